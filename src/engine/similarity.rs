//! Vector and similarity kernel.
//!
//! Two vector spaces coexist: the dense per-commit weight vector (length
//! = summary count) used for cosine similarity between definitions, and
//! the four-component feature vector used for dot products in resonance
//! analysis and for cluster vectors. Cluster vectors are the
//! L2-normalized component sums of their member vectors, memoized on
//! first access and discarded only with the cluster arena.

use crate::core::{ClusterId, Definition, Member, FEATURE_DIMENSIONS};
use crate::engine::ClusterEngine;

/// Feature-vector dot product with its per-component products, kept for
/// resonance analysis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotProduct {
    pub scalar: f64,
    pub components: [f64; FEATURE_DIMENSIONS],
}

/// Raw (unnormalized) dot product of two feature vectors
pub fn feature_dot(
    a: &[f64; FEATURE_DIMENSIONS],
    b: &[f64; FEATURE_DIMENSIONS],
) -> DotProduct {
    let mut components = [0.0; FEATURE_DIMENSIONS];
    let mut scalar = 0.0;
    for i in 0..FEATURE_DIMENSIONS {
        components[i] = a[i] * b[i];
        scalar += components[i];
    }
    DotProduct { scalar, components }
}

/// Cosine similarity between two equal-length weight vectors; 0.0 on a
/// length mismatch or a zero norm
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let norm_a = norm_a.sqrt();
    let norm_b = norm_b.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// L2-normalize in place; the zero vector stays zero
pub fn normalize(mut v: [f64; FEATURE_DIMENSIONS]) -> [f64; FEATURE_DIMENSIONS] {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
    v
}

impl ClusterEngine {
    /// Dense per-commit weight vector for a definition: entry i carries
    /// the accumulated connection weight at summary index i
    pub fn connection_weights(&self, def: &Definition) -> Vec<f64> {
        let mut weights = vec![0.0; self.summaries.len()];
        for conn in &def.connections {
            if conn.index < weights.len() {
                weights[conn.index] += conn.weight;
            }
        }
        weights
    }

    /// Cosine similarity over the per-commit weight vectors of two
    /// definitions
    pub fn cosine_similarity(&self, a: &Definition, b: &Definition) -> f64 {
        cosine(&self.connection_weights(a), &self.connection_weights(b))
    }

    /// Symmetric pairwise similarity matrix over the live definitions,
    /// name-sorted for a stable row order
    pub fn similarity_matrix(&self) -> Vec<Vec<f64>> {
        let mut defs: Vec<&Definition> = self.definitions().map(|(_, d)| d).collect();
        defs.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        let n = defs.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            matrix[i][i] = 1.0;
            for j in (i + 1)..n {
                let similarity = self.cosine_similarity(defs[i], defs[j]);
                matrix[i][j] = similarity;
                matrix[j][i] = similarity;
            }
        }
        matrix
    }

    /// Memoized cluster feature vector: the normalized component sum of
    /// member vectors, the zero vector for an empty cluster
    pub fn cluster_vector(&self, id: ClusterId) -> [f64; FEATURE_DIMENSIONS] {
        let Some(cluster) = self.clusters.get(id.0) else {
            return [0.0; FEATURE_DIMENSIONS];
        };

        *cluster.vector.get_or_init(|| {
            let mut sum = [0.0; FEATURE_DIMENSIONS];
            for member in &cluster.members {
                let v = self.member_vector(*member);
                for i in 0..FEATURE_DIMENSIONS {
                    sum[i] += v[i];
                }
            }
            normalize(sum)
        })
    }

    /// Feature vector of a member node; a dangling reference contributes
    /// the zero vector
    pub fn member_vector(&self, member: Member) -> [f64; FEATURE_DIMENSIONS] {
        match member {
            Member::Definition(id) => self
                .definition_by_id(id)
                .map(|d| d.feature_vector())
                .unwrap_or_default(),
            Member::Cluster(id) => self.cluster_vector(id),
        }
    }
}
