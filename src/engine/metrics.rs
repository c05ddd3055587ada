//! Clustering quality metrics.
//!
//! All metrics are total: before clustering (or on an empty engine) they
//! return their documented zero case, and a vector of the wrong dimension
//! is skipped locally rather than corrupting a result.

use crate::core::{ClusterId, DefId};
use crate::engine::ClusterEngine;

/// Squared Euclidean distance; `None` on a dimension mismatch
fn squared_distance(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    Some(a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum())
}

fn distance(a: &[f64], b: &[f64]) -> Option<f64> {
    squared_distance(a, b).map(f64::sqrt)
}

/// Mean pairwise squared Euclidean distance over a vector set;
/// mismatched pairs are skipped
fn mean_pairwise_squared_distance(vectors: &[Vec<f64>]) -> f64 {
    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..vectors.len() {
        for j in (i + 1)..vectors.len() {
            if let Some(d) = squared_distance(&vectors[i], &vectors[j]) {
                total += d;
                pairs += 1;
            }
        }
    }
    if pairs == 0 {
        0.0
    } else {
        total / pairs as f64
    }
}

/// Componentwise mean of a non-empty vector set, sized by its first entry;
/// mismatched vectors are skipped
fn centroid(vectors: &[Vec<f64>]) -> Option<Vec<f64>> {
    let dimensions = vectors.first()?.len();
    let mut sum = vec![0.0; dimensions];
    let mut count = 0usize;
    for v in vectors {
        if v.len() != dimensions {
            continue;
        }
        for (s, x) in sum.iter_mut().zip(v.iter()) {
            *s += x;
        }
        count += 1;
    }
    if count == 0 {
        return None;
    }
    for s in sum.iter_mut() {
        *s /= count as f64;
    }
    Some(sum)
}

impl ClusterEngine {
    /// Entropy gain: mean pairwise spread of the definition vectors minus
    /// the spread of the cluster vectors. Positive means clustering
    /// reduced spread. 0.0 before clustering.
    pub fn entropy_gain(&self) -> f64 {
        if self.top.is_empty() {
            return 0.0;
        }

        let definition_vectors: Vec<Vec<f64>> = self
            .definitions()
            .map(|(_, d)| d.feature_vector().to_vec())
            .collect();
        let cluster_vectors: Vec<Vec<f64>> = self
            .top
            .iter()
            .map(|id| self.cluster_vector(*id).to_vec())
            .collect();

        mean_pairwise_squared_distance(&definition_vectors)
            - mean_pairwise_squared_distance(&cluster_vectors)
    }

    /// Variance gain: 1 − intra-cluster variance over definition
    /// variance. 1.0 means clustering perfectly explains the spread.
    /// 0.0 before clustering or when the definitions have no spread.
    pub fn variance_gain(&self) -> f64 {
        let populations = self.definition_populations();
        if populations.is_empty() {
            return 0.0;
        }

        let all_vectors: Vec<Vec<f64>> = self
            .definitions()
            .map(|(_, d)| d.feature_vector().to_vec())
            .collect();
        let Some(global_centroid) = centroid(&all_vectors) else {
            return 0.0;
        };

        let mut total_variance = 0.0;
        let mut total_count = 0usize;
        for v in &all_vectors {
            if let Some(d) = squared_distance(v, &global_centroid) {
                total_variance += d;
                total_count += 1;
            }
        }
        if total_count == 0 {
            return 0.0;
        }
        total_variance /= total_count as f64;
        if total_variance == 0.0 {
            return 0.0;
        }

        let mut intra = 0.0;
        let mut members = 0usize;
        for (_, population) in &populations {
            let vectors: Vec<Vec<f64>> = population
                .iter()
                .filter_map(|id| self.definition_by_id(*id))
                .map(|d| d.feature_vector().to_vec())
                .collect();
            let Some(cluster_centroid) = centroid(&vectors) else {
                continue;
            };
            for v in &vectors {
                if let Some(d) = squared_distance(v, &cluster_centroid) {
                    intra += d;
                    members += 1;
                }
            }
        }
        if members == 0 {
            return 0.0;
        }
        intra /= members as f64;

        1.0 - intra / total_variance
    }

    /// Silhouette score averaged over every definition membership in a
    /// cluster of size ≥ 2; `b` minimizes over clusters that do not
    /// contain the point. 0.0 with fewer than two non-empty clusters.
    pub fn silhouette_score(&self) -> f64 {
        let populations = self.definition_populations();
        if populations.len() < 2 {
            return 0.0;
        }

        let mut terms: Vec<f64> = Vec::new();
        for (i, (_, population)) in populations.iter().enumerate() {
            if population.len() < 2 {
                continue;
            }
            for &point in population {
                let Some(point_vector) = self.definition_by_id(point).map(|d| d.feature_vector())
                else {
                    continue;
                };

                let a = self.mean_distance_to(&point_vector, population, Some(point));
                let b = populations
                    .iter()
                    .enumerate()
                    .filter(|(j, (_, other))| *j != i && !other.contains(&point))
                    .filter_map(|(_, (_, other))| {
                        let d = self.mean_distance_to(&point_vector, other, None);
                        d.is_finite().then_some(d)
                    })
                    .fold(f64::INFINITY, f64::min);
                if !b.is_finite() {
                    continue;
                }

                let denom = a.max(b);
                terms.push(if denom > 0.0 { (b - a) / denom } else { 0.0 });
            }
        }

        if terms.is_empty() {
            0.0
        } else {
            terms.iter().sum::<f64>() / terms.len() as f64
        }
    }

    /// Mean member count across the non-empty top-level clusters
    pub fn average_cluster_size(&self) -> f64 {
        let sizes: Vec<usize> = self
            .clusters()
            .filter(|(_, c)| !c.is_empty())
            .map(|(_, c)| c.len())
            .collect();
        if sizes.is_empty() {
            return 0.0;
        }
        sizes.iter().sum::<usize>() as f64 / sizes.len() as f64
    }

    /// Top-level clusters that hold at least one live definition, with
    /// their definition populations
    fn definition_populations(&self) -> Vec<(ClusterId, Vec<DefId>)> {
        self.clusters()
            .map(|(id, c)| {
                let defs: Vec<DefId> = c
                    .definition_members()
                    .filter(|d| self.definition_by_id(*d).is_some())
                    .collect();
                (id, defs)
            })
            .filter(|(_, defs)| !defs.is_empty())
            .collect()
    }

    /// Mean Euclidean distance from a point to a population, optionally
    /// excluding one member (the point itself)
    fn mean_distance_to(&self, point: &[f64; 4], population: &[DefId], exclude: Option<DefId>) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;
        for &id in population {
            if exclude == Some(id) {
                continue;
            }
            let Some(other) = self.definition_by_id(id) else {
                continue;
            };
            if let Some(d) = distance(point, &other.feature_vector()) {
                total += d;
                count += 1;
            }
        }
        if count == 0 {
            f64::INFINITY
        } else {
            total / count as f64
        }
    }
}
