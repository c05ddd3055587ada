//! Hub aggregation: clusters become the data points.
//!
//! The resonance pass groups clusters whose definitions relate to one
//! another with similar average feature dot products; the dissonance pass
//! groups clusters spanning similar field radii. Both reuse the adaptive
//! band walk and append to the same global list, so the dissonance pass
//! also sees the resonance hubs it runs after.

use crate::core::{Cluster, ClusterId, ClusterKind, Member};
use crate::engine::banding::adaptive_bands;
use crate::engine::similarity::feature_dot;
use crate::engine::ClusterEngine;

impl ClusterEngine {
    pub(crate) fn resonance_pass(&mut self) {
        let scored: Vec<(ClusterId, f64)> = self
            .top
            .iter()
            .map(|id| (*id, self.average_pairwise_dot(*id)))
            .collect();
        self.hub_walk(scored, ClusterKind::ResonanceHub);
    }

    pub(crate) fn dissonance_pass(&mut self) {
        let scored: Vec<(ClusterId, f64)> = self
            .top
            .iter()
            .filter_map(|id| self.cluster_node(*id).map(|c| (*id, c.radius)))
            .collect();
        self.hub_walk(scored, ClusterKind::DissonanceHub);
    }

    /// Mean raw feature dot product over all unordered pairs of the
    /// cluster's definition members; 0.0 below two members
    pub(crate) fn average_pairwise_dot(&self, id: ClusterId) -> f64 {
        let Some(cluster) = self.cluster_node(id) else {
            return 0.0;
        };
        let vectors: Vec<[f64; 4]> = cluster
            .definition_members()
            .filter_map(|def_id| self.definition_by_id(def_id))
            .map(|d| d.feature_vector())
            .collect();
        if vectors.len() < 2 {
            return 0.0;
        }

        let mut total = 0.0;
        let mut pairs = 0usize;
        for i in 0..vectors.len() {
            for j in (i + 1)..vectors.len() {
                total += feature_dot(&vectors[i], &vectors[j]).scalar;
                pairs += 1;
            }
        }
        total / pairs as f64
    }

    /// Sort the scored clusters ascending and run the adaptive band walk,
    /// emitting hubs of the given kind onto the global list
    fn hub_walk(&mut self, mut scored: Vec<(ClusterId, f64)>, kind: ClusterKind) {
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let values: Vec<f64> = scored.iter().map(|(_, v)| v).copied().collect();
        for band in adaptive_bands(&values, self.config.band_tail) {
            let mut hub = Cluster::new(kind);
            hub.radius = band.radius;
            for position in band.members {
                hub.members.push(Member::Cluster(scored[position].0));
            }
            self.push_top(hub);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Summary;

    fn summary_with(id: &str, defs: &[&str]) -> Summary {
        let mut s = Summary::new(id);
        s.ctag_definitions = defs.iter().map(|d| d.to_string()).collect();
        s
    }

    /// Two early groups and two late groups, big enough for the band
    /// passes to emit several clusters for the hubs to aggregate
    fn grouped_engine() -> ClusterEngine {
        let mut engine = ClusterEngine::new();
        engine.process_summaries(vec![
            summary_with("c1", &["alpha_a", "alpha_b", "alpha_c"]),
            summary_with("c2", &["alpha_a", "alpha_b", "alpha_c"]),
            summary_with("c3", &["beta_a", "beta_b", "beta_c"]),
            summary_with("c4", &["beta_a", "beta_b", "beta_c"]),
        ]);
        engine.cluster();
        engine
    }

    #[test]
    fn test_hub_members_are_clusters() {
        let engine = grouped_engine();
        for kind in [ClusterKind::ResonanceHub, ClusterKind::DissonanceHub] {
            for (_, hub) in engine.clusters_by_kind(kind) {
                assert!(!hub.is_empty());
                assert!(hub.definition_members().next().is_none());
            }
        }
    }

    #[test]
    fn test_dissonance_pass_emits_hubs() {
        let engine = grouped_engine();
        // Four band clusters share radius 0.0, so the radius walk groups
        // them into at least one hub
        assert!(!engine.clusters_by_kind(ClusterKind::DissonanceHub).is_empty());
    }

    #[test]
    fn test_average_pairwise_dot_identical_members() {
        let engine = grouped_engine();
        let (id, cluster) = engine
            .clusters_by_kind(ClusterKind::Chronic)
            .into_iter()
            .find(|(_, c)| c.definition_members().count() >= 2)
            .expect("a chronic band with two members");

        let first = cluster
            .definition_members()
            .next()
            .and_then(|d| engine.definition_by_id(d))
            .unwrap();
        let expected = feature_dot(&first.feature_vector(), &first.feature_vector()).scalar;
        // Band members carry identical features here, so the average
        // pairwise dot equals the self dot
        assert!((engine.average_pairwise_dot(id) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_average_pairwise_dot_degenerate() {
        let mut engine = ClusterEngine::new();
        let id = engine.push_top(Cluster::new(ClusterKind::Chronic));
        assert_eq!(engine.average_pairwise_dot(id), 0.0);
    }
}
