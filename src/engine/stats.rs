//! Per-definition statistics: commit frequency and chronic point.
//!
//! Recomputed after file attribution (the file axis adds synthetic
//! definitions) and again after alias unification (merged connection
//! lists may otherwise push the frequency past 1.0; the ceiling keeps the
//! feature inside its documented range).

use crate::core::Definition;
use crate::engine::ingest::connection_weight;
use crate::engine::ClusterEngine;

impl ClusterEngine {
    /// Finalize `commit_frequency` and `chronic_point` on every live
    /// definition and every file-axis definition.
    pub(crate) fn compute_statistics(&mut self) {
        let total = self.summaries.len();
        let max_weight: f64 = (0..total).map(|i| connection_weight(i, total)).sum();

        for def in self.defs.iter_mut().flatten() {
            finalize(def, total, max_weight);
        }
        for def in self.files.iter_mut() {
            finalize(def, total, max_weight);
        }
    }
}

/// Commit frequency: accumulated connection weight as a fraction of the
/// weight of appearing once in every summary. Chronic point: the weighted
/// temporal center of mass on the normalized summary axis.
fn finalize(def: &mut Definition, total: usize, max_weight: f64) {
    def.commit_frequency = if max_weight > 0.0 {
        (def.connection_sum() / max_weight).min(1.0)
    } else {
        0.0
    };

    if def.connections.is_empty() {
        def.chronic_point = 0.0;
        return;
    }

    let span = total.saturating_sub(1) as f64;
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for conn in &def.connections {
        // A single-summary stream has a degenerate time axis; 0.0 by the
        // division-by-zero convention
        let normalized_time = if span > 0.0 {
            conn.index as f64 / span
        } else {
            0.0
        };
        weighted_sum += normalized_time * conn.weight;
        total_weight += conn.weight;
    }

    def.chronic_point = if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    };
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

    fn stream(specs: &[&[&str]]) -> ClusterEngine {
        let mut engine = ClusterEngine::new();
        let summaries = specs
            .iter()
            .enumerate()
            .map(|(i, defs)| summary_with(&format!("c{i}"), defs))
            .collect();
        engine.process_summaries(summaries);
        engine
    }

    #[test]
    fn test_features_stay_in_unit_interval() {
        let engine = stream(&[&["Alpha", "Beta"], &["Alpha"], &["Gamma"]]);
        for (_, def) in engine.definitions() {
            assert!((0.0..=1.0).contains(&def.commit_frequency));
            assert!((0.0..=1.0).contains(&def.chronic_point));
        }
    }

    #[test]
    fn test_ubiquitous_definition_reaches_full_frequency() {
        let engine = stream(&[&["Alpha"], &["Alpha"], &["Alpha"], &["Alpha"]]);
        let def = engine.definition("Alpha").unwrap();
        assert!((def.commit_frequency - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_chronic_point_extremes() {
        let engine = stream(&[&["First"], &["Middle"], &["Last"]]);
        let first = engine.definition("First").unwrap();
        let last = engine.definition("Last").unwrap();
        assert!(first.chronic_point.abs() < 1e-9);
        assert!((last.chronic_point - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_chronic_point_weighted_toward_recent() {
        // Present in summaries 0 and 2 of three; the later connection
        // carries more weight, so the centroid sits past the midpoint.
        let engine = stream(&[&["Alpha"], &[], &["Alpha"]]);
        let def = engine.definition("Alpha").unwrap();
        // weights 1/3 and 1; centroid = (0*1/3 + 1*1) / (4/3) = 0.75
        assert!((def.chronic_point - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_single_summary_chronic_point_is_zero() {
        let engine = stream(&[&["Alpha"]]);
        let def = engine.definition("Alpha").unwrap();
        assert_eq!(def.chronic_point, 0.0);
        assert!((def.commit_frequency - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_double_mention_frequency_is_clamped() {
        let mut engine = ClusterEngine::new();
        let mut s = summary_with("c1", &["Alpha"]);
        s.regex_definitions = vec!["Alpha".to_string()];
        engine.process_summaries(vec![s]);

        let def = engine.definition("Alpha").unwrap();
        assert!((def.commit_frequency - 1.0).abs() < 1e-9);
    }
}
