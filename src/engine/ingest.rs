//! Graph ingest: builds the symbol/connection graph from the summary
//! stream.
//!
//! Each summary contributes a linearly time-rising weight so that recent
//! activity dominates while no summary is weighted zero. A symbol named in
//! both the ctag and regex lists of the same summary accumulates its
//! weight twice on the same connection.

use crate::core::{Connection, DefId, Definition};
use crate::engine::ClusterEngine;

/// Connection weight for the summary at `time_index` out of `total`:
/// (i + 1) / N, ranging from 1/N for the oldest summary to 1.0 for the
/// newest.
pub(crate) fn connection_weight(time_index: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (time_index as f64 + 1.0) / total as f64
}

impl ClusterEngine {
    pub(crate) fn ingest_summaries(&mut self) {
        let total = self.summaries.len();

        for i in 0..total {
            let weight = connection_weight(i, total);
            let names: Vec<String> = self.summaries[i]
                .ctag_definitions
                .iter()
                .chain(self.summaries[i].regex_definitions.iter())
                .filter(|name| !name.is_empty())
                .cloned()
                .collect();

            for name in names {
                self.add_definition(&name, i, weight);
            }
        }
    }

    /// Locate or create the definition for `symbol` and connect it to the
    /// summary at `summary_index`; a connection that already exists for
    /// that index accumulates the new weight instead.
    pub(crate) fn add_definition(&mut self, symbol: &str, summary_index: usize, weight: f64) {
        let id = self.symbols.get(symbol).copied().unwrap_or_else(|| {
            let id = DefId(self.defs.len());
            self.defs.push(Some(Definition::new(symbol)));
            self.symbols.insert(symbol.to_string(), id);
            id
        });

        if let Some(def) = self.defs[id.0].as_mut() {
            match def
                .connections
                .iter_mut()
                .find(|c| c.index == summary_index)
            {
                Some(existing) => existing.weight += weight,
                None => def.connections.push(Connection {
                    index: summary_index,
                    weight,
                }),
            }
        }
    }
}
