//! Alias unification: symbols equivalent under case/underscore
//! normalization collapse into the newest spelling.
//!
//! Later naming conventions supersede earlier ones; the dominated
//! spellings move into the survivor's history so renames stay traceable.

use crate::core::{normalize_symbol, DefId};
use crate::engine::ClusterEngine;

impl ClusterEngine {
    pub(crate) fn unify_aliases(&mut self) {
        // Group live definitions by normalized name, preserving first-seen
        // order so the pass is deterministic
        let mut order: Vec<String> = Vec::new();
        let mut groups: std::collections::HashMap<String, Vec<DefId>> =
            std::collections::HashMap::new();

        for (id, def) in self.definitions() {
            let key = normalize_symbol(&def.symbol);
            let group = groups.entry(key.clone()).or_default();
            if group.is_empty() {
                order.push(key);
            }
            group.push(id);
        }

        for key in order {
            let Some(group) = groups.get(&key) else {
                continue;
            };
            if group.len() < 2 {
                continue;
            }

            // Arena ids ascend with insertion, so the last entry is the
            // newest alias and inherits the rest
            let survivor = group[group.len() - 1];
            for &dominated_id in &group[..group.len() - 1] {
                let Some(dominated) = self.defs[dominated_id.0].take() else {
                    continue;
                };
                self.symbols.remove(&dominated.symbol);
                if let Some(inheritor) = self.defs[survivor.0].as_mut() {
                    inheritor.history.push(dominated.symbol);
                    inheritor.connections.extend(dominated.connections);
                }
            }
        }
    }
}
