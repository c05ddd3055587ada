//! Namespace decomposition: scoped symbols become a nested context tree.
//!
//! `app::net::Server` yields a root context `app` holding a context `net`
//! holding the definition re-keyed to `Server`. Context lookup is by
//! normalized name, so `Net_IO` and `netio` resolve to the same context.

use crate::core::{Cluster, ClusterId, DefId, Member};
use crate::engine::ClusterEngine;

/// Scope segments of a raw symbol, split on `::` and `/`
fn scope_segments(symbol: &str) -> Vec<&str> {
    symbol
        .split("::")
        .flat_map(|part| part.split('/'))
        .filter(|part| !part.is_empty())
        .collect()
}

impl ClusterEngine {
    pub(crate) fn decompose_namespaces(&mut self) {
        let ids: Vec<DefId> = self.definitions().map(|(id, _)| id).collect();

        for id in ids {
            let Some(symbol) = self.definition_by_id(id).map(|d| d.symbol.clone()) else {
                continue;
            };
            if !symbol.contains("::") && !symbol.contains('/') {
                continue;
            }
            let segments = scope_segments(&symbol);
            if segments.len() < 2 {
                continue;
            }

            let mut context = self.find_or_create_root(segments[0]);
            for segment in &segments[1..segments.len() - 1] {
                context = self.find_or_create_child(context, segment);
            }

            let tail = segments[segments.len() - 1].to_string();
            let surviving = self.rekey_definition(id, &symbol, tail);
            if let Some(cluster) = self.clusters.get_mut(context.0) {
                if !cluster.contains_definition(surviving) {
                    cluster.members.push(Member::Definition(surviving));
                }
            }
        }
    }

    /// Re-key a decomposed definition under its tail segment. A tail that
    /// collides with an existing entry merges into it with accumulation
    /// semantics, recording the scoped symbol in the survivor's history.
    fn rekey_definition(&mut self, id: DefId, old_symbol: &str, tail: String) -> DefId {
        self.symbols.remove(old_symbol);

        match self.symbols.get(&tail).copied() {
            Some(existing) if existing != id => {
                if let Some(dominated) = self.defs[id.0].take() {
                    if let Some(survivor) = self.defs[existing.0].as_mut() {
                        survivor.history.push(dominated.symbol);
                        survivor.connections.extend(dominated.connections);
                    }
                }
                existing
            }
            _ => {
                if let Some(def) = self.defs[id.0].as_mut() {
                    def.symbol = tail.clone();
                }
                self.symbols.insert(tail, id);
                id
            }
        }
    }

    fn find_or_create_root(&mut self, name: &str) -> ClusterId {
        if let Some(id) = self.root_context(name) {
            return id;
        }
        let id = self.push_top(Cluster::context(name));
        self.roots.push(id);
        id
    }

    fn find_or_create_child(&mut self, parent: ClusterId, name: &str) -> ClusterId {
        if let Some(id) = self.child_context(parent, name) {
            return id;
        }
        let id = self.push_nested(Cluster::context(name));
        if let Some(cluster) = self.clusters.get_mut(parent.0) {
            cluster.members.push(Member::Cluster(id));
        }
        id
    }
}
