//! The abstract clustering engine.
//!
//! Owns the summary and commit streams for the lifetime of a run, the
//! definition arena with its symbol table, the file-axis table, and the
//! cluster arena. The pipeline is strictly ordered and single-threaded:
//! `process_summaries` builds the symbol graph and its statistics,
//! `process_commits` attributes definitions to files, and `cluster` runs
//! the multi-pass grouping (namespace, alias, chronic, occurrence,
//! resonance hub, dissonance hub, file cohesion). Quality metrics are
//! queried afterwards.
//!
//! Every dynamic entry point is total on well-formed input; only the
//! lookup-style helpers (`find_summary_by_id`, `find_commit_by_id`)
//! return an error, and only on a missing key.

pub mod alias;
pub mod attribution;
pub mod banding;
pub mod hubs;
pub mod ingest;
pub mod metrics;
pub mod namespace;
pub mod similarity;
pub mod stats;

pub use similarity::{cosine, feature_dot, DotProduct};

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::core::{
    normalize_symbol, Cluster, ClusterId, ClusterKind, Commit, DefId, Definition, Error, Result,
    Summary,
};

/// Pipeline progress marker; states are strictly ordered
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineState {
    Empty,
    SummariesIngested,
    StatsComputed,
    CommitsIngested,
    FilesAttributed,
    Clustered,
}

/// Aggregate counters over the symbol table
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EngineStats {
    pub total_definitions: usize,
    pub total_summaries: usize,
    pub total_connections: usize,
    pub average_commit_frequency: f64,
    pub average_chronic_point: f64,
    pub average_connections_per_definition: f64,
}

/// The symbolic semantic-memory engine
pub struct ClusterEngine {
    pub(crate) config: EngineConfig,
    pub(crate) state: PipelineState,
    pub(crate) summaries: Vec<Summary>,
    pub(crate) commits: Vec<Commit>,
    /// Definition arena; alias unification tombstones dominated slots
    pub(crate) defs: Vec<Option<Definition>>,
    /// Symbol table over the arena; arena order is insertion order
    pub(crate) symbols: HashMap<String, DefId>,
    /// File-path definitions on the sorted file axis
    pub(crate) files: Vec<Definition>,
    pub(crate) file_index: HashMap<String, usize>,
    /// Cluster arena; child contexts live here but only top-level
    /// clusters appear in `top`
    pub(crate) clusters: Vec<Cluster>,
    /// The global cluster list, in emission order
    pub(crate) top: Vec<ClusterId>,
    /// Root namespace contexts, in creation order
    pub(crate) roots: Vec<ClusterId>,
}

impl Default for ClusterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            state: PipelineState::Empty,
            summaries: Vec::new(),
            commits: Vec::new(),
            defs: Vec::new(),
            symbols: HashMap::new(),
            files: Vec::new(),
            file_index: HashMap::new(),
            clusters: Vec::new(),
            top: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Ingest the chronological summary stream, oldest first, and compute
    /// per-definition statistics. Resets the engine first, so re-ingestion
    /// always starts from empty. Never fails.
    pub fn process_summaries(&mut self, mut summaries: Vec<Summary>) {
        self.clear();

        for (i, summary) in summaries.iter_mut().enumerate() {
            summary.time_index = i;
        }
        self.summaries = summaries;
        self.state = PipelineState::SummariesIngested;

        debug!(summaries = self.summaries.len(), "ingesting summary stream");
        self.ingest_summaries();
        self.compute_statistics();
        self.state = PipelineState::StatsComputed;
    }

    /// Ingest the raw commit stream: link each commit to the summary with
    /// the same id, derive file buckets with rename detection, build the
    /// sorted file axis, and recompute statistics over the enlarged symbol
    /// set. Never fails.
    pub fn process_commits(&mut self, commits: Vec<Commit>) {
        self.commits = commits;
        self.link_commits();
        self.state = PipelineState::CommitsIngested;

        debug!(commits = self.commits.len(), "attributing files");
        self.attribute_files();
        self.compute_statistics();
        self.state = PipelineState::FilesAttributed;
    }

    /// Run the clustering pipeline in its fixed pass order. Never fails;
    /// on an empty engine every pass is a no-op.
    pub fn cluster(&mut self) {
        self.clusters.clear();
        self.top.clear();
        self.roots.clear();
        for def in self.defs.iter_mut().flatten() {
            def.cluster_frequency = 0.0;
        }

        debug!("clustering: namespace decomposition");
        self.decompose_namespaces();
        debug!("clustering: alias unification");
        self.unify_aliases();
        // Re-normalize statistics over the merged connection lists
        self.compute_statistics();

        debug!("clustering: chronic band pass");
        self.band_pass(ClusterKind::Chronic, |d| d.chronic_point);
        debug!("clustering: occurrence band pass");
        self.band_pass(ClusterKind::Occurrence, |d| d.commit_frequency);
        self.normalize_cluster_frequencies();

        debug!("clustering: resonance hub pass");
        self.resonance_pass();
        debug!("clustering: dissonance hub pass");
        self.dissonance_pass();

        debug!("clustering: file cohesion pass");
        self.build_file_clusters();

        self.state = PipelineState::Clustered;
        debug!(clusters = self.top.len(), "clustering finished");
    }

    /// Drop all graph state and return to the empty pipeline state
    pub fn clear(&mut self) {
        self.summaries.clear();
        self.commits.clear();
        self.defs.clear();
        self.symbols.clear();
        self.files.clear();
        self.file_index.clear();
        self.clusters.clear();
        self.top.clear();
        self.roots.clear();
        self.state = PipelineState::Empty;
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn summaries(&self) -> &[Summary] {
        &self.summaries
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    /// Live definitions in insertion order
    pub fn definitions(&self) -> impl Iterator<Item = (DefId, &Definition)> {
        self.defs
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|d| (DefId(i), d)))
    }

    pub fn definition(&self, symbol: &str) -> Option<&Definition> {
        self.symbols
            .get(symbol)
            .and_then(|id| self.definition_by_id(*id))
    }

    pub fn definition_by_id(&self, id: DefId) -> Option<&Definition> {
        self.defs.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn definition_count(&self) -> usize {
        self.defs.iter().flatten().count()
    }

    /// File-path definitions on the sorted file axis
    pub fn files(&self) -> &[Definition] {
        &self.files
    }

    pub fn file(&self, path: &str) -> Option<&Definition> {
        self.file_index.get(path).and_then(|i| self.files.get(*i))
    }

    /// Top-level clusters in emission order
    pub fn clusters(&self) -> impl Iterator<Item = (ClusterId, &Cluster)> {
        self.top
            .iter()
            .filter_map(|id| self.clusters.get(id.0).map(|c| (*id, c)))
    }

    pub fn clusters_by_kind(&self, kind: ClusterKind) -> Vec<(ClusterId, &Cluster)> {
        self.clusters().filter(|(_, c)| c.kind == kind).collect()
    }

    pub fn cluster_count(&self) -> usize {
        self.top.len()
    }

    pub fn cluster_node(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.0)
    }

    /// Root context whose label matches `name` after normalization
    pub fn root_context(&self, name: &str) -> Option<ClusterId> {
        let wanted = normalize_symbol(name);
        self.roots.iter().copied().find(|id| {
            self.cluster_node(*id)
                .and_then(|c| c.symbol.as_deref())
                .is_some_and(|s| normalize_symbol(s) == wanted)
        })
    }

    /// Child context of `parent` whose label matches `name` after
    /// normalization
    pub fn child_context(&self, parent: ClusterId, name: &str) -> Option<ClusterId> {
        let wanted = normalize_symbol(name);
        let parent = self.cluster_node(parent)?;
        parent.cluster_members().find(|id| {
            self.cluster_node(*id)
                .filter(|c| c.kind == ClusterKind::Context)
                .and_then(|c| c.symbol.as_deref())
                .is_some_and(|s| normalize_symbol(s) == wanted)
        })
    }

    /// Aggregate counters over the live symbol table; all zeros on an
    /// empty engine
    pub fn statistics(&self) -> EngineStats {
        let mut stats = EngineStats {
            total_summaries: self.summaries.len(),
            ..EngineStats::default()
        };

        let mut sum_frequency = 0.0;
        let mut sum_chronic = 0.0;
        for (_, def) in self.definitions() {
            stats.total_definitions += 1;
            stats.total_connections += def.connections.len();
            sum_frequency += def.commit_frequency;
            sum_chronic += def.chronic_point;
        }

        if stats.total_definitions > 0 {
            let count = stats.total_definitions as f64;
            stats.average_commit_frequency = sum_frequency / count;
            stats.average_chronic_point = sum_chronic / count;
            stats.average_connections_per_definition = stats.total_connections as f64 / count;
        }

        stats
    }

    /// Look up a summary by commit hash. Not used on the hot path.
    pub fn find_summary_by_id(&self, id: &str) -> Result<&Summary> {
        self.summaries
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::not_found("summary", id))
    }

    /// Look up a commit by hash. Not used on the hot path.
    pub fn find_commit_by_id(&self, id: &str) -> Result<&Commit> {
        self.commits
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::not_found("commit", id))
    }

    /// Definitions whose chronic point lies within `threshold` of the
    /// named symbol's
    pub fn temporally_related(&self, symbol: &str, threshold: f64) -> Vec<&Definition> {
        let Some(target) = self.definition(symbol) else {
            return Vec::new();
        };
        self.definitions()
            .filter(|(_, d)| d.symbol != symbol)
            .filter(|(_, d)| (target.chronic_point - d.chronic_point).abs() <= threshold)
            .map(|(_, d)| d)
            .collect()
    }

    /// Definitions whose commit-stream cosine similarity to the named
    /// symbol reaches `threshold`
    pub fn co_occurring(&self, symbol: &str, threshold: f64) -> Vec<&Definition> {
        let Some(target) = self.definition(symbol) else {
            return Vec::new();
        };
        self.definitions()
            .filter(|(_, d)| d.symbol != symbol)
            .filter(|(_, d)| self.cosine_similarity(target, d) >= threshold)
            .map(|(_, d)| d)
            .collect()
    }

    /// Append a cluster to the arena and the global list
    pub(crate) fn push_top(&mut self, cluster: Cluster) -> ClusterId {
        let id = ClusterId(self.clusters.len());
        self.clusters.push(cluster);
        self.top.push(id);
        id
    }

    /// Append a cluster to the arena only (nested contexts)
    pub(crate) fn push_nested(&mut self, cluster: Cluster) -> ClusterId {
        let id = ClusterId(self.clusters.len());
        self.clusters.push(cluster);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_with(id: &str, defs: &[&str]) -> Summary {
        let mut s = Summary::new(id);
        s.ctag_definitions = defs.iter().map(|d| d.to_string()).collect();
        s
    }

    #[test]
    fn test_empty_engine_statistics_are_zero() {
        let engine = ClusterEngine::new();
        assert_eq!(engine.statistics(), EngineStats::default());
    }

    #[test]
    fn test_state_transitions() {
        let mut engine = ClusterEngine::new();
        assert_eq!(engine.state(), PipelineState::Empty);

        engine.process_summaries(vec![summary_with("c1", &["FunctionA"])]);
        assert_eq!(engine.state(), PipelineState::StatsComputed);

        engine.process_commits(Vec::new());
        assert_eq!(engine.state(), PipelineState::FilesAttributed);

        engine.cluster();
        assert_eq!(engine.state(), PipelineState::Clustered);

        engine.clear();
        assert_eq!(engine.state(), PipelineState::Empty);
    }

    #[test]
    fn test_clear_resets_statistics() {
        let mut engine = ClusterEngine::new();
        engine.process_summaries(vec![
            summary_with("c1", &["FunctionA", "FunctionB"]),
            summary_with("c2", &["FunctionA"]),
        ]);
        assert!(engine.statistics().total_definitions > 0);

        engine.clear();
        assert_eq!(engine.statistics(), EngineStats::default());
    }

    #[test]
    fn test_reingestion_starts_from_empty() {
        let mut engine = ClusterEngine::new();
        engine.process_summaries(vec![summary_with("c1", &["FunctionA"])]);
        engine.process_summaries(vec![summary_with("c2", &["FunctionB"])]);

        assert!(engine.definition("FunctionA").is_none());
        assert!(engine.definition("FunctionB").is_some());
        assert_eq!(engine.statistics().total_definitions, 1);
    }

    #[test]
    fn test_find_commit_by_id_not_found() {
        let engine = ClusterEngine::new();
        assert!(engine.find_commit_by_id("missing").is_err());
        assert!(engine.find_summary_by_id("missing").is_err());
    }

    #[test]
    fn test_statistics_counts() {
        let mut engine = ClusterEngine::new();
        engine.process_summaries(vec![
            summary_with("c1", &["FunctionA", "FunctionB", "FunctionC"]),
            summary_with("c2", &["FunctionA", "FunctionB", "FunctionD"]),
            summary_with("c3", &["FunctionC", "FunctionE", "FunctionF"]),
            summary_with("c4", &["FunctionD", "FunctionE"]),
        ]);

        let stats = engine.statistics();
        assert_eq!(stats.total_summaries, 4);
        assert_eq!(stats.total_definitions, 6);
        assert_eq!(stats.total_connections, 11);
        assert!(stats.average_connections_per_definition > 1.0);
    }
}
