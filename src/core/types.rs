//! Core data model for the clustering engine.
//!
//! Definitions live in an arena owned by the engine and are addressed by
//! [`DefId`]; clusters (including namespace contexts) live in a second
//! arena addressed by [`ClusterId`]. Cluster membership is a closed tagged
//! variant rather than an open hierarchy, so ownership stays single-rooted
//! and `clear()` is a plain arena reset.

use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};

/// Number of scalar features tracked per node
pub const FEATURE_DIMENSIONS: usize = 4;

/// Index of a [`Definition`] in the engine's definition arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub usize);

/// Index of a [`Cluster`] in the engine's cluster arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClusterId(pub usize);

/// A processed commit record carrying generated messages and the symbol
/// lists extracted from its diff
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Summary {
    pub id: String,
    pub original_message: String,
    pub generated_message: String,
    pub hunk_summaries: Vec<String>,
    pub ctag_definitions: Vec<String>,
    pub regex_definitions: Vec<String>,
    pub time_index: usize, // position in the chronological input sequence
}

impl Summary {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            original_message: String::new(),
            generated_message: String::new(),
            hunk_summaries: Vec::new(),
            ctag_definitions: Vec::new(),
            regex_definitions: Vec::new(),
            time_index: 0,
        }
    }
}

/// Change type of a single hunk
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
    Renamed,
}

impl ChangeKind {
    /// Map a `file_status` input value; unrecognized values read as
    /// `Modified` so a tolerant reader never rejects a record over them.
    pub fn from_status(status: &str) -> Self {
        static STATUS_MAP: &[(&str, ChangeKind)] = &[
            ("added", ChangeKind::Added),
            ("deleted", ChangeKind::Deleted),
            ("modified", ChangeKind::Modified),
            ("renamed", ChangeKind::Renamed),
        ];

        STATUS_MAP
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, k)| *k)
            .unwrap_or(ChangeKind::Modified)
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChangeKind::Added => "added",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Modified => "modified",
            ChangeKind::Renamed => "renamed",
        };
        write!(f, "{s}")
    }
}

/// A contiguous change region within a single file in a single commit.
///
/// Line fields are signed: delete-only and add-only hunks carry zero on
/// the side they do not touch, and rename detection compares the signed
/// pairs directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hunk {
    pub file: String,
    pub change: ChangeKind,
    pub old_start: i64,
    pub old_lines: i64,
    pub new_start: i64,
    pub new_lines: i64,
    pub old_text: String,
    pub new_text: String,
}

impl Hunk {
    /// Signed (start, lines) pair on the pre-image side
    pub fn old_signature(&self) -> (i64, i64) {
        (self.old_start, self.old_lines)
    }

    /// Signed (start, lines) pair on the post-image side
    pub fn new_signature(&self) -> (i64, i64) {
        (self.new_start, self.new_lines)
    }
}

/// The raw commit record with per-hunk diff metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub message: String,
    pub hunks: Vec<Hunk>,
    /// Back-reference into the summary stream, linked by id during
    /// commit ingestion; `None` when no summary shares the commit's id
    pub summary_index: Option<usize>,
}

impl Commit {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: String::new(),
            hunks: Vec::new(),
            summary_index: None,
        }
    }
}

/// A weighted link from a definition to a specific summary
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Connection {
    pub index: usize, // summary index
    pub weight: f64,  // influence in (0, 1]
}

/// A symbol node tracked across the summary stream.
///
/// The four scalar features each live in [0, 1] once statistics are
/// finalized; together they form the node's feature vector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Definition {
    pub symbol: String,
    pub connections: Vec<Connection>,
    /// Prior names, oldest first: alias merges and file renames append here
    pub history: Vec<String>,
    /// Indices into the sorted file axis where this symbol is referenced
    pub referenced: Vec<usize>,
    pub commit_frequency: f64,
    pub cluster_frequency: f64,
    pub chronic_point: f64,
    pub file_vector: f64,
}

impl Definition {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            connections: Vec::new(),
            history: Vec::new(),
            referenced: Vec::new(),
            commit_frequency: 0.0,
            cluster_frequency: 0.0,
            chronic_point: 0.0,
            file_vector: 0.0,
        }
    }

    /// Total connection weight
    pub fn connection_sum(&self) -> f64 {
        self.connections.iter().map(|c| c.weight).sum()
    }

    pub fn feature_vector(&self) -> [f64; FEATURE_DIMENSIONS] {
        [
            self.commit_frequency,
            self.cluster_frequency,
            self.chronic_point,
            self.file_vector,
        ]
    }
}

/// Cluster type tag; the node set is closed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClusterKind {
    Chronic,
    Occurrence,
    DissonanceHub,
    ResonanceHub,
    Context,
}

impl ClusterKind {
    /// Wire name used by the visualizer records
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterKind::Chronic => "CHRONIC",
            ClusterKind::Occurrence => "OCCURRENCE",
            ClusterKind::DissonanceHub => "DISSONANCE_HUB",
            ClusterKind::ResonanceHub => "RESONANCE_HUB",
            ClusterKind::Context => "CONTEXT",
        }
    }
}

impl std::fmt::Display for ClusterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cluster member: a referenced definition or an owned child cluster
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Member {
    Definition(DefId),
    Cluster(ClusterId),
}

/// An unordered collection of member nodes with an observed radius and a
/// memoized feature vector.
///
/// Contexts are clusters with `kind == Context` plus a `symbol` label;
/// their child contexts are `Member::Cluster` entries into the same arena.
#[derive(Debug)]
pub struct Cluster {
    pub kind: ClusterKind,
    /// Namespace segment or file path for contexts; `None` otherwise
    pub symbol: Option<String>,
    pub members: Vec<Member>,
    /// Maximum member-to-member one-dimensional gap observed while building
    pub radius: f64,
    /// Memoized L2-normalized component sum of member vectors; invalidated
    /// only by discarding the cluster arena
    pub(crate) vector: OnceCell<[f64; FEATURE_DIMENSIONS]>,
}

impl Cluster {
    pub fn new(kind: ClusterKind) -> Self {
        Self {
            kind,
            symbol: None,
            members: Vec::new(),
            radius: 0.0,
            vector: OnceCell::new(),
        }
    }

    pub fn context(symbol: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            ..Self::new(ClusterKind::Context)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Definition members, in insertion order
    pub fn definition_members(&self) -> impl Iterator<Item = DefId> + '_ {
        self.members.iter().filter_map(|m| match m {
            Member::Definition(id) => Some(*id),
            Member::Cluster(_) => None,
        })
    }

    /// Child cluster members, in insertion order
    pub fn cluster_members(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.members.iter().filter_map(|m| match m {
            Member::Cluster(id) => Some(*id),
            Member::Definition(_) => None,
        })
    }

    pub fn contains_definition(&self, id: DefId) -> bool {
        self.members.contains(&Member::Definition(id))
    }
}

/// Normalized symbol form used for context lookup and alias grouping:
/// lowercased with every underscore removed.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol
        .chars()
        .filter(|c| *c != '_')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol_case_and_underscores() {
        assert_eq!(normalize_symbol("my_func"), "myfunc");
        assert_eq!(normalize_symbol("MyFunc"), "myfunc");
        assert_eq!(normalize_symbol("MYFUNC"), "myfunc");
        assert_eq!(normalize_symbol("__leading"), "leading");
    }

    #[test]
    fn test_change_kind_from_status() {
        assert_eq!(ChangeKind::from_status("added"), ChangeKind::Added);
        assert_eq!(ChangeKind::from_status("deleted"), ChangeKind::Deleted);
        assert_eq!(ChangeKind::from_status("renamed"), ChangeKind::Renamed);
        assert_eq!(ChangeKind::from_status("copied"), ChangeKind::Modified);
    }

    #[test]
    fn test_feature_vector_order() {
        let mut def = Definition::new("sym");
        def.commit_frequency = 0.1;
        def.cluster_frequency = 0.2;
        def.chronic_point = 0.3;
        def.file_vector = 0.4;
        assert_eq!(def.feature_vector(), [0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_hunk_signatures() {
        let hunk = Hunk {
            file: "a.h".into(),
            change: ChangeKind::Deleted,
            old_start: 1,
            old_lines: 20,
            new_start: 0,
            new_lines: 0,
            old_text: String::new(),
            new_text: String::new(),
        };
        assert_eq!(hunk.old_signature(), (1, 20));
        assert_eq!(hunk.new_signature(), (0, 0));
    }
}
