pub mod errors;
pub mod types;

pub use errors::{Error, Result};
pub use types::{
    normalize_symbol, ChangeKind, Cluster, ClusterId, ClusterKind, Commit, Connection, DefId,
    Definition, Hunk, Member, Summary, FEATURE_DIMENSIONS,
};
