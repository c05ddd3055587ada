//! # Commitmap
//!
//! A symbolic semantic-memory engine for commit histories. Commitmap
//! ingests a chronological stream of commit summaries and raw commits and
//! produces a clustered graph of symbolic definitions whose structure
//! reveals thematic groupings, temporal lifecycles, rename chains, and
//! file cohesion. It is the backend a release-note generator needs to
//! decide which commits belong to the same feature, without a language
//! model.
//!
//! ## How it works
//!
//! Every symbol mentioned in a summary becomes a definition node
//! connected to that summary with a linearly time-rising weight, so
//! recent activity dominates. Each definition then collapses into four
//! scalar features:
//!
//! - **commit frequency**: time-weighted prevalence across summaries
//! - **cluster frequency**: how often band clustering groups it
//! - **chronic point**: its temporal center of mass
//! - **file vector**: its center of mass on the similarity-sorted file axis
//!
//! The clustering pipeline runs in a fixed order: namespace
//! decomposition, alias unification, chronic and occurrence banding,
//! resonance and dissonance hub aggregation, and file cohesion. Hubs
//! treat earlier clusters as data points, so the output is a two-level
//! grouping ready for the web visualizer.
//!
//! ## Quick start
//!
//! ```rust
//! use commitmap::core::Summary;
//! use commitmap::engine::ClusterEngine;
//!
//! let mut early = Summary::new("a1b2");
//! early.ctag_definitions = vec!["parse_config".into(), "ConfigError".into()];
//! let mut late = Summary::new("c3d4");
//! late.ctag_definitions = vec!["render_report".into()];
//!
//! let mut engine = ClusterEngine::new();
//! engine.process_summaries(vec![early, late]);
//! engine.cluster();
//!
//! let stats = engine.statistics();
//! assert_eq!(stats.total_definitions, 3);
//! ```
//!
//! The engine is a batch, single-threaded, in-memory pipeline: no state
//! persists between runs and nothing touches the network. `clear()`
//! returns it to empty.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod engine;
pub mod filter;
pub mod io;
pub mod observability;

pub use crate::config::{BandTail, EngineConfig};
pub use crate::core::{
    ChangeKind, Cluster, ClusterId, ClusterKind, Commit, Connection, DefId, Definition, Hunk,
    Member, Summary,
};
pub use crate::engine::{ClusterEngine, EngineStats, PipelineState};
pub use crate::io::{read_commits, read_summaries, visualization_records, write_records_to_path};
