//! Commitmap CLI entry point.
//!
//! Parses the two positional record streams, runs the clustering engine,
//! and writes the visualizer records. Exits non-zero on parse or I/O
//! failure; the engine itself never fails.

use anyhow::Result;

use commitmap::cli::parse_args;
use commitmap::commands::analyze;
use commitmap::observability::init_tracing;

fn main() -> Result<()> {
    init_tracing();

    let cli = parse_args();
    analyze::run(&cli)
}
