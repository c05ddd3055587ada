//! The analysis command: parse, filter, cluster, emit.

use std::io::Write;

use anyhow::Context;
use colored::Colorize;
use tracing::info;

use crate::cli::Cli;
use crate::engine::ClusterEngine;
use crate::io::output::{visualization_records, write_records, write_records_to_path};
use crate::io::reader::{read_commits, read_summaries};
use crate::filter;

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut summaries = read_summaries(&cli.summaries)
        .with_context(|| format!("reading summaries from {}", cli.summaries.display()))?;
    info!(count = summaries.len(), "parsed summary stream");

    let commits = read_commits(&cli.commits)
        .with_context(|| format!("reading commits from {}", cli.commits.display()))?;
    info!(count = commits.len(), "parsed commit stream");

    filter::filter_summaries(&mut summaries);

    let mut engine = ClusterEngine::with_config(cli.engine_config());
    engine.process_summaries(summaries);
    engine.process_commits(commits);
    engine.cluster();
    info!(clusters = engine.cluster_count(), "clustering finished");

    if cli.stats {
        print_statistics(&engine);
    }

    let records = visualization_records(&engine, !cli.all_clusters);
    match &cli.output {
        Some(path) => {
            write_records_to_path(path, &records)
                .with_context(|| format!("writing clusters to {}", path.display()))?;
            info!(path = %path.display(), "wrote cluster records");
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_records(&mut handle, &records).context("writing clusters to stdout")?;
            writeln!(handle)?;
        }
    }

    Ok(())
}

fn print_statistics(engine: &ClusterEngine) {
    let stats = engine.statistics();

    eprintln!("{}", "Engine statistics".bold());
    eprintln!("  Definitions:        {}", stats.total_definitions);
    eprintln!("  Summaries:          {}", stats.total_summaries);
    eprintln!("  Connections:        {}", stats.total_connections);
    eprintln!(
        "  Avg frequency:      {}",
        format!("{:.4}", stats.average_commit_frequency).cyan()
    );
    eprintln!(
        "  Avg chronic point:  {}",
        format!("{:.4}", stats.average_chronic_point).cyan()
    );
    eprintln!(
        "  Avg connections:    {}",
        format!("{:.2}", stats.average_connections_per_definition).cyan()
    );

    eprintln!("{}", "Clustering quality".bold());
    eprintln!("  Clusters:           {}", engine.cluster_count());
    eprintln!(
        "  Avg cluster size:   {}",
        format!("{:.2}", engine.average_cluster_size()).cyan()
    );
    eprintln!(
        "  Entropy gain:       {}",
        format!("{:.4}", engine.entropy_gain()).cyan()
    );
    eprintln!(
        "  Variance gain:      {}",
        format!("{:.4}", engine.variance_gain()).cyan()
    );
    eprintln!(
        "  Silhouette:         {}",
        format!("{:.4}", engine.silhouette_score()).cyan()
    );
}
