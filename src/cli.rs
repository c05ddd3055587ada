use clap::Parser;
use std::path::PathBuf;

use crate::config::{BandTail, EngineConfig};

#[derive(Parser, Debug)]
#[command(name = "commitmap")]
#[command(about = "Clusters commit histories into symbolic feature groups", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Summary stream JSON (chronological, oldest first)
    pub summaries: PathBuf,

    /// Commit stream JSON
    pub commits: PathBuf,

    /// Output file (defaults to stdout)
    pub output: Option<PathBuf>,

    /// Emit every top-level cluster instead of only the dissonance hubs
    #[arg(long)]
    pub all_clusters: bool,

    /// Print engine statistics and quality metrics to the terminal
    #[arg(long)]
    pub stats: bool,

    /// Drop the trailing band during clustering, matching the historical
    /// pipeline
    #[arg(long)]
    pub legacy_band_tail: bool,
}

impl Cli {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            band_tail: if self.legacy_band_tail {
                BandTail::Legacy
            } else {
                BandTail::Flush
            },
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut full_args = vec!["commitmap"];
        full_args.extend(args);
        Cli::parse_from(full_args)
    }

    #[test]
    fn test_positional_paths() {
        let cli = parse(&["summaries.json", "commits.json"]);
        assert_eq!(cli.summaries, PathBuf::from("summaries.json"));
        assert_eq!(cli.commits, PathBuf::from("commits.json"));
        assert!(cli.output.is_none());
        assert!(!cli.all_clusters);
    }

    #[test]
    fn test_optional_output_path() {
        let cli = parse(&["summaries.json", "commits.json", "out.json"]);
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_legacy_band_tail_flag() {
        let cli = parse(&["s.json", "c.json", "--legacy-band-tail"]);
        assert_eq!(cli.engine_config().band_tail, BandTail::Legacy);

        let cli = parse(&["s.json", "c.json"]);
        assert_eq!(cli.engine_config().band_tail, BandTail::Flush);
    }
}
