//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Runner arguments
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "compliance-scan",
    version,
    about = "Scan inspection exports for geofence and vehicle presence violations"
)]
pub struct RunnerArgs {
    /// JSON array of inspection centers
    pub centers: PathBuf,
    /// JSON array of inspection records
    pub inspections: PathBuf,
    /// Notification snapshot, loaded before and saved after every pass
    #[arg(long)]
    pub store: Option<PathBuf>,
    #[arg(long, help = "Scan config file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,
    /// Repeat the scan every N seconds instead of running once
    #[arg(long = "interval-secs", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: Option<u64>,
    #[arg(long, help = "Run one worker task per center")]
    pub concurrent: bool,
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl RunnerArgs {
    pub fn interval(&self) -> Option<Duration> {
        self.interval_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<RunnerArgs, clap::Error> {
        RunnerArgs::try_parse_from(std::iter::once("compliance-scan").chain(args.iter().copied()))
    }

    #[test]
    fn test_minimal_args() {
        let args = parse(&["centers.json", "inspections.json"]).unwrap();
        assert_eq!(args.centers, PathBuf::from("centers.json"));
        assert_eq!(args.interval(), None);
        assert_eq!(args.log_level, Level::INFO);
        assert!(!args.concurrent);
    }

    #[test]
    fn test_all_flags() {
        let args = parse(&[
            "--store", "n.json", "c.json", "--interval-secs", "60", "i.json",
            "--concurrent", "--log-level", "debug", "--json-logs", "--config", "scan.toml",
        ])
        .unwrap();
        assert_eq!(args.store, Some(PathBuf::from("n.json")));
        assert_eq!(args.config, Some(PathBuf::from("scan.toml")));
        assert_eq!(args.interval(), Some(Duration::from_secs(60)));
        assert_eq!(args.inspections, PathBuf::from("i.json"));
        assert_eq!(args.log_level, Level::DEBUG);
        assert!(args.concurrent && args.json_logs);
    }

    #[test]
    fn test_usage_errors() {
        assert!(parse(&["only-one.json"]).is_err());
        assert!(parse(&["a", "b", "--interval-secs", "0"]).is_err());
        assert!(parse(&["a", "b", "--store"]).is_err());
        assert!(parse(&["a", "b", "--verbose"]).is_err());
        assert!(parse(&["a", "b", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_command_is_well_formed() {
        use clap::CommandFactory;
        RunnerArgs::command().debug_assert();
    }
}
