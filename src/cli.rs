//! Command-line interface argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// Rate Explorer - interactive dashboard for health-insurance rate data
///
/// Opens the dashboard window, or with --export prints one view's summary
/// as JSON and exits.
///
/// Examples:
///   rate-explorer --data rates.csv
///   rate-explorer --data rates.parquet --export '#map/std'
///   rate-explorer --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Rate dataset to load at startup (.csv, .json, .parquet)
    #[arg(short, long, value_name = "FILE", env = "RATE_EXPLORER_DATA")]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for rate-explorer.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the summary behind a view as JSON instead of opening the window
    ///
    /// Routes: #hist/{rate,state,age,year}, #box/{none,state,age,year},
    /// #line/{state,age,year}, #map/{median,mean,min,max,std}
    #[arg(short, long, value_name = "ROUTE")]
    pub export: Option<String>,

    /// Number of bins of the rate histogram
    #[arg(long, value_name = "COUNT")]
    pub bins: Option<usize>,

    /// Generate a default rate-explorer.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_args() {
        let args =
            Args::try_parse_from(["rate-explorer", "--data", "r.csv", "--export", "#map/std"])
                .unwrap();
        assert_eq!(args.data, Some(PathBuf::from("r.csv")));
        assert_eq!(args.export.as_deref(), Some("#map/std"));
        assert!(!args.init_config);
    }

    #[test]
    fn test_export_data_may_come_from_config() {
        let args = Args::try_parse_from(["rate-explorer", "--export", "#line/age", "--bins", "20"])
            .unwrap();
        assert_eq!(args.export.as_deref(), Some("#line/age"));
        assert_eq!(args.bins, Some(20));
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
