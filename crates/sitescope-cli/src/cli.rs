use clap::{Parser, Subcommand};
use sitescope_core::models::ClassificationMode;
use std::path::PathBuf;

/// SiteScope - Density, co-location and area classification for site tables
#[derive(Parser, Debug)]
#[command(name = "sitescope")]
#[command(about = "Geospatial site analytics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enrich a CSV of sites with density, co-location group and area class
    Analyze(AnalyzeArgs),

    /// Show the resolved analysis configuration and where each value came from
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Input CSV with site_id, lat, lon and cluster_id columns
    pub input: PathBuf,

    /// Write the enriched table to this CSV file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Radius for density calculation (km)
    #[arg(long)]
    pub radius_km: Option<f64>,

    /// Co-location threshold (meters)
    #[arg(long)]
    pub threshold_m: Option<f64>,

    /// Classification mode (quantile or threshold)
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<ClassificationMode>,

    /// Rural cut point in sites per km² (threshold mode)
    #[arg(long)]
    pub rural: Option<f64>,

    /// Suburban cut point in sites per km² (threshold mode)
    #[arg(long)]
    pub suburban: Option<f64>,

    /// Urban cut point in sites per km² (threshold mode)
    #[arg(long)]
    pub urban: Option<f64>,

    /// Configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of enriched rows to preview
    #[arg(long, default_value = "10")]
    pub preview: usize,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

fn parse_mode(value: &str) -> Result<ClassificationMode, String> {
    value.parse().map_err(|e: sitescope_core::SiteError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_args() {
        let cli = Cli::parse_from([
            "sitescope",
            "analyze",
            "sites.csv",
            "--radius-km",
            "1.5",
            "--mode",
            "THRESHOLD",
            "--urban",
            "300",
            "--json",
        ]);

        assert!(cli.json);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.input, PathBuf::from("sites.csv"));
                assert_eq!(args.radius_km, Some(1.5));
                assert_eq!(args.mode, Some(ClassificationMode::Threshold));
                assert_eq!(args.urban, Some(300.0));
                assert_eq!(args.preview, 10);
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let result = Cli::try_parse_from(["sitescope", "analyze", "sites.csv", "--mode", "kmeans"]);
        assert!(result.is_err());
    }
}
