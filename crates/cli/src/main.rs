// mapgap CLI - find reference POIs that the map does not have yet

mod exit_codes;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};
use run::RunArgs;

#[derive(Parser)]
#[command(name = "mapgap")]
#[command(about = "Reconcile Wikidata POIs against an OpenStreetMap export")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Errors only
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the reference source against the map and write GeoJSON
    #[command(after_help = "\
Examples:
  mapgap run
  mapgap run --config mapgap.toml
  mapgap run --map osm.json --reference query.csv --output data.geojson
  mapgap run --tag-match-mode contains --report report.json --json")]
    Run(RunArgs),

    /// Check a config file and its region without reading any data
    #[command(after_help = "\
Examples:
  mapgap validate --config mapgap.toml")]
    Validate {
        #[arg(long, short = 'c', env = "MAPGAP_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Test a single point against the region (exit 0 inside, 1 outside)
    #[command(allow_negative_numbers = true)]
    #[command(after_help = "\
Examples:
  mapgap inside 46.498 11.354
  mapgap inside 47.269 11.404 --config mapgap.toml")]
    Inside {
        /// Latitude in decimal degrees
        lat: f64,

        /// Longitude in decimal degrees
        lon: f64,

        #[arg(long, short = 'c', env = "MAPGAP_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("MAPGAP_COMMIT"), ")",
        "\nbuild:   ", env!("MAPGAP_PROFILE"),
        "\ntarget:  ", env!("MAPGAP_TARGET"),
    )
}

/// RUST_LOG wins when set; otherwise -v/-q pick the level.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version come through here too.
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Run(args) => run::cmd_run(args, cli.quiet),
        Commands::Validate { config } => run::cmd_validate(config),
        Commands::Inside { lat, lon, config } => run::cmd_inside(lat, lon, config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
