//! `mapgap run|validate|inside`: config loading and the file-to-file pipeline.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};

use mapgap_io::csv::load_candidates;
use mapgap_io::geojson::to_geojson_string;
use mapgap_io::osm::load_map_entries;
use mapgap_io::report::RunReport;
use mapgap_io::{write_atomic_all, IoError};
use mapgap_recon::{ReconConfig, ReconInput, RegionTest, TagKeyFilter, TagMatchMode};

use crate::exit_codes::{
    recon_exit_code, EXIT_CONFIG, EXIT_MAP_SOURCE, EXIT_OUTSIDE, EXIT_REFERENCE_SOURCE,
    EXIT_WRITE,
};
use crate::CliError;

#[derive(Clone, Copy, ValueEnum)]
pub enum MatchModeArg {
    Suffix,
    Contains,
}

impl From<MatchModeArg> for TagMatchMode {
    fn from(arg: MatchModeArg) -> Self {
        match arg {
            MatchModeArg::Suffix => TagMatchMode::Suffix,
            MatchModeArg::Contains => TagMatchMode::Contains,
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// TOML config; relative paths inside it resolve against its directory
    #[arg(long, short = 'c', env = "MAPGAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overpass JSON export (overrides sources.map)
    #[arg(long)]
    pub map: Option<PathBuf>,

    /// SPARQL CSV export (overrides sources.reference)
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// GeoJSON output path (overrides output.geojson)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Also write a JSON run report (overrides output.report)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// How tag keys are tested against the marker
    #[arg(long, value_enum)]
    pub tag_match_mode: Option<MatchModeArg>,

    /// Reference CSV delimiter (single character)
    #[arg(long, short = 'd')]
    pub delimiter: Option<String>,

    /// Classify candidates on the rayon pool
    #[arg(long)]
    pub parallel: bool,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

fn cli_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

/// Loaded config plus the directory its relative paths resolve against.
struct LoadedConfig {
    config: ReconConfig,
    base_dir: PathBuf,
}

impl LoadedConfig {
    fn resolve(&self, configured: &str) -> PathBuf {
        self.base_dir.join(configured)
    }
}

fn load_config(path: Option<&Path>) -> Result<LoadedConfig, CliError> {
    let Some(path) = path else {
        tracing::debug!("no config file, using built-in defaults");
        return Ok(LoadedConfig {
            config: ReconConfig::default(),
            base_dir: PathBuf::from("."),
        });
    };

    let text = std::fs::read_to_string(path).map_err(|e| {
        cli_err(EXIT_CONFIG, format!("cannot read config {}: {e}", path.display()))
    })?;
    let config = ReconConfig::from_toml(&text).map_err(|e| {
        cli_err(recon_exit_code(&e), format!("{}: {e}", path.display()))
    })?;
    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    tracing::debug!(path = %path.display(), "config loaded");
    Ok(LoadedConfig { config, base_dir })
}

pub fn cmd_run(args: RunArgs, quiet: bool) -> Result<(), CliError> {
    let mut loaded = load_config(args.config.as_deref())?;

    if let Some(mode) = args.tag_match_mode {
        loaded.config.matching.tag_match_mode = mode.into();
    }
    if let Some(delimiter) = args.delimiter {
        loaded.config.sources.delimiter = delimiter;
    }
    if args.parallel {
        loaded.config.engine.parallel = true;
    }
    loaded
        .config
        .validate()
        .map_err(|e| cli_err(recon_exit_code(&e), e.to_string()))?;

    let config = &loaded.config;
    let map_path = args.map.unwrap_or_else(|| loaded.resolve(&config.sources.map));
    let reference_path = args
        .reference
        .unwrap_or_else(|| loaded.resolve(&config.sources.reference));
    let output_path = args.output.unwrap_or_else(|| loaded.resolve(&config.output.geojson));
    let report_path = args
        .report
        .or_else(|| config.output.report.as_deref().map(|r| loaded.resolve(r)));

    let filter = TagKeyFilter::from_config(&config.matching);
    let map = load_map_entries(&map_path, &filter)
        .map_err(|e| cli_err(EXIT_MAP_SOURCE, e.to_string()))?;

    let candidates = load_candidates(&reference_path, config.sources.delimiter_byte(), &config.columns)
        .map_err(|e| {
            let err = cli_err(EXIT_REFERENCE_SOURCE, e.to_string());
            match e {
                IoError::MissingColumn { .. } => err.with_hint(
                    "rename the header or list it under [columns] in the config",
                ),
                _ => err,
            }
        })?;

    let input = ReconInput {
        map_entries: map.entries,
        candidates,
    };
    let outcome = mapgap_recon::run(config, &input)
        .map_err(|e| cli_err(recon_exit_code(&e), e.to_string()))?;

    let report = RunReport::new(
        &outcome,
        &config.region.name,
        config.matching.tag_match_mode,
        map.missing_file,
    );
    let geojson = to_geojson_string(&outcome.records).map_err(|e| cli_err(EXIT_WRITE, e.to_string()))?;
    let report_json = report
        .to_json_pretty()
        .map_err(|e| cli_err(EXIT_WRITE, e.to_string()))?;

    // GeoJSON and report are committed together or not at all.
    let mut files: Vec<(&Path, &[u8])> = vec![(output_path.as_path(), geojson.as_bytes())];
    if let Some(ref path) = report_path {
        files.push((path.as_path(), report_json.as_bytes()));
    }
    write_atomic_all(&files).map_err(|e| cli_err(EXIT_WRITE, e.to_string()))?;
    tracing::info!(path = %output_path.display(), features = outcome.records.len(), "geojson written");

    if args.json {
        println!("{report_json}");
    }

    if !quiet {
        let s = &outcome.summary;
        eprintln!(
            "region '{}': {} emitted ({} matched, {} missing), {} outside region, {} invalid rows",
            config.region.name,
            s.emitted(),
            s.matched,
            s.missing,
            s.skipped_out_of_region,
            outcome.dropped.len() - s.skipped_out_of_region,
        );
        eprintln!("wrote {}", output_path.display());
        if let Some(ref path) = report_path {
            eprintln!("wrote {}", path.display());
        }
    }

    Ok(())
}

pub fn cmd_validate(config_path: Option<PathBuf>) -> Result<(), CliError> {
    let loaded = load_config(config_path.as_deref())?;
    let config = &loaded.config;
    let region = config
        .region
        .build()
        .map_err(|e| cli_err(recon_exit_code(&e), e.to_string()))?;
    let bbox = region.bounding_box();

    eprintln!(
        "valid: region '{}' with {} vertices (lat {}..{}, lon {}..{}), tag match mode {}",
        region.name(),
        region.vertices().len(),
        bbox.min_lat,
        bbox.max_lat,
        bbox.min_lon,
        bbox.max_lon,
        config.matching.tag_match_mode,
    );
    Ok(())
}

pub fn cmd_inside(lat: f64, lon: f64, config_path: Option<PathBuf>) -> Result<(), CliError> {
    let loaded = load_config(config_path.as_deref())?;
    let region = loaded
        .config
        .region
        .build()
        .map_err(|e| cli_err(recon_exit_code(&e), e.to_string()))?;

    let verdict = region.classify(lat, lon);
    println!("{verdict}");

    match verdict {
        RegionTest::Inside => Ok(()),
        RegionTest::OutsideBoundingBox | RegionTest::OutsidePolygon => {
            Err(cli_err(EXIT_OUTSIDE, String::new()))
        }
    }
}
