//! Geostress CLI - Command-line interface for the geodetic stress engine
//!
//! Commands:
//! - assess: Assess a series file, or the nearest station in a data directory
//! - validate: Normalize a series file and report corrections
//! - stations: List stations near a location
//! - doctor: Diagnose configuration and data health
//! - schema: Print input/output schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use geostress::adapters::{FixtureGateway, GnssSeriesAdapter, SeismicityAdapter, StationDirectory};
use geostress::encoder::{AssessmentPayload, PAYLOAD_SCHEMA_VERSION};
use geostress::normalizer::SeriesNormalizer;
use geostress::{
    GeoPoint, Gateways, PlateCache, StressConfig, StressError, StressProcessor,
    GEOSTRESS_VERSION, PRODUCER_NAME,
};

/// Geostress - Geodetic stress-indicator engine
#[derive(Parser)]
#[command(name = "geostress")]
#[command(version = GEOSTRESS_VERSION)]
#[command(about = "Assess crustal stress from GNSS displacement and seismicity", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce a stress assessment
    Assess {
        /// GNSS series file (use - for stdin)
        #[arg(short, long, conflicts_with = "data_dir")]
        series: Option<PathBuf>,

        /// Seismicity payload file for --series
        #[arg(long, requires = "series")]
        seismicity: Option<PathBuf>,

        /// Fixture directory with stations.json, series/ and seismicity.json
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Latitude for --data-dir lookups
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude for --data-dir lookups
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Assess this station instead of the nearest one
        #[arg(long, requires = "data_dir")]
        station: Option<String>,

        /// Reference time for --data-dir lookups (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        as_of: Option<String>,

        /// Plate geometry GeoJSON for tectonic context
        #[arg(long)]
        plates: Option<PathBuf>,

        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Station search radius in km (overrides config)
        #[arg(long)]
        radius_km: Option<f64>,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Normalize a series file and report corrections and degraded-input flags
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stations within a radius of a location
    Stations {
        /// Fixture directory containing stations.json
        #[arg(long)]
        data_dir: PathBuf,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Search radius in km (defaults to config)
        #[arg(long)]
        radius_km: Option<f64>,

        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and data health
    Doctor {
        /// Configuration file to check
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fixture directory to check
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Plate geometry file to check
        #[arg(long)]
        plates: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// GNSS displacement series input
    Series,
    /// Seismicity stress input
    Seismicity,
    /// Assessment output
    Output,
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), GeostressCliError> {
    match cli.command {
        Commands::Assess {
            series,
            seismicity,
            data_dir,
            lat,
            lon,
            station,
            as_of,
            plates,
            config,
            radius_km,
            output,
            output_format,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(radius_km) = radius_km {
                config.station_radius_km = radius_km;
                config.validate()?;
            }

            let mut processor = StressProcessor::new(config);
            if let Some(plates_path) = plates {
                processor = processor.with_plates(Arc::new(PlateCache::from_path(plates_path)));
            }

            let payload = match (series, data_dir) {
                (Some(series_path), _) => {
                    assess_file(&processor, &series_path, seismicity.as_deref())?
                }
                (None, Some(dir)) => {
                    let location = location_arg(lat, lon)?;
                    let now = parse_as_of(as_of.as_deref())?;
                    assess_data_dir(&processor, &dir, location, station.as_deref(), now)?
                }
                (None, None) => {
                    return Err(GeostressCliError::MissingInput(
                        "either --series or --data-dir is required".to_string(),
                    ))
                }
            };

            write_output(&payload, &output, &output_format)
        }

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Stations {
            data_dir,
            lat,
            lon,
            radius_km,
            config,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            let radius_km = radius_km.unwrap_or(config.station_radius_km);
            cmd_stations(&data_dir, location_arg(Some(lat), Some(lon))?, radius_km, &config, json)
        }

        Commands::Doctor {
            config,
            data_dir,
            plates,
            json,
        } => cmd_doctor(config.as_deref(), data_dir.as_deref(), plates.as_deref(), json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn assess_file(
    processor: &StressProcessor,
    series_path: &Path,
    seismicity_path: Option<&Path>,
) -> Result<AssessmentPayload, GeostressCliError> {
    let series = GnssSeriesAdapter::parse(&read_input(series_path)?)?;
    let seismicity = match seismicity_path {
        Some(path) => SeismicityAdapter::parse(&read_input(path)?)?,
        None => None,
    };

    log::info!(
        "Assessing station {} ({} samples)",
        series.station_id,
        series.len()
    );
    Ok(processor.assess_series(&series, seismicity.as_ref(), series.location)?)
}

fn assess_data_dir(
    processor: &StressProcessor,
    dir: &Path,
    location: GeoPoint,
    station: Option<&str>,
    now: DateTime<Utc>,
) -> Result<AssessmentPayload, GeostressCliError> {
    let gateway = FixtureGateway::load_dir(dir, processor.config().seismicity_match_radius_km)?;
    let gateways = Gateways::from_single(&gateway);

    let payload = match station {
        Some(station_id) => processor.assess_station(gateways, station_id, location, now)?,
        None => processor.assess_location(gateways, location, now)?,
    };
    Ok(payload)
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), GeostressCliError> {
    let series = GnssSeriesAdapter::parse(&read_input(input)?)?;
    let normalized = SeriesNormalizer::normalize(&series);

    let report = ValidationReport {
        station_id: normalized.station_id.clone(),
        input_samples: series.len(),
        usable_samples: normalized.samples.len(),
        coverage: normalized.coverage,
        flags: normalized
            .quality_flags
            .iter()
            .map(|f| f.as_str().to_string())
            .collect(),
        first_sample_utc: normalized.summary.first_epoch.map(|t| t.to_rfc3339()),
        last_sample_utc: normalized.summary.last_epoch.map(|t| t.to_rfc3339()),
        net_displacement_mm: normalized.summary.net_displacement_mm,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Station:        {}", report.station_id);
        println!("Input samples:  {}", report.input_samples);
        println!("Usable samples: {}", report.usable_samples);
        println!("Coverage:       {:.2}", report.coverage);
        if let (Some(first), Some(last)) = (&report.first_sample_utc, &report.last_sample_utc) {
            println!("Span:           {} .. {}", first, last);
        }
        println!("Net movement:   {:.2} mm", report.net_displacement_mm);

        if !report.flags.is_empty() {
            println!("\nFlags:");
            for flag in &report.flags {
                println!("  - {}", flag);
            }
        }
    }

    if report.usable_samples == 0 {
        Err(GeostressCliError::NoUsableSamples)
    } else {
        Ok(())
    }
}

fn cmd_stations(
    data_dir: &Path,
    location: GeoPoint,
    radius_km: f64,
    config: &StressConfig,
    json: bool,
) -> Result<(), GeostressCliError> {
    let gateway = FixtureGateway::load_dir(data_dir, config.seismicity_match_radius_km)?;
    let nearby = gateway.nearby_stations(location, radius_km)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&nearby)?);
    } else if nearby.is_empty() {
        println!(
            "No stations within {:.0} km of ({}, {})",
            radius_km, location.latitude, location.longitude
        );
    } else {
        for entry in &nearby {
            println!(
                "{:<10} {:>8.1} km  {}",
                entry.station.id,
                entry.distance_km,
                entry.station.name.as_deref().unwrap_or("")
            );
        }
    }

    Ok(())
}

fn cmd_doctor(
    config: Option<&Path>,
    data_dir: Option<&Path>,
    plates: Option<&Path>,
    json: bool,
) -> Result<(), GeostressCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "geostress_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Geostress version {}", GEOSTRESS_VERSION),
    });

    checks.push(DoctorCheck {
        name: "schema_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Output schema: {}", PAYLOAD_SCHEMA_VERSION),
    });

    let mut match_radius_km = StressConfig::default().seismicity_match_radius_km;
    match config {
        Some(path) => checks.push(match StressConfig::load(path) {
            Ok(config) => {
                match_radius_km = config.seismicity_match_radius_km;
                DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "Config valid ({} region rules, station radius {} km)",
                        config.region_rules.len(),
                        config.station_radius_km
                    ),
                }
            }
            Err(e) => DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Error,
                message: e.to_string(),
            },
        }),
        None => checks.push(DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: "Using built-in defaults".to_string(),
        }),
    }

    if let Some(dir) = data_dir {
        let check = if !dir.is_dir() {
            DoctorCheck {
                name: "data_dir".to_string(),
                status: CheckStatus::Error,
                message: format!("{} is not a directory", dir.display()),
            }
        } else {
            match FixtureGateway::load_dir(dir, match_radius_km) {
                Ok(gateway) if gateway.stations().is_empty() => DoctorCheck {
                    name: "data_dir".to_string(),
                    status: CheckStatus::Warning,
                    message: "Data directory has no stations.json entries".to_string(),
                },
                Ok(gateway) => DoctorCheck {
                    name: "data_dir".to_string(),
                    status: CheckStatus::Ok,
                    message: format!("{} stations loaded", gateway.stations().len()),
                },
                Err(e) => DoctorCheck {
                    name: "data_dir".to_string(),
                    status: CheckStatus::Error,
                    message: e.to_string(),
                },
            }
        };
        checks.push(check);
    }

    if let Some(path) = plates {
        let cache = PlateCache::from_path(path);
        checks.push(match cache.get_or_load() {
            Ok(catalog) => DoctorCheck {
                name: "plates".to_string(),
                status: CheckStatus::Ok,
                message: format!(
                    "{} plates, {} boundaries",
                    catalog.plates().len(),
                    catalog.boundaries().len()
                ),
            },
            Err(e) => DoctorCheck {
                name: "plates".to_string(),
                status: CheckStatus::Error,
                message: e.to_string(),
            },
        });
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (--series - ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: GEOSTRESS_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Geostress Doctor Report");
        println!("=======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(GeostressCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), GeostressCliError> {
    match schema_type {
        SchemaType::Series => {
            if json_schema {
                println!("{}", series_json_schema());
            } else {
                println!("GNSS Series Input");
                println!();
                println!("- station_id (or station): station identifier");
                println!("- latitude / longitude (optional): station position in decimal degrees");
                println!("- samples: array of");
                println!("  - timestamp (RFC 3339) or date (YYYY-MM-DD)");
                println!("  - north (or north_mm, dn): north displacement in mm");
                println!("  - east (or east_mm, de): east displacement in mm");
                println!();
                println!("Samples may be unsorted; duplicates and non-finite values are dropped.");
            }
        }
        SchemaType::Seismicity => {
            if json_schema {
                println!("{}", seismicity_json_schema());
            } else {
                println!("Seismicity Input");
                println!();
                println!("Compact form:");
                println!("- score, label, earthquake_count, basis, recommendations");
                println!();
                println!("Prediction service form:");
                println!("- stress_score, stress_level, earthquake_count");
                println!("- stress_analysis.stress_pattern, recommendations");
                println!();
                println!("null, {{}} or an insufficient_data pattern means no seismicity input.");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", output_json_schema());
            } else {
                println!("Output Schema: {}", PAYLOAD_SCHEMA_VERSION);
                println!();
                println!("- schema_version");
                println!("- producer: {{ name, version, instance_id }}");
                println!("- provenance: {{ station_id, inputs, first_sample_utc, last_sample_utc, computed_at_utc }}");
                println!("- quality: {{ coverage, sample_count, flags }}");
                println!("- summary: {{ sample_count, span_days, net_displacement_mm, mean_daily_rate_mm, ... }}");
                println!("- assessment:");
                println!("  - overall: {{ level, numeric_score, color_hint }}");
                println!("  - indicators: strain_rate, direction_consistency, acceleration_trend,");
                println!("    stress_buildup, seismic_activity (each {{ value, level, description }})");
                println!("  - recommendations, generated_at, provenance");
                println!("- tectonic (optional): {{ plate, nearest_boundary, boundary_distance_km }}");
            }
        }
    }

    Ok(())
}

// Helper functions

fn load_config(path: Option<&Path>) -> Result<StressConfig, GeostressCliError> {
    match path {
        Some(path) => Ok(StressConfig::load(path)?),
        None => Ok(StressConfig::default()),
    }
}

fn read_input(path: &Path) -> Result<String, GeostressCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn location_arg(lat: Option<f64>, lon: Option<f64>) -> Result<GeoPoint, GeostressCliError> {
    let (Some(lat), Some(lon)) = (lat, lon) else {
        return Err(GeostressCliError::MissingInput(
            "--lat and --lon are required with --data-dir".to_string(),
        ));
    };
    let point = GeoPoint::new(lat, lon);
    if !point.is_valid() {
        return Err(GeostressCliError::InvalidArgument(format!(
            "location ({lat}, {lon}) is out of range"
        )));
    }
    Ok(point)
}

fn parse_as_of(raw: Option<&str>) -> Result<DateTime<Utc>, GeostressCliError> {
    let Some(raw) = raw else {
        return Ok(Utc::now());
    };
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|t| t.and_utc())
        .ok_or_else(|| GeostressCliError::InvalidArgument(format!("invalid --as-of '{raw}'")))
}

fn write_output(
    payload: &AssessmentPayload,
    output: &Path,
    format: &OutputFormat,
) -> Result<(), GeostressCliError> {
    let data = match format {
        OutputFormat::Json => serde_json::to_string(payload)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(payload)?,
    };

    if output.to_string_lossy() == "-" {
        println!("{}", data);
    } else {
        fs::write(output, data + "\n")?;
    }
    Ok(())
}

fn series_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "geostress.series",
        "description": "GNSS displacement series for one station",
        "type": "object",
        "required": ["samples"],
        "properties": {
            "station_id": { "type": "string" },
            "latitude": { "type": "number", "minimum": -90, "maximum": 90 },
            "longitude": { "type": "number", "minimum": -180, "maximum": 180 },
            "samples": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["north", "east"],
                    "properties": {
                        "timestamp": { "type": "string", "format": "date-time" },
                        "date": { "type": "string", "format": "date" },
                        "north": { "type": "number" },
                        "east": { "type": "number" }
                    }
                }
            }
        }
    })
    .to_string()
}

fn seismicity_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "geostress.seismicity",
        "description": "Seismicity-derived stress score",
        "type": ["object", "null"],
        "properties": {
            "score": { "type": "number" },
            "stress_score": { "type": "number" },
            "label": { "type": "string" },
            "stress_level": { "type": "string" },
            "earthquake_count": { "type": "integer", "minimum": 0 },
            "basis": { "type": "string" },
            "stress_analysis": {
                "type": "object",
                "properties": { "stress_pattern": { "type": "string" } }
            },
            "recommendations": { "type": "array" }
        }
    })
    .to_string()
}

fn output_json_schema() -> String {
    let indicator = serde_json::json!({
        "type": "object",
        "properties": {
            "value": { "type": "number" },
            "level": { "type": "string" },
            "description": { "type": "string" }
        }
    });

    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": PAYLOAD_SCHEMA_VERSION,
        "description": "Geostress assessment payload",
        "type": "object",
        "required": ["schema_version", "producer", "provenance", "quality", "summary", "assessment"],
        "properties": {
            "schema_version": { "type": "string" },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "provenance": {
                "type": "object",
                "properties": {
                    "station_id": { "type": "string" },
                    "inputs": { "type": "string" },
                    "first_sample_utc": { "type": ["string", "null"] },
                    "last_sample_utc": { "type": ["string", "null"] },
                    "computed_at_utc": { "type": "string" }
                }
            },
            "quality": {
                "type": "object",
                "properties": {
                    "coverage": { "type": "number" },
                    "sample_count": { "type": "integer" },
                    "flags": { "type": "array", "items": { "type": "string" } }
                }
            },
            "summary": { "type": "object" },
            "assessment": {
                "type": "object",
                "properties": {
                    "overall": {
                        "type": "object",
                        "properties": {
                            "level": {
                                "type": "string",
                                "enum": ["Low", "Moderate", "Elevated", "High", "Critical"]
                            },
                            "numeric_score": { "type": "number" },
                            "color_hint": { "type": "string" }
                        }
                    },
                    "indicators": {
                        "type": "object",
                        "properties": {
                            "strain_rate": indicator,
                            "direction_consistency": indicator,
                            "acceleration_trend": indicator,
                            "stress_buildup": indicator,
                            "seismic_activity": indicator
                        }
                    },
                    "recommendations": { "type": "array", "items": { "type": "string" } },
                    "generated_at": { "type": "string", "format": "date-time" },
                    "provenance": { "type": "string", "enum": ["geodetic_only", "geodetic_and_seismicity"] }
                }
            },
            "tectonic": { "type": "object" }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum GeostressCliError {
    Io(io::Error),
    Stress(StressError),
    Json(serde_json::Error),
    MissingInput(String),
    InvalidArgument(String),
    NoUsableSamples,
    DoctorFailed,
}

impl From<io::Error> for GeostressCliError {
    fn from(e: io::Error) -> Self {
        GeostressCliError::Io(e)
    }
}

impl From<StressError> for GeostressCliError {
    fn from(e: StressError) -> Self {
        GeostressCliError::Stress(e)
    }
}

impl From<serde_json::Error> for GeostressCliError {
    fn from(e: serde_json::Error) -> Self {
        GeostressCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<GeostressCliError> for CliError {
    fn from(e: GeostressCliError) -> Self {
        match e {
            GeostressCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            GeostressCliError::Stress(e) => stress_error(e),
            GeostressCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            GeostressCliError::MissingInput(msg) => CliError {
                code: "MISSING_INPUT".to_string(),
                message: msg,
                hint: Some("Run 'geostress assess --help' for usage".to_string()),
            },
            GeostressCliError::InvalidArgument(msg) => CliError {
                code: "INVALID_ARGUMENT".to_string(),
                message: msg,
                hint: None,
            },
            GeostressCliError::NoUsableSamples => CliError {
                code: "NO_USABLE_SAMPLES".to_string(),
                message: "Series has no usable samples".to_string(),
                hint: Some("Check that samples carry finite north/east values".to_string()),
            },
            GeostressCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

fn stress_error(e: StressError) -> CliError {
    let (code, hint) = match &e {
        StressError::MissingSeries(_) => (
            "NO_ASSESSMENT",
            Some("No displacement data in range; try a larger --radius-km or an earlier --as-of"),
        ),
        StressError::ConfigError(_) => ("CONFIG_ERROR", Some("Run 'geostress doctor --config <file>'")),
        StressError::Gateway(_) => ("GATEWAY_ERROR", Some("Check the data source and retry")),
        StressError::InvalidLocation(_) => ("INVALID_LOCATION", None),
        StressError::Io(_) => ("IO_ERROR", Some("Check file paths and permissions")),
        _ => ("PARSE_ERROR", Some("Run 'geostress schema series' for the expected format")),
    };
    CliError {
        code: code.to_string(),
        message: e.to_string(),
        hint: hint.map(str::to_string),
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    station_id: String,
    input_samples: usize,
    usable_samples: usize,
    coverage: f64,
    flags: Vec<String>,
    first_sample_utc: Option<String>,
    last_sample_utc: Option<String>,
    net_displacement_mm: f64,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
