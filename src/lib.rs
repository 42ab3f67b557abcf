//! Geostress - Geodetic stress-indicator engine
//!
//! Geostress turns a station's GNSS displacement time series, optionally fused
//! with a seismicity-derived stress score, into a stress assessment through a
//! deterministic pipeline: series normalization → indicator derivation →
//! scoring → recommendations → payload encoding.
//!
//! ## Modules
//!
//! - **Engine**: `normalizer`, `features`, `scoring`, `recommendations`, `pipeline`
//! - **Gateways**: `adapters` (GNSS series, seismicity, station directory), `stations`
//! - **Geometry**: `geo` (distance, point-in-polygon), `plates` (tectonic context)

pub mod adapters;
pub mod config;
pub mod encoder;
pub mod error;
pub mod features;
pub mod geo;
pub mod normalizer;
pub mod pipeline;
pub mod plates;
pub mod recommendations;
pub mod scoring;
pub mod stations;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::StressConfig;
pub use encoder::{AssessmentEncoder, AssessmentPayload};
pub use error::StressError;
pub use pipeline::{assess_json, compute_stress_assessment, Gateways, StressEngine, StressProcessor};
pub use plates::{PlateCache, PlateCatalog};
pub use types::{
    DisplacementSample, DisplacementSeries, GeoPoint, SeismicityStressInput, StressAssessment,
    StressLevel,
};

/// Geostress version embedded in all assessment payloads
pub const GEOSTRESS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for assessment payloads
pub const PRODUCER_NAME: &str = "geostress";
