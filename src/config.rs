/**
 * Tunable thresholds for path construction and sample filtering.
 */
use std::fs::File;
use std::io::BufReader;
use std::path::Path as FilePath;

use serde::Deserialize;

use crate::error::Result;
use crate::telemetry::Meter;

/// Minimum distance between two consecutive distinct waypoints. Absorbs GPS
/// jitter when a path is authored by dropping pins.
pub const COINCIDENCE_THRESHOLD_M: Meter = 10.0;

/// Samples must move at least this fraction of their own accuracy from the
/// last accepted position to be accepted.
pub const NOISE_THRESHOLD_FACTOR: f64 = 0.4;

/// Fixes with a worse accuracy than this are flagged as imprecise.
pub const PRECISION_THRESHOLD_M: Meter = COINCIDENCE_THRESHOLD_M;


#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub coincidence_threshold: Meter,
    pub noise_threshold_factor: f64,
    pub precision_threshold: Meter,
}


impl Default for NavigationConfig {
    fn default() -> NavigationConfig {
        NavigationConfig {
            coincidence_threshold: COINCIDENCE_THRESHOLD_M,
            noise_threshold_factor: NOISE_THRESHOLD_FACTOR,
            precision_threshold: PRECISION_THRESHOLD_M,
        }
    }
}


impl NavigationConfig {
    /// Parses a JSON object. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<NavigationConfig> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<FilePath>>(file_name: P) -> Result<NavigationConfig> {
        let file = File::open(file_name)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
