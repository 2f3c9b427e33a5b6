/**
 * Units, coordinates and the spherical geometry used by everything else.
 */
use chrono::{DateTime, Utc};

pub type Meter = f64;
pub type Degrees = f64;
pub type MetersPerSecond = f64;
pub type Seconds = f64;

/// Earth's mean radius.
pub const EARTH_RADIUS_M: Meter = 6_371_008.8;


#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    pub latitude: Degrees,
    pub longitude: Degrees,
}


impl Coordinate {
    pub fn new(latitude: Degrees, longitude: Degrees) -> Coordinate {
        Coordinate {
            latitude,
            longitude,
        }
    }

    /// True if the latitude and longitude are finite and in range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
    }
}


/**
 * A single fix from the position source. The accuracy is the radius of
 * uncertainty the device reports for the fix.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionSample {
    pub coordinate: Coordinate,
    pub accuracy: Meter,
}


impl PositionSample {
    pub fn new(coordinate: Coordinate, accuracy: Meter) -> PositionSample {
        PositionSample {
            coordinate,
            accuracy,
        }
    }
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedSample {
    pub sample: PositionSample,
    pub timestamp: DateTime<Utc>,
}


/**
 * Great circle distance between two points, using the haversine formula.
 */
pub fn distance(a: &Coordinate, b: &Coordinate) -> Meter {
    let lat_1 = a.latitude.to_radians();
    let lat_2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_1.cos() * lat_2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair over 1 for antipodal points
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}


/**
 * Initial bearing from one point toward another, in degrees clockwise from
 * true north, in the range (-180, 180]. Coincident points give 0.
 */
pub fn initial_bearing(from: &Coordinate, to: &Coordinate) -> Degrees {
    if from == to {
        return 0.0;
    }
    let lat_1 = from.latitude.to_radians();
    let lat_2 = to.latitude.to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let y = d_lon.sin() * lat_2.cos();
    let x = lat_1.cos() * lat_2.sin() - lat_1.sin() * lat_2.cos() * d_lon.cos();
    let bearing = y.atan2(x).to_degrees();
    if bearing <= -180.0 {
        bearing + 360.0
    } else {
        bearing
    }
}


/**
 * Brings a difference of two bearings back into (-180, 180]. Both bearings
 * are already bounded, so one correction is enough.
 */
pub fn wrap_degrees(degrees: Degrees) -> Degrees {
    if degrees <= -180.0 {
        degrees + 360.0
    } else if degrees > 180.0 {
        degrees - 360.0
    } else {
        degrees
    }
}


#[cfg(test)]
pub fn assert_approx_eq(value_1: f64, value_2: f64, tolerance: f64) {
    let diff = (value_1 - value_2).abs();
    assert!(
        diff < tolerance,
        "|{} - {}| = {} < {} failed",
        value_1,
        value_2,
        diff,
        tolerance
    );
}
