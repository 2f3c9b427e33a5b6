use log::debug;

use crate::config::NavigationConfig;
use crate::telemetry::{distance, initial_bearing, Coordinate, Degrees, Meter, PositionSample};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ingest {
    Accepted,
    Rejected,
}


/**
 * Holds the filtered position, heading and accuracy. A new sample is only
 * taken if it moved further from the current position than a fraction of
 * its own accuracy, so jitter inside the device's uncertainty is ignored
 * while real movement still shows up quickly.
 */
#[derive(Clone, Debug)]
pub struct PositionTracker {
    position: Option<Coordinate>,
    // Clockwise from true north, 0 until two positions have been accepted
    heading: Degrees,
    accuracy: Meter,
    threshold_factor: f64,
    precision_threshold: Meter,
}


impl Default for PositionTracker {
    fn default() -> PositionTracker {
        PositionTracker::new(&NavigationConfig::default())
    }
}


impl PositionTracker {
    pub fn new(config: &NavigationConfig) -> PositionTracker {
        PositionTracker {
            position: None,
            heading: 0.0,
            accuracy: config.precision_threshold,
            threshold_factor: config.noise_threshold_factor,
            precision_threshold: config.precision_threshold,
        }
    }

    /**
     * Runs the noise filter on a sample and, if it passes, moves the tracked
     * position. Rejected samples leave everything untouched.
     */
    pub fn ingest(&mut self, sample: &PositionSample) -> Ingest {
        if let Some(previous) = self.position {
            let moved_m = distance(&previous, &sample.coordinate);
            let minimum_m = sample.accuracy * self.threshold_factor;
            if moved_m < minimum_m {
                debug!(
                    "Ignoring sample {:.2} m away, needs {:.2} m",
                    moved_m, minimum_m
                );
                return Ingest::Rejected;
            }
        }
        self.accept(sample);
        Ingest::Accepted
    }

    /**
     * Moves the tracked position to a sample without filtering it. The
     * heading follows the move when there was a position before.
     */
    pub fn accept(&mut self, sample: &PositionSample) {
        if let Some(previous) = self.position {
            self.heading = initial_bearing(&previous, &sample.coordinate);
        }
        self.position = Some(sample.coordinate);
        self.accuracy = sample.accuracy;
    }

    pub fn position(&self) -> Option<Coordinate> {
        self.position
    }

    pub fn heading(&self) -> Degrees {
        self.heading
    }

    pub fn accuracy(&self) -> Meter {
        self.accuracy
    }

    /// The last accepted fix was worse than the precision threshold.
    pub fn is_imprecise(&self) -> bool {
        self.accuracy > self.precision_threshold
    }
}


#[cfg(test)]
mod tests {
    use super::{Ingest, PositionTracker};
    use crate::config::NavigationConfig;
    use crate::telemetry::{assert_approx_eq, distance, Coordinate, PositionSample};

    // Roughly 1.11 m of longitude on the equator
    const METER_ISH: f64 = 0.00001;

    fn sample(latitude: f64, longitude: f64, accuracy: f64) -> PositionSample {
        PositionSample::new(Coordinate::new(latitude, longitude), accuracy)
    }

    #[test]
    fn test_first_sample_always_accepted() {
        let mut tracker = PositionTracker::default();
        assert_eq!(tracker.position(), None);
        assert_eq!(tracker.heading(), 0.0);
        assert_eq!(tracker.ingest(&sample(0.0, 0.0, 1000.0)), Ingest::Accepted);
        assert_eq!(tracker.position(), Some(Coordinate::new(0.0, 0.0)));
        assert_eq!(tracker.accuracy(), 1000.0);
        // Heading needs two positions
        assert_eq!(tracker.heading(), 0.0);
    }

    #[test]
    fn test_jitter_rejected() {
        let mut tracker = PositionTracker::default();
        tracker.ingest(&sample(0.0, 0.0, 10.0));

        // 3 m < 10 * 0.4
        let three_m = 3.0 / 1.11195 * METER_ISH;
        assert_approx_eq(
            distance(&Coordinate::new(0.0, 0.0), &Coordinate::new(0.0, three_m)),
            3.0,
            0.01,
        );
        assert_eq!(tracker.ingest(&sample(0.0, three_m, 10.0)), Ingest::Rejected);
        assert_eq!(tracker.position(), Some(Coordinate::new(0.0, 0.0)));
        assert_eq!(tracker.accuracy(), 10.0);
        assert_eq!(tracker.heading(), 0.0);

        // 5 m >= 4
        let five_m = 5.0 / 1.11195 * METER_ISH;
        assert_eq!(tracker.ingest(&sample(0.0, five_m, 10.0)), Ingest::Accepted);
        assert_eq!(tracker.position(), Some(Coordinate::new(0.0, five_m)));
        assert_approx_eq(tracker.heading(), 90.0, 1e-6);
    }

    #[test]
    fn test_heading_follows_movement() {
        let mut tracker = PositionTracker::default();
        tracker.ingest(&sample(0.0, 0.0, 5.0));
        tracker.ingest(&sample(0.001, 0.0, 5.0));
        assert_approx_eq(tracker.heading(), 0.0, 1e-6);
        tracker.ingest(&sample(0.001, -0.001, 5.0));
        assert_approx_eq(tracker.heading(), -90.0, 1e-3);
        tracker.ingest(&sample(0.0, -0.001, 5.0));
        assert_approx_eq(tracker.heading(), 180.0, 1e-6);
    }

    #[test]
    fn test_accept_skips_filter() {
        let mut tracker = PositionTracker::default();
        tracker.accept(&sample(0.0, 0.0, 10.0));
        assert_eq!(tracker.position(), Some(Coordinate::new(0.0, 0.0)));
        assert_eq!(tracker.heading(), 0.0);

        // Well inside the noise band, taken anyway
        tracker.accept(&sample(0.0, METER_ISH, 50.0));
        assert_eq!(tracker.position(), Some(Coordinate::new(0.0, METER_ISH)));
        assert_eq!(tracker.accuracy(), 50.0);
        assert_approx_eq(tracker.heading(), 90.0, 1e-6);
        assert!(tracker.is_imprecise());
    }

    #[test]
    fn test_zero_accuracy_accepts_any_move() {
        let mut tracker = PositionTracker::default();
        tracker.ingest(&sample(0.0, 0.0, 0.0));
        assert_eq!(tracker.ingest(&sample(0.0, 0.0, 0.0)), Ingest::Accepted);
        assert_eq!(tracker.ingest(&sample(0.0, METER_ISH, 0.0)), Ingest::Accepted);
    }

    #[test]
    fn test_precision_flag() {
        let mut tracker = PositionTracker::default();
        // Starts at the threshold, which is not imprecise
        assert!(!tracker.is_imprecise());
        tracker.ingest(&sample(0.0, 0.0, 10.0));
        assert!(!tracker.is_imprecise());
        tracker.ingest(&sample(0.0, 0.001, 25.0));
        assert!(tracker.is_imprecise());
        tracker.ingest(&sample(0.0, 0.002, 3.0));
        assert!(!tracker.is_imprecise());
    }

    #[test]
    fn test_config_threshold_factor() {
        let config = NavigationConfig {
            noise_threshold_factor: 1.0,
            ..NavigationConfig::default()
        };
        let mut tracker = PositionTracker::new(&config);
        tracker.ingest(&sample(0.0, 0.0, 10.0));
        let five_m = 5.0 / 1.11195 * METER_ISH;
        assert_eq!(tracker.ingest(&sample(0.0, five_m, 10.0)), Ingest::Rejected);
    }
}
