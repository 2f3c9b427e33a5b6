/**
 * Builds a new route out of pins the user drops, while tracking where the
 * user is with the same filtered position stream that navigation uses.
 */
use log::info;

use crate::config::NavigationConfig;
use crate::error::{NavError, Result};
use crate::path_store::{LocationRecord, PathListRecord, PathRecord};
use crate::position_tracker::{Ingest, PositionTracker};
use crate::sample_feed::PositionListener;
use crate::telemetry::{Coordinate, TimedSample};


pub fn default_route_name(existing_routes: usize) -> String {
    format!("My Route {}", existing_routes + 1)
}


#[derive(Clone, Debug, Default)]
pub struct RouteCreator {
    tracker: PositionTracker,
    waypoints: Vec<Coordinate>,
}


impl RouteCreator {
    pub fn new(config: &NavigationConfig) -> RouteCreator {
        RouteCreator {
            tracker: PositionTracker::new(config),
            waypoints: Vec::new(),
        }
    }

    pub fn add_waypoint(&mut self, coordinate: Coordinate) {
        self.waypoints.push(coordinate);
    }

    /// Removes the last pin.
    pub fn undo(&mut self) -> Option<Coordinate> {
        self.waypoints.pop()
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    pub fn waypoints(&self) -> &[Coordinate] {
        &self.waypoints
    }

    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    /// A route needs somewhere to start and somewhere to end.
    pub fn can_save(&self) -> bool {
        self.waypoints.len() > 1
    }

    /**
     * The pins as a stored path, in the order they were dropped. Duplicates
     * are kept here and only collapsed once the record is loaded as a path.
     */
    pub fn to_record(&self, name: &str) -> Result<PathRecord> {
        if !self.can_save() {
            return Err(NavError::NotEnoughWaypoints {
                count: self.waypoints.len(),
            });
        }
        Ok(PathRecord {
            title: name.to_string(),
            locations: self.waypoints
                .iter()
                .map(|&waypoint| LocationRecord::from(waypoint))
                .collect(),
        })
    }

    /**
     * Appends the route to a stored list. Without a name, or with an empty
     * one, the route is named after its place in the list. Returns the name
     * that was used.
     */
    pub fn save_into(&self, list: &mut PathListRecord, name: Option<&str>) -> Result<String> {
        let name = match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => default_route_name(list.paths.len()),
        };
        let record = self.to_record(&name)?;
        info!("Saving route '{}' with {} points", name, record.locations.len());
        list.paths.push(record);
        Ok(name)
    }
}


impl PositionListener for RouteCreator {
    fn on_sample(&mut self, sample: &TimedSample) -> Ingest {
        self.tracker.ingest(&sample.sample)
    }
}


#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{default_route_name, RouteCreator};
    use crate::config::NavigationConfig;
    use crate::error::NavError;
    use crate::path_store::PathListRecord;
    use crate::position_tracker::Ingest;
    use crate::sample_feed::PositionListener;
    use crate::telemetry::{Coordinate, PositionSample, TimedSample};

    #[test]
    fn test_add_undo_clear() {
        let mut creator = RouteCreator::default();
        assert_eq!(creator.undo(), None);
        creator.add_waypoint(Coordinate::new(0.0, 0.0));
        creator.add_waypoint(Coordinate::new(0.0, 0.01));
        assert!(creator.can_save());
        assert_eq!(creator.undo(), Some(Coordinate::new(0.0, 0.01)));
        assert!(!creator.can_save());
        creator.add_waypoint(Coordinate::new(0.0, 0.02));
        assert_eq!(creator.waypoints().len(), 2);
        creator.clear();
        assert!(creator.waypoints().is_empty());
    }

    #[test]
    fn test_to_record_needs_two_points() {
        let mut creator = RouteCreator::new(&NavigationConfig::default());
        creator.add_waypoint(Coordinate::new(0.0, 0.0));
        match creator.to_record("short") {
            Err(NavError::NotEnoughWaypoints { count }) => assert_eq!(count, 1),
            other => panic!("Expected not enough waypoints, got {:?}", other),
        }

        // Duplicate pins are kept as dropped
        creator.add_waypoint(Coordinate::new(0.0, 0.0));
        let record = creator.to_record("dup").unwrap();
        assert_eq!(record.title, "dup");
        assert_eq!(record.locations.len(), 2);
        assert_eq!(record.to_path(10.0).unwrap().len(), 1);
    }

    #[test]
    fn test_save_into_names() {
        assert_eq!(default_route_name(0), "My Route 1");

        let mut creator = RouteCreator::default();
        creator.add_waypoint(Coordinate::new(-37.91, 145.13));
        creator.add_waypoint(Coordinate::new(-37.92, 145.13));

        let mut list = PathListRecord::default();
        assert_eq!(creator.save_into(&mut list, None).unwrap(), "My Route 1");
        assert_eq!(creator.save_into(&mut list, Some("")).unwrap(), "My Route 2");
        assert_eq!(creator.save_into(&mut list, Some("To the lake")).unwrap(), "To the lake");
        assert_eq!(list.paths.len(), 3);
        assert_eq!(list.paths[2].title, "To the lake");

        creator.clear();
        assert!(creator.save_into(&mut list, None).is_err());
        assert_eq!(list.paths.len(), 3);
    }

    #[test]
    fn test_tracks_position() {
        let mut creator = RouteCreator::default();
        let sample = TimedSample {
            sample: PositionSample::new(Coordinate::new(-37.91, 145.13), 30.0),
            timestamp: Utc.timestamp_millis_opt(0).unwrap(),
        };
        assert_eq!(creator.on_sample(&sample), Ingest::Accepted);
        assert_eq!(creator.tracker().position(), Some(Coordinate::new(-37.91, 145.13)));
        assert!(creator.tracker().is_imprecise());
        // Pins are independent of the tracked position
        assert!(creator.waypoints().is_empty());
    }
}
