/**
 * Follows a path with live position samples and reports progress along it.
 */
use chrono::{DateTime, Utc};
use log::warn;

use crate::config::NavigationConfig;
use crate::path::Path;
use crate::position_tracker::{Ingest, PositionTracker};
use crate::sample_feed::PositionListener;
use crate::telemetry::{
    distance, wrap_degrees, Coordinate, Degrees, Meter, MetersPerSecond,
    PositionSample, Seconds, TimedSample,
};
use crate::waypoint_generator::{Arrival, PathWaypointGenerator, WaypointGenerator};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Complete,
}


/// What happened to one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Update {
    pub ingest: Ingest,
    pub arrival: Option<Arrival>,
}


/// Which way to turn to face the next waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    UTurn,
    Left,
    SlightLeft,
    Straight,
    SlightRight,
    Right,
}


impl Direction {
    /**
     * Buckets a relative bearing in (-180, 180] into 45 degree sectors
     * centered on straight ahead, left, right and behind.
     */
    pub fn from_relative_bearing(degrees: Degrees) -> Direction {
        if -180.0 < degrees && degrees <= -112.5 {
            Direction::UTurn
        } else if -112.5 < degrees && degrees <= -67.5 {
            Direction::Left
        } else if -67.5 < degrees && degrees <= -22.5 {
            Direction::SlightLeft
        } else if -22.5 < degrees && degrees <= 22.5 {
            Direction::Straight
        } else if 22.5 < degrees && degrees <= 67.5 {
            Direction::SlightRight
        } else if 67.5 < degrees && degrees <= 112.5 {
            Direction::Right
        } else if 112.5 < degrees && degrees <= 180.0 {
            Direction::UTurn
        } else {
            warn!("Direction out of range: {}", degrees);
            Direction::Straight
        }
    }
}


/**
 * One trip along a path. Owns the position tracker that filters incoming
 * samples and the pointer to the next waypoint. All the reported metrics are
 * computed on read from that state.
 */
pub struct NavigationSession<'a> {
    tracker: PositionTracker,
    waypoints: PathWaypointGenerator<'a>,
    travelled: Meter,
    start_time: DateTime<Utc>,
    position_history: Vec<Coordinate>,
}


impl<'a> NavigationSession<'a> {
    pub fn new(path: &'a Path) -> NavigationSession<'a> {
        NavigationSession::starting_at(path, Utc::now(), &NavigationConfig::default())
    }

    pub fn starting_at(
        path: &'a Path,
        start_time: DateTime<Utc>,
        config: &NavigationConfig,
    ) -> NavigationSession<'a> {
        NavigationSession {
            tracker: PositionTracker::new(config),
            waypoints: PathWaypointGenerator::new(path),
            travelled: 0.0,
            start_time,
            position_history: Vec::new(),
        }
    }

    /**
     * Filters a raw sample and, if the tracker takes it, moves the session
     * along.
     */
    pub fn update(&mut self, sample: &PositionSample) -> Update {
        let ingest = self.tracker.ingest(sample);
        let arrival = match ingest {
            Ingest::Accepted => self.move_to(sample.coordinate, sample.accuracy),
            Ingest::Rejected => None,
        };
        Update { ingest, arrival }
    }

    /**
     * Handles a position that already passed a noise filter elsewhere. The
     * tracker takes it as is, then the session moves along as for an
     * accepted sample.
     */
    pub fn on_position_accepted(&mut self, position: Coordinate, accuracy: Meter) -> Option<Arrival> {
        self.tracker.accept(&PositionSample::new(position, accuracy));
        self.move_to(position, accuracy)
    }

    /**
     * Adds the ground covered since the last position and checks whether the
     * current waypoint is within the position's accuracy.
     */
    fn move_to(&mut self, position: Coordinate, accuracy: Meter) -> Option<Arrival> {
        if let Some(prior) = self.position_history.last() {
            self.travelled += distance(prior, &position);
        }
        self.position_history.push(position);

        if self.waypoints.reached(&position, accuracy) {
            self.waypoints.advance()
        } else {
            None
        }
    }

    pub fn path(&self) -> &'a Path {
        self.waypoints.path()
    }

    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    pub fn waypoint_index(&self) -> usize {
        self.waypoints.index()
    }

    pub fn is_complete(&self) -> bool {
        self.waypoints.done()
    }

    pub fn state(&self) -> SessionState {
        if self.is_complete() {
            SessionState::Complete
        } else {
            SessionState::Active
        }
    }

    pub fn is_imprecise(&self) -> bool {
        self.tracker.is_imprecise()
    }

    /// Ground covered since the session started.
    pub fn travelled(&self) -> Meter {
        self.travelled
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn position_history(&self) -> &[Coordinate] {
        &self.position_history
    }

    pub fn elapsed_seconds_at(&self, now: DateTime<Utc>) -> Seconds {
        (now - self.start_time).num_milliseconds() as Seconds / 1000.0
    }

    pub fn distance_to_next(&self) -> Option<Meter> {
        if self.is_complete() {
            return None;
        }
        let position = self.tracker.position()?;
        self.path().distance_to_waypoint(&position, self.waypoint_index())
    }

    /// Average over the whole session, None before any time has passed.
    pub fn average_speed_at(&self, now: DateTime<Utc>) -> Option<MetersPerSecond> {
        let elapsed_s = self.elapsed_seconds_at(now);
        if elapsed_s <= 0.0 {
            return None;
        }
        Some(self.travelled / elapsed_s)
    }

    pub fn average_speed(&self) -> Option<MetersPerSecond> {
        self.average_speed_at(Utc::now())
    }

    /// Distance to the next waypoint plus the rest of the path after it.
    pub fn remaining_distance(&self) -> Option<Meter> {
        let to_next = self.distance_to_next()?;
        Some(to_next + self.path().remaining_after(self.waypoint_index()))
    }

    /**
     * Estimated time to the end of the path at the average speed so far.
     * None when standing still, since no finite estimate exists.
     */
    pub fn remaining_time_at(&self, now: DateTime<Utc>) -> Option<Seconds> {
        let remaining_m = self.remaining_distance()?;
        let speed_m_s = self.average_speed_at(now)?;
        let remaining_s = remaining_m / speed_m_s;
        if remaining_s.is_finite() {
            Some(remaining_s)
        } else {
            None
        }
    }

    pub fn remaining_time(&self) -> Option<Seconds> {
        self.remaining_time_at(Utc::now())
    }

    /**
     * Angle to turn from the current heading to face the next waypoint, in
     * (-180, 180], positive clockwise.
     */
    pub fn direction_to_waypoint(&self) -> Option<Degrees> {
        if self.is_complete() {
            return None;
        }
        let position = self.tracker.position()?;
        let bearing = self.path().bearing_to_waypoint(&position, self.waypoint_index())?;
        Some(wrap_degrees(bearing - self.tracker.heading()))
    }

    pub fn turn_direction(&self) -> Option<Direction> {
        self.direction_to_waypoint()
            .map(Direction::from_relative_bearing)
    }
}


impl<'a> PositionListener for NavigationSession<'a> {
    fn on_sample(&mut self, sample: &TimedSample) -> Ingest {
        self.update(&sample.sample).ingest
    }
}
