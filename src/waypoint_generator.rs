/**
 * Provides waypoint data.
 */
use log::info;

use crate::path::Path;
use crate::telemetry::{distance, Coordinate, Meter};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrival {
    /// Now heading for the waypoint at this index
    WaypointReached(usize),
    DestinationReached,
}


pub trait WaypointGenerator {
    /**
     * Returns the waypoint being navigated to, or None once there are no
     * more waypoints.
     */
    fn current_waypoint(&self) -> Option<Coordinate>;

    /**
     * Returns the index of the current waypoint. Never decreases.
     */
    fn index(&self) -> usize;

    /**
     * Returns true if a fix at `position` with the given accuracy counts as
     * being at the current waypoint.
     */
    fn reached(&self, position: &Coordinate, accuracy: Meter) -> bool;

    /**
     * Moves to the next waypoint, or finishes if this was the last one.
     */
    fn advance(&mut self) -> Option<Arrival>;

    /**
     * Returns true if there are no more waypoints.
     */
    fn done(&self) -> bool;
}


/**
 * Walks the waypoints of a path in order. Finishing is a latch: once done it
 * never hands out a waypoint again.
 */
#[derive(Clone, Debug)]
pub struct PathWaypointGenerator<'a> {
    path: &'a Path,
    index: usize,
    complete: bool,
}


impl<'a> PathWaypointGenerator<'a> {
    pub fn new(path: &'a Path) -> PathWaypointGenerator<'a> {
        PathWaypointGenerator {
            path,
            index: 0,
            complete: false,
        }
    }

    pub fn path(&self) -> &'a Path {
        self.path
    }
}


impl<'a> WaypointGenerator for PathWaypointGenerator<'a> {
    fn current_waypoint(&self) -> Option<Coordinate> {
        if self.complete {
            return None;
        }
        self.path.waypoint(self.index).copied()
    }

    fn index(&self) -> usize {
        self.index
    }

    fn reached(&self, position: &Coordinate, accuracy: Meter) -> bool {
        // Strict, so a fix with no uncertainty can't trigger an arrival
        match self.current_waypoint() {
            Some(waypoint) => distance(position, &waypoint) < accuracy,
            None => false,
        }
    }

    fn advance(&mut self) -> Option<Arrival> {
        if self.complete {
            return None;
        }
        let last_index = self.path.last_index()?;
        if self.index < last_index {
            self.index += 1;
            info!("Reached waypoint, now heading for {}", self.index + 1);
            Some(Arrival::WaypointReached(self.index))
        } else {
            self.complete = true;
            info!("Reached the destination of '{}'", self.path.name());
            Some(Arrival::DestinationReached)
        }
    }

    fn done(&self) -> bool {
        self.complete
    }
}
