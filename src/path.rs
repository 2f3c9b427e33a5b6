/**
 * A fixed route as an ordered list of distinct waypoints.
 */
use std::fmt;
use std::slice;

use log::debug;

use crate::config::COINCIDENCE_THRESHOLD_M;
use crate::error::{NavError, Result};
use crate::telemetry::{distance, initial_bearing, Coordinate, Degrees, Meter};


/**
 * An ordered, deduplicated sequence of waypoints. Insertion order is the
 * direction of travel. `segment_distances[i]` is the distance from waypoint
 * `i - 1` to waypoint `i`, and `segment_distances[0]` is 0. Consecutive
 * waypoints are always further apart than the coincidence threshold the
 * path was built with.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    name: String,
    waypoints: Vec<Coordinate>,
    segment_distances: Vec<Meter>,
    total_distance: Meter,
}


/// Totals shown when listing paths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSummary {
    pub total_distance: Meter,
    /// Waypoints other than the start and the end
    pub turns: usize,
}


impl Path {
    pub fn new<S: Into<String>>(name: S, coordinates: Vec<Coordinate>) -> Path {
        Path::with_threshold(name, coordinates, COINCIDENCE_THRESHOLD_M)
    }

    /**
     * Builds a path, dropping every point that is within `threshold` of the
     * last point that was kept. Points are compared against the last kept
     * point rather than their raw neighbor so that a slow drift of small
     * steps still gets split into waypoints.
     */
    pub fn with_threshold<S: Into<String>>(
        name: S,
        coordinates: Vec<Coordinate>,
        threshold: Meter,
    ) -> Path {
        let name = name.into();
        let mut raw = coordinates.into_iter();
        let first = match raw.next() {
            Some(first) => first,
            None => {
                return Path {
                    name,
                    waypoints: Vec::new(),
                    segment_distances: Vec::new(),
                    total_distance: 0.0,
                }
            }
        };

        let mut waypoints = vec![first];
        let mut segment_distances = vec![0.0];
        let mut total_distance = 0.0;
        let mut last_accepted = first;
        for (offset, candidate) in raw.enumerate() {
            let d = distance(&last_accepted, &candidate);
            if d > threshold {
                waypoints.push(candidate);
                segment_distances.push(d);
                total_distance += d;
                last_accepted = candidate;
            } else {
                debug!(
                    "Dropping point {} of '{}', {:.2} m from the last waypoint",
                    offset + 1,
                    name,
                    d
                );
            }
        }

        Path {
            name,
            waypoints,
            segment_distances,
            total_distance,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn waypoints(&self) -> &[Coordinate] {
        &self.waypoints
    }

    pub fn segment_distances(&self) -> &[Meter] {
        &self.segment_distances
    }

    pub fn total_distance(&self) -> Meter {
        self.total_distance
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoint(&self, index: usize) -> Option<&Coordinate> {
        self.waypoints.get(index)
    }

    pub fn last_index(&self) -> Option<usize> {
        self.waypoints.len().checked_sub(1)
    }

    /// Distance from `position` to the waypoint at `index`.
    pub fn distance_to_waypoint(&self, position: &Coordinate, index: usize) -> Option<Meter> {
        self.waypoint(index)
            .map(|waypoint| distance(position, waypoint))
    }

    /// Bearing from `position` to the waypoint at `index`, in (-180, 180].
    pub fn bearing_to_waypoint(&self, position: &Coordinate, index: usize) -> Option<Degrees> {
        self.waypoint(index)
            .map(|waypoint| initial_bearing(position, waypoint))
    }

    /// Path length left once the waypoint at `index` has been reached.
    pub fn remaining_after(&self, index: usize) -> Meter {
        self.segment_distances
            .iter()
            .skip(index + 1)
            .sum()
    }

    pub fn summary(&self) -> PathSummary {
        PathSummary {
            total_distance: self.total_distance,
            turns: self.waypoints.len().saturating_sub(2),
        }
    }
}


impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "name: {}", self.name)?;
        for waypoint in &self.waypoints {
            writeln!(f, "coords: {}, {}", waypoint.latitude, waypoint.longitude)?;
        }
        writeln!(f, "total distance: {}", self.total_distance)
    }
}


impl fmt::Display for PathSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Total distance: {:.2} m, No. of turns: {}",
            self.total_distance, self.turns
        )
    }
}


/// A named list of paths, in the order they were stored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathCollection {
    name: String,
    paths: Vec<Path>,
}


impl PathCollection {
    pub fn new<S: Into<String>>(name: S, paths: Vec<Path>) -> PathCollection {
        PathCollection {
            name: name.into(),
            paths,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index)
    }

    pub fn push(&mut self, path: Path) {
        self.paths.push(path);
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Takes the path at `index` out of the collection.
    pub fn remove(&mut self, index: usize) -> Result<Path> {
        if index >= self.paths.len() {
            return Err(NavError::PathIndexOutOfRange {
                index,
                len: self.paths.len(),
            });
        }
        Ok(self.paths.remove(index))
    }

    pub fn iter(&self) -> slice::Iter<'_, Path> {
        self.paths.iter()
    }
}


impl<'a> IntoIterator for &'a PathCollection {
    type Item = &'a Path;
    type IntoIter = slice::Iter<'a, Path>;

    fn into_iter(self) -> slice::Iter<'a, Path> {
        self.paths.iter()
    }
}
