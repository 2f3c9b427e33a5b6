/**
 * Reads and writes the stored form of paths:
 * `{"title": ..., "locations": [{"lat": ..., "lng": ...}, ...]}` for a path
 * and `{"paths": [...]}` for a list of them.
 */
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path as FilePath;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};
use crate::path::{Path, PathCollection};
use crate::telemetry::{Coordinate, Meter};


#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub lat: f64,
    pub lng: f64,
}


#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    pub title: String,
    pub locations: Vec<LocationRecord>,
}


#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PathListRecord {
    pub paths: Vec<PathRecord>,
}


impl From<Coordinate> for LocationRecord {
    fn from(coordinate: Coordinate) -> LocationRecord {
        LocationRecord {
            lat: coordinate.latitude,
            lng: coordinate.longitude,
        }
    }
}


impl PathRecord {
    pub fn from_json(json: &str) -> Result<PathRecord> {
        Ok(serde_json::from_str(json)?)
    }

    /**
     * Checks every location and returns them in order. Any bad location
     * fails the whole record.
     */
    pub fn coordinates(&self) -> Result<Vec<Coordinate>> {
        self.locations
            .iter()
            .enumerate()
            .map(|(index, location)| {
                let coordinate = Coordinate::new(location.lat, location.lng);
                if coordinate.is_valid() {
                    Ok(coordinate)
                } else {
                    Err(NavError::InvalidCoordinate {
                        index,
                        latitude: location.lat,
                        longitude: location.lng,
                    })
                }
            })
            .collect()
    }

    pub fn to_path(&self, threshold: Meter) -> Result<Path> {
        Ok(Path::with_threshold(
            self.title.clone(),
            self.coordinates()?,
            threshold,
        ))
    }
}


impl<'a> From<&'a Path> for PathRecord {
    fn from(path: &'a Path) -> PathRecord {
        PathRecord {
            title: path.name().to_string(),
            locations: path.waypoints()
                .iter()
                .map(|&waypoint| LocationRecord::from(waypoint))
                .collect(),
        }
    }
}


impl PathListRecord {
    pub fn from_json(json: &str) -> Result<PathListRecord> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<FilePath>>(file_name: P) -> Result<PathListRecord> {
        let file = File::open(file_name.as_ref())?;
        let record: PathListRecord = serde_json::from_reader(BufReader::new(file))?;
        info!(
            "Loaded {} paths from {}",
            record.paths.len(),
            file_name.as_ref().display()
        );
        Ok(record)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn save<P: AsRef<FilePath>>(&self, file_name: P) -> Result<()> {
        let file = File::create(file_name)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Deletes the stored path at `index` and hands it back.
    pub fn remove(&mut self, index: usize) -> Result<PathRecord> {
        if index >= self.paths.len() {
            return Err(NavError::PathIndexOutOfRange {
                index,
                len: self.paths.len(),
            });
        }
        let record = self.paths.remove(index);
        info!("Deleted path '{}'", record.title);
        Ok(record)
    }

    /// Builds every path. Nothing is returned if any of them is malformed.
    pub fn to_collection<S: Into<String>>(&self, name: S, threshold: Meter) -> Result<PathCollection> {
        let paths = self.paths
            .iter()
            .map(|record| record.to_path(threshold))
            .collect::<Result<Vec<Path>>>()?;
        Ok(PathCollection::new(name, paths))
    }
}


impl<'a> From<&'a PathCollection> for PathListRecord {
    fn from(collection: &'a PathCollection) -> PathListRecord {
        PathListRecord {
            paths: collection.iter().map(PathRecord::from).collect(),
        }
    }
}
