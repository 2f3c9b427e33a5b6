/**
 * Reads recorded position samples and pushes them to whoever is listening.
 * Each line is `timestamp_ms,latitude,longitude,accuracy_m`; blank lines and
 * lines starting with `#` are skipped.
 */
use std::io::{BufRead, Lines};

use chrono::{DateTime, TimeZone, Utc};
use log::debug;

use crate::error::{NavError, Result};
use crate::position_tracker::Ingest;
use crate::telemetry::{Coordinate, PositionSample, TimedSample};


/**
 * Anything that consumes the position stream. Samples arrive one at a time
 * and each is handled to completion before the next.
 */
pub trait PositionListener {
    fn on_sample(&mut self, sample: &TimedSample) -> Ingest;
}


#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub accepted: usize,
    pub rejected: usize,
}


pub struct SampleFeed<R: BufRead> {
    lines: Lines<R>,
    line_number: usize,
    last_timestamp: Option<DateTime<Utc>>,
}


impl<R: BufRead> SampleFeed<R> {
    pub fn new(reader: R) -> SampleFeed<R> {
        SampleFeed {
            lines: reader.lines(),
            line_number: 0,
            last_timestamp: None,
        }
    }

    /// Sends every remaining sample to the listener. Stops at the first bad line.
    pub fn pump(&mut self, listener: &mut dyn PositionListener) -> Result<FeedStats> {
        let mut stats = FeedStats::default();
        for sample in self {
            match listener.on_sample(&sample?) {
                Ingest::Accepted => stats.accepted += 1,
                Ingest::Rejected => stats.rejected += 1,
            }
        }
        Ok(stats)
    }

    fn parse_line(&self, line: &str) -> Result<TimedSample> {
        let fields: Vec<&str> = line.split(',').map(|field| field.trim()).collect();
        if fields.len() != 4 {
            return Err(self.malformed(format!("expected 4 fields, found {}", fields.len())));
        }

        let timestamp_ms = match fields[0].parse::<i64>() {
            Ok(timestamp_ms) => timestamp_ms,
            Err(e) => return Err(self.malformed(format!("timestamp '{}': {}", fields[0], e))),
        };
        let timestamp = match Utc.timestamp_millis_opt(timestamp_ms).single() {
            Some(timestamp) => timestamp,
            None => return Err(self.malformed(format!("timestamp {} out of range", timestamp_ms))),
        };

        let mut values = [0.0f64; 3];
        for (value, field) in values.iter_mut().zip(fields[1..].iter()) {
            *value = match field.parse::<f64>() {
                Ok(parsed) => parsed,
                Err(e) => return Err(self.malformed(format!("'{}': {}", field, e))),
            };
        }
        let coordinate = Coordinate::new(values[0], values[1]);
        if !coordinate.is_valid() {
            return Err(self.malformed(format!("coordinate {}, {} out of range", values[0], values[1])));
        }
        let accuracy = values[2];
        if !accuracy.is_finite() || accuracy < 0.0 {
            return Err(self.malformed(format!("accuracy {} must be a non-negative number", accuracy)));
        }

        Ok(TimedSample {
            sample: PositionSample::new(coordinate, accuracy),
            timestamp,
        })
    }

    fn malformed(&self, reason: String) -> NavError {
        NavError::MalformedSample {
            line: self.line_number,
            reason,
        }
    }
}


impl<R: BufRead> Iterator for SampleFeed<R> {
    type Item = Result<TimedSample>;

    /**
     * Returns the next sample. A fix repeating the previous timestamp is the
     * source delivering the same reading twice, so it's skipped.
     */
    fn next(&mut self) -> Option<Result<TimedSample>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(NavError::from(e))),
            };
            self.line_number += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let sample = match self.parse_line(trimmed) {
                Ok(sample) => sample,
                Err(e) => return Some(Err(e)),
            };
            if self.last_timestamp == Some(sample.timestamp) {
                debug!("Skipping repeated sample on line {}", self.line_number);
                continue;
            }
            self.last_timestamp = Some(sample.timestamp);
            return Some(Ok(sample));
        }
    }
}
