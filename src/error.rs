use std::io;

use crate::telemetry::Degrees;


#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A stored path or path list did not have the expected shape
    #[error("Malformed path record: {0}")]
    MalformedRecord(#[from] serde_json::Error),

    #[error("Invalid coordinate at location {index}: {latitude}, {longitude}")]
    InvalidCoordinate {
        index: usize,
        latitude: Degrees,
        longitude: Degrees,
    },

    #[error("There are not enough points to save this route ({count})")]
    NotEnoughWaypoints { count: usize },

    #[error("Path index {index} out of range for {len} paths")]
    PathIndexOutOfRange { index: usize, len: usize },

    #[error("Malformed sample on line {line}: {reason}")]
    MalformedSample { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, NavError>;


#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::io;

    use super::NavError;

    #[test]
    fn test_display() {
        let e = NavError::PathIndexOutOfRange { index: 3, len: 2 };
        assert_eq!(e.to_string(), "Path index 3 out of range for 2 paths");
        let e = NavError::InvalidCoordinate {
            index: 1,
            latitude: 91.0,
            longitude: 0.5,
        };
        assert_eq!(e.to_string(), "Invalid coordinate at location 1: 91, 0.5");
    }

    #[test]
    fn test_source_is_kept() {
        let e = NavError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(e.source().is_some());
        assert!(e.to_string().starts_with("I/O error: "));
        let e = NavError::NotEnoughWaypoints { count: 1 };
        assert!(e.source().is_none());
    }
}
