//! Tracks a live position against a fixed path of waypoints and reports
//! progress along it.
pub mod config;
pub mod error;
pub mod navigation;
pub mod path;
pub mod path_store;
pub mod position_tracker;
pub mod route_creator;
pub mod sample_feed;
pub mod telemetry;
pub mod waypoint_generator;

pub use config::NavigationConfig;
pub use error::{NavError, Result};
pub use navigation::{Direction, NavigationSession, SessionState, Update};
pub use path::{Path, PathCollection, PathSummary};
pub use path_store::{LocationRecord, PathListRecord, PathRecord};
pub use position_tracker::{Ingest, PositionTracker};
pub use route_creator::RouteCreator;
pub use sample_feed::{FeedStats, PositionListener, SampleFeed};
pub use telemetry::{Coordinate, PositionSample, TimedSample};
pub use waypoint_generator::{Arrival, PathWaypointGenerator, WaypointGenerator};
