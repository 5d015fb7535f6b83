//! Geocast - location math for area-targeted emergency broadcasts
//!
//! Checks whether a broadcast circle stays inside an authority's
//! jurisdiction and maps coordinates to pub/sub topics.

pub mod config;
pub mod error;
pub mod geodesy;
pub mod jurisdiction;
pub mod models;
pub mod topics;

pub use error::{GeoError, Result};
pub use geodesy::{distance, project_point, sample_circle, CircleSampler};
pub use jurisdiction::{
    is_radius_within_jurisdiction, ContainmentMode, JurisdictionChecker, JurisdictionIndex,
};
pub use models::{Coordinate, JurisdictionMarker};
pub use topics::{neighboring_topics, topic_change, topic_for, TopicChange};
