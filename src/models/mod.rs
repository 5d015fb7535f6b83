//! Core value types shared by the geometry, jurisdiction and topic modules.

pub mod coordinate;
pub mod marker;

pub use coordinate::Coordinate;
pub use marker::JurisdictionMarker;
