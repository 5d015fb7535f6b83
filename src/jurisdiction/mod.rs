//! Broadcast-radius containment checks.
//!
//! A jurisdiction is a union of circular markers. The checker samples the
//! broadcast disc and requires every sample to fall inside some marker;
//! the spatial index speeds up the per-sample marker lookup for large
//! marker sets.

mod checker;
mod index;

pub use checker::{
    is_radius_within_jurisdiction, ContainmentMode, JurisdictionChecker, MarkerSet,
    SamplerSettings,
};
pub use index::JurisdictionIndex;
