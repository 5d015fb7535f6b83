//! Spherical-earth geometry.
//!
//! Great-circle distances, bearing projection and the disc sampler used by
//! the jurisdiction checks.

mod math;
mod sampler;

pub use math::{distance, project_point, EARTH_RADIUS_METERS};
pub use sampler::{for_each_sample, sample_circle, CircleSampler, SampleIter};
