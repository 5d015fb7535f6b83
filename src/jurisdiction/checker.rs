//! Decide whether a broadcast circle stays inside a jurisdiction.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::JurisdictionIndex;
use crate::error::{GeoError, Result};
use crate::geodesy::{distance, CircleSampler};
use crate::models::{Coordinate, JurisdictionMarker};

/// A union of circular zones that can answer point and disc queries.
pub trait MarkerSet {
    /// Whether some marker contains `point`
    fn covers(&self, point: &Coordinate) -> bool;

    /// Whether some single marker fully contains the disc
    fn nests(&self, center: &Coordinate, radius: f64) -> bool;
}

fn nested_in(marker: &JurisdictionMarker, center: &Coordinate, radius: f64) -> bool {
    distance(center, &marker.center) + radius <= marker.radius_meters
}

impl MarkerSet for [JurisdictionMarker] {
    fn covers(&self, point: &Coordinate) -> bool {
        self.iter().any(|m| m.contains(point))
    }

    fn nests(&self, center: &Coordinate, radius: f64) -> bool {
        self.iter().any(|m| nested_in(m, center, radius))
    }
}

impl MarkerSet for Vec<JurisdictionMarker> {
    fn covers(&self, point: &Coordinate) -> bool {
        self.as_slice().covers(point)
    }

    fn nests(&self, center: &Coordinate, radius: f64) -> bool {
        self.as_slice().nests(center, radius)
    }
}

impl MarkerSet for JurisdictionIndex {
    fn covers(&self, point: &Coordinate) -> bool {
        JurisdictionIndex::covers(self, point)
    }

    fn nests(&self, center: &Coordinate, radius: f64) -> bool {
        // A marker holding the whole disc holds its center
        self.markers_containing(center)
            .iter()
            .any(|m| nested_in(m, center, radius))
    }
}

/// How the disc is tested against the markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainmentMode {
    /// Every lattice sample must fall inside some marker
    #[default]
    Sampled,
    /// The disc must be nested inside one marker (exact, ignores unions)
    Nested,
}

/// Sample density used for a broadcast circle.
///
/// The sampler spacing is `max(radius / divisions, min_sample_distance)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerSettings {
    pub min_sample_distance: f64,
    pub divisions: u32,
    pub max_samples: Option<usize>,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            min_sample_distance: 1.0,
            divisions: 10,
            max_samples: None,
        }
    }
}

impl SamplerSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.min_sample_distance.is_finite() || self.min_sample_distance <= 0.0 {
            return Err(GeoError::InvalidSampleDistance(self.min_sample_distance));
        }
        if self.divisions == 0 {
            return Err(GeoError::InvalidSampleDivisions(self.divisions));
        }
        Ok(())
    }

    pub fn sample_distance(&self, radius: f64) -> f64 {
        (radius / self.divisions as f64).max(self.min_sample_distance)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JurisdictionChecker {
    settings: SamplerSettings,
    mode: ContainmentMode,
}

impl JurisdictionChecker {
    pub fn new(settings: SamplerSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            mode: ContainmentMode::default(),
        })
    }

    pub fn with_mode(mut self, mode: ContainmentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }

    pub fn mode(&self) -> ContainmentMode {
        self.mode
    }

    /// Sampler for a broadcast circle, with the configured budget applied
    pub fn sampler(&self, center: Coordinate, radius: f64) -> Result<CircleSampler> {
        let sampler = CircleSampler::new(center, radius, self.settings.sample_distance(radius))?;
        Ok(match self.settings.max_samples {
            Some(limit) => sampler.with_max_samples(limit),
            None => sampler,
        })
    }

    /// Whether the circle of `radius` meters around `center` lies inside
    /// the union of `markers`
    pub fn check<M>(&self, markers: &M, center: Coordinate, radius: f64) -> Result<bool>
    where
        M: MarkerSet + ?Sized,
    {
        let within = match self.mode {
            ContainmentMode::Sampled => {
                let mut samples = self.sampler(center, radius)?.iter_checked()?;
                samples.all(|s| markers.covers(&s))
            }
            ContainmentMode::Nested => {
                self.validate_disc(&center, radius)?;
                markers.nests(&center, radius)
            }
        };

        debug!(
            "Containment of {}m around {} ({:?}): {}",
            radius, center, self.mode, within
        );
        Ok(within)
    }

    /// Same answer as [`check`](Self::check), evaluating sample rings on
    /// the rayon pool
    pub fn check_parallel<M>(&self, markers: &M, center: Coordinate, radius: f64) -> Result<bool>
    where
        M: MarkerSet + Sync + ?Sized,
    {
        if self.mode == ContainmentMode::Nested {
            return self.check(markers, center, radius);
        }

        let sampler = self.sampler(center, radius)?;
        sampler.check_budget()?;

        let within = (0..=sampler.last_ring())
            .into_par_iter()
            .all(|ring| sampler.ring_points(ring).all(|s| markers.covers(&s)));

        debug!(
            "Parallel containment of {}m around {} over {} rings: {}",
            radius,
            center,
            sampler.last_ring() + 1,
            within
        );
        Ok(within)
    }

    fn validate_disc(&self, center: &Coordinate, radius: f64) -> Result<()> {
        center.validate()?;
        if !radius.is_finite() || radius < 0.0 {
            return Err(GeoError::InvalidRadius(radius));
        }
        Ok(())
    }
}

/// Sampled containment check with default density: spacing
/// `max(radius / 10, 1 m)`, no sample budget.
pub fn is_radius_within_jurisdiction(
    markers: &[JurisdictionMarker],
    center: Coordinate,
    radius: f64,
) -> Result<bool> {
    JurisdictionChecker::default().check(markers, center, radius)
}
