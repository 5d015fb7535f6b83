use std::f64::consts::PI;
use std::iter::FusedIterator;

use super::math::project_point;
use crate::error::{GeoError, Result};
use crate::models::Coordinate;

/// Deterministic point lattice covering a filled disc.
///
/// Points lie on concentric rings spaced `max_sample_distance` apart, the
/// outermost ring sitting at `ceil(radius / d) * d` (which may be past
/// `radius`). Ring `i > 0` carries `ceil(2π·r_i / d)` evenly spaced points
/// starting at bearing 0; ring 0 is the center itself.
#[derive(Debug, Clone, Copy)]
pub struct CircleSampler {
    center: Coordinate,
    radius: f64,
    step: f64,
    max_samples: Option<usize>,
}

impl CircleSampler {
    pub fn new(center: Coordinate, radius: f64, max_sample_distance: f64) -> Result<Self> {
        center.validate()?;
        if !radius.is_finite() || radius < 0.0 {
            return Err(GeoError::InvalidRadius(radius));
        }
        if !max_sample_distance.is_finite() || max_sample_distance <= 0.0 {
            return Err(GeoError::InvalidSampleDistance(max_sample_distance));
        }
        Ok(Self {
            center,
            radius,
            step: max_sample_distance,
            max_samples: None,
        })
    }

    /// Refuse to produce circles needing more than `limit` points
    pub fn with_max_samples(mut self, limit: usize) -> Self {
        self.max_samples = Some(limit);
        self
    }

    /// Index of the outermost ring
    pub fn last_ring(&self) -> u64 {
        (self.radius / self.step).ceil() as u64
    }

    /// Number of points on ring `ring`
    pub fn ring_len(&self, ring: u64) -> u64 {
        if ring == 0 {
            return 1;
        }
        let r = ring as f64 * self.step;
        (2.0 * PI * r / self.step).ceil() as u64
    }

    /// Exact number of points `iter()` yields, computed without projecting.
    /// Saturates at `u64::MAX`.
    pub fn sample_count(&self) -> u64 {
        (0..=self.last_ring()).fold(0u64, |total, i| total.saturating_add(self.ring_len(i)))
    }

    /// Running point total, cut off as soon as it passes `limit`.
    ///
    /// Returns `Err(partial)` with the first total above `limit`. Ring `i`
    /// holds at least `2π·i` points, so this visits O(√limit) rings.
    fn count_within(&self, limit: u64) -> std::result::Result<u64, u64> {
        let mut total = 0u64;
        for ring in 0..=self.last_ring() {
            total = match total.checked_add(self.ring_len(ring)) {
                Some(t) if t <= limit => t,
                Some(t) => return Err(t),
                None => return Err(u64::MAX),
            };
        }
        Ok(total)
    }

    /// Points of a single ring in ascending bearing order
    pub fn ring_points(&self, ring: u64) -> impl Iterator<Item = Coordinate> + '_ {
        let len = self.ring_len(ring);
        let r = ring as f64 * self.step;
        (0..len).map(move |j| {
            if ring == 0 {
                self.center
            } else {
                let theta = 2.0 * PI * j as f64 / len as f64;
                project_point(&self.center, r, theta)
            }
        })
    }

    /// Lazy iterator over all points, ignoring the sample budget
    pub fn iter(&self) -> SampleIter {
        SampleIter {
            sampler: *self,
            ring: 0,
            ring_len: 1,
            index: 0,
        }
    }

    /// Lazy iterator over all points, failing up front when the circle
    /// needs more samples than the configured budget allows
    pub fn iter_checked(&self) -> Result<SampleIter> {
        self.check_budget()?;
        Ok(self.iter())
    }

    pub fn check_budget(&self) -> Result<()> {
        if let Some(limit) = self.max_samples {
            let limit_u64 = u64::try_from(limit).unwrap_or(u64::MAX);
            if let Err(required) = self.count_within(limit_u64) {
                return Err(GeoError::SampleBudgetExceeded {
                    required: usize::try_from(required).unwrap_or(usize::MAX),
                    limit,
                });
            }
        }
        Ok(())
    }
}

impl IntoIterator for &CircleSampler {
    type Item = Coordinate;
    type IntoIter = SampleIter;

    fn into_iter(self) -> SampleIter {
        self.iter()
    }
}

/// Ring-major, bearing-minor walk over a [`CircleSampler`] lattice.
#[derive(Debug, Clone)]
pub struct SampleIter {
    sampler: CircleSampler,
    ring: u64,
    ring_len: u64,
    index: u64,
}

impl Iterator for SampleIter {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        let last_ring = self.sampler.last_ring();
        loop {
            if self.ring > last_ring {
                return None;
            }

            if self.index < self.ring_len {
                let j = self.index;
                self.index += 1;

                if self.ring == 0 {
                    return Some(self.sampler.center);
                }
                let r = self.ring as f64 * self.sampler.step;
                let theta = 2.0 * PI * j as f64 / self.ring_len as f64;
                return Some(project_point(&self.sampler.center, r, theta));
            }

            self.ring += 1;
            self.index = 0;
            self.ring_len = self.sampler.ring_len(self.ring);
        }
    }
}

impl FusedIterator for SampleIter {}

/// Collect the lattice for a disc into a vector.
pub fn sample_circle(
    center: Coordinate,
    radius: f64,
    max_sample_distance: f64,
) -> Result<Vec<Coordinate>> {
    Ok(CircleSampler::new(center, radius, max_sample_distance)?
        .iter()
        .collect())
}

/// Push every lattice point into `sink` without buffering.
pub fn for_each_sample<F>(
    center: Coordinate,
    radius: f64,
    max_sample_distance: f64,
    sink: F,
) -> Result<()>
where
    F: FnMut(Coordinate),
{
    CircleSampler::new(center, radius, max_sample_distance)?
        .iter()
        .for_each(sink);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::distance;

    fn origin() -> Coordinate {
        Coordinate::new(0.0, 0.0).unwrap()
    }

    #[test]
    fn test_zero_radius_yields_center_once() {
        let center = Coordinate::new(47.4, 8.5).unwrap();
        let points = sample_circle(center, 0.0, 5.0).unwrap();
        assert_eq!(points, vec![center]);
    }

    #[test]
    fn test_first_point_is_center() {
        let center = Coordinate::new(-12.0, 130.0).unwrap();
        let points = sample_circle(center, 1000.0, 100.0).unwrap();
        assert_eq!(points[0], center);
    }

    #[test]
    fn test_ring_layout() {
        let sampler = CircleSampler::new(origin(), 10.0, 10.0).unwrap();
        assert_eq!(sampler.last_ring(), 1);
        // ring 1 at r = d: ceil(2π) = 7 points
        assert_eq!(sampler.ring_len(1), 7);
        assert_eq!(sampler.sample_count(), 8);

        let sampler = CircleSampler::new(origin(), 25.0, 10.0).unwrap();
        // rings at 0, 10, 20, 30: outer ring passes the radius
        assert_eq!(sampler.last_ring(), 3);
        assert_eq!(sampler.ring_len(2), 13);
        assert_eq!(sampler.ring_len(3), 19);
        assert_eq!(sampler.sample_count(), 1 + 7 + 13 + 19);
    }

    #[test]
    fn test_sample_count_matches_iterator() {
        for radius in [0.0, 0.5, 1.0, 37.0, 1000.0, 12_345.0] {
            for d in [1.0, 3.7, 100.0] {
                let sampler = CircleSampler::new(origin(), radius, d).unwrap();
                assert_eq!(sampler.iter().count() as u64, sampler.sample_count());
            }
        }
    }

    #[test]
    fn test_sample_count_monotone_in_radius() {
        let mut previous = 0;
        for k in 0..60 {
            let radius = k as f64 * 7.5;
            let count = CircleSampler::new(origin(), radius, 10.0)
                .unwrap()
                .sample_count();
            assert!(count >= previous, "radius {} gave {} < {}", radius, count, previous);
            previous = count;
        }
    }

    #[test]
    fn test_points_lie_on_their_rings() {
        let center = Coordinate::new(51.5, -0.12).unwrap();
        let sampler = CircleSampler::new(center, 500.0, 100.0).unwrap();
        for ring in 0..=sampler.last_ring() {
            let r = ring as f64 * 100.0;
            for p in sampler.ring_points(ring) {
                assert!((distance(&center, &p) - r).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_deterministic_order() {
        let center = Coordinate::new(10.0, 10.0).unwrap();
        let a = sample_circle(center, 750.0, 75.0).unwrap();
        let b = sample_circle(center, 750.0, 75.0).unwrap();
        assert_eq!(a, b);

        let sampler = CircleSampler::new(center, 750.0, 75.0).unwrap();
        let by_ring: Vec<Coordinate> = (0..=sampler.last_ring())
            .flat_map(|i| sampler.ring_points(i).collect::<Vec<_>>())
            .collect();
        assert_eq!(a, by_ring);
    }

    #[test]
    fn test_first_point_of_ring_is_due_north() {
        let sampler = CircleSampler::new(origin(), 100.0, 50.0).unwrap();
        let points: Vec<Coordinate> = sampler.iter().collect();
        assert!(points[1].lat > 0.0);
        assert!(points[1].lon.abs() < 1e-12);
    }

    #[test]
    fn test_push_variant_matches_iterator() {
        let center = Coordinate::new(35.0, 139.0).unwrap();
        let mut pushed = Vec::new();
        for_each_sample(center, 300.0, 40.0, |p| pushed.push(p)).unwrap();
        assert_eq!(pushed, sample_circle(center, 300.0, 40.0).unwrap());
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            CircleSampler::new(origin(), -1.0, 1.0).unwrap_err(),
            GeoError::InvalidRadius(-1.0)
        );
        assert_eq!(
            CircleSampler::new(origin(), 1.0, 0.0).unwrap_err(),
            GeoError::InvalidSampleDistance(0.0)
        );
        assert!(CircleSampler::new(origin(), 1.0, -3.0).is_err());
        assert!(CircleSampler::new(origin(), f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_sample_budget() {
        let sampler = CircleSampler::new(origin(), 25.0, 10.0)
            .unwrap()
            .with_max_samples(10);
        assert_eq!(
            sampler.iter_checked().unwrap_err(),
            GeoError::SampleBudgetExceeded {
                required: 21,
                limit: 10
            }
        );

        let sampler = sampler.with_max_samples(40);
        assert_eq!(sampler.iter_checked().unwrap().count(), 40);
    }

    #[test]
    fn test_budget_check_stops_early_on_huge_circles() {
        // 1e10 rings: counting them all would overflow and take forever
        let sampler = CircleSampler::new(origin(), 1e10, 1.0)
            .unwrap()
            .with_max_samples(1000);
        match sampler.check_budget() {
            Err(GeoError::SampleBudgetExceeded { required, limit }) => {
                assert_eq!(limit, 1000);
                assert!(required > 1000 && required < 2000);
            }
            other => panic!("expected budget error, got {:?}", other),
        }
        assert!(sampler.iter_checked().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_center() {
        let center = Coordinate::from_raw(120.0, 400.0);
        assert_eq!(
            CircleSampler::new(center, 10.0, 1.0).unwrap_err(),
            GeoError::InvalidLatitude(120.0)
        );
        assert!(sample_circle(center, 10.0, 1.0).is_err());
        assert!(for_each_sample(center, 10.0, 1.0, |_| {}).is_err());
    }

    #[test]
    fn test_iterator_is_fused() {
        let mut iter = CircleSampler::new(origin(), 0.0, 1.0).unwrap().iter();
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }
}
