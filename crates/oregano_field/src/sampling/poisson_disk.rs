//! Incremental Poisson disk sampler.
//!
//! Unlike a batch sampler, [`PoissonDiskSampler`] keeps its active front between
//! calls so callers can pull one point per timer tick with [`PoissonDiskSampler::next`].
use std::f32::consts::{SQRT_2, TAU};

use glam::Vec2;
use mint::Vector2;
use rand::Rng as RngCore;

use crate::sampling::rand01;

/// Default number of candidates tried around an active point before it is retired.
pub const DEFAULT_MAX_ATTEMPTS: usize = 30;

/// Incremental blue-noise sampler over a rectangle centered at the origin.
///
/// The covered region is `[-w/2, w/2) x [-h/2, h/2)`. Points produced by
/// [`next`](Self::next) keep at least `min_distance` from every accepted point.
#[derive(Debug, Clone)]
pub struct PoissonDiskSampler {
    radius: f32,
    radius_squared: f32,
    max_attempts: usize,
    cell_size: f32,
    grid_width: usize,
    grid_height: usize,
    /// Per-cell buckets of indices into `points`. Inserted occupants may share a cell.
    grid: Vec<Vec<usize>>,
    points: Vec<Vec2>,
    active_list: Vec<usize>,
    extent: Vec2,
}

impl PoissonDiskSampler {
    /// Creates an empty sampler. Non-finite or non-positive parameters yield a
    /// sampler that never accepts points.
    pub fn new(min_distance: f32, extent: Vec2) -> Self {
        let usable = min_distance.is_finite()
            && min_distance > 0.0
            && extent.x.is_finite()
            && extent.y.is_finite()
            && extent.x > 0.0
            && extent.y > 0.0;

        let cell_size = min_distance / SQRT_2;
        let (grid_width, grid_height) = if usable {
            (
                (extent.x / cell_size).ceil() as usize + 1,
                (extent.y / cell_size).ceil() as usize + 1,
            )
        } else {
            (0, 0)
        };

        Self {
            radius: min_distance,
            radius_squared: min_distance * min_distance,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cell_size,
            grid_width,
            grid_height,
            grid: vec![Vec::new(); grid_width * grid_height],
            points: Vec::new(),
            active_list: Vec::new(),
            extent,
        }
    }

    /// Creates an empty sampler from a `mint` extent.
    pub fn from_mint(min_distance: f32, extent: Vector2<f32>) -> Self {
        Self::new(min_distance, Vec2::from(extent))
    }

    /// Sets how many annulus candidates are tried per active point.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn min_distance(&self) -> f32 {
        self.radius
    }

    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Number of accepted points, seeded and inserted ones included.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All accepted points in acceptance order.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Number of points still able to spawn neighbours.
    pub fn active_count(&self) -> usize {
        self.active_list.len()
    }

    /// Accepts `point` as the first point. No-op when the sampler already holds
    /// points or `point` lies outside the region.
    pub fn seed(&mut self, point: Vec2) -> Option<Vec2> {
        if !self.is_usable() || !self.points.is_empty() || !self.contains(point) {
            return None;
        }
        self.add_point(point);
        Some(point)
    }

    /// Accepts an existing occupant without a spacing check. Used when rebuilding
    /// a sampler so that already placed points stay respected.
    pub fn insert(&mut self, point: Vec2) -> bool {
        if !self.is_usable() || !self.contains(point) {
            return false;
        }
        self.add_point(point);
        true
    }

    /// Produces the next point on the advancing front, or `None` once every
    /// active point has been retired.
    pub fn next(&mut self, rng: &mut dyn RngCore) -> Option<Vec2> {
        while !self.active_list.is_empty() {
            let len = self.active_list.len();
            let slot = ((rand01(rng) * len as f32) as usize).min(len - 1);
            let origin = self.points[self.active_list[slot]];

            if let Some(candidate) = self.generate_around_point(rng, origin) {
                self.add_point(candidate);
                return Some(candidate);
            }

            self.active_list.swap_remove(slot);
        }

        None
    }

    /// Whether `point` lies inside the half-open region.
    pub fn contains(&self, point: Vec2) -> bool {
        let half = self.extent / 2.0;
        point.x >= -half.x && point.x < half.x && point.y >= -half.y && point.y < half.y
    }

    fn is_usable(&self) -> bool {
        self.grid_width > 0 && self.grid_height > 0
    }

    #[inline]
    fn grid_index(&self, x: usize, y: usize) -> usize {
        y * self.grid_width + x
    }

    #[inline]
    fn point_to_grid(&self, point: Vec2) -> (usize, usize) {
        let shifted = point + self.extent / 2.0;
        let x = ((shifted.x / self.cell_size).floor() as isize)
            .clamp(0, self.grid_width as isize - 1) as usize;
        let y = ((shifted.y / self.cell_size).floor() as isize)
            .clamp(0, self.grid_height as isize - 1) as usize;
        (x, y)
    }

    fn is_valid_point(&self, point: Vec2) -> bool {
        if !self.contains(point) {
            return false;
        }

        let (gx, gy) = self.point_to_grid(point);
        let start_x = gx.saturating_sub(2);
        let end_x = (gx + 3).min(self.grid_width);
        let start_y = gy.saturating_sub(2);
        let end_y = (gy + 3).min(self.grid_height);

        for y in start_y..end_y {
            for x in start_x..end_x {
                for &idx in &self.grid[self.grid_index(x, y)] {
                    if point.distance_squared(self.points[idx]) < self.radius_squared {
                        return false;
                    }
                }
            }
        }

        true
    }

    fn add_point(&mut self, point: Vec2) {
        let (gx, gy) = self.point_to_grid(point);
        let cell = self.grid_index(gx, gy);
        let idx = self.points.len();
        self.points.push(point);
        self.grid[cell].push(idx);
        self.active_list.push(idx);
    }

    fn generate_around_point(&self, rng: &mut dyn RngCore, origin: Vec2) -> Option<Vec2> {
        for _ in 0..self.max_attempts {
            let angle = rand01(rng) * TAU;
            let distance = self.radius + rand01(rng) * self.radius;
            let candidate = origin + Vec2::from_angle(angle) * distance;

            if self.is_valid_point(candidate) {
                return Some(candidate);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn pairwise_min_distance(points: &[Vec2]) -> f32 {
        let mut min = f32::MAX;
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                min = min.min(points[i].distance(points[j]));
            }
        }
        min
    }

    fn drain(sampler: &mut PoissonDiskSampler, rng: &mut StdRng) -> usize {
        let mut produced = 0;
        while sampler.next(rng).is_some() {
            produced += 1;
        }
        produced
    }

    #[test]
    fn sampler_initializes_grid_dimensions() {
        let sampler = PoissonDiskSampler::new(0.5, Vec2::new(2.0, 1.0));
        assert_eq!(
            sampler.grid_width,
            ((2.0 / sampler.cell_size).ceil() as usize) + 1
        );
        assert_eq!(
            sampler.grid_height,
            ((1.0 / sampler.cell_size).ceil() as usize) + 1
        );
        assert!(sampler.is_empty());
    }

    #[test]
    fn seed_only_accepts_first_point() {
        let mut sampler = PoissonDiskSampler::new(1.0, Vec2::new(10.0, 10.0));
        assert_eq!(sampler.seed(Vec2::ZERO), Some(Vec2::ZERO));
        assert_eq!(sampler.seed(Vec2::new(3.0, 3.0)), None);
        assert_eq!(sampler.point_count(), 1);
    }

    #[test]
    fn seed_rejects_out_of_bounds_point() {
        let mut sampler = PoissonDiskSampler::new(1.0, Vec2::new(10.0, 10.0));
        assert_eq!(sampler.seed(Vec2::new(5.0, 0.0)), None);
        assert!(sampler.is_empty());
    }

    #[test]
    fn is_valid_point_rejects_close_neighbors() {
        let mut sampler = PoissonDiskSampler::new(1.0, Vec2::new(4.0, 4.0));
        sampler.seed(Vec2::ZERO);

        assert!(!sampler.is_valid_point(Vec2::new(0.5, 0.0)));
        assert!(sampler.is_valid_point(Vec2::new(1.5, 1.5)));
    }

    #[test]
    fn next_without_points_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sampler = PoissonDiskSampler::new(1.0, Vec2::new(10.0, 10.0));
        assert_eq!(sampler.next(&mut rng), None);
    }

    #[test]
    fn generated_points_respect_radius_and_bounds() {
        let mut rng = StdRng::seed_from_u64(123);
        let mut sampler = PoissonDiskSampler::new(0.3, Vec2::new(4.0, 3.0));
        sampler.seed(Vec2::ZERO);
        let produced = drain(&mut sampler, &mut rng);

        assert!(produced > 10);
        assert_eq!(sampler.point_count(), produced + 1);
        for p in sampler.points() {
            assert!(p.x >= -2.0 && p.x < 2.0);
            assert!(p.y >= -1.5 && p.y < 1.5);
        }
        assert!(pairwise_min_distance(sampler.points()) >= 0.3 - 1e-5);
    }

    #[test]
    fn exhausted_front_keeps_returning_none() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut sampler = PoissonDiskSampler::new(2.0, Vec2::new(6.0, 6.0));
        sampler.seed(Vec2::ZERO);
        drain(&mut sampler, &mut rng);

        assert_eq!(sampler.active_count(), 0);
        let count = sampler.point_count();
        assert_eq!(sampler.next(&mut rng), None);
        assert_eq!(sampler.point_count(), count);
    }

    #[test]
    fn inserted_occupants_are_respected_by_new_points() {
        let mut rng = StdRng::seed_from_u64(77);
        let mut sampler = PoissonDiskSampler::new(1.0, Vec2::new(8.0, 8.0));
        // Closer than the minimum distance: inserts skip the spacing check.
        assert!(sampler.insert(Vec2::new(0.0, 0.0)));
        assert!(sampler.insert(Vec2::new(0.4, 0.0)));
        assert!(!sampler.insert(Vec2::new(4.0, 0.0)));

        drain(&mut sampler, &mut rng);
        let occupants = [Vec2::new(0.0, 0.0), Vec2::new(0.4, 0.0)];
        for p in &sampler.points()[2..] {
            for o in &occupants {
                assert!(p.distance(*o) >= 1.0 - 1e-5);
            }
        }
    }

    #[test]
    fn invalid_parameters_never_accept_points() {
        let mut rng = StdRng::seed_from_u64(1);
        for sampler in [
            PoissonDiskSampler::new(0.0, Vec2::new(10.0, 10.0)),
            PoissonDiskSampler::new(f32::NAN, Vec2::new(10.0, 10.0)),
            PoissonDiskSampler::new(1.0, Vec2::new(0.0, 10.0)),
        ] {
            let mut sampler = sampler;
            assert_eq!(sampler.seed(Vec2::ZERO), None);
            assert!(!sampler.insert(Vec2::ZERO));
            assert_eq!(sampler.next(&mut rng), None);
        }
    }

    #[test]
    fn mint_constructor_matches_glam() {
        let sampler = PoissonDiskSampler::from_mint(1.0, Vector2 { x: 3.0, y: 2.0 });
        assert_eq!(sampler.extent(), Vec2::new(3.0, 2.0));
        assert_eq!(
            sampler.with_max_attempts(0).max_attempts(),
            1,
            "attempts are clamped to at least one"
        );
    }
}
