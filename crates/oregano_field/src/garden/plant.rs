//! A single plant and the leaves it grows.
//!
//! Each plant owns a leaf sampler over a `size x size` square centered on the
//! plant and a growth process whose mean delay changes as leaves come and go:
//!
//! - every new leaf sets `rate = rate / base + base / 2`,
//! - every harvested leaf resets `rate = base` and rebuilds the sampler from the
//!   remaining leaves so the freed slot can regrow.
use glam::Vec2;
use rand::Rng as RngCore;
use tracing::trace;

use crate::garden::color::Rgb;
use crate::garden::cultivar::Cultivar;
use crate::garden::{LeafId, PlantId, Tick};
use crate::process::{IntervalProcess, TimerQueue};
use crate::sampling::PoissonDiskSampler;

/// A harvestable point of a plant.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub id: LeafId,
    /// Position relative to the plant center, jitter included.
    pub offset: Vec2,
    /// Inherited from the plant.
    pub heirloom: bool,
    pub harvested: bool,
}

/// Attributes drawn for a plant when it spawns.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantTraits {
    pub heirloom: bool,
    pub cultivar: Cultivar,
    /// Growth radius. Also bounds the number of live leaves.
    pub size: f32,
    pub color: Rgb,
    /// Mean delay between growth ticks of a freshly spawned or harvested plant.
    pub base_growth_rate_ms: f64,
    /// Offset added to every leaf position.
    pub leaf_jitter: Vec2,
    /// Candidates tried per active leaf before it is retired.
    pub max_attempts: usize,
}

/// Result of a single growth tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthOutcome {
    /// A leaf was added.
    Grew(LeafId),
    /// The plant already carries as many live leaves as its size allows.
    AtCapacity,
    /// The leaf sampler has no free spot left.
    Exhausted,
    /// The sampled spot lies beyond the growth radius. The leaf sampler's
    /// square extent keeps every sample within `size / sqrt(2)`, so growth on a
    /// plant built by [`Plant::new`] never reports this.
    OutsideRadius,
    /// The plant was harvested or is unknown.
    Inactive,
}

/// Outcome of harvesting a single leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafHarvest {
    pub harvested_leaf_count: u32,
    /// Live leaves re-inserted into the rebuilt sampler.
    pub seeded: usize,
}

#[derive(Debug, Clone)]
pub struct Plant {
    id: PlantId,
    position: Vec2,
    heirloom: bool,
    cultivar: Cultivar,
    size: f32,
    color: Rgb,
    harvested: bool,
    harvested_leaf_count: u32,
    growth_rate_ms: f64,
    base_growth_rate_ms: f64,
    leaf_cluster_factor: f32,
    leaf_jitter: Vec2,
    max_attempts: usize,
    sampler: PoissonDiskSampler,
    growth: IntervalProcess<Tick>,
    leaves: Vec<Leaf>,
    /// Sampler-local point each leaf was grown at, parallel to `leaves`.
    leaf_spots: Vec<Vec2>,
    next_leaf_id: u32,
}

impl Plant {
    /// Creates a plant at `position` (field coordinates). The growth process is
    /// idle until [`Plant::start_growing`].
    pub fn new(id: PlantId, position: Vec2, traits: PlantTraits) -> Self {
        let leaf_cluster_factor = traits.size / 2.0;
        let sampler = Self::leaf_sampler(traits.size, leaf_cluster_factor, traits.max_attempts);

        Self {
            id,
            position,
            heirloom: traits.heirloom,
            cultivar: traits.cultivar,
            size: traits.size,
            color: traits.color,
            harvested: false,
            harvested_leaf_count: 0,
            growth_rate_ms: traits.base_growth_rate_ms,
            base_growth_rate_ms: traits.base_growth_rate_ms,
            leaf_cluster_factor,
            leaf_jitter: traits.leaf_jitter,
            max_attempts: traits.max_attempts,
            sampler,
            growth: IntervalProcess::new(Tick::Grow(id), traits.base_growth_rate_ms),
            leaves: Vec::new(),
            leaf_spots: Vec::new(),
            next_leaf_id: 0,
        }
    }

    fn leaf_sampler(size: f32, leaf_cluster_factor: f32, max_attempts: usize) -> PoissonDiskSampler {
        PoissonDiskSampler::new(size / leaf_cluster_factor, Vec2::splat(size))
            .with_max_attempts(max_attempts)
    }

    pub fn id(&self) -> PlantId {
        self.id
    }

    /// Center of the plant in field coordinates.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn heirloom(&self) -> bool {
        self.heirloom
    }

    pub fn cultivar(&self) -> Cultivar {
        self.cultivar
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn is_harvested(&self) -> bool {
        self.harvested
    }

    pub fn harvested_leaf_count(&self) -> u32 {
        self.harvested_leaf_count
    }

    /// Mean delay used for the next growth tick.
    pub fn growth_rate_ms(&self) -> f64 {
        self.growth_rate_ms
    }

    pub fn base_growth_rate_ms(&self) -> f64 {
        self.base_growth_rate_ms
    }

    pub fn leaf_cluster_factor(&self) -> f32 {
        self.leaf_cluster_factor
    }

    /// Minimum distance between leaves.
    pub fn leaf_spacing(&self) -> f32 {
        self.sampler.min_distance()
    }

    /// Maximum number of live leaves.
    pub fn leaf_capacity(&self) -> usize {
        self.size.max(0.0).ceil() as usize
    }

    /// Whether the growth process is scheduled.
    pub fn is_growing(&self) -> bool {
        self.growth.is_running()
    }

    /// Every leaf ever grown, harvested ones included.
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    pub fn leaf(&self, id: LeafId) -> Option<&Leaf> {
        self.leaves.iter().find(|l| l.id == id)
    }

    /// Leaves still on the plant.
    pub fn live_leaves(&self) -> impl Iterator<Item = &Leaf> + '_ {
        self.leaves.iter().filter(|l| !l.harvested)
    }

    pub fn live_leaf_count(&self) -> usize {
        self.live_leaves().count()
    }

    /// Hover text for the plant's leaves.
    pub fn title(&self) -> String {
        self.cultivar.title(self.heirloom)
    }

    pub fn sampler(&self) -> &PoissonDiskSampler {
        &self.sampler
    }

    pub(crate) fn process_mut(&mut self) -> &mut IntervalProcess<Tick> {
        &mut self.growth
    }

    pub(crate) fn start_growing(&mut self, queue: &mut TimerQueue<Tick>, rng: &mut dyn RngCore) {
        if !self.harvested {
            self.growth.start(queue, rng);
        }
    }

    /// Runs one growth tick.
    pub(crate) fn grow(&mut self, rng: &mut dyn RngCore) -> GrowthOutcome {
        if self.harvested {
            return GrowthOutcome::Inactive;
        }
        if self.live_leaf_count() >= self.leaf_capacity() {
            return GrowthOutcome::AtCapacity;
        }

        let sample = if self.sampler.is_empty() {
            self.sampler.seed(Vec2::ZERO)
        } else {
            self.sampler.next(rng)
        };
        let Some(sample) = sample else {
            return GrowthOutcome::Exhausted;
        };

        // Unreachable with the `size x size` extent; bounds leaves to the radius.
        if sample.length_squared() > self.size * self.size {
            trace!(plant = %self.id, ?sample, "leaf sample beyond growth radius");
            return GrowthOutcome::OutsideRadius;
        }

        let id = LeafId(self.next_leaf_id);
        self.next_leaf_id += 1;
        self.leaves.push(Leaf {
            id,
            offset: sample + self.leaf_jitter,
            heirloom: self.heirloom,
            harvested: false,
        });
        self.leaf_spots.push(sample);
        self.on_leaf_added();
        GrowthOutcome::Grew(id)
    }

    fn on_leaf_added(&mut self) {
        self.growth_rate_ms =
            self.growth_rate_ms / self.base_growth_rate_ms + self.base_growth_rate_ms / 2.0;
        self.growth.update_rate(self.growth_rate_ms);
    }

    /// Harvests one leaf. `None` when the leaf is unknown, already harvested, or
    /// the plant itself is harvested.
    pub(crate) fn harvest_leaf(&mut self, leaf_id: LeafId) -> Option<LeafHarvest> {
        if self.harvested {
            return None;
        }
        let leaf = self
            .leaves
            .iter_mut()
            .find(|l| l.id == leaf_id && !l.harvested)?;
        leaf.harvested = true;

        self.harvested_leaf_count += 1;
        self.growth_rate_ms = self.base_growth_rate_ms;
        self.growth.update_rate(self.growth_rate_ms);
        let seeded = self.rebuild_sampler();

        Some(LeafHarvest {
            harvested_leaf_count: self.harvested_leaf_count,
            seeded,
        })
    }

    /// Replaces the leaf sampler with one seeded by the live leaves.
    fn rebuild_sampler(&mut self) -> usize {
        let mut sampler =
            Self::leaf_sampler(self.size, self.leaf_cluster_factor, self.max_attempts);
        let mut seeded = 0;
        let live = self.leaves.iter().zip(&self.leaf_spots).filter(|(l, _)| !l.harvested);
        for (_, spot) in live {
            if sampler.insert(*spot) {
                seeded += 1;
            }
        }
        self.sampler = sampler;
        seeded
    }

    /// Harvests the whole plant and stops its growth. Returns `false` if it was
    /// already harvested.
    pub(crate) fn harvest(&mut self, queue: &mut TimerQueue<Tick>) -> bool {
        if self.harvested {
            return false;
        }
        self.harvested = true;
        self.growth.stop(queue);
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn traits(size: f32, base: f64) -> PlantTraits {
        PlantTraits {
            heirloom: true,
            cultivar: Cultivar::Hirtum,
            size,
            color: Rgb::default(),
            base_growth_rate_ms: base,
            leaf_jitter: Vec2::ZERO,
            max_attempts: 30,
        }
    }

    fn grow_leaves(plant: &mut Plant, rng: &mut StdRng, n: usize) -> Vec<LeafId> {
        let mut grown = Vec::new();
        for _ in 0..(n * 10) {
            if grown.len() == n {
                break;
            }
            if let GrowthOutcome::Grew(id) = plant.grow(rng) {
                grown.push(id);
            }
        }
        assert_eq!(grown.len(), n, "plant failed to grow {n} leaves");
        grown
    }

    #[test]
    fn new_plant_derives_cluster_factor_and_rate() {
        let plant = Plant::new(PlantId(3), Vec2::new(10.0, 20.0), traits(20.0, 1000.0));
        assert_eq!(plant.leaf_cluster_factor(), 10.0);
        assert_eq!(plant.leaf_spacing(), 2.0);
        assert_eq!(plant.growth_rate_ms(), 1000.0);
        assert_eq!(plant.leaf_capacity(), 20);
        assert!(!plant.is_growing());
        assert_eq!(plant.title(), "Origanum hirtum (heirloom variety)");
    }

    #[test]
    fn first_leaf_grows_at_center_and_inherits_heirloom() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut plant = Plant::new(PlantId(0), Vec2::ZERO, traits(20.0, 1000.0));
        assert_eq!(plant.grow(&mut rng), GrowthOutcome::Grew(LeafId(0)));

        let leaf = &plant.leaves()[0];
        assert_eq!(leaf.offset, Vec2::ZERO);
        assert!(leaf.heirloom);
    }

    #[test]
    fn leaves_stay_within_growth_radius_and_spacing() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut plant = Plant::new(PlantId(0), Vec2::ZERO, traits(40.0, 500.0));
        grow_leaves(&mut plant, &mut rng, 40);

        let offsets: Vec<_> = plant.leaves().iter().map(|l| l.offset).collect();
        for (i, a) in offsets.iter().enumerate() {
            assert!(a.length() <= 40.0);
            for b in &offsets[i + 1..] {
                assert!(a.distance(*b) >= plant.leaf_spacing() - 1e-4);
            }
        }
    }

    #[test]
    fn capacity_blocks_growth_until_harvest() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut plant = Plant::new(PlantId(0), Vec2::ZERO, traits(20.0, 1000.0));
        let leaves = grow_leaves(&mut plant, &mut rng, 20);

        assert_eq!(plant.grow(&mut rng), GrowthOutcome::AtCapacity);
        assert_eq!(plant.leaves().len(), 20);

        plant.harvest_leaf(leaves[5]).expect("live leaf");
        let mut regrew = false;
        for _ in 0..50 {
            if matches!(plant.grow(&mut rng), GrowthOutcome::Grew(_)) {
                regrew = true;
                break;
            }
        }
        assert!(regrew);
        assert_eq!(plant.live_leaf_count(), 20);
    }

    #[test]
    fn leaf_growth_applies_rate_feedback() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut plant = Plant::new(PlantId(0), Vec2::ZERO, traits(20.0, 1000.0));
        grow_leaves(&mut plant, &mut rng, 1);
        assert!((plant.growth_rate_ms() - 501.0).abs() < 1e-9);
        grow_leaves(&mut plant, &mut rng, 1);
        assert!((plant.growth_rate_ms() - 500.501).abs() < 1e-9);
    }

    #[test]
    fn harvesting_leaf_resets_rate_and_counts() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut plant = Plant::new(PlantId(0), Vec2::ZERO, traits(20.0, 800.0));
        let leaves = grow_leaves(&mut plant, &mut rng, 3);

        let harvest = plant.harvest_leaf(leaves[1]).expect("live leaf");
        assert_eq!(harvest.harvested_leaf_count, 1);
        assert_eq!(harvest.seeded, 2);
        assert_eq!(plant.growth_rate_ms(), 800.0);
        assert_eq!(plant.sampler().point_count(), 2);
        assert_eq!(plant.live_leaf_count(), 2);
    }

    #[test]
    fn repeated_or_unknown_leaf_harvest_is_noop() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut plant = Plant::new(PlantId(0), Vec2::ZERO, traits(20.0, 800.0));
        let leaves = grow_leaves(&mut plant, &mut rng, 2);
        plant.harvest_leaf(leaves[0]).expect("live leaf");
        let rate = plant.growth_rate_ms();
        let points = plant.sampler().point_count();

        assert_eq!(plant.harvest_leaf(leaves[0]), None);
        assert_eq!(plant.harvest_leaf(LeafId(999)), None);
        assert_eq!(plant.harvested_leaf_count(), 1);
        assert_eq!(plant.growth_rate_ms(), rate);
        assert_eq!(plant.sampler().point_count(), points);
    }

    #[test]
    fn harvesting_last_leaf_keeps_plant_alive() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut plant = Plant::new(PlantId(0), Vec2::ZERO, traits(20.0, 800.0));
        let leaves = grow_leaves(&mut plant, &mut rng, 1);

        plant.harvest_leaf(leaves[0]).expect("live leaf");
        assert!(!plant.is_harvested());
        assert_eq!(plant.live_leaf_count(), 0);
        assert!(plant.sampler().is_empty());
        assert_eq!(plant.grow(&mut rng), GrowthOutcome::Grew(LeafId(1)));
    }

    #[test]
    fn harvested_plant_stops_growing() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut queue = TimerQueue::new();
        let mut plant = Plant::new(PlantId(0), Vec2::ZERO, traits(20.0, 800.0));
        plant.start_growing(&mut queue, &mut rng);
        assert!(plant.is_growing());
        assert_eq!(queue.len(), 1);

        assert!(plant.harvest(&mut queue));
        assert!(!plant.harvest(&mut queue));
        assert!(!plant.is_growing());
        assert!(queue.is_empty());
        assert_eq!(plant.grow(&mut rng), GrowthOutcome::Inactive);
        assert_eq!(plant.harvest_leaf(LeafId(0)), None);
    }

    #[test]
    fn jitter_shifts_leaves_but_not_sampler_points() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut t = traits(20.0, 800.0);
        t.leaf_jitter = Vec2::new(3.0, -1.0);
        let mut plant = Plant::new(PlantId(0), Vec2::ZERO, t);
        let leaves = grow_leaves(&mut plant, &mut rng, 3);
        assert_eq!(plant.leaves()[0].offset, Vec2::new(3.0, -1.0));

        plant.harvest_leaf(leaves[2]).expect("live leaf");
        assert_eq!(plant.sampler().points()[0], Vec2::ZERO);
    }

    #[test]
    fn rebuild_keeps_exact_points_under_fractional_jitter() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut t = traits(30.0, 800.0);
        t.leaf_jitter = Vec2::new(0.1, 1.0e4);
        let mut plant = Plant::new(PlantId(0), Vec2::ZERO, t);
        let leaves = grow_leaves(&mut plant, &mut rng, 6);
        let before = plant.sampler().points().to_vec();

        plant.harvest_leaf(leaves[3]).expect("live leaf");
        let expected: Vec<Vec2> = before
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 3)
            .map(|(_, p)| *p)
            .collect();
        assert_eq!(plant.sampler().points(), expected.as_slice());
    }

    #[test]
    fn samples_never_leave_growth_radius() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut plant = Plant::new(PlantId(0), Vec2::ZERO, traits(12.0, 500.0));
        for _ in 0..200 {
            assert_ne!(plant.grow(&mut rng), GrowthOutcome::OutsideRadius);
        }
    }
}
