//! The field of plants and the driver that dispatches its timers.
//!
//! [`PlantField`] owns every plant, the field-wide sampler that keeps plants
//! apart, the spawn process and the [`TimerQueue`] all processes share. Hosts
//! move time forward with [`PlantField::advance_to`] and forward user actions
//! through the harvest and fertilizer methods.
use std::collections::BTreeSet;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng as RngCore, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::error::Result;
use crate::garden::config::FieldConfig;
use crate::garden::cultivar::Cultivar;
use crate::garden::events::{
    EventSink, FieldEvent, FieldEventKind, RebuildReason, SamplerScope,
};
use crate::garden::plant::{GrowthOutcome, Plant, PlantTraits};
use crate::garden::{HarvestStats, LeafId, PlantId, Tick};
use crate::process::{IntervalProcess, TimerQueue};
use crate::sampling::{rand_range, PoissonDiskSampler};

/// A field of plants growing under a shared spacing constraint.
///
/// Plants are never removed; harvesting is a terminal flag. Plant ids are
/// allocated in order, so a plant's id doubles as its index.
pub struct PlantField<S: EventSink = ()> {
    config: FieldConfig,
    clustering_factor: u32,
    min_spacing: f32,
    sampler: PoissonDiskSampler,
    spawner: IntervalProcess<Tick>,
    queue: TimerQueue<Tick>,
    plants: Vec<Plant>,
    /// Sampler-local point each plant was placed at, indexed by plant id.
    spots: Vec<Vec2>,
    rng: StdRng,
    sink: S,
}

impl PlantField<()> {
    /// Creates a field after validating `config`.
    pub fn try_new(config: FieldConfig) -> Result<Self> {
        Self::try_with_sink(config, ())
    }

    /// Creates a field. Invalid configurations are only caught by debug assertions;
    /// use [`PlantField::try_new`] for untrusted input.
    pub fn new(config: FieldConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid field configuration");
        Self::build(config, ())
    }
}

impl<S: EventSink> PlantField<S> {
    /// Creates a field reporting to `sink` after validating `config`.
    pub fn try_with_sink(config: FieldConfig, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, sink))
    }

    fn build(config: FieldConfig, sink: S) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().next_u64());
        let clustering_factor = config.clustering_factor;
        let min_spacing = config.min_spacing();
        let sampler = PoissonDiskSampler::new(min_spacing, config.extent)
            .with_max_attempts(config.max_attempts);
        let spawner = IntervalProcess::new(Tick::Spawn, config.spawn_interval_ms);

        Self {
            config,
            clustering_factor,
            min_spacing,
            sampler,
            spawner,
            queue: TimerQueue::new(),
            plants: Vec::new(),
            spots: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            sink,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.queue.now_ms()
    }

    pub fn min_spacing(&self) -> f32 {
        self.min_spacing
    }

    pub fn clustering_factor(&self) -> u32 {
        self.clustering_factor
    }

    pub fn is_running(&self) -> bool {
        self.spawner.is_running()
    }

    /// Pending timer fires across the spawn process and all plants.
    pub fn pending_timers(&self) -> usize {
        self.queue.len()
    }

    /// The field-wide sampler, in coordinates centered on the field.
    pub fn sampler(&self) -> &PoissonDiskSampler {
        &self.sampler
    }

    /// Every plant ever spawned, harvested ones included.
    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    /// Plants that are still growing.
    pub fn live_plants(&self) -> impl Iterator<Item = &Plant> + '_ {
        self.plants.iter().filter(|p| !p.is_harvested())
    }

    pub fn plant(&self, id: PlantId) -> Option<&Plant> {
        self.plants.get(id.0 as usize)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Field coordinates of the region center.
    pub fn center(&self) -> Vec2 {
        self.config.offset + self.config.extent / 2.0
    }

    fn to_field(&self, local: Vec2) -> Vec2 {
        local + self.center()
    }

    /// Starts the spawn process. Plants spawned later start growing on their own.
    pub fn start(&mut self) {
        self.spawner.start(&mut self.queue, &mut self.rng);
        info!(
            min_spacing = self.min_spacing,
            spawn_interval_ms = self.config.spawn_interval_ms,
            "field started"
        );
        if self.sink.wants(FieldEventKind::FieldStarted) {
            self.sink.send(FieldEvent::FieldStarted {
                min_spacing: self.min_spacing,
            });
        }
    }

    /// Stops spawning and every plant's growth.
    pub fn stop(&mut self) {
        self.spawner.stop(&mut self.queue);
        for plant in &mut self.plants {
            plant.process_mut().stop(&mut self.queue);
        }
        info!(plants = self.plants.len(), "field stopped");
    }

    /// Dispatches every timer due up to `now_ms`, in due order, then moves the
    /// clock to `now_ms`. Returns the number of ticks dispatched.
    pub fn advance_to(&mut self, now_ms: f64) -> usize {
        let mut dispatched = 0;
        while let Some((token, tick)) = self.queue.pop_due(now_ms) {
            match tick {
                Tick::Spawn => {
                    if !self.spawner.accept(token) {
                        continue;
                    }
                    self.spawn_tick();
                    self.spawner.rearm(&mut self.queue, &mut self.rng);
                }
                Tick::Grow(id) => {
                    let accepted = self
                        .plants
                        .get_mut(id.0 as usize)
                        .is_some_and(|p| p.process_mut().accept(token));
                    if !accepted {
                        continue;
                    }
                    self.grow_tick(id);
                    if let Some(plant) = self.plants.get_mut(id.0 as usize) {
                        plant.process_mut().rearm(&mut self.queue, &mut self.rng);
                    }
                }
            }
            dispatched += 1;
        }
        self.queue.advance_to(now_ms);
        dispatched
    }

    /// Advances the clock by `delta_ms`. See [`PlantField::advance_to`].
    pub fn advance_by(&mut self, delta_ms: f64) -> usize {
        let target = self.now_ms() + delta_ms.max(0.0);
        self.advance_to(target)
    }

    /// Tries to place one plant. Seeds the field center when the sampler is
    /// empty. Returns `None` when no free spot is left.
    pub fn spawn_tick(&mut self) -> Option<PlantId> {
        let sample = if self.sampler.is_empty() {
            self.sampler.seed(Vec2::ZERO)
        } else {
            self.sampler.next(&mut self.rng)
        };

        let Some(local) = sample else {
            let plants_growing = self.live_plants().count();
            trace!(plants_growing, "no room for another plant");
            if self.sink.wants(FieldEventKind::SpawnSkipped) {
                self.sink.send(FieldEvent::SpawnSkipped { plants_growing });
            }
            return None;
        };

        let id = PlantId(self.plants.len() as u64);
        let position = self.to_field(local);
        let traits = self.draw_traits();
        debug!(
            plant = %id,
            x = position.x,
            y = position.y,
            cultivar = %traits.cultivar,
            heirloom = traits.heirloom,
            size = traits.size,
            "plant spawned"
        );
        if self.sink.wants(FieldEventKind::PlantSpawned) {
            self.sink.send(FieldEvent::PlantSpawned {
                plant_id: id,
                position,
                cultivar: traits.cultivar,
                heirloom: traits.heirloom,
                size: traits.size,
                base_growth_rate_ms: traits.base_growth_rate_ms,
            });
        }

        let mut plant = Plant::new(id, position, traits);
        plant.start_growing(&mut self.queue, &mut self.rng);
        self.plants.push(plant);
        self.spots.push(local);
        Some(id)
    }

    fn draw_traits(&mut self) -> PlantTraits {
        let rng: &mut dyn RngCore = &mut self.rng;
        let config = &self.config;

        let heirloom = config.heirloom_odds.roll(rng);
        let (size_min, size_max) = config.size_range;
        let size = rand_range(rng, size_min, size_max);
        let cultivar = config.cultivar_mix.roll(rng);
        let color = if cultivar == Cultivar::default() {
            config.base_color
        } else {
            config
                .base_color
                .lighten(rand_range(rng, 0.0, 0.4))
                .saturate(rand_range(rng, 0.2, 0.8))
        };
        let (growth_min, growth_max) = config.growth_factor_range;
        let base_growth_rate_ms =
            config.spawn_interval_ms * rand_range(rng, growth_min, growth_max) as f64;

        PlantTraits {
            heirloom,
            cultivar,
            size,
            color,
            base_growth_rate_ms,
            leaf_jitter: config.leaf_jitter,
            max_attempts: config.max_attempts,
        }
    }

    /// Runs one growth tick for `plant_id`.
    pub fn grow_tick(&mut self, plant_id: PlantId) -> GrowthOutcome {
        let Some(plant) = self.plants.get_mut(plant_id.0 as usize) else {
            return GrowthOutcome::Inactive;
        };
        let outcome = plant.grow(&mut self.rng);

        match outcome {
            GrowthOutcome::Grew(leaf_id) => {
                let offset = plant.leaf(leaf_id).map(|l| l.offset).unwrap_or_default();
                let growth_rate_ms = plant.growth_rate_ms();
                trace!(plant = %plant_id, leaf = %leaf_id, growth_rate_ms, "leaf grown");
                if self.sink.wants(FieldEventKind::LeafGrown) {
                    self.sink.send(FieldEvent::LeafGrown {
                        plant_id,
                        leaf_id,
                        offset,
                        growth_rate_ms,
                    });
                }
            }
            other => trace!(plant = %plant_id, outcome = ?other, "no leaf grown"),
        }

        outcome
    }

    /// Harvests a single leaf. Unknown ids, harvested leaves and harvested
    /// plants are ignored. Harvesting the last live leaf does not harvest the
    /// plant; call [`PlantField::harvest_plant`] for that.
    pub fn harvest_leaf(&mut self, plant_id: PlantId, leaf_id: LeafId) -> bool {
        let Some(plant) = self.plants.get_mut(plant_id.0 as usize) else {
            debug!(plant = %plant_id, "harvest of unknown plant ignored");
            return false;
        };
        let Some(harvest) = plant.harvest_leaf(leaf_id) else {
            debug!(plant = %plant_id, leaf = %leaf_id, "leaf harvest ignored");
            return false;
        };
        let min_distance = plant.leaf_spacing();

        debug!(
            plant = %plant_id,
            leaf = %leaf_id,
            harvested_leaf_count = harvest.harvested_leaf_count,
            "leaf harvested"
        );
        if self.sink.wants(FieldEventKind::LeafHarvested) {
            self.sink.send(FieldEvent::LeafHarvested {
                plant_id,
                leaf_id,
                harvested_leaf_count: harvest.harvested_leaf_count,
            });
        }
        if self.sink.wants(FieldEventKind::SamplerRebuilt) {
            self.sink.send(FieldEvent::SamplerRebuilt {
                scope: SamplerScope::Plant(plant_id),
                reason: RebuildReason::LeafHarvested,
                seeded: harvest.seeded,
                min_distance,
            });
        }
        true
    }

    /// Harvests a whole plant, stops its growth and frees its spot in the field.
    pub fn harvest_plant(&mut self, plant_id: PlantId) -> bool {
        let Some(plant) = self.plants.get_mut(plant_id.0 as usize) else {
            debug!(plant = %plant_id, "harvest of unknown plant ignored");
            return false;
        };
        if !plant.harvest(&mut self.queue) {
            debug!(plant = %plant_id, "plant already harvested");
            return false;
        }

        debug!(plant = %plant_id, "plant harvested");
        if self.sink.wants(FieldEventKind::PlantHarvested) {
            self.sink.send(FieldEvent::PlantHarvested { plant_id });
        }
        self.rebuild_sampler(RebuildReason::PlantHarvested);
        true
    }

    /// Raises the clustering factor by one, tightening the minimum spacing so
    /// more plants fit. Returns the new spacing.
    pub fn apply_fertilizer(&mut self) -> f32 {
        self.clustering_factor = self.clustering_factor.saturating_add(1);
        let spacing = self.config.spacing_for(self.clustering_factor);
        info!(
            clustering_factor = self.clustering_factor,
            min_spacing = spacing,
            "fertilizer applied"
        );
        self.set_min_spacing(spacing);
        self.min_spacing
    }

    /// Replaces the minimum plant spacing and rebuilds the field sampler.
    /// Existing plants keep their positions. Non-finite or non-positive values
    /// are ignored.
    pub fn set_min_spacing(&mut self, spacing: f32) -> bool {
        if !spacing.is_finite() || spacing <= 0.0 {
            warn!(spacing, "ignoring invalid minimum spacing");
            return false;
        }
        self.min_spacing = spacing;
        if self.sink.wants(FieldEventKind::SpacingChanged) {
            self.sink.send(FieldEvent::SpacingChanged {
                clustering_factor: self.clustering_factor,
                min_spacing: spacing,
            });
        }
        self.rebuild_sampler(RebuildReason::SpacingChanged);
        true
    }

    /// Replaces the field sampler with a fresh one seeded by every live plant.
    fn rebuild_sampler(&mut self, reason: RebuildReason) {
        let mut sampler = PoissonDiskSampler::new(self.min_spacing, self.config.extent)
            .with_max_attempts(self.config.max_attempts);
        let mut seeded = 0;
        let live = self.plants.iter().zip(&self.spots).filter(|(p, _)| !p.is_harvested());
        for (_, spot) in live {
            if sampler.insert(*spot) {
                seeded += 1;
            }
        }
        self.sampler = sampler;

        debug!(?reason, seeded, min_spacing = self.min_spacing, "field sampler rebuilt");
        if self.sink.wants(FieldEventKind::SamplerRebuilt) {
            self.sink.send(FieldEvent::SamplerRebuilt {
                scope: SamplerScope::Field,
                reason,
                seeded,
                min_distance: self.min_spacing,
            });
        }
    }

    /// Aggregate harvest counters.
    pub fn stats(&self) -> HarvestStats {
        let leaves: u64 = self
            .plants
            .iter()
            .map(|p| p.harvested_leaf_count() as u64)
            .sum();
        let harvested_plants = self.plants.iter().filter(|p| p.is_harvested()).count();
        let heirlooms: BTreeSet<Cultivar> = self
            .plants
            .iter()
            .filter(|p| p.heirloom() && p.harvested_leaf_count() > 0)
            .map(|p| p.cultivar())
            .collect();

        HarvestStats {
            total_harvested: leaves + harvested_plants as u64,
            heirloom_varieties_harvested: heirlooms.len(),
            heirloom_varieties_total: Cultivar::ALL.len(),
            plants_growing: self.plants.len() - harvested_plants,
        }
    }
}
