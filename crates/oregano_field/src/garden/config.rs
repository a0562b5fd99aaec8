//! Field configuration.
use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::garden::color::{Rgb, OREGANO_GREEN};
use crate::garden::selection::{CultivarMix, HeirloomOdds};
use crate::sampling::poisson_disk::DEFAULT_MAX_ATTEMPTS;

/// Configuration for a [`crate::garden::field::PlantField`].
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldConfig {
    /// Size of the plantable region in field units.
    pub extent: Vec2,
    /// Offset added to every plant position (top-left margin of the region).
    pub offset: Vec2,
    /// Mean delay between spawn attempts in milliseconds.
    pub spawn_interval_ms: f64,
    /// Initial clustering factor. The minimum plant spacing is `extent.x / clustering_factor`.
    pub clustering_factor: u32,
    /// Half-open range `[min, max)` that plant sizes are drawn from.
    pub size_range: (f32, f32),
    /// Half-open range of the factor applied to `spawn_interval_ms` to get a
    /// plant's base growth rate.
    pub growth_factor_range: (f32, f32),
    /// Odds of spawning an heirloom plant.
    pub heirloom_odds: HeirloomOdds,
    /// Cultivar weights at spawn time.
    pub cultivar_mix: CultivarMix,
    /// Offset added to every leaf position within its plant.
    pub leaf_jitter: Vec2,
    /// Leaf color of the default cultivar; other cultivars derive from it.
    pub base_color: Rgb,
    /// Candidates tried around each active point before it is retired.
    pub max_attempts: usize,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            extent: Vec2::new(1440.0, 810.0),
            offset: Vec2::new(100.0, 100.0),
            spawn_interval_ms: 1000.0,
            clustering_factor: 12,
            size_range: (10.0, 100.0),
            growth_factor_range: (0.2, 2.0),
            heirloom_odds: HeirloomOdds::default(),
            cultivar_mix: CultivarMix::default(),
            leaf_jitter: Vec2::ZERO,
            base_color: OREGANO_GREEN,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Creates a default configuration with the given plantable extent.
    pub fn new(extent: Vec2) -> Self {
        Self {
            extent,
            ..Default::default()
        }
    }

    /// Sizes the field to a window, leaving a quarter of each dimension as margin.
    pub fn for_window(width: f32, height: f32) -> Self {
        Self::new(Vec2::new(width - width / 4.0, height - height / 4.0))
    }

    pub fn with_extent(mut self, extent: Vec2) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_spawn_interval_ms(mut self, spawn_interval_ms: f64) -> Self {
        self.spawn_interval_ms = spawn_interval_ms;
        self
    }

    pub fn with_clustering_factor(mut self, clustering_factor: u32) -> Self {
        self.clustering_factor = clustering_factor;
        self
    }

    pub fn with_size_range(mut self, min: f32, max: f32) -> Self {
        self.size_range = (min, max);
        self
    }

    pub fn with_growth_factor_range(mut self, min: f32, max: f32) -> Self {
        self.growth_factor_range = (min, max);
        self
    }

    pub fn with_heirloom_odds(mut self, heirloom_odds: HeirloomOdds) -> Self {
        self.heirloom_odds = heirloom_odds;
        self
    }

    pub fn with_cultivar_mix(mut self, cultivar_mix: CultivarMix) -> Self {
        self.cultivar_mix = cultivar_mix;
        self
    }

    pub fn with_leaf_jitter(mut self, leaf_jitter: Vec2) -> Self {
        self.leaf_jitter = leaf_jitter;
        self
    }

    pub fn with_base_color(mut self, base_color: Rgb) -> Self {
        self.base_color = base_color;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Minimum plant spacing for a clustering factor.
    pub fn spacing_for(&self, clustering_factor: u32) -> f32 {
        self.extent.x / clustering_factor as f32
    }

    /// Minimum plant spacing at the configured clustering factor.
    pub fn min_spacing(&self) -> f32 {
        self.spacing_for(self.clustering_factor)
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.extent.is_finite() || self.extent.x <= 0.0 || self.extent.y <= 0.0 {
            return Err(Error::InvalidConfig(
                "extent must be finite and > 0 in both components".into(),
            ));
        }
        if !self.offset.is_finite() || !self.leaf_jitter.is_finite() {
            return Err(Error::InvalidConfig(
                "offset and leaf_jitter must be finite".into(),
            ));
        }
        if !self.spawn_interval_ms.is_finite() || self.spawn_interval_ms <= 0.0 {
            return Err(Error::InvalidConfig("spawn_interval_ms must be > 0".into()));
        }
        if self.clustering_factor == 0 {
            return Err(Error::InvalidConfig("clustering_factor must be > 0".into()));
        }
        let (size_min, size_max) = self.size_range;
        if !(size_min.is_finite() && size_max.is_finite()) || size_min <= 0.0 || size_max < size_min
        {
            return Err(Error::InvalidConfig(format!(
                "size_range must satisfy 0 < min <= max, got [{size_min}, {size_max})"
            )));
        }
        let (growth_min, growth_max) = self.growth_factor_range;
        if !(growth_min.is_finite() && growth_max.is_finite())
            || growth_min <= 0.0
            || growth_max < growth_min
        {
            return Err(Error::InvalidConfig(format!(
                "growth_factor_range must satisfy 0 < min <= max, got [{growth_min}, {growth_max})"
            )));
        }
        if self.heirloom_odds.heirloom < 0.0 || self.heirloom_odds.regular < 0.0 {
            return Err(Error::InvalidConfig(
                "heirloom_odds weights must be >= 0".into(),
            ));
        }
        if !self.cultivar_mix.is_pickable() {
            return Err(Error::InvalidConfig(
                "cultivar_mix needs at least one positive weight".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be > 0".into()));
        }

        Ok(())
    }
}
