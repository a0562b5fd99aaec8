//! The growing field: plants, leaves, harvests and the timers that drive them.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod color;
pub mod config;
pub mod cultivar;
pub mod events;
pub mod field;
pub mod plant;
pub mod selection;

/// Identifier of a plant, unique within its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlantId(pub u64);

/// Identifier of a leaf, unique within its plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeafId(pub u32);

impl std::fmt::Display for PlantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "plant#{}", self.0)
    }
}

impl std::fmt::Display for LeafId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "leaf#{}", self.0)
    }
}

/// What a timer fire should do once it is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Try to place a new plant.
    Spawn,
    /// Try to grow a leaf on the given plant.
    Grow(PlantId),
}

/// Aggregate counters shown alongside the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HarvestStats {
    /// Harvested leaves plus harvested plants.
    pub total_harvested: u64,
    /// Distinct cultivars among heirloom plants with at least one harvested leaf.
    pub heirloom_varieties_harvested: usize,
    /// Number of cultivars that exist.
    pub heirloom_varieties_total: usize,
    /// Plants not yet harvested.
    pub plants_growing: usize,
}
