#![forbid(unsafe_code)]
//! oregano_field: a stochastic growth engine for a field of harvestable plants.
//!
//! Modules:
//! - sampling: incremental Poisson disk (blue-noise) sampler
//! - process: Poisson-timed processes on a virtual-time timer queue
//! - garden: plants, leaves, harvests, fertilizer, events and the field driver
//!
//! Rendering and input handling are left to the host, which reads the live
//! plants and forwards harvest/fertilizer actions.
pub mod error;
pub mod garden;
pub mod process;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use oregano_field::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::garden::color::{Rgb, OREGANO_GREEN};
    pub use crate::garden::config::FieldConfig;
    pub use crate::garden::cultivar::Cultivar;
    pub use crate::garden::events::{
        EventSink, FieldEvent, FieldEventKind, FilterSink, FnSink, MultiSink, RebuildReason,
        SamplerScope, VecSink,
    };
    pub use crate::garden::field::PlantField;
    pub use crate::garden::plant::{GrowthOutcome, Leaf, Plant, PlantTraits};
    pub use crate::garden::selection::{pick_weighted, CultivarMix, HeirloomOdds};
    pub use crate::garden::{HarvestStats, LeafId, PlantId, Tick};
    pub use crate::process::{sample_delay, IntervalProcess, TimerQueue, TimerToken};
    pub use crate::sampling::PoissonDiskSampler;
}
