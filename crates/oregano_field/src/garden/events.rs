//! Event types and sinks for observing a growing field.
//!
//! [`crate::garden::field::PlantField`] reports every state transition to its
//! sink: spawns, leaf growth, harvests and sampler rebuilds.
use glam::Vec2;

use crate::garden::cultivar::Cultivar;
use crate::garden::{LeafId, PlantId};

/// Why a sampler was rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildReason {
    /// The minimum spacing changed.
    SpacingChanged,
    /// A plant was harvested and frees its slot in the field.
    PlantHarvested,
    /// A leaf was harvested and frees its slot in the plant.
    LeafHarvested,
}

/// Which sampler an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerScope {
    Field,
    Plant(PlantId),
}

/// Describes events emitted while a field grows.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum FieldEvent {
    /// Emitted when the spawn process starts.
    FieldStarted {
        /// Minimum plant spacing at start.
        min_spacing: f32,
    },

    /// Emitted when a spawn tick places a plant.
    PlantSpawned {
        plant_id: PlantId,
        /// Field position of the plant center.
        position: Vec2,
        cultivar: Cultivar,
        heirloom: bool,
        size: f32,
        base_growth_rate_ms: f64,
    },

    /// Emitted when a spawn tick finds no free spot.
    SpawnSkipped {
        /// Number of plants still growing.
        plants_growing: usize,
    },

    /// Emitted when a growth tick adds a leaf.
    LeafGrown {
        plant_id: PlantId,
        leaf_id: LeafId,
        /// Leaf position relative to the plant center.
        offset: Vec2,
        /// Mean delay of the plant's next growth tick.
        growth_rate_ms: f64,
    },

    /// Emitted when a single leaf is harvested.
    LeafHarvested {
        plant_id: PlantId,
        leaf_id: LeafId,
        /// Harvested leaves of this plant so far.
        harvested_leaf_count: u32,
    },

    /// Emitted when a whole plant is harvested.
    PlantHarvested { plant_id: PlantId },

    /// Emitted after a sampler was replaced by a re-seeded one.
    SamplerRebuilt {
        scope: SamplerScope,
        reason: RebuildReason,
        /// Occupants inserted into the new sampler.
        seeded: usize,
        min_distance: f32,
    },

    /// Emitted when fertilizer or a direct update changes the plant spacing.
    SpacingChanged {
        clustering_factor: u32,
        min_spacing: f32,
    },
}

/// Discriminant of [`FieldEvent`] used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldEventKind {
    FieldStarted,
    PlantSpawned,
    SpawnSkipped,
    LeafGrown,
    LeafHarvested,
    PlantHarvested,
    SamplerRebuilt,
    SpacingChanged,
}

impl FieldEvent {
    pub fn kind(&self) -> FieldEventKind {
        match self {
            FieldEvent::FieldStarted { .. } => FieldEventKind::FieldStarted,
            FieldEvent::PlantSpawned { .. } => FieldEventKind::PlantSpawned,
            FieldEvent::SpawnSkipped { .. } => FieldEventKind::SpawnSkipped,
            FieldEvent::LeafGrown { .. } => FieldEventKind::LeafGrown,
            FieldEvent::LeafHarvested { .. } => FieldEventKind::LeafHarvested,
            FieldEvent::PlantHarvested { .. } => FieldEventKind::PlantHarvested,
            FieldEvent::SamplerRebuilt { .. } => FieldEventKind::SamplerRebuilt,
            FieldEvent::SpacingChanged { .. } => FieldEventKind::SpacingChanged,
        }
    }
}

/// A generic event sink that accepts [`FieldEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: FieldEvent);

    /// Whether events of `kind` should be built and sent at all.
    fn wants(&self, _kind: FieldEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: FieldEvent) {}

    #[inline]
    fn wants(&self, _kind: FieldEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(FieldEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(FieldEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(FieldEvent),
{
    #[inline]
    fn send(&mut self, event: FieldEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<FieldEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<FieldEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[FieldEvent] {
        &self.events
    }

    /// Takes the collected events, leaving the sink empty.
    pub fn drain(&mut self) -> Vec<FieldEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count(&self, kind: FieldEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: FieldEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn sinks(&self) -> &[S] {
        &self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: FieldEvent) {
        let kind = event.kind();
        let Some(last_idx) = self.sinks.iter().rposition(|s| s.wants(kind)) else {
            return;
        };
        for i in 0..last_idx {
            if self.sinks[i].wants(kind) {
                self.sinks[i].send(event.clone());
            }
        }
        self.sinks[last_idx].send(event);
    }

    fn wants(&self, kind: FieldEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

/// Sink adapter that only forwards the listed event kinds.
pub struct FilterSink<S: EventSink> {
    inner: S,
    kinds: Vec<FieldEventKind>,
}

impl<S: EventSink> FilterSink<S> {
    pub fn new(inner: S, kinds: impl IntoIterator<Item = FieldEventKind>) -> Self {
        Self {
            inner,
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EventSink> EventSink for FilterSink<S> {
    fn send(&mut self, event: FieldEvent) {
        if self.wants(event.kind()) {
            self.inner.send(event);
        }
    }

    fn wants(&self, kind: FieldEventKind) -> bool {
        self.kinds.contains(&kind) && self.inner.wants(kind)
    }
}
