use oregano_field::prelude::*;

/// What a click on a leaf ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    LeafHarvested,
    PlantHarvested,
    Ignored,
}

/// Handles a click on a leaf the way the field UI does: the last live leaf
/// takes the whole plant with it, any other leaf is picked on its own.
pub fn harvest_click<S: EventSink>(
    field: &mut PlantField<S>,
    plant_id: PlantId,
    leaf_id: LeafId,
) -> ClickOutcome {
    let Some(plant) = field.plant(plant_id) else {
        return ClickOutcome::Ignored;
    };
    if plant.live_leaf_count() == 1 {
        if field.harvest_plant(plant_id) {
            ClickOutcome::PlantHarvested
        } else {
            ClickOutcome::Ignored
        }
    } else if field.harvest_leaf(plant_id, leaf_id) {
        ClickOutcome::LeafHarvested
    } else {
        ClickOutcome::Ignored
    }
}
