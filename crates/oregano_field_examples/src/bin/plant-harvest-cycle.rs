use oregano_field::prelude::*;
use oregano_field_examples::{harvest_click, init_tracing, ClickOutcome};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let sink = FnSink::new(|event: FieldEvent| {
        if let FieldEvent::PlantHarvested { plant_id } = event {
            tracing::info!(plant = %plant_id, "picked a whole plant");
        }
    });
    let mut field = PlantField::try_with_sink(FieldConfig::default().with_seed(2024), sink)?;
    field.start();

    let mut leaves_picked = 0;
    let mut plants_picked = 0;
    for second in 1..=90 {
        field.advance_to(second as f64 * 1000.0);

        // Pick from plants with a handful of leaves, and clear out picked-over
        // plants down to their last leaf.
        let clicks: Vec<(PlantId, LeafId)> = field
            .live_plants()
            .filter(|p| {
                p.live_leaf_count() >= 5
                    || (p.live_leaf_count() == 1 && p.harvested_leaf_count() >= 3)
            })
            .filter_map(|p| p.live_leaves().next().map(|l| (p.id(), l.id)))
            .collect();
        for (plant, leaf) in clicks {
            match harvest_click(&mut field, plant, leaf) {
                ClickOutcome::LeafHarvested => leaves_picked += 1,
                ClickOutcome::PlantHarvested => plants_picked += 1,
                ClickOutcome::Ignored => {}
            }
        }

        if second % 15 == 0 {
            let stats = field.stats();
            tracing::info!(
                second,
                total_harvested = stats.total_harvested,
                heirlooms = %format!(
                    "{}/{}",
                    stats.heirloom_varieties_harvested, stats.heirloom_varieties_total
                ),
                growing = stats.plants_growing,
                "harvest progress"
            );
        }
    }

    tracing::info!(leaves_picked, plants_picked, "done");
    Ok(())
}
