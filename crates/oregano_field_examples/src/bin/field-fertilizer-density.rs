use oregano_field::prelude::*;
use oregano_field_examples::{init_tracing, render_field_to_png, RenderConfig};

const HORIZON_MS: f64 = 120_000.0;
const FERTILIZER_EVERY_MS: f64 = 10_000.0;

type Logs = MultiSink<FilterSink<VecSink>>;

const SPAWN_LOG: usize = 0;
const SPACING_LOG: usize = 1;

fn grow(fertilize: bool) -> anyhow::Result<PlantField<Logs>> {
    let config = FieldConfig::default().with_seed(7);
    let sink = MultiSink::with_sinks(vec![
        FilterSink::new(
            VecSink::new(),
            [FieldEventKind::PlantSpawned, FieldEventKind::SpawnSkipped],
        ),
        FilterSink::new(
            VecSink::new(),
            [FieldEventKind::SpacingChanged, FieldEventKind::SamplerRebuilt],
        ),
    ]);
    let mut field = PlantField::try_with_sink(config, sink)?;
    field.start();

    let mut t = 0.0;
    while t < HORIZON_MS {
        t += FERTILIZER_EVERY_MS;
        field.advance_to(t);
        if fertilize {
            field.apply_fertilizer();
        }
    }
    Ok(field)
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    for fertilize in [false, true] {
        let field = grow(fertilize)?;
        let logs = field.sink().sinks();
        let spawns = logs[SPAWN_LOG].inner();
        let spacing = logs[SPACING_LOG].inner();
        tracing::info!(
            fertilize,
            min_spacing = field.min_spacing(),
            plants = field.stats().plants_growing,
            spawned = spawns.count(FieldEventKind::PlantSpawned),
            skipped = spawns.count(FieldEventKind::SpawnSkipped),
            spacing_changes = spacing.count(FieldEventKind::SpacingChanged),
            rebuilds = spacing.count(FieldEventKind::SamplerRebuilt),
            "density after {}s",
            HORIZON_MS / 1000.0
        );

        let out = if fertilize {
            "field-fertilized.png"
        } else {
            "field-unfertilized.png"
        };
        render_field_to_png(&field, &RenderConfig::new((1640, 1010)), out)?;
    }
    Ok(())
}
