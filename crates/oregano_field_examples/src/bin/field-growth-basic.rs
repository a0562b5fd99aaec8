use oregano_field::prelude::*;
use oregano_field_examples::{init_tracing, render_field_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = FieldConfig::for_window(1920.0, 1080.0).with_seed(42);
    let mut field = PlantField::try_new(config)?;
    field.start();

    for second in 1..=60 {
        field.advance_to(second as f64 * 1000.0);
        if second % 10 == 0 {
            let stats = field.stats();
            let leaves: usize = field.live_plants().map(|p| p.live_leaf_count()).sum();
            tracing::info!(
                second,
                plants = stats.plants_growing,
                leaves,
                "field growing"
            );
        }
    }

    let config = RenderConfig::new((1640, 1010)).with_leaf_radius(1);
    render_field_to_png(&field, &config, "field-growth-basic.png")?;
    Ok(())
}
