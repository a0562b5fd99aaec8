use std::path::Path;

use glam::Vec2;
use image::{Rgb as Pixel, RgbImage};
use oregano_field::prelude::*;

/// Output settings for [`render_field_to_png`].
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub background: [u8; 3],
    /// Leaf disc radius in pixels.
    pub leaf_radius_px: i32,
    /// Outline drawn around heirloom leaves.
    pub heirloom_outline: Option<[u8; 3]>,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            background: [245, 240, 225],
            leaf_radius_px: 2,
            heirloom_outline: Some([212, 175, 55]),
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_leaf_radius(mut self, leaf_radius_px: i32) -> Self {
        self.leaf_radius_px = leaf_radius_px;
        self
    }
}

/// Draws every live leaf of every live plant and writes a PNG to `path`.
///
/// The image covers the field offset plus the plantable extent, so plants at the
/// margin stay visible.
pub fn render_field_to_png<S: EventSink>(
    field: &PlantField<S>,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = config.image_size;
    let mut img = RgbImage::from_pixel(w, h, Pixel(config.background));

    let world = field.config().offset * 2.0 + field.config().extent;
    let scale = Vec2::new(w as f32 / world.x, h as f32 / world.y);

    for plant in field.live_plants() {
        for leaf in plant.live_leaves() {
            let p = (plant.position() + leaf.offset) * scale;
            let (cx, cy) = (p.x.round() as i32, p.y.round() as i32);
            if let (true, Some(outline)) = (leaf.heirloom, config.heirloom_outline) {
                draw_disc(&mut img, cx, cy, config.leaf_radius_px + 1, outline);
            }
            draw_disc(&mut img, cx, cy, config.leaf_radius_px, plant.color().to_array());
        }
    }

    img.save(path.as_ref())?;
    tracing::info!(path = %path.as_ref().display(), "wrote field snapshot");
    Ok(())
}

fn draw_disc(img: &mut RgbImage, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
    let (w, h) = (img.width() as i32, img.height() as i32);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x >= 0 && y >= 0 && x < w && y < h {
                img.put_pixel(x as u32, y as u32, Pixel(color));
            }
        }
    }
}
