#![forbid(unsafe_code)]

mod harvester;
mod rendering;

pub use harvester::{harvest_click, ClickOutcome};
pub use rendering::{render_field_to_png, RenderConfig};

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
