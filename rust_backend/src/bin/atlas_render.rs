//! Atlas Render Binary
//!
//! Loads a civilization table, builds the strata and rivers timelines on SVG
//! surfaces, and writes them out together with the computed layouts.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin atlas-render -- data/matriz.csv out/ [atlas.toml]
//! ```
//!
//! Writes `strata.svg`, `rivers.svg` and `layout.json` into the output
//! directory (default: current directory).
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter directives, e.g. `atlas_rust=debug` (default: info)
//! - `ATLAS_WIDTH`: Surface width in pixels (default: 1200)

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use atlas_rust::config::AtlasConfig;
use atlas_rust::core::domain::LayoutResult;
use atlas_rust::io::DatasetLoader;
use atlas_rust::render::SvgSurface;
use atlas_rust::view::{AlertPresenter, AtlasApp, ViewKind, ViewStatus};

#[derive(Serialize)]
struct LayoutExport<'a> {
    strata: Option<&'a LayoutResult>,
    rivers: Option<&'a LayoutResult>,
}

fn file_name(kind: ViewKind) -> &'static str {
    match kind {
        ViewKind::Strata => "strata.svg",
        ViewKind::Rivers => "rivers.svg",
    }
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        error!("Unexpected failure: {}", info);
        eprintln!("Se ha producido un error inesperado. Consulte el registro para más detalles.");
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();
    install_panic_hook();

    let args: Vec<String> = env::args().collect();
    let data_path = args
        .get(1)
        .map(PathBuf::from)
        .context("usage: atlas-render <data.csv> [out_dir] [config.toml]")?;
    let out_dir = args.get(2).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let config = match args.get(3) {
        Some(path) => AtlasConfig::from_file(path)?,
        None => AtlasConfig::load_default()?,
    };
    let width: f64 = env::var("ATLAS_WIDTH")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1200.0);

    info!("Loading {}", data_path.display());
    let dataset = DatasetLoader::load_from_file_async(&data_path).await?;
    if dataset.discarded > 0 {
        warn!("{} rows discarded for missing continent or culture", dataset.discarded);
    }

    let mut app = AtlasApp::new(config);
    for kind in ViewKind::ALL {
        let surface = SvgSurface::new(width, 600.0);
        if let Err(e) = app.init_view(kind, Some(surface), Box::new(AlertPresenter::logging())) {
            warn!("{:?} view unavailable: {}", kind, e);
        }
    }
    app.load_records(dataset.records)?;

    let summary = app.summary()?;
    info!(
        "{} records, {} datable, {} continents, {} regions",
        summary.total_records,
        summary.datable_records,
        summary.continent_count,
        summary.region_count
    );

    tokio::fs::create_dir_all(&out_dir)
        .await
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    for kind in ViewKind::ALL {
        let svg = match (app.view(kind), app.failed_surface(kind)) {
            (Some(view), _) => view.surface().to_svg_string(),
            (None, Some(surface)) => surface.to_svg_string(),
            (None, None) => continue,
        };
        write_output(&out_dir.join(file_name(kind)), svg).await?;
        if let ViewStatus::Failed(message) = app.status(kind) {
            warn!("{:?}: {}", kind, message);
        }
    }

    let export = LayoutExport {
        strata: app.view(ViewKind::Strata).map(|view| view.layout()),
        rivers: app.view(ViewKind::Rivers).map(|view| view.layout()),
    };
    let json = serde_json::to_string_pretty(&export).context("Failed to serialise layouts")?;
    write_output(&out_dir.join("layout.json"), json).await?;

    Ok(())
}

async fn write_output(path: &Path, content: String) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
