use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{
    cli::{create_spinner, Cli},
    diagram::DiagramOrchestrator,
    error::WindRoseError,
    geometry::MapGeometry,
    reading::DirectionNormalizer,
    render::{load_font, Palette, RoseRenderer},
    stats::WindTable,
};

/// Aggregates the observations once and writes every diagram.
pub fn generate(cli: &Cli) -> Result<Vec<PathBuf>> {
    require_file(&cli.wind)?;
    require_file(&cli.map)?;

    let normalizer = DirectionNormalizer::new();

    let bar = create_spinner("Reading wind observations...".to_string());
    let table = WindTable::load(&cli.wind, &normalizer)
        .with_context(|| format!("failed to load `{}`", cli.wind.display()))?;
    bar.finish_with_message("Wind observations aggregated");

    let geometry = MapGeometry::load(&cli.map, cli.angle)
        .with_context(|| format!("failed to load `{}`", cli.map.display()))?;
    tracing::info!(rotation = geometry.rotation(), "prepared base map");

    let renderer = RoseRenderer::new(Palette::new(), load_font(cli.font.as_deref()));
    let orchestrator = DiagramOrchestrator::new(&table, &geometry, &renderer, &cli.output_dir);

    Ok(orchestrator.run(&cli.seasons())?)
}

fn require_file(path: &Path) -> Result<(), WindRoseError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(WindRoseError::MissingInputFile {
            path: path.to_path_buf(),
        })
    }
}

// -- Tests -------------------------------------------------------------------
