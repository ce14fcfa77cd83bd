//! CSV-to-map pipeline
//!
//! raw bytes → [`normalize`] → [`backfill`] → [`render`](crate::render::render)

pub mod backfill;
pub mod normalize;

pub use backfill::{backfill, unresolved_count};
pub use normalize::{normalize, parse_table, read_csv, RawTable, OPTIONAL_COLUMNS, REQUIRED_COLUMNS};

use thiserror::Error;
use tracing::info;

use crate::geocode::CoordinateResolver;
use crate::render::{render, MapArtifact, RenderError};

/// Pipeline failure, by stage
#[derive(Debug, Error)]
pub enum PipelineError {
    /// One or more required columns absent from the header row
    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// The upload could not be read as CSV
    #[error("Error processing CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Run the full pipeline over an uploaded CSV
pub async fn generate_map(
    bytes: &[u8],
    resolver: &dyn CoordinateResolver,
) -> Result<MapArtifact, PipelineError> {
    let table = parse_table(bytes)?;
    info!(rows = table.len(), "Parsed member table");

    let table = backfill(table, resolver).await;
    let artifact = render(&table)?;

    info!(
        markers = artifact.markers.len(),
        unresolved = artifact.unresolved_count(),
        "Rendered community map"
    );
    Ok(artifact)
}
