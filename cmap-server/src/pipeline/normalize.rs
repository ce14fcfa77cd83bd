//! Row Normalizer
//!
//! Reads the uploaded CSV, checks the required columns, fills optional
//! columns with defaults and coerces coordinates to `f64`.

use cmap_common::member::LINKEDIN_PLACEHOLDER;
use cmap_common::{GeocodeStatus, Member, MemberTable};
use csv::ReaderBuilder;
use tracing::debug;

use super::PipelineError;

/// Columns that must be present in the header row
pub const REQUIRED_COLUMNS: [&str; 3] = ["name", "location", "image"];

/// Columns understood when present
pub const OPTIONAL_COLUMNS: [&str; 6] = [
    "title",
    "latitude",
    "longitude",
    "linkedin",
    "website",
    "updated_at",
];

/// Header plus string cells, as read from the CSV
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Read CSV bytes into a [`RawTable`]
///
/// Header names are trimmed. Short rows are accepted; their missing cells
/// read as empty.
pub fn read_csv(bytes: &[u8]) -> Result<RawTable, PipelineError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Validate and normalize a raw table into member records
///
/// Fails with [`PipelineError::Schema`] naming every missing required column.
pub fn normalize(raw: RawTable) -> Result<MemberTable, PipelineError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| raw.column(col).is_none())
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::Schema { missing });
    }

    let ignored: Vec<&str> = raw
        .headers
        .iter()
        .map(String::as_str)
        .filter(|h| !REQUIRED_COLUMNS.contains(h) && !OPTIONAL_COLUMNS.contains(h))
        .collect();
    if !ignored.is_empty() {
        debug!(?ignored, "Ignoring unknown columns");
    }

    let col = |name: &str| raw.column(name);
    let (name_idx, location_idx, image_idx) = (col("name"), col("location"), col("image"));
    let title_idx = col("title");
    let lat_idx = col("latitude");
    let lon_idx = col("longitude");
    let linkedin_idx = col("linkedin");
    let website_idx = col("website");
    let updated_idx = col("updated_at");

    let members: MemberTable = raw
        .rows
        .iter()
        .map(|row| {
            let cell = |idx: Option<usize>| {
                idx.and_then(|i| row.get(i))
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
            };

            Member {
                name: cell(name_idx).unwrap_or_default().to_string(),
                location: cell(location_idx).unwrap_or_default().to_string(),
                image: cell(image_idx).unwrap_or_default().to_string(),
                title: cell(title_idx).unwrap_or_default().to_string(),
                latitude: cell(lat_idx).and_then(parse_coordinate),
                longitude: cell(lon_idx).and_then(parse_coordinate),
                linkedin: cell(linkedin_idx)
                    .unwrap_or(LINKEDIN_PLACEHOLDER)
                    .to_string(),
                website: cell(website_idx).unwrap_or_default().to_string(),
                updated_at: cell(updated_idx).map(str::to_string),
                geocode: GeocodeStatus::Provided,
            }
        })
        .collect();

    debug!(rows = members.len(), "Normalized member table");
    Ok(members)
}

/// Read and normalize an uploaded CSV in one step
pub fn parse_table(bytes: &[u8]) -> Result<MemberTable, PipelineError> {
    normalize(read_csv(bytes)?)
}

/// Unparsable or non-finite values become missing, never zero
fn parse_coordinate(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
