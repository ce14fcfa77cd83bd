//! Map Renderer
//!
//! Builds a [`MapArtifact`] from a backfilled member table: centroid, one
//! marker per member with an http(s) image, a name search index, and the
//! fullscreen/search controls. [`MapArtifact::to_html`] turns it into a
//! standalone Leaflet document.

pub mod popup;

use cmap_common::{Coordinates, GeocodeStatus, Member, MemberTable};
use reqwest::Url;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub use popup::{escape_html, popup_html};

/// Initial zoom level
pub const DEFAULT_ZOOM: u8 = 2;

/// Marker icon size in pixels (width, height)
pub const MARKER_SIZE: [u32; 2] = [50, 50];

/// Maximum popup width in pixels
pub const POPUP_MAX_WIDTH: u32 = 250;

pub const SEARCH_PLACEHOLDER: &str = "Search members...";

const MAP_TEMPLATE: &str = include_str!("../../ui/map.html");
const MAP_DATA_SLOT: &str = "__MAP_DATA__";

/// Rendering failure
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot render a map from an empty member table")]
    EmptyTable,

    #[error("No member has numeric coordinates; map center is undefined")]
    NoCoordinates,

    #[error("Failed to serialize map data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One member marker
#[derive(Debug, Clone, Serialize)]
pub struct MapMarker {
    pub position: Coordinates,
    pub icon_url: String,
    pub icon_size: [u32; 2],
    pub popup_html: String,
    pub popup_max_width: u32,
    pub tooltip: String,
    /// False when the position is the sentinel from a failed lookup
    pub resolved: bool,
}

/// Search index entry: member name → `[lat, lon]`
#[derive(Debug, Clone, Serialize)]
pub struct SearchEntry {
    pub name: String,
    pub loc: [f64; 2],
}

/// Fixed map controls
#[derive(Debug, Clone, Serialize)]
pub struct MapControls {
    pub fullscreen: bool,
    pub scale: bool,
    pub search_placeholder: String,
}

impl Default for MapControls {
    fn default() -> Self {
        Self {
            fullscreen: true,
            scale: true,
            search_placeholder: SEARCH_PLACEHOLDER.to_string(),
        }
    }
}

/// Rendered community map
#[derive(Debug, Clone, Serialize)]
pub struct MapArtifact {
    pub center: Coordinates,
    pub zoom: u8,
    pub member_count: usize,
    pub unresolved: usize,
    pub markers: Vec<MapMarker>,
    pub search_index: Vec<SearchEntry>,
    pub controls: MapControls,
}

impl MapArtifact {
    pub fn unresolved_count(&self) -> usize {
        self.unresolved
    }

    /// Standalone HTML document with the map data embedded
    pub fn to_html(&self) -> Result<String, RenderError> {
        // `<` escaped so member text can never close the script element
        let data = serde_json::to_string(self)?.replace('<', "\\u003c");
        Ok(MAP_TEMPLATE.replace(MAP_DATA_SLOT, &data))
    }
}

/// Render a backfilled member table
pub fn render(table: &MemberTable) -> Result<MapArtifact, RenderError> {
    if table.is_empty() {
        return Err(RenderError::EmptyTable);
    }

    let center = centroid(table).ok_or(RenderError::NoCoordinates)?;

    let markers: Vec<MapMarker> = table.iter().filter_map(build_marker).collect();

    let search_index = table
        .iter()
        .filter_map(|m| {
            m.coordinates().map(|c| SearchEntry {
                name: m.name.clone(),
                loc: [c.latitude, c.longitude],
            })
        })
        .collect();

    let skipped = table.len() - markers.len();
    if skipped > 0 {
        debug!(skipped, "Skipped members without an http(s) image or coordinates");
    }

    Ok(MapArtifact {
        center,
        zoom: DEFAULT_ZOOM,
        member_count: table.len(),
        unresolved: table
            .iter()
            .filter(|m| m.geocode == GeocodeStatus::Unresolved)
            .count(),
        markers,
        search_index,
        controls: MapControls::default(),
    })
}

/// Mean position of members with real coordinates
///
/// Sentinel rows are left out so failed lookups do not pull the view toward
/// (0, 0). If every row is a sentinel, they are all used.
pub fn centroid(table: &MemberTable) -> Option<Coordinates> {
    let resolved: Vec<Coordinates> = table
        .iter()
        .filter(|m| m.geocode != GeocodeStatus::Unresolved)
        .filter_map(Member::coordinates)
        .collect();

    if !resolved.is_empty() {
        return mean(&resolved);
    }

    let all: Vec<Coordinates> = table.iter().filter_map(Member::coordinates).collect();
    mean(&all)
}

fn mean(points: &[Coordinates]) -> Option<Coordinates> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let lat = points.iter().map(|c| c.latitude).sum::<f64>() / n;
    let lon = points.iter().map(|c| c.longitude).sum::<f64>() / n;
    Some(Coordinates::new(lat, lon))
}

fn build_marker(member: &Member) -> Option<MapMarker> {
    if !is_http_url(&member.image) {
        return None;
    }
    let position = member.coordinates()?;

    Some(MapMarker {
        position,
        icon_url: member.image.clone(),
        icon_size: MARKER_SIZE,
        popup_html: popup_html(member),
        popup_max_width: POPUP_MAX_WIDTH,
        tooltip: member.name.clone(),
        resolved: member.geocode != GeocodeStatus::Unresolved,
    })
}

/// Well-formed absolute http(s) URL with a host
pub fn is_http_url(value: &str) -> bool {
    match Url::parse(value.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}
