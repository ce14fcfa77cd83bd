//! Member record data model
//!
//! One [`Member`] per CSV row. A [`MemberTable`] keeps rows in source order,
//! which is also the marker draw order and the search index order.

use serde::Serialize;

/// Placeholder written into `linkedin` when the column or cell is empty
pub const LINKEDIN_PLACEHOLDER: &str = "#";

/// Sentinel written when a location cannot be geocoded
pub const SENTINEL: Coordinates = Coordinates {
    latitude: 0.0,
    longitude: 0.0,
};

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Where a member's coordinates came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodeStatus {
    /// Both coordinates were present and numeric in the upload
    Provided,
    /// Coordinates were filled in by the geocoder
    Resolved,
    /// Geocoding failed; coordinates hold [`SENTINEL`]
    Unresolved,
}

/// One community member (one input row)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    pub name: String,
    pub location: String,
    pub image: String,
    pub title: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub linkedin: String,
    pub website: String,
    /// Carried through untouched; nothing downstream reads it
    pub updated_at: Option<String>,
    pub geocode: GeocodeStatus,
}

impl Member {
    /// Coordinates if both halves are present
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }

    /// True if either latitude or longitude is missing
    pub fn needs_coordinates(&self) -> bool {
        self.coordinates().is_none()
    }

    pub fn set_coordinates(&mut self, coords: Coordinates, status: GeocodeStatus) {
        self.latitude = Some(coords.latitude);
        self.longitude = Some(coords.longitude);
        self.geocode = status;
    }

    /// LinkedIn URL if it is set to something other than the placeholder
    pub fn linkedin_link(&self) -> Option<&str> {
        let link = self.linkedin.trim();
        (!link.is_empty() && link != LINKEDIN_PLACEHOLDER).then_some(link)
    }

    pub fn website_link(&self) -> Option<&str> {
        let link = self.website.trim();
        (!link.is_empty() && link != LINKEDIN_PLACEHOLDER).then_some(link)
    }
}

/// Ordered member rows for one upload
pub type MemberTable = Vec<Member>;

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Member {
        Member {
            name: "Alice".to_string(),
            location: "Paris, France".to_string(),
            image: "http://x/a.png".to_string(),
            title: String::new(),
            latitude: None,
            longitude: Some(2.35),
            linkedin: LINKEDIN_PLACEHOLDER.to_string(),
            website: String::new(),
            updated_at: None,
            geocode: GeocodeStatus::Provided,
        }
    }

    #[test]
    fn test_half_coordinates_need_backfill() {
        let m = member();
        assert!(m.needs_coordinates());
        assert_eq!(m.coordinates(), None);
    }

    #[test]
    fn test_set_coordinates_records_status() {
        let mut m = member();
        m.set_coordinates(SENTINEL, GeocodeStatus::Unresolved);
        assert_eq!(m.coordinates(), Some(Coordinates::new(0.0, 0.0)));
        assert_eq!(m.geocode, GeocodeStatus::Unresolved);
    }

    #[test]
    fn test_placeholder_links_are_hidden() {
        let mut m = member();
        assert_eq!(m.linkedin_link(), None);
        assert_eq!(m.website_link(), None);

        m.linkedin = "https://linkedin.com/in/alice".to_string();
        m.website = " https://alice.dev ".to_string();
        assert_eq!(m.linkedin_link(), Some("https://linkedin.com/in/alice"));
        assert_eq!(m.website_link(), Some("https://alice.dev"));
    }
}
