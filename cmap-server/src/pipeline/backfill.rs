//! Coordinate Backfill
//!
//! Fills in coordinates for rows that lack them. Rows that already carry
//! both coordinates are never touched, and nothing is resolved at all when
//! every row is complete.

use cmap_common::member::SENTINEL;
use cmap_common::{Coordinates, GeocodeStatus, MemberTable};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::geocode::CoordinateResolver;

/// Resolve missing coordinates, one lookup per distinct location
///
/// Lookups run sequentially. A failed lookup leaves the row at
/// [`SENTINEL`] with [`GeocodeStatus::Unresolved`]; blank locations are
/// marked unresolved without a lookup.
pub async fn backfill(mut table: MemberTable, resolver: &dyn CoordinateResolver) -> MemberTable {
    let pending = table.iter().filter(|m| m.needs_coordinates()).count();
    if pending == 0 {
        return table;
    }

    info!(pending, total = table.len(), "Backfilling missing coordinates");

    let mut lookups: HashMap<String, Option<Coordinates>> = HashMap::new();

    for member in table.iter_mut().filter(|m| m.needs_coordinates()) {
        let location = member.location.trim();

        let resolved = if location.is_empty() {
            None
        } else if let Some(cached) = lookups.get(location) {
            *cached
        } else {
            let result = resolver.resolve(location).await;
            lookups.insert(location.to_string(), result);
            result
        };

        match resolved {
            Some(coords) => member.set_coordinates(coords, GeocodeStatus::Resolved),
            None => {
                warn!(
                    name = %member.name,
                    location = %member.location,
                    "Location unresolved, placing member at sentinel coordinates"
                );
                member.set_coordinates(SENTINEL, GeocodeStatus::Unresolved);
            }
        }
    }

    info!(
        lookups = lookups.len(),
        unresolved = unresolved_count(&table),
        "Backfill complete"
    );

    table
}

/// Rows whose location could not be geocoded
pub fn unresolved_count(table: &MemberTable) -> usize {
    table
        .iter()
        .filter(|m| m.geocode == GeocodeStatus::Unresolved)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse_table;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedResolver {
        known: HashMap<&'static str, Coordinates>,
        calls: AtomicUsize,
    }

    impl FixedResolver {
        fn new() -> Self {
            let mut known = HashMap::new();
            known.insert("Paris, France", Coordinates::new(48.8566, 2.3522));
            known.insert("Berlin", Coordinates::new(52.52, 13.405));
            Self {
                known,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CoordinateResolver for FixedResolver {
        async fn resolve(&self, location: &str) -> Option<Coordinates> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.known.get(location).copied()
        }
    }

    #[tokio::test]
    async fn test_complete_table_is_untouched() {
        let table = parse_table(
            b"name,location,image,latitude,longitude\n\
              Alice,Paris,http://x/a.png,1.25,-3.5\n\
              Bob,Nowhere,http://x/b.png,0.1,0.2\n",
        )
        .unwrap();
        let resolver = FixedResolver::new();

        let result = backfill(table.clone(), &resolver).await;

        assert_eq!(resolver.calls(), 0);
        assert_eq!(result, table);
    }

    #[tokio::test]
    async fn test_failed_lookup_uses_sentinel() {
        let table = parse_table(
            b"name,location,image\n\
              Alice,\"Paris, France\",http://x/a.png\n\
              Bob,Unknown Nowhereville,http://x/b.png\n",
        )
        .unwrap();
        let resolver = FixedResolver::new();

        let result = backfill(table, &resolver).await;

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].latitude, Some(48.8566));
        assert_eq!(result[0].geocode, GeocodeStatus::Resolved);
        assert_eq!(result[1].coordinates(), Some(SENTINEL));
        assert_eq!(result[1].geocode, GeocodeStatus::Unresolved);
        assert_eq!(unresolved_count(&result), 1);
    }

    #[tokio::test]
    async fn test_only_incomplete_rows_are_resolved() {
        let table = parse_table(
            b"name,location,image,latitude,longitude\n\
              Alice,Berlin,http://x/a.png,10.0,20.0\n\
              Bob,Berlin,http://x/b.png,,\n\
              Carol,Berlin,http://x/c.png,5.0,\n",
        )
        .unwrap();
        let resolver = FixedResolver::new();

        let result = backfill(table, &resolver).await;

        assert_eq!(result[0].coordinates(), Some(Coordinates::new(10.0, 20.0)));
        assert_eq!(result[0].geocode, GeocodeStatus::Provided);
        assert_eq!(result[1].coordinates(), Some(Coordinates::new(52.52, 13.405)));
        assert_eq!(result[2].coordinates(), Some(Coordinates::new(52.52, 13.405)));
        // Same location looked up once per request
        assert_eq!(resolver.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_location_skips_lookup() {
        let table = parse_table(b"name,location,image\nAlice,,http://x/a.png\n").unwrap();
        let resolver = FixedResolver::new();

        let result = backfill(table, &resolver).await;

        assert_eq!(resolver.calls(), 0);
        assert_eq!(result[0].geocode, GeocodeStatus::Unresolved);
        assert_eq!(result[0].coordinates(), Some(SENTINEL));
    }

    #[tokio::test]
    async fn test_backfill_is_idempotent() {
        let table = parse_table(
            b"name,location,image\n\
              Alice,\"Paris, France\",http://x/a.png\n\
              Bob,Atlantis,http://x/b.png\n",
        )
        .unwrap();
        let resolver = FixedResolver::new();

        let once = backfill(table, &resolver).await;
        let calls_after_first = resolver.calls();
        let twice = backfill(once.clone(), &resolver).await;

        assert_eq!(once, twice);
        assert_eq!(resolver.calls(), calls_after_first);
    }
}
