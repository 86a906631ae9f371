//! Resolution of entity → location references.

use std::collections::HashMap;

use waymark_core::entity::{EntityId, Location, LocationRef};

/// Resolves the location an NPC or encounter refers to.
///
/// Compatibility behaviour for inconsistent source data: a reference is tried
/// as a location id first and then as a location name, compared
/// case-insensitively after trimming. When several locations share a name the
/// first one wins.
#[derive(Debug)]
pub struct LocationLinker<'a> {
    by_id: HashMap<EntityId, &'a Location>,
    by_name: HashMap<String, &'a Location>,
}

impl<'a> LocationLinker<'a> {
    pub fn new(locations: &'a [Location]) -> Self {
        let mut by_id = HashMap::with_capacity(locations.len());
        let mut by_name = HashMap::with_capacity(locations.len());

        for location in locations {
            by_id.entry(location.id).or_insert(location);
            by_name
                .entry(normalize_name(&location.name))
                .or_insert(location);
        }

        Self { by_id, by_name }
    }

    /// Returns the referenced location, or `None` if the reference is absent
    /// or matches nothing.
    pub fn resolve(&self, reference: Option<&LocationRef>) -> Option<&'a Location> {
        match reference? {
            LocationRef::Id(id) => self.by_id.get(id).copied(),
            LocationRef::Name(name) => {
                let trimmed = name.trim();
                trimmed
                    .parse::<u64>()
                    .ok()
                    .and_then(|id| self.by_id.get(&EntityId(id)).copied())
                    .or_else(|| self.by_name.get(&normalize_name(trimmed)).copied())
            }
        }
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
