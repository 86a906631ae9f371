//! Node identifiers backed by string interning.
//!
//! Flowchart node and edge ids are strings in the persisted document
//! (`"location-42"`, `"start"`), but the engine compares and hashes them on
//! every lookup. [`Id`] interns the string once and is `Copy` afterwards.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Process-wide interner shared by every [`Id`].
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> std::sync::MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Interned identifier for flowchart nodes and edges.
///
/// # Examples
///
/// ```
/// use waymark_core::identifier::Id;
///
/// let id = Id::for_entity("location", 42);
/// assert_eq!(id, "location-42");
/// assert_eq!(id, Id::new("location-42"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Interns `name`.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates the deterministic node id of a campaign entity: `<prefix>-<entity_id>`.
    pub fn for_entity(prefix: &str, entity_id: u64) -> Self {
        Self::new(&format!("{prefix}-{entity_id}"))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{str_value}")
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        interner.resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}
