//! Campaign entity snapshot consumed by a flowchart sync.
//!
//! These types mirror the records returned by the campaign datastore. They are
//! read-only inputs: the engine never mutates them, and makes no assumption
//! about their ordering or referential integrity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::flowchart::NodeKind;

/// Numeric identifier of a campaign entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(pub u64);

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference from an NPC or encounter to the location it belongs to.
///
/// Source records are inconsistent: some store the location id, others store
/// the location name. A string reference is tried as an id first, then as a
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationRef {
    Id(EntityId),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: EntityId,
    pub name: String,
    /// The location that follows this one in the adventure.
    #[serde(default)]
    pub next_location_id: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub location: Option<LocationRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub location: Option<LocationRef>,
    /// NPCs taking part in the encounter.
    #[serde(default)]
    pub npc_ids: Vec<EntityId>,
}

/// Kind of entity a note link points at.
///
/// Deserialized case-insensitively from its singular name. Plural spellings
/// (`"npcs"`, `"locations"`, ...) written by older clients are accepted too.
/// Anything else is kept verbatim as [`LinkedEntityType::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinkedEntityType {
    Location,
    Npc,
    Item,
    Encounter,
    Campaign,
    Unknown(String),
}

impl LinkedEntityType {
    /// Returns the flowchart node kind that represents entities of this type.
    ///
    /// Items and campaigns never get a node, so links to them cannot resolve.
    pub fn node_kind(&self) -> Option<NodeKind> {
        match self {
            Self::Location => Some(NodeKind::Location),
            Self::Npc => Some(NodeKind::Npc),
            Self::Encounter => Some(NodeKind::Encounter),
            Self::Item | Self::Campaign | Self::Unknown(_) => None,
        }
    }
}

impl From<String> for LinkedEntityType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "location" | "locations" => Self::Location,
            "npc" | "npcs" => Self::Npc,
            "item" | "items" => Self::Item,
            "encounter" | "encounters" => Self::Encounter,
            "campaign" | "campaigns" => Self::Campaign,
            _ => Self::Unknown(value),
        }
    }
}

impl From<LinkedEntityType> for String {
    fn from(value: LinkedEntityType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for LinkedEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location => write!(f, "location"),
            Self::Npc => write!(f, "npc"),
            Self::Item => write!(f, "item"),
            Self::Encounter => write!(f, "encounter"),
            Self::Campaign => write!(f, "campaign"),
            Self::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteLink {
    pub linked_entity_type: LinkedEntityType,
    pub linked_entity_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub links: Vec<NoteLink>,
}

/// Everything a sync needs to know about one campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignEntities {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub npcs: Vec<Npc>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub encounters: Vec<Encounter>,
}

impl CampaignEntities {
    /// Returns true if the campaign has no entities at all.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
            && self.npcs.is_empty()
            && self.notes.is_empty()
            && self.encounters.is_empty()
    }
}
