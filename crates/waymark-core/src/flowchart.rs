//! The flowchart graph: positioned nodes, handle-qualified edges, and the
//! persisted document that wraps them.
//!
//! A [`FlowchartDocument`] is stored and retrieved verbatim by the storage
//! collaborator; its JSON shape is:
//!
//! ```text
//! { "name": "...",
//!   "data": { "nodes": [...], "edges": [...], "viewport": { "x", "y", "zoom" } } }
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    entity::EntityId,
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

/// Error returned when parsing a [`NodeKind`] or [`Handle`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {what} `{value}`")]
pub struct ParseKindError {
    what: &'static str,
    value: String,
}

/// What a flowchart node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// The synthetic entry point of the adventure.
    Start,
    Location,
    Npc,
    Note,
    Encounter,
}

impl NodeKind {
    /// Returns the prefix used to build deterministic node ids for this kind.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Location => "location",
            Self::Npc => "npc",
            Self::Note => "note",
            Self::Encounter => "encounter",
        }
    }

    /// Returns the deterministic id of the node representing `entity`.
    ///
    /// ```
    /// # use waymark_core::{entity::EntityId, flowchart::NodeKind};
    /// assert_eq!(NodeKind::Npc.entity_node_id(EntityId(7)), "npc-7");
    /// ```
    pub fn entity_node_id(self, entity: EntityId) -> Id {
        Id::for_entity(self.id_prefix(), entity.0)
    }

    /// Splits an entity node id such as `npc-7` into its kind and entity.
    ///
    /// Returns `None` for any other id, including the start node's.
    ///
    /// ```
    /// # use waymark_core::{entity::EntityId, flowchart::NodeKind};
    /// assert_eq!(
    ///     NodeKind::parse_entity_node_id("npc-7"),
    ///     Some((NodeKind::Npc, EntityId(7)))
    /// );
    /// assert_eq!(NodeKind::parse_entity_node_id("start"), None);
    /// ```
    pub fn parse_entity_node_id(id: &str) -> Option<(Self, EntityId)> {
        let (prefix, entity) = id.rsplit_once('-')?;
        let kind = [Self::Location, Self::Npc, Self::Note, Self::Encounter]
            .into_iter()
            .find(|kind| kind.id_prefix() == prefix)?;
        let entity = EntityId(entity.parse().ok()?);
        (kind.entity_node_id(entity) == id).then_some((kind, entity))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id_prefix())
    }
}

impl FromStr for NodeKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "location" => Ok(Self::Location),
            "npc" => Ok(Self::Npc),
            "note" => Ok(Self::Note),
            "encounter" => Ok(Self::Encounter),
            _ => Err(ParseKindError {
                what: "node kind",
                value: s.to_string(),
            }),
        }
    }
}

/// A named connection point on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Top,
    Bottom,
    Left,
    Right,
}

impl Handle {
    /// Returns true for the side handles used by associations.
    pub fn is_lateral(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

impl FromStr for Handle {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(ParseKindError {
                what: "handle",
                value: s.to_string(),
            }),
        }
    }
}

/// Semantic role of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// One location leads to the next (also used for start → first location).
    Sequential,
    /// An NPC or encounter belongs to a location.
    Association,
    NoteLink,
    EncounterNpc,
}

impl EdgeKind {
    /// Returns the style metadata attached to edges of this kind.
    pub fn style(self) -> EdgeStyle {
        match self {
            Self::Sequential => EdgeStyle::new("#2563eb", true, false),
            Self::Association => EdgeStyle::new("#16a34a", false, true),
            Self::NoteLink => EdgeStyle::new("#ca8a04", false, true),
            Self::EncounterNpc => EdgeStyle::new("#dc2626", false, false),
        }
    }
}

/// Rendering hints carried on every edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeStyle {
    stroke: String,
    animated: bool,
    dashed: bool,
}

impl EdgeStyle {
    pub fn new(stroke: &str, animated: bool, dashed: bool) -> Self {
        Self {
            stroke: stroke.to_string(),
            animated,
            dashed,
        }
    }

    pub fn stroke(&self) -> &str {
        &self.stroke
    }

    pub fn animated(&self) -> bool {
        self.animated
    }

    pub fn dashed(&self) -> bool {
        self.dashed
    }
}

/// A positioned, typed element of the flowchart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: Id,
    kind: NodeKind,
    /// Top-left corner.
    position: Point,
    size: Size,
    label: String,
    #[serde(default)]
    z_index: u32,
}

impl Node {
    pub fn new(id: Id, kind: NodeKind, label: impl Into<String>, size: Size) -> Self {
        Self {
            id,
            kind,
            position: Point::default(),
            size,
            label: label.into(),
            z_index: 0,
        }
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn with_z_index(mut self, z_index: u32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn z_index(&self) -> u32 {
        self.z_index
    }

    /// Returns the area covered by the node.
    pub fn bounds(&self) -> Bounds {
        self.position.to_bounds(self.size)
    }
}

/// A directed, handle-qualified connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    id: Id,
    source: Id,
    target: Id,
    source_handle: Handle,
    target_handle: Handle,
    kind: EdgeKind,
    style: EdgeStyle,
}

impl Edge {
    /// Creates an edge whose id is derived from its role and endpoints:
    /// `<role>:<source>-><target>`.
    ///
    /// The same role and endpoints always produce the same id.
    pub fn new(
        role: &str,
        source: Id,
        source_handle: Handle,
        target: Id,
        target_handle: Handle,
        kind: EdgeKind,
    ) -> Self {
        Self {
            id: Id::new(&format!("{role}:{source}->{target}")),
            source,
            target,
            source_handle,
            target_handle,
            kind,
            style: kind.style(),
        }
    }

    /// Replaces the generated id.
    pub fn with_id(mut self, id: Id) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn source_handle(&self) -> Handle {
        self.source_handle
    }

    pub fn target_handle(&self) -> Handle {
        self.target_handle
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }

    /// Returns true for a bottom → top edge.
    pub fn is_vertical(&self) -> bool {
        self.source_handle == Handle::Bottom && self.target_handle == Handle::Top
    }

    /// Returns true if the edge joins `a` and `b` in either direction.
    pub fn connects(&self, a: Id, b: Id) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// Pan and zoom of the canvas showing the flowchart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// The node/edge graph of one flowchart together with its viewport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowchartData {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub viewport: Viewport,
}

impl FlowchartData {
    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node with the given id, if present.
    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Returns the first start node, if present.
    pub fn start_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|node| node.kind == NodeKind::Start)
    }
}

/// A named flowchart as persisted by the storage collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowchartDocument {
    pub name: String,
    #[serde(default)]
    pub data: FlowchartData,
}

impl FlowchartDocument {
    pub fn new(name: impl Into<String>, data: FlowchartData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}
