//! The working flowchart: the in-memory graph that syncs replace and manual
//! edits mutate.

use log::{debug, info};

use waymark_core::{
    flowchart::{Edge, EdgeKind, FlowchartData, FlowchartDocument, Handle, NodeKind, Viewport},
    geometry::Point,
    identifier::Id,
};

use crate::connection::{ConnectionError, validate_connection};

/// Edge id role used for interactively drawn edges.
const MANUAL_ROLE: &str = "manual";

/// A named, editable flowchart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flowchart {
    document: FlowchartDocument,
}

impl Flowchart {
    pub fn new(document: FlowchartDocument) -> Self {
        Self { document }
    }

    /// Creates a flowchart with no nodes and the default viewport.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(FlowchartDocument::new(name, FlowchartData::default()))
    }

    pub fn name(&self) -> &str {
        &self.document.name
    }

    pub fn data(&self) -> &FlowchartData {
        &self.document.data
    }

    pub fn document(&self) -> &FlowchartDocument {
        &self.document
    }

    pub fn into_document(self) -> FlowchartDocument {
        self.document
    }

    /// Returns true for a brand-new flowchart, which is rebuilt from campaign
    /// data on first load.
    pub fn needs_rebuild(&self) -> bool {
        self.document.data.is_empty()
    }

    /// Replaces nodes and edges wholesale, keeping the current viewport.
    pub(crate) fn replace_graph(&mut self, data: FlowchartData) {
        let viewport = self.document.data.viewport;
        self.document.data = FlowchartData { viewport, ..data };
    }

    /// Adds a manually drawn edge.
    ///
    /// # Errors
    ///
    /// Fails without touching the graph if either endpoint is missing, the
    /// endpoints are the same node, the handles are not allowed between the
    /// two node kinds, or the same connection already exists.
    pub fn connect(
        &mut self,
        source: Id,
        source_handle: Handle,
        target: Id,
        target_handle: Handle,
    ) -> Result<&Edge, ConnectionError> {
        let data = &self.document.data;
        let source_kind = data
            .node(source)
            .ok_or_else(|| ConnectionError::UnknownNode(source.to_string()))?
            .kind();
        let target_kind = data
            .node(target)
            .ok_or_else(|| ConnectionError::UnknownNode(target.to_string()))?
            .kind();

        if source == target {
            return Err(ConnectionError::SelfConnection(source.to_string()));
        }

        validate_connection(source_kind, source_handle, target_kind, target_handle)?;

        let kind = manual_edge_kind(source_kind, source_handle, target_kind, target_handle);
        let edge = Edge::new(MANUAL_ROLE, source, source_handle, target, target_handle, kind)
            .with_id(manual_edge_id(source, source_handle, target, target_handle));

        let duplicate = data.edges.iter().any(|existing| {
            existing.id() == edge.id()
                || (existing.source() == source
                    && existing.target() == target
                    && existing.source_handle() == source_handle
                    && existing.target_handle() == target_handle)
        });
        if duplicate {
            return Err(ConnectionError::Duplicate(edge.id().to_string()));
        }

        info!(
            edge_id:% = edge.id(),
            kind:? = kind;
            "Manual edge added"
        );
        let edges = &mut self.document.data.edges;
        edges.push(edge);
        Ok(&edges[edges.len() - 1])
    }

    /// Removes the edge with the given id. Returns false if there was none.
    pub fn disconnect(&mut self, edge_id: Id) -> bool {
        let edges = &mut self.document.data.edges;
        let before = edges.len();
        edges.retain(|edge| edge.id() != edge_id);
        let removed = edges.len() != before;
        if removed {
            debug!(edge_id:% = edge_id; "Edge removed");
        }
        removed
    }

    /// Moves a node. Returns false if the node does not exist.
    pub fn move_node(&mut self, id: Id, position: Point) -> bool {
        match self
            .document
            .data
            .nodes
            .iter_mut()
            .find(|node| node.id() == id)
        {
            Some(node) => {
                node.set_position(position);
                true
            }
            None => false,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.document.data.viewport = viewport;
    }
}

/// Manual edges may join the same pair through different handles, so their
/// ids name the handles too: `manual:<source>:<handle>-><target>:<handle>`.
fn manual_edge_id(source: Id, source_handle: Handle, target: Id, target_handle: Handle) -> Id {
    Id::new(&format!(
        "{MANUAL_ROLE}:{source}:{source_handle}->{target}:{target_handle}"
    ))
}

/// Infers the semantic kind of an interactively drawn edge.
fn manual_edge_kind(
    source_kind: NodeKind,
    source_handle: Handle,
    target_kind: NodeKind,
    target_handle: Handle,
) -> EdgeKind {
    if source_handle == Handle::Bottom && target_handle == Handle::Top {
        return EdgeKind::Sequential;
    }
    match (source_kind, target_kind) {
        (NodeKind::Note, _) | (_, NodeKind::Note) => EdgeKind::NoteLink,
        (NodeKind::Encounter, NodeKind::Npc) | (NodeKind::Npc, NodeKind::Encounter) => {
            EdgeKind::EncounterNpc
        }
        _ => EdgeKind::Association,
    }
}
