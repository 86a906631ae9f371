//! Play mode: read-only traversal of a flowchart.
//!
//! A [`PlaySession`] starts at the start node and presents the flowchart as a
//! linear chooser: at every stop it offers the locations reachable through one
//! bottom → top edge, plus the NPCs, notes, and encounters associated with the
//! stop through its side handles.

use std::collections::HashSet;

use log::{debug, warn};
use thiserror::Error;

use waymark_core::{
    flowchart::{FlowchartData, Node, NodeKind},
    identifier::Id,
};

use crate::graph_index::GraphIndex;

/// Reasons a play session cannot start or continue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("the flowchart has no start node")]
    MissingStart,

    #[error("dead end: `{0}` is not on the flowchart")]
    DeadEnd(String),
}

/// Entities attached to the current stop, grouped by kind.
#[derive(Debug, Default, PartialEq)]
pub struct AssociatedEntities<'a> {
    pub npcs: Vec<&'a Node>,
    pub notes: Vec<&'a Node>,
    pub encounters: Vec<&'a Node>,
}

impl AssociatedEntities<'_> {
    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty() && self.notes.is_empty() && self.encounters.is_empty()
    }
}

/// A traversal of one flowchart.
#[derive(Debug)]
pub struct PlaySession<'a> {
    index: GraphIndex<'a>,
    /// Position of the current node in the node array.
    current: usize,
    history: Vec<Id>,
}

impl<'a> PlaySession<'a> {
    /// Starts a session at the flowchart's start node.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError::MissingStart`] if the flowchart has no start node.
    pub fn start(data: &'a FlowchartData) -> Result<Self, PlayError> {
        let start = data
            .nodes
            .iter()
            .position(|node| node.kind() == NodeKind::Start)
            .ok_or(PlayError::MissingStart)?;

        let index = GraphIndex::new(data);
        let history = vec![index.node_at(start).id()];
        debug!(start:% = history[0]; "Play session started");

        Ok(Self {
            index,
            current: start,
            history,
        })
    }

    /// Returns the node the session is currently at.
    pub fn current(&self) -> &'a Node {
        self.index.node_at(self.current)
    }

    /// Returns the ids of every visited node, the current one last.
    pub fn history(&self) -> &[Id] {
        &self.history
    }

    /// Returns the locations reachable from the current node through one
    /// bottom → top edge, in edge order.
    ///
    /// Only start and location nodes lead anywhere; from any other node the
    /// result is empty.
    pub fn next_stops(&self) -> Vec<&'a Node> {
        let current = self.current();
        if !matches!(current.kind(), NodeKind::Start | NodeKind::Location) {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        self.index
            .outgoing_edges(current.id())
            .filter(|edge| edge.is_vertical())
            .filter_map(|edge| self.index.node(edge.target()))
            .filter(|node| node.kind() == NodeKind::Location)
            .filter(|node| seen.insert(node.id()))
            .collect()
    }

    /// Returns true when the current node offers no next stop.
    pub fn is_finished(&self) -> bool {
        self.next_stops().is_empty()
    }

    /// Returns the NPCs, notes, and encounters attached to the current node
    /// through one of its side handles, in either direction.
    pub fn associated(&self) -> AssociatedEntities<'a> {
        let current = self.current().id();

        let outgoing = self
            .index
            .outgoing_edges(current)
            .filter(|edge| edge.source_handle().is_lateral())
            .map(|edge| edge.target());
        let incoming = self
            .index
            .incoming_edges(current)
            .filter(|edge| edge.target_handle().is_lateral())
            .map(|edge| edge.source());

        let mut seen = HashSet::new();
        let mut associated = AssociatedEntities::default();
        for node in outgoing
            .chain(incoming)
            .filter_map(|id| self.index.node(id))
        {
            let bucket = match node.kind() {
                NodeKind::Npc => &mut associated.npcs,
                NodeKind::Note => &mut associated.notes,
                NodeKind::Encounter => &mut associated.encounters,
                NodeKind::Start | NodeKind::Location => continue,
            };
            if seen.insert(node.id()) {
                bucket.push(node);
            }
        }
        associated
    }

    /// Moves to `target`, consuming the session.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError::DeadEnd`] if `target` is not a node of the
    /// flowchart; the session is over in that case.
    pub fn move_to(mut self, target: Id) -> Result<Self, PlayError> {
        let Some(position) = self.index.node_position(target) else {
            warn!(target:% = target; "Play session hit a dead end");
            return Err(PlayError::DeadEnd(target.to_string()));
        };

        debug!(from:% = self.current().id(), to:% = target; "Moving to next stop");
        self.current = position;
        self.history.push(target);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_core::{
        flowchart::{Edge, EdgeKind, Handle},
        geometry::Size,
    };

    fn node(id: &str, kind: NodeKind) -> Node {
        Node::new(Id::new(id), kind, id, Size::new(10.0, 10.0))
    }

    fn vertical(source: &str, target: &str) -> Edge {
        Edge::new(
            "seq",
            Id::new(source),
            Handle::Bottom,
            Id::new(target),
            Handle::Top,
            EdgeKind::Sequential,
        )
    }

    fn lateral(source: &str, target: &str, kind: EdgeKind) -> Edge {
        Edge::new(
            "assoc",
            Id::new(source),
            Handle::Right,
            Id::new(target),
            Handle::Left,
            kind,
        )
    }

    fn ids(nodes: &[&Node]) -> Vec<String> {
        nodes.iter().map(|node| node.id().to_string()).collect()
    }

    fn campaign() -> FlowchartData {
        FlowchartData {
            nodes: vec![
                node("start", NodeKind::Start),
                node("location-1", NodeKind::Location),
                node("location-2", NodeKind::Location),
                node("location-3", NodeKind::Location),
                node("npc-1", NodeKind::Npc),
                node("npc-2", NodeKind::Npc),
                node("note-1", NodeKind::Note),
                node("encounter-1", NodeKind::Encounter),
            ],
            edges: vec![
                vertical("start", "location-1"),
                vertical("location-1", "location-2"),
                vertical("location-1", "location-3"),
                vertical("location-1", "npc-1"),
                lateral("npc-1", "location-1", EdgeKind::Association),
                lateral("location-1", "npc-2", EdgeKind::Association),
                lateral("note-1", "location-1", EdgeKind::NoteLink),
                lateral("encounter-1", "location-1", EdgeKind::Association),
                lateral("encounter-1", "npc-1", EdgeKind::EncounterNpc),
                lateral("location-2", "location-1", EdgeKind::Association),
            ],
            ..FlowchartData::default()
        }
    }

    #[test]
    fn test_start_to_first_location() {
        let data = campaign();
        let session = PlaySession::start(&data).unwrap();
        assert_eq!(session.current().id(), "start");
        assert_eq!(ids(&session.next_stops()), vec!["location-1"]);

        let session = session.move_to(Id::new("location-1")).unwrap();
        assert_eq!(ids(&session.next_stops()), vec!["location-2", "location-3"]);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_associated_entities_of_location() {
        let data = campaign();
        let session = PlaySession::start(&data)
            .unwrap()
            .move_to(Id::new("location-1"))
            .unwrap();

        let associated = session.associated();
        assert_eq!(ids(&associated.npcs), vec!["npc-2", "npc-1"]);
        assert_eq!(ids(&associated.notes), vec!["note-1"]);
        assert_eq!(ids(&associated.encounters), vec!["encounter-1"]);
    }

    #[test]
    fn test_start_has_no_associations() {
        let data = campaign();
        let session = PlaySession::start(&data).unwrap();
        assert!(session.associated().is_empty());
    }

    #[test]
    fn test_non_location_nodes_lead_nowhere() {
        let data = campaign();
        let session = PlaySession::start(&data)
            .unwrap()
            .move_to(Id::new("npc-1"))
            .unwrap();
        assert!(session.next_stops().is_empty());
        assert!(session.is_finished());
    }

    #[test]
    fn test_dead_end() {
        let data = campaign();
        let session = PlaySession::start(&data).unwrap();
        let err = session.move_to(Id::new("location-404")).unwrap_err();
        assert_eq!(err, PlayError::DeadEnd("location-404".to_string()));
    }

    #[test]
    fn test_missing_start() {
        let data = FlowchartData {
            nodes: vec![node("location-1", NodeKind::Location)],
            ..FlowchartData::default()
        };
        assert_eq!(
            PlaySession::start(&data).unwrap_err(),
            PlayError::MissingStart
        );
    }

    #[test]
    fn test_duplicate_edges_yield_one_stop() {
        let mut data = campaign();
        data.edges.push(Edge::new(
            "manual",
            Id::new("start"),
            Handle::Bottom,
            Id::new("location-1"),
            Handle::Top,
            EdgeKind::Sequential,
        ));
        let session = PlaySession::start(&data).unwrap();
        assert_eq!(ids(&session.next_stops()), vec!["location-1"]);
    }
}
