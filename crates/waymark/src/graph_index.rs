//! Read-only adjacency index over a persisted flowchart.
//!
//! Persisted flowcharts are flat node and edge arrays. Traversals need to ask
//! "which edges leave this node?" repeatedly, so [`GraphIndex`] builds the
//! id → node map and the incoming/outgoing edge lists once.
//!
//! Edges whose endpoints are missing from the node array are kept in the
//! adjacency lists; lookups of the missing endpoint simply return `None`.

use std::{collections::HashMap, marker::PhantomData};

use waymark_core::{
    flowchart::{Edge, FlowchartData, Node},
    identifier::Id,
};

/// Index of an edge in the underlying edge array.
///
/// The lifetime ties the index to the graph it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EdgeIndex<'idx>(usize, PhantomData<&'idx ()>);

impl EdgeIndex<'_> {
    fn new(index: usize) -> Self {
        EdgeIndex(index, PhantomData)
    }
}

/// Adjacency index borrowing a [`FlowchartData`].
#[derive(Debug)]
pub(crate) struct GraphIndex<'a> {
    data: &'a FlowchartData,
    nodes: HashMap<Id, usize>,
    incoming_edges: HashMap<Id, Vec<EdgeIndex<'a>>>,
    outgoing_edges: HashMap<Id, Vec<EdgeIndex<'a>>>,
}

impl<'a> GraphIndex<'a> {
    pub(crate) fn new(data: &'a FlowchartData) -> Self {
        let mut nodes = HashMap::with_capacity(data.nodes.len());
        for (idx, node) in data.nodes.iter().enumerate() {
            // First occurrence wins, mirroring `FlowchartData::node`.
            nodes.entry(node.id()).or_insert(idx);
        }

        let mut incoming_edges = HashMap::<Id, Vec<EdgeIndex<'a>>>::new();
        let mut outgoing_edges = HashMap::<Id, Vec<EdgeIndex<'a>>>::new();
        for (idx, edge) in data.edges.iter().enumerate() {
            outgoing_edges
                .entry(edge.source())
                .or_default()
                .push(EdgeIndex::new(idx));
            incoming_edges
                .entry(edge.target())
                .or_default()
                .push(EdgeIndex::new(idx));
        }

        Self {
            data,
            nodes,
            incoming_edges,
            outgoing_edges,
        }
    }

    /// Returns the position of a node in the node array.
    pub(crate) fn node_position(&self, id: Id) -> Option<usize> {
        self.nodes.get(&id).copied()
    }

    /// Returns the node with the given ID, if it exists.
    pub(crate) fn node(&self, id: Id) -> Option<&'a Node> {
        self.node_position(id).map(|idx| &self.data.nodes[idx])
    }

    /// Returns the node at a position previously returned by [`GraphIndex::node_position`].
    pub(crate) fn node_at(&self, position: usize) -> &'a Node {
        &self.data.nodes[position]
    }

    fn edge(&self, idx: EdgeIndex<'a>) -> &'a Edge {
        &self.data.edges[idx.0]
    }

    /// Returns an iterator over the edges leaving `id`, in edge array order.
    pub(crate) fn outgoing_edges(&self, id: Id) -> impl Iterator<Item = &'a Edge> + '_ {
        self.outgoing_edges
            .get(&id)
            .into_iter()
            .flatten()
            .map(|&idx| self.edge(idx))
    }

    /// Returns an iterator over the edges arriving at `id`, in edge array order.
    pub(crate) fn incoming_edges(&self, id: Id) -> impl Iterator<Item = &'a Edge> + '_ {
        self.incoming_edges
            .get(&id)
            .into_iter()
            .flatten()
            .map(|&idx| self.edge(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_core::{
        flowchart::{EdgeKind, Handle, NodeKind},
        geometry::Size,
    };

    fn node(id: &str, kind: NodeKind) -> Node {
        Node::new(Id::new(id), kind, id, Size::new(10.0, 10.0))
    }

    fn edge(source: &str, target: &str) -> Edge {
        Edge::new(
            "test",
            Id::new(source),
            Handle::Bottom,
            Id::new(target),
            Handle::Top,
            EdgeKind::Sequential,
        )
    }

    fn diamond() -> FlowchartData {
        //     top
        //    /   \
        //  left  right
        //    \   /
        //    bottom
        FlowchartData {
            nodes: vec![
                node("top", NodeKind::Start),
                node("left", NodeKind::Location),
                node("right", NodeKind::Location),
                node("bottom", NodeKind::Location),
            ],
            edges: vec![
                edge("top", "left"),
                edge("top", "right"),
                edge("left", "bottom"),
                edge("right", "bottom"),
            ],
            ..FlowchartData::default()
        }
    }

    #[test]
    fn test_edge_index_creation() {
        let idx1 = EdgeIndex::new(5);
        let idx2 = EdgeIndex::new(5);
        let idx3 = EdgeIndex::new(10);

        assert_eq!(idx1, idx2);
        assert_ne!(idx1, idx3);
        assert_eq!(idx3.0, 10);
    }

    #[test]
    fn test_node_lookup() {
        let data = diamond();
        let index = GraphIndex::new(&data);

        assert_eq!(index.node(Id::new("left")).map(Node::kind), Some(NodeKind::Location));
        assert_eq!(index.node_position(Id::new("bottom")), Some(3));
        assert!(index.node(Id::new("missing")).is_none());
        assert_eq!(index.node_at(0).id(), "top");
    }

    #[test]
    fn test_outgoing_and_incoming() {
        let data = diamond();
        let index = GraphIndex::new(&data);

        let targets: Vec<String> = index
            .outgoing_edges(Id::new("top"))
            .map(|edge| edge.target().to_string())
            .collect();
        assert_eq!(targets, vec!["left", "right"]);

        let sources: Vec<String> = index
            .incoming_edges(Id::new("bottom"))
            .map(|edge| edge.source().to_string())
            .collect();
        assert_eq!(sources, vec!["left", "right"]);

        assert_eq!(index.outgoing_edges(Id::new("bottom")).count(), 0);
        assert_eq!(index.incoming_edges(Id::new("top")).count(), 0);
    }

    #[test]
    fn test_dangling_edges_are_indexed() {
        let mut data = diamond();
        data.edges.push(edge("bottom", "ghost"));
        let index = GraphIndex::new(&data);

        let dangling: Vec<&Edge> = index.outgoing_edges(Id::new("bottom")).collect();
        assert_eq!(dangling.len(), 1);
        assert!(index.node(dangling[0].target()).is_none());
    }

    #[test]
    fn test_duplicate_node_ids_keep_first() {
        let mut data = diamond();
        data.nodes.push(node("top", NodeKind::Note));
        let index = GraphIndex::new(&data);
        assert_eq!(index.node(Id::new("top")).map(Node::kind), Some(NodeKind::Start));
    }
}
