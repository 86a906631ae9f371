//! Location sequencing.
//!
//! Orders locations so that every location precedes its successor, using
//! Kahn's algorithm over the successor relation. Campaign data is hand-edited
//! and frequently contains cycles; locations caught in a cycle are appended
//! after the sorted prefix in their original input order instead of being
//! rejected.

use std::collections::{HashMap, VecDeque};

use log::{debug, trace};
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
};

use waymark_core::entity::{EntityId, Location};

/// Returns `locations` in topological order of their successor relation.
///
/// Every input location appears exactly once in the output. Successors that
/// name unknown ids or the location itself do not constrain the order. Should
/// an id occur more than once, only its first occurrence is kept.
pub fn sequence_locations(locations: &[Location]) -> Vec<&Location> {
    let mut graph = DiGraph::<&Location, ()>::with_capacity(locations.len(), locations.len());
    let mut indices = HashMap::<EntityId, NodeIndex>::with_capacity(locations.len());

    for location in locations {
        if indices.contains_key(&location.id) {
            trace!(location_id = location.id.0; "Ignoring duplicate location");
            continue;
        }
        let idx = graph.add_node(location);
        indices.insert(location.id, idx);
    }

    let successors: Vec<(NodeIndex, NodeIndex)> = graph
        .node_indices()
        .filter_map(|idx| {
            let location = graph[idx];
            let next = location.next_location_id.filter(|&next| next != location.id)?;
            indices.get(&next).map(|&next_idx| (idx, next_idx))
        })
        .collect();
    for (idx, next_idx) in successors {
        graph.add_edge(idx, next_idx, ());
    }

    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|idx| graph.neighbors_directed(idx, Direction::Incoming).count())
        .collect();

    // Node indices follow insertion order, so the seed queue keeps input order.
    let mut queue: VecDeque<NodeIndex> = graph
        .node_indices()
        .filter(|idx| in_degree[idx.index()] == 0)
        .collect();

    let mut ordered = Vec::with_capacity(graph.node_count());
    let mut visited = vec![false; graph.node_count()];

    while let Some(idx) = queue.pop_front() {
        visited[idx.index()] = true;
        ordered.push(graph[idx]);

        for next in graph.neighbors_directed(idx, Direction::Outgoing) {
            in_degree[next.index()] -= 1;
            if in_degree[next.index()] == 0 {
                queue.push_back(next);
            }
        }
    }

    if ordered.len() < graph.node_count() {
        let stranded = graph.node_count() - ordered.len();
        debug!(stranded; "Location chain contains a cycle, appending in input order");

        ordered.extend(
            graph
                .node_indices()
                .filter(|idx| !visited[idx.index()])
                .map(|idx| graph[idx]),
        );
    }

    ordered
}
