//! Edge derivation.
//!
//! Computes every edge implied by the campaign's relational references, for a
//! node set produced by the layout engine. Rules apply in precedence order:
//!
//! 1. location → successor location (bottom → top, sequential)
//! 2. start → first sequenced location (bottom → top, sequential)
//! 3. NPC/encounter → its location (right → left, association)
//! 4. encounter → each NPC on its roster (right → left), unless the pair is
//!    already connected in either direction
//! 5. note → each linked entity (right → left, note-link)
//!
//! Edge ids depend only on role and endpoints, so deriving twice over the same
//! nodes yields the same edge set.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, warn};

use waymark_core::{
    entity::{CampaignEntities, Location},
    flowchart::{Edge, EdgeKind, Handle, Node, NodeKind},
    identifier::Id,
};

use crate::linker::LocationLinker;

/// Result of an edge derivation pass.
#[derive(Debug)]
pub struct DerivedEdges {
    edges: Vec<Edge>,
    skipped_links: usize,
}

impl DerivedEdges {
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns how many note links could not be resolved to a node.
    pub fn skipped_links(&self) -> usize {
        self.skipped_links
    }

    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}

/// Insertion-ordered edge collection, unique by edge id.
#[derive(Debug, Default)]
struct EdgeSet {
    edges: IndexMap<Id, Edge>,
    /// Connected node pairs, stored in both orientations.
    pairs: HashSet<(Id, Id)>,
}

impl EdgeSet {
    fn insert(&mut self, edge: Edge) {
        if self.edges.contains_key(&edge.id()) {
            return;
        }
        self.pairs.insert((edge.source(), edge.target()));
        self.pairs.insert((edge.target(), edge.source()));
        self.edges.insert(edge.id(), edge);
    }

    fn connects(&self, a: Id, b: Id) -> bool {
        self.pairs.contains(&(a, b))
    }
}

/// Derives the edges of a freshly laid out flowchart.
pub fn derive_edges(
    entities: &CampaignEntities,
    sequence: &[&Location],
    nodes: &[Node],
    linker: &LocationLinker<'_>,
) -> DerivedEdges {
    let index: IndexMap<Id, NodeKind> = nodes.iter().map(|node| (node.id(), node.kind())).collect();
    let exists = |id: &Id| index.contains_key(id);

    let mut set = EdgeSet::default();
    let mut skipped_links = 0;

    for location in sequence {
        let Some(next) = location.next_location_id else {
            continue;
        };
        if next == location.id {
            debug!(location_id = location.id.0; "Ignoring location that follows itself");
            continue;
        }
        let source = NodeKind::Location.entity_node_id(location.id);
        let target = NodeKind::Location.entity_node_id(next);
        if exists(&source) && exists(&target) {
            set.insert(sequential("seq", source, target));
        }
    }

    let start = index
        .iter()
        .find(|(_, kind)| **kind == NodeKind::Start)
        .map(|(id, _)| *id);
    if let (Some(start), Some(first)) = (start, sequence.first()) {
        let first = NodeKind::Location.entity_node_id(first.id);
        if exists(&first) {
            set.insert(sequential("start", start, first));
        }
    }

    let npcs = entities
        .npcs
        .iter()
        .map(|npc| (NodeKind::Npc.entity_node_id(npc.id), npc.location.as_ref()));
    let encounters = entities.encounters.iter().map(|encounter| {
        (
            NodeKind::Encounter.entity_node_id(encounter.id),
            encounter.location.as_ref(),
        )
    });
    for (source, reference) in npcs.chain(encounters) {
        let Some(location) = linker.resolve(reference) else {
            continue;
        };
        let target = NodeKind::Location.entity_node_id(location.id);
        if exists(&source) && exists(&target) {
            set.insert(lateral("assoc", source, target, EdgeKind::Association));
        }
    }

    for encounter in &entities.encounters {
        let source = NodeKind::Encounter.entity_node_id(encounter.id);
        if !exists(&source) {
            continue;
        }
        for &npc_id in &encounter.npc_ids {
            let target = NodeKind::Npc.entity_node_id(npc_id);
            if !exists(&target) {
                warn!(encounter:% = source, npc:% = target; "Encounter roster names a missing NPC");
                continue;
            }
            if !set.connects(source, target) {
                set.insert(lateral("roster", source, target, EdgeKind::EncounterNpc));
            }
        }
    }

    for note in &entities.notes {
        let source = NodeKind::Note.entity_node_id(note.id);
        if !exists(&source) {
            continue;
        }
        for link in &note.links {
            let target = link
                .linked_entity_type
                .node_kind()
                .map(|kind| kind.entity_node_id(link.linked_entity_id))
                .filter(|target| exists(target));

            match target {
                Some(target) => set.insert(lateral("note", source, target, EdgeKind::NoteLink)),
                None => {
                    warn!(
                        note:% = source,
                        linked_type:% = link.linked_entity_type,
                        linked_id = link.linked_entity_id.0;
                        "Skipping note link that does not resolve to a node"
                    );
                    skipped_links += 1;
                }
            }
        }
    }

    DerivedEdges {
        edges: set.edges.into_values().collect(),
        skipped_links,
    }
}

fn sequential(role: &str, source: Id, target: Id) -> Edge {
    Edge::new(
        role,
        source,
        Handle::Bottom,
        target,
        Handle::Top,
        EdgeKind::Sequential,
    )
}

fn lateral(role: &str, source: Id, target: Id, kind: EdgeKind) -> Edge {
    Edge::new(role, source, Handle::Right, target, Handle::Left, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Engine, sequence_locations};
    use waymark_core::entity::{
        Encounter, EntityId, LinkedEntityType, LocationRef, Note, NoteLink, Npc,
    };

    fn location(id: u64, next: Option<u64>) -> Location {
        Location {
            id: EntityId(id),
            name: format!("L{id}"),
            next_location_id: next.map(EntityId),
        }
    }

    fn derive(entities: &CampaignEntities) -> DerivedEdges {
        let sequence = sequence_locations(&entities.locations);
        let linker = LocationLinker::new(&entities.locations);
        let layout = Engine::default().calculate_layout(entities, &sequence, &linker, None);
        derive_edges(entities, &sequence, layout.nodes(), &linker)
    }

    fn count(edges: &[Edge], kind: EdgeKind) -> usize {
        edges.iter().filter(|edge| edge.kind() == kind).count()
    }

    fn edge_ids(edges: &[Edge]) -> Vec<String> {
        edges.iter().map(|edge| edge.id().to_string()).collect()
    }

    #[test]
    fn test_chain_yields_sequential_and_start_edges() {
        let entities = CampaignEntities {
            locations: vec![location(1, Some(2)), location(2, Some(3)), location(3, None)],
            ..CampaignEntities::default()
        };
        let derived = derive(&entities);
        let edges = derived.edges();

        assert_eq!(
            edge_ids(edges),
            vec![
                "seq:location-1->location-2",
                "seq:location-2->location-3",
                "start:start->location-1",
            ]
        );
        let location_edges = edges
            .iter()
            .filter(|edge| edge.kind() == EdgeKind::Sequential && edge.source() != "start")
            .count();
        assert_eq!(location_edges, 2);
        assert_eq!(count(edges, EdgeKind::Association), 0);
        assert!(edges.iter().all(Edge::is_vertical));
    }

    #[test]
    fn test_successor_must_exist() {
        let entities = CampaignEntities {
            locations: vec![location(1, Some(42)), location(2, Some(2))],
            ..CampaignEntities::default()
        };
        let derived = derive(&entities);
        assert_eq!(edge_ids(derived.edges()), vec!["start:start->location-1"]);
    }

    #[test]
    fn test_associations_only_for_resolved_entities() {
        let entities = CampaignEntities {
            locations: vec![location(1, None)],
            npcs: vec![
                Npc {
                    id: EntityId(7),
                    name: "Mira".to_string(),
                    location: Some(LocationRef::Name(" l1 ".to_string())),
                },
                Npc {
                    id: EntityId(8),
                    name: "Vell".to_string(),
                    location: None,
                },
            ],
            encounters: vec![Encounter {
                id: EntityId(3),
                title: "Ambush".to_string(),
                location: Some(LocationRef::Id(EntityId(1))),
                npc_ids: Vec::new(),
            }],
            ..CampaignEntities::default()
        };
        let derived = derive(&entities);
        let associations: Vec<&Edge> = derived
            .edges()
            .iter()
            .filter(|edge| edge.kind() == EdgeKind::Association)
            .collect();

        assert_eq!(associations.len(), 2);
        assert_eq!(associations[0].id(), "assoc:npc-7->location-1");
        assert_eq!(associations[0].source_handle(), Handle::Right);
        assert_eq!(associations[0].target_handle(), Handle::Left);
        assert_eq!(associations[1].id(), "assoc:encounter-3->location-1");
    }

    #[test]
    fn test_roster_edges_are_deduplicated() {
        let entities = CampaignEntities {
            npcs: vec![Npc {
                id: EntityId(7),
                name: "Mira".to_string(),
                location: None,
            }],
            encounters: vec![Encounter {
                id: EntityId(3),
                title: "Ambush".to_string(),
                location: None,
                npc_ids: vec![EntityId(7), EntityId(7), EntityId(99)],
            }],
            ..CampaignEntities::default()
        };
        let derived = derive(&entities);
        assert_eq!(
            edge_ids(derived.edges()),
            vec!["roster:encounter-3->npc-7"]
        );
    }

    #[test]
    fn test_note_link_to_present_npc() {
        let mut entities = CampaignEntities {
            npcs: vec![Npc {
                id: EntityId(7),
                name: "Mira".to_string(),
                location: None,
            }],
            notes: vec![Note {
                id: EntityId(1),
                title: "Rumours".to_string(),
                links: vec![NoteLink {
                    linked_entity_type: LinkedEntityType::from("npcs".to_string()),
                    linked_entity_id: EntityId(7),
                }],
            }],
            ..CampaignEntities::default()
        };

        let derived = derive(&entities);
        assert_eq!(count(derived.edges(), EdgeKind::NoteLink), 1);
        assert_eq!(derived.edges()[0].id(), "note:note-1->npc-7");
        assert_eq!(derived.skipped_links(), 0);

        entities.npcs.clear();
        let derived = derive(&entities);
        assert!(derived.edges().is_empty());
        assert_eq!(derived.skipped_links(), 1);
    }

    #[test]
    fn test_note_links_to_items_and_unknown_types_are_skipped() {
        let entities = CampaignEntities {
            locations: vec![location(1, None)],
            notes: vec![Note {
                id: EntityId(1),
                title: "Loot".to_string(),
                links: vec![
                    NoteLink {
                        linked_entity_type: LinkedEntityType::Item,
                        linked_entity_id: EntityId(1),
                    },
                    NoteLink {
                        linked_entity_type: LinkedEntityType::from("factions".to_string()),
                        linked_entity_id: EntityId(1),
                    },
                    NoteLink {
                        linked_entity_type: LinkedEntityType::Location,
                        linked_entity_id: EntityId(1),
                    },
                    NoteLink {
                        linked_entity_type: LinkedEntityType::Location,
                        linked_entity_id: EntityId(1),
                    },
                ],
            }],
            ..CampaignEntities::default()
        };
        let derived = derive(&entities);
        assert_eq!(count(derived.edges(), EdgeKind::NoteLink), 1);
        assert_eq!(derived.skipped_links(), 2);
    }

    #[test]
    fn test_derivation_is_repeatable() {
        let entities = CampaignEntities {
            locations: vec![location(2, Some(1)), location(1, None)],
            npcs: vec![Npc {
                id: EntityId(7),
                name: "Mira".to_string(),
                location: Some(LocationRef::Id(EntityId(1))),
            }],
            encounters: vec![Encounter {
                id: EntityId(3),
                title: "Ambush".to_string(),
                location: Some(LocationRef::Id(EntityId(2))),
                npc_ids: vec![EntityId(7)],
            }],
            ..CampaignEntities::default()
        };
        assert_eq!(derive(&entities).edges(), derive(&entities).edges());
    }
}
