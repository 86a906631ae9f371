//! Column layout engine
//!
//! Positions the start node, every location, and every NPC, encounter, and
//! note of a campaign using the deterministic column scheme described in the
//! [parent module](super).

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, warn};

use waymark_core::{
    entity::{CampaignEntities, EntityId, Location, LocationRef},
    flowchart::{Node, NodeKind},
    geometry::{Point, Size},
    identifier::Id,
};

use super::{Column, LayoutContext};
use crate::{config::LayoutConfig, linker::LocationLinker};

/// Id of the start node of a freshly created flowchart.
pub const START_NODE_ID: &str = "start";

const START_LABEL: &str = "Start";

/// Result of a layout pass.
#[derive(Debug)]
pub struct Layout {
    nodes: Vec<Node>,
    unlinked: usize,
}

impl Layout {
    /// Returns the positioned nodes in placement order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns how many nodes ended up in the unlinked column.
    pub fn unlinked(&self) -> usize {
        self.unlinked
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

/// Column layout engine.
#[derive(Debug, Default)]
pub struct Engine {
    config: LayoutConfig,
}

impl Engine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Calculate the layout of a campaign.
    ///
    /// - `sequence`: the campaign's locations in sequencer order.
    /// - `prior_start`: the start node of the graph being replaced, whose id
    ///   and label are kept.
    ///
    /// Entity ids are expected to be unique per kind.
    pub fn calculate_layout(
        &self,
        entities: &CampaignEntities,
        sequence: &[&Location],
        linker: &LocationLinker<'_>,
        prior_start: Option<&Node>,
    ) -> Layout {
        let mut ctx = LayoutContext::new(&self.config);
        let mut placed = IndexMap::<Id, Node>::new();
        let mut fallback = Vec::<Node>::new();

        let start = self.start_node(prior_start);
        self.place(&mut ctx, &mut placed, start, Column::Targets);

        for location in sequence {
            let node = self.entity_node(NodeKind::Location, location.id, &location.name);
            self.place(&mut ctx, &mut placed, node, Column::Targets);
        }

        self.place_sources(entities, sequence, linker, &mut ctx, &mut placed, &mut fallback);
        // Unlinked sources are placed before notes so notes can anchor to them.
        let mut unlinked = self.place_unlinked(&mut ctx, &mut placed, &mut fallback);
        self.place_notes(entities, &mut ctx, &mut placed, &mut fallback);
        unlinked += self.place_unlinked(&mut ctx, &mut placed, &mut fallback);

        Layout {
            nodes: placed.into_values().collect(),
            unlinked,
        }
    }

    /// Places NPCs and encounters beneath the location they belong to.
    fn place_sources(
        &self,
        entities: &CampaignEntities,
        sequence: &[&Location],
        linker: &LocationLinker<'_>,
        ctx: &mut LayoutContext,
        placed: &mut IndexMap<Id, Node>,
        fallback: &mut Vec<Node>,
    ) {
        let npcs = entities.npcs.iter().map(|npc| {
            (NodeKind::Npc, npc.id, npc.name.as_str(), npc.location.as_ref())
        });
        let encounters = entities.encounters.iter().map(|encounter| {
            (
                NodeKind::Encounter,
                encounter.id,
                encounter.title.as_str(),
                encounter.location.as_ref(),
            )
        });

        let mut groups = HashMap::<Id, Vec<Node>>::new();
        for (kind, id, label, reference) in npcs.chain(encounters) {
            let node = self.entity_node(kind, id, label);
            match linker.resolve(reference) {
                Some(location) => groups
                    .entry(NodeKind::Location.entity_node_id(location.id))
                    .or_default()
                    .push(node),
                None => {
                    log_unresolved_location(node.id(), reference);
                    fallback.push(node);
                }
            }
        }

        // Whole groups in location order, so stacks never interleave.
        for location in sequence {
            let target = NodeKind::Location.entity_node_id(location.id);
            let (Some(group), Some(target_y)) = (
                groups.remove(&target),
                placed.get(&target).map(|node| node.position().y()),
            ) else {
                continue;
            };
            for node in group {
                self.place_linked(ctx, placed, node, Column::Sources, target, target_y);
            }
        }
    }

    /// Places queued nodes in the unlinked column and returns how many there were.
    fn place_unlinked(
        &self,
        ctx: &mut LayoutContext,
        placed: &mut IndexMap<Id, Node>,
        fallback: &mut Vec<Node>,
    ) -> usize {
        let count = fallback.len();
        for node in fallback.drain(..) {
            self.place(ctx, placed, node, Column::Unlinked);
        }
        count
    }

    /// Places notes beside the first placed node they link to, which may be an
    /// unlinked NPC or encounter.
    fn place_notes(
        &self,
        entities: &CampaignEntities,
        ctx: &mut LayoutContext,
        placed: &mut IndexMap<Id, Node>,
        fallback: &mut Vec<Node>,
    ) {
        let mut groups = IndexMap::<Id, Vec<Node>>::new();
        for note in &entities.notes {
            let node = self.entity_node(NodeKind::Note, note.id, &note.title);
            let anchor = note.links.iter().find_map(|link| {
                let target = link
                    .linked_entity_type
                    .node_kind()?
                    .entity_node_id(link.linked_entity_id);
                placed.contains_key(&target).then_some(target)
            });

            match anchor {
                Some(anchor) => groups.entry(anchor).or_default().push(node),
                None => {
                    warn!(node_id:% = node.id(); "Note links to nothing on the flowchart, placing it unlinked");
                    fallback.push(node);
                }
            }
        }

        let mut anchors: Vec<(Id, f32)> = groups
            .keys()
            .filter_map(|anchor| {
                placed
                    .get(anchor)
                    .map(|node| (*anchor, node.position().y()))
            })
            .collect();
        anchors.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (anchor, anchor_y) in anchors {
            let Some(group) = groups.swap_remove(&anchor) else {
                continue;
            };
            for node in group {
                self.place_linked(ctx, placed, node, Column::Notes, anchor, anchor_y);
            }
        }
    }

    fn start_node(&self, prior_start: Option<&Node>) -> Node {
        let (id, label) = match prior_start {
            Some(prior) => {
                let mut id = prior.id();
                if NodeKind::parse_entity_node_id(&id.to_string()).is_some() {
                    warn!(node_id:% = id; "Stored start node uses an entity node id, resetting it");
                    id = Id::new(START_NODE_ID);
                } else {
                    debug!(node_id:% = id; "Reusing start node");
                }
                (id, prior.label().to_string())
            }
            None => (Id::new(START_NODE_ID), START_LABEL.to_string()),
        };
        Node::new(id, NodeKind::Start, label, self.size(NodeKind::Start))
    }

    fn entity_node(&self, kind: NodeKind, id: EntityId, label: &str) -> Node {
        Node::new(kind.entity_node_id(id), kind, label, self.size(kind))
    }

    fn size(&self, kind: NodeKind) -> Size {
        let height = match kind {
            NodeKind::Start => self.config.start_height(),
            NodeKind::Location => self.config.location_height(),
            NodeKind::Npc | NodeKind::Encounter => self.config.entity_height(),
            NodeKind::Note => self.config.note_height(),
        };
        Size::new(self.config.node_width(), height)
    }

    fn place(
        &self,
        ctx: &mut LayoutContext,
        placed: &mut IndexMap<Id, Node>,
        node: Node,
        column: Column,
    ) {
        let y = ctx.place(column, node.size().height());
        self.insert(ctx, placed, node, column, y);
    }

    fn place_linked(
        &self,
        ctx: &mut LayoutContext,
        placed: &mut IndexMap<Id, Node>,
        node: Node,
        column: Column,
        target: Id,
        target_y: f32,
    ) {
        let y = ctx.place_linked(column, target, target_y, node.size().height());
        self.insert(ctx, placed, node, column, y);
    }

    fn insert(
        &self,
        ctx: &mut LayoutContext,
        placed: &mut IndexMap<Id, Node>,
        node: Node,
        column: Column,
        y: f32,
    ) {
        let node = node
            .with_position(Point::new(column.x(&self.config), y))
            .with_z_index(ctx.next_z_index());
        placed.insert(node.id(), node);
    }
}

fn log_unresolved_location(node_id: Id, reference: Option<&LocationRef>) {
    match reference {
        Some(reference) => {
            warn!(node_id:% = node_id, reference:?; "Location reference does not resolve, placing it unlinked")
        }
        None => debug!(node_id:% = node_id; "Entity has no location, placing it unlinked"),
    }
}
