//! Waymark - campaign flowcharts built from relational campaign data.
//!
//! A campaign's locations, NPCs, notes, and encounters are turned into a
//! node-and-edge flowchart: locations are ordered along their successor chain,
//! every node gets a non-overlapping position in one of four columns, and the
//! edges implied by the data are derived. The resulting graph can then be
//! edited by hand (within the rules of [`connection`]) and walked in
//! [`play`] mode.

pub mod config;
pub mod connection;
pub mod play;
pub mod source;
pub mod store;

mod edges;
mod error;
mod graph;
mod graph_index;
mod layout;
mod linker;
mod workspace;

pub use waymark_core::{entity, flowchart, geometry, identifier};

pub use error::WaymarkError;
pub use graph::Flowchart;
pub use workspace::Workspace;

use std::collections::HashSet;

use log::{debug, info, trace, warn};

use waymark_core::{
    entity::{CampaignEntities, EntityId},
    flowchart::{FlowchartData, NodeKind},
};

use config::AppConfig;
use linker::LocationLinker;

/// Counts describing one rebuilt flowchart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub nodes: usize,
    pub edges: usize,
    /// Entities placed in the unlinked column.
    pub unlinked: usize,
    /// Note links that resolved to no node.
    pub skipped_links: usize,
}

/// Builds flowcharts from campaign entity snapshots.
///
/// # Examples
///
/// ```
/// use waymark::{FlowchartBuilder, entity::{CampaignEntities, EntityId, Location}};
///
/// let entities = CampaignEntities {
///     locations: vec![Location {
///         id: EntityId(1),
///         name: "Harbor".to_string(),
///         next_location_id: None,
///     }],
///     ..CampaignEntities::default()
/// };
///
/// let (data, report) = FlowchartBuilder::default().build(entities, None);
/// assert_eq!(report.nodes, 2);
/// assert_eq!(data.edges.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlowchartBuilder {
    config: AppConfig,
}

impl FlowchartBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Lays out `entities` and derives their edges.
    ///
    /// `prior` is the graph being replaced: its start node id and label and its
    /// viewport carry over. Nothing else of it survives.
    pub fn build(
        &self,
        entities: CampaignEntities,
        prior: Option<&FlowchartData>,
    ) -> (FlowchartData, SyncReport) {
        let entities = dedup_entities(entities);

        let sequence = layout::sequence_locations(&entities.locations);
        let linker = LocationLinker::new(&entities.locations);
        debug!(locations = sequence.len(); "Locations sequenced");

        let engine = layout::Engine::new(self.config.layout().clone());
        let layout = engine.calculate_layout(
            &entities,
            &sequence,
            &linker,
            prior.and_then(FlowchartData::start_node),
        );
        let unlinked = layout.unlinked();
        let nodes = layout.into_nodes();

        let derived = edges::derive_edges(&entities, &sequence, &nodes, &linker);
        let skipped_links = derived.skipped_links();
        let edges = derived.into_edges();

        let report = SyncReport {
            nodes: nodes.len(),
            edges: edges.len(),
            unlinked,
            skipped_links,
        };
        info!(
            nodes = report.nodes,
            edges = report.edges,
            unlinked = report.unlinked;
            "Flowchart built"
        );

        let data = FlowchartData {
            nodes,
            edges,
            viewport: prior.map(|prior| prior.viewport).unwrap_or_default(),
        };
        trace!(data:?; "Built flowchart");

        (data, report)
    }
}

/// Drops every entity whose id repeats an earlier entity of the same kind.
fn dedup_entities(mut entities: CampaignEntities) -> CampaignEntities {
    dedup_by_id(NodeKind::Location, &mut entities.locations, |l| l.id);
    dedup_by_id(NodeKind::Npc, &mut entities.npcs, |n| n.id);
    dedup_by_id(NodeKind::Note, &mut entities.notes, |n| n.id);
    dedup_by_id(NodeKind::Encounter, &mut entities.encounters, |e| e.id);
    entities
}

fn dedup_by_id<T>(kind: NodeKind, items: &mut Vec<T>, key: impl Fn(&T) -> EntityId) {
    let mut seen = HashSet::with_capacity(items.len());
    items.retain(|item| {
        let id = key(item);
        let first = seen.insert(id);
        if !first {
            warn!(kind:% = kind, entity_id = id.0; "Dropping entity with duplicate id");
        }
        first
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_core::{
        entity::{Encounter, Location, LocationRef, Npc},
        flowchart::Viewport,
    };

    fn location(id: u64, next: Option<u64>) -> Location {
        Location {
            id: EntityId(id),
            name: format!("Location {id}"),
            next_location_id: next.map(EntityId),
        }
    }

    #[test]
    fn test_empty_campaign_yields_start_only() {
        let (data, report) = FlowchartBuilder::default().build(CampaignEntities::default(), None);
        assert_eq!(data.nodes.len(), 1);
        assert_eq!(data.nodes[0].kind(), NodeKind::Start);
        assert!(data.edges.is_empty());
        assert_eq!(report, SyncReport {
            nodes: 1,
            ..SyncReport::default()
        });
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let entities = CampaignEntities {
            locations: vec![location(1, None), location(1, None)],
            npcs: vec![
                Npc {
                    id: EntityId(5),
                    name: "Mira".to_string(),
                    location: Some(LocationRef::Id(EntityId(1))),
                },
                Npc {
                    id: EntityId(5),
                    name: "Mira again".to_string(),
                    location: None,
                },
            ],
            ..CampaignEntities::default()
        };

        let (data, report) = FlowchartBuilder::default().build(entities, None);
        assert_eq!(report.nodes, 3);
        assert_eq!(report.unlinked, 0);
        let npc = data.node("npc-5".into()).unwrap();
        assert_eq!(npc.label(), "Mira");
    }

    #[test]
    fn test_prior_start_and_viewport_carry_over() {
        let builder = FlowchartBuilder::default();
        let (mut prior, _) = builder.build(CampaignEntities::default(), None);
        prior.viewport = Viewport {
            x: 12.0,
            y: 34.0,
            zoom: 0.75,
        };

        let entities = CampaignEntities {
            locations: vec![location(1, None)],
            encounters: vec![Encounter {
                id: EntityId(9),
                title: "Ambush".to_string(),
                location: Some(LocationRef::Name("location 1".to_string())),
                npc_ids: Vec::new(),
            }],
            ..CampaignEntities::default()
        };
        let (data, report) = builder.build(entities, Some(&prior));

        assert_eq!(data.viewport, prior.viewport);
        assert_eq!(data.start_node().map(|node| node.id()), Some("start".into()));
        assert_eq!(report.edges, 2);
    }
}
