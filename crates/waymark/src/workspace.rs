//! Ties the entity source, the flowchart store, and the builder together.

use log::{debug, info};

use waymark_core::entity::CampaignId;

use crate::{
    FlowchartBuilder, SyncReport, error::WaymarkError, graph::Flowchart, source::EntitySource,
    store::FlowchartStore,
};

/// The sync pipeline over one entity source and one flowchart store.
#[derive(Debug)]
pub struct Workspace<S, T> {
    builder: FlowchartBuilder,
    source: S,
    store: T,
}

impl<S: EntitySource, T: FlowchartStore> Workspace<S, T> {
    pub fn new(builder: FlowchartBuilder, source: S, store: T) -> Self {
        Self {
            builder,
            source,
            store,
        }
    }

    pub fn builder(&self) -> &FlowchartBuilder {
        &self.builder
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &T {
        &self.store
    }

    /// Loads the flowchart `name`.
    ///
    /// A flowchart that was never stored, or was stored without nodes, is
    /// rebuilt from `campaign` before being returned. The rebuilt flowchart is
    /// not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, or if a rebuild is needed and the
    /// entity fetch fails.
    pub fn open(&self, name: &str, campaign: CampaignId) -> Result<Flowchart, WaymarkError> {
        let mut flowchart = match self.store.load(name)? {
            Some(document) => Flowchart::new(document),
            None => Flowchart::empty(name),
        };

        if flowchart.needs_rebuild() {
            debug!(flowchart = name; "Flowchart has no nodes, rebuilding");
            self.sync(&mut flowchart, campaign)?;
        }

        Ok(flowchart)
    }

    /// Loads the flowchart `name` as stored, without rebuilding it.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    pub fn load(&self, name: &str) -> Result<Option<Flowchart>, WaymarkError> {
        Ok(self.store.load(name)?.map(Flowchart::new))
    }

    /// Replaces the nodes and edges of `flowchart` with a fresh build from the
    /// current entities of `campaign`.
    ///
    /// Manual edits and positions are discarded; the viewport and the start
    /// node's identity are kept.
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::Source`] if the fetch fails, in which case
    /// `flowchart` is unchanged.
    pub fn sync(
        &self,
        flowchart: &mut Flowchart,
        campaign: CampaignId,
    ) -> Result<SyncReport, WaymarkError> {
        info!(campaign_id:% = campaign, flowchart = flowchart.name(); "Syncing flowchart");

        let entities = self.source.fetch(campaign)?;
        let (data, report) = self.builder.build(entities, Some(flowchart.data()));
        flowchart.replace_graph(data);

        info!(
            nodes = report.nodes,
            edges = report.edges,
            skipped_links = report.skipped_links;
            "Flowchart synced"
        );
        Ok(report)
    }

    /// Persists `flowchart` under its name.
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::Store`] if the store rejects the document.
    pub fn save(&mut self, flowchart: &Flowchart) -> Result<(), WaymarkError> {
        self.store.save(flowchart.document())?;
        debug!(flowchart = flowchart.name(); "Flowchart saved");
        Ok(())
    }
}
