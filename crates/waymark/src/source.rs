//! Entity data sources.
//!
//! A sync starts by fetching the campaign's entities from an [`EntitySource`].
//! The fetch is the only fallible step before layout: when it fails the sync
//! is abandoned and the working flowchart stays untouched.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;
use thiserror::Error;

use waymark_core::entity::{CampaignEntities, CampaignId};

/// Errors raised while fetching campaign entities.
#[derive(Debug, Error)]
pub enum Error {
    #[error("campaign {0} not found")]
    UnknownCampaign(CampaignId),

    #[error("failed to read `{path}`: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed campaign snapshot `{path}`: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Returns the entities of a campaign.
///
/// Implementations may return the arrays in any order and may return empty
/// arrays; the engine copes with both.
pub trait EntitySource {
    /// Fetch a snapshot of every entity belonging to `campaign`.
    fn fetch(&self, campaign: CampaignId) -> Result<CampaignEntities, Error>;
}

/// In-memory source, mostly useful for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    campaigns: HashMap<CampaignId, CampaignEntities>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the entities of a campaign.
    pub fn insert(&mut self, campaign: CampaignId, entities: CampaignEntities) {
        self.campaigns.insert(campaign, entities);
    }

    /// Builder-style variant of [`MemorySource::insert`].
    pub fn with_campaign(mut self, campaign: CampaignId, entities: CampaignEntities) -> Self {
        self.insert(campaign, entities);
        self
    }
}

impl EntitySource for MemorySource {
    fn fetch(&self, campaign: CampaignId) -> Result<CampaignEntities, Error> {
        self.campaigns
            .get(&campaign)
            .cloned()
            .ok_or(Error::UnknownCampaign(campaign))
    }
}

/// Reads `<dir>/<campaign_id>.json` snapshots exported from the campaign datastore.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the snapshot path of a campaign.
    pub fn snapshot_path(&self, campaign: CampaignId) -> PathBuf {
        self.dir.join(format!("{campaign}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl EntitySource for JsonDirSource {
    fn fetch(&self, campaign: CampaignId) -> Result<CampaignEntities, Error> {
        let path = self.snapshot_path(campaign);
        debug!(path = path.display().to_string(); "Reading campaign snapshot");

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::UnknownCampaign(campaign));
            }
            Err(source) => return Err(Error::Io { path, source }),
        };

        serde_json::from_str(&content).map_err(|source| Error::Json { path, source })
    }
}
