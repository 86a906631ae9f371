//! Configuration types for Waymark flowchart synchronization.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources; every section and field falls back to its default when
//! absent.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and storage settings.
//! - [`LayoutConfig`] - Node sizes and spacing used by the column layout engine.
//! - [`StorageConfig`] - Where entity snapshots and flowchart documents live.
//!
//! # Example
//!
//! ```
//! # use waymark::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().general_spacing(), 40.0);
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Storage configuration section.
    #[serde(default)]
    storage: StorageConfig,
}

impl AppConfig {
    /// Combines a layout and a storage section.
    pub fn new(layout: LayoutConfig, storage: StorageConfig) -> Self {
        Self { layout, storage }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the storage configuration.
    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }
}

/// Node dimensions and spacing for the column layout engine.
///
/// Column x-offsets derive from `node_width` and `column_gap` only, so the
/// horizontal placement of a node depends on nothing but its column.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    node_width: f32,
    column_gap: f32,
    /// Vertical gap between unrelated nodes in one column.
    general_spacing: f32,
    /// Vertical gap between nodes stacked beneath the same target.
    linked_spacing: f32,
    origin_y: f32,
    start_height: f32,
    location_height: f32,
    /// Height of NPC and encounter nodes.
    entity_height: f32,
    note_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 220.0,
            column_gap: 80.0,
            general_spacing: 40.0,
            linked_spacing: 16.0,
            origin_y: 0.0,
            start_height: 60.0,
            location_height: 80.0,
            entity_height: 64.0,
            note_height: 64.0,
        }
    }
}

impl LayoutConfig {
    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    pub fn column_gap(&self) -> f32 {
        self.column_gap
    }

    pub fn general_spacing(&self) -> f32 {
        self.general_spacing
    }

    pub fn linked_spacing(&self) -> f32 {
        self.linked_spacing
    }

    pub fn origin_y(&self) -> f32 {
        self.origin_y
    }

    pub fn start_height(&self) -> f32 {
        self.start_height
    }

    pub fn location_height(&self) -> f32 {
        self.location_height
    }

    pub fn entity_height(&self) -> f32 {
        self.entity_height
    }

    pub fn note_height(&self) -> f32 {
        self.note_height
    }

    /// Sets the gap between columns.
    pub fn with_column_gap(mut self, gap: f32) -> Self {
        self.column_gap = gap;
        self
    }

    /// Sets the vertical spacing between unrelated nodes.
    pub fn with_general_spacing(mut self, spacing: f32) -> Self {
        self.general_spacing = spacing;
        self
    }

    /// Sets the vertical spacing between nodes stacked beneath one target.
    pub fn with_linked_spacing(mut self, spacing: f32) -> Self {
        self.linked_spacing = spacing;
        self
    }
}

/// Locations of entity snapshots and flowchart documents on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one `<campaign_id>.json` entity snapshot per campaign.
    data_dir: PathBuf,
    /// Directory holding one `<name>.json` document per flowchart.
    flowchart_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            flowchart_dir: PathBuf::from("flowcharts"),
        }
    }
}

impl StorageConfig {
    pub fn new(data_dir: impl Into<PathBuf>, flowchart_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            flowchart_dir: flowchart_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn flowchart_dir(&self) -> &Path {
        &self.flowchart_dir
    }
}
