//! Column layout for campaign flowcharts.
//!
//! Nodes are assigned to one of four fixed columns, left to right:
//!
//! ```text
//!  Unlinked      Notes        Sources        Targets
//!  ┌──────┐    ┌──────┐      ┌──────┐       ┌───────┐
//!  │ npc  │    │ note ├─────►│ npc  ├──────►│ start │
//!  └──────┘    └──────┘      └──────┘       └───┬───┘
//!                                               ▼
//!                                           ┌────────┐
//!                                           │location│
//!                                           └────────┘
//! ```
//!
//! Placement is plain cursor arithmetic held in a [`LayoutContext`]: one Y
//! cursor per column, plus a per-target stack so that several nodes linked to
//! the same target line up beneath it.

mod columns;
mod sequencer;

pub use columns::{Engine, Layout};
pub use sequencer::sequence_locations;

use std::collections::HashMap;

use waymark_core::identifier::Id;

use crate::config::LayoutConfig;

/// A fixed horizontal lane of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Entities that reference nothing resolvable.
    Unlinked,
    Notes,
    /// NPCs and encounters linked to a location.
    Sources,
    /// The start node and every location.
    Targets,
}

impl Column {
    fn index(self) -> usize {
        match self {
            Self::Unlinked => 0,
            Self::Notes => 1,
            Self::Sources => 2,
            Self::Targets => 3,
        }
    }

    /// Returns the x-offset of the column.
    pub fn x(self, config: &LayoutConfig) -> f32 {
        self.index() as f32 * (config.node_width() + config.column_gap())
    }
}

/// Mutable placement state of a single layout pass.
///
/// Created fresh for every pass and threaded through each placement call.
#[derive(Debug)]
pub(crate) struct LayoutContext {
    cursors: [f32; 4],
    /// Next free Y beneath a target, per column.
    stacks: HashMap<(Column, Id), f32>,
    next_z_index: u32,
    general_spacing: f32,
    linked_spacing: f32,
}

impl LayoutContext {
    pub(crate) fn new(config: &LayoutConfig) -> Self {
        Self {
            cursors: [config.origin_y(); 4],
            stacks: HashMap::new(),
            next_z_index: 0,
            general_spacing: config.general_spacing(),
            linked_spacing: config.linked_spacing(),
        }
    }

    /// Returns the next free Y of a column.
    pub(crate) fn cursor(&self, column: Column) -> f32 {
        self.cursors[column.index()]
    }

    /// Places an item at the column's cursor and returns its Y.
    pub(crate) fn place(&mut self, column: Column, height: f32) -> f32 {
        let cursor = &mut self.cursors[column.index()];
        let y = *cursor;
        *cursor = y + height + self.general_spacing;
        y
    }

    /// Places an item beneath `target` and returns its Y.
    ///
    /// The first item for a target starts level with it, or lower if the
    /// column is already occupied there. Later items stack directly below
    /// their predecessor. The column cursor always ends below the stack.
    pub(crate) fn place_linked(
        &mut self,
        column: Column,
        target: Id,
        target_y: f32,
        height: f32,
    ) -> f32 {
        let y = match self.stacks.get(&(column, target)) {
            Some(&next_free) => next_free,
            None => target_y.max(self.cursor(column)),
        };
        self.stacks
            .insert((column, target), y + height + self.linked_spacing);

        let cursor = &mut self.cursors[column.index()];
        *cursor = cursor.max(y + height + self.general_spacing);
        y
    }

    /// Returns the z-index for the next placed node.
    pub(crate) fn next_z_index(&mut self) -> u32 {
        let z_index = self.next_z_index;
        self.next_z_index += 1;
        z_index
    }
}
