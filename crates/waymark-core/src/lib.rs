//! Waymark Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Waymark engine
//! and its front ends. It includes:
//!
//! - **Identifiers**: Interned node identifiers ([`identifier::Id`])
//! - **Geometry**: Positions, sizes, and bounds ([`geometry`] module)
//! - **Entities**: The campaign snapshot consumed by a sync ([`entity`] module)
//! - **Flowchart**: The node/edge diagram produced by a sync ([`flowchart`] module)

pub mod entity;
pub mod flowchart;
pub mod geometry;
pub mod identifier;
