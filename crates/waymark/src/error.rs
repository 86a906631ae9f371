//! Error types for Waymark operations.
//!
//! [`WaymarkError`] wraps the errors of every collaborator a sync, an edit, or
//! a play session can hit. Unresolved references and cyclic location chains are
//! not errors: they are logged and the flowchart is still built.

use thiserror::Error;

use crate::{connection::ConnectionError, play::PlayError, source, store};

/// The main error type for Waymark operations.
#[derive(Debug, Error)]
pub enum WaymarkError {
    /// The entity fetch failed; the flowchart was left unchanged.
    #[error("Fetch error: {0}")]
    Source(#[from] source::Error),

    #[error("Storage error: {0}")]
    Store(#[from] store::Error),

    /// A manual edge was refused; the flowchart was left unchanged.
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Play error: {0}")]
    Play(#[from] PlayError),
}
