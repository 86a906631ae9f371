//! Connection grammar for manually drawn edges.
//!
//! A bottom → top connection is always allowed: it expresses "this leads to
//! that" between any two nodes. Lateral right → left connections express
//! associations and are limited to the node-kind pairs listed in
//! [`LATERAL_CONNECTIONS`]. Everything else is rejected.

use thiserror::Error;

use waymark_core::flowchart::{Handle, NodeKind};

/// One allowed `(source kind, source handle, target kind, target handle)` combination.
pub type Connection = (NodeKind, Handle, NodeKind, Handle);

/// Every allowed lateral connection.
pub const LATERAL_CONNECTIONS: &[Connection] = &[
    (NodeKind::Location, Handle::Right, NodeKind::Location, Handle::Left),
    (NodeKind::Npc, Handle::Right, NodeKind::Location, Handle::Left),
    (NodeKind::Location, Handle::Right, NodeKind::Npc, Handle::Left),
    (NodeKind::Note, Handle::Right, NodeKind::Location, Handle::Left),
    (NodeKind::Location, Handle::Right, NodeKind::Note, Handle::Left),
    (NodeKind::Encounter, Handle::Right, NodeKind::Location, Handle::Left),
    (NodeKind::Location, Handle::Right, NodeKind::Encounter, Handle::Left),
    (NodeKind::Note, Handle::Right, NodeKind::Npc, Handle::Left),
    (NodeKind::Npc, Handle::Right, NodeKind::Note, Handle::Left),
    (NodeKind::Encounter, Handle::Right, NodeKind::Npc, Handle::Left),
    (NodeKind::Npc, Handle::Right, NodeKind::Encounter, Handle::Left),
    (NodeKind::Npc, Handle::Right, NodeKind::Npc, Handle::Left),
    (NodeKind::Encounter, Handle::Right, NodeKind::Note, Handle::Left),
    (NodeKind::Note, Handle::Right, NodeKind::Encounter, Handle::Left),
];

/// Reasons a manual connection is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error(
        "cannot connect {source_kind} ({source_handle}) to {target_kind} ({target_handle})"
    )]
    Disallowed {
        source_kind: NodeKind,
        source_handle: Handle,
        target_kind: NodeKind,
        target_handle: Handle,
    },

    #[error("node `{0}` does not exist")]
    UnknownNode(String),

    #[error("node `{0}` cannot be connected to itself")]
    SelfConnection(String),

    #[error("edge `{0}` already exists")]
    Duplicate(String),
}

/// Returns true if an edge with these endpoints may be drawn.
///
/// # Examples
///
/// ```
/// use waymark::connection::is_valid_connection;
/// use waymark_core::flowchart::{Handle, NodeKind};
///
/// assert!(is_valid_connection(NodeKind::Location, Handle::Right, NodeKind::Npc, Handle::Left));
/// assert!(!is_valid_connection(NodeKind::Npc, Handle::Top, NodeKind::Location, Handle::Bottom));
/// ```
pub fn is_valid_connection(
    source_kind: NodeKind,
    source_handle: Handle,
    target_kind: NodeKind,
    target_handle: Handle,
) -> bool {
    (source_handle == Handle::Bottom && target_handle == Handle::Top)
        || LATERAL_CONNECTIONS.contains(&(source_kind, source_handle, target_kind, target_handle))
}

/// Like [`is_valid_connection`], but explains a rejection.
///
/// # Errors
///
/// Returns [`ConnectionError::Disallowed`] naming the offending kinds and handles.
pub fn validate_connection(
    source_kind: NodeKind,
    source_handle: Handle,
    target_kind: NodeKind,
    target_handle: Handle,
) -> Result<(), ConnectionError> {
    if is_valid_connection(source_kind, source_handle, target_kind, target_handle) {
        Ok(())
    } else {
        Err(ConnectionError::Disallowed {
            source_kind,
            source_handle,
            target_kind,
            target_handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [NodeKind; 5] = [
        NodeKind::Start,
        NodeKind::Location,
        NodeKind::Npc,
        NodeKind::Note,
        NodeKind::Encounter,
    ];
    const HANDLES: [Handle; 4] = [Handle::Top, Handle::Bottom, Handle::Left, Handle::Right];

    #[test]
    fn test_location_to_npc_lateral() {
        assert!(is_valid_connection(
            NodeKind::Location,
            Handle::Right,
            NodeKind::Npc,
            Handle::Left
        ));
    }

    #[test]
    fn test_top_to_bottom_rejected() {
        assert!(!is_valid_connection(
            NodeKind::Npc,
            Handle::Top,
            NodeKind::Location,
            Handle::Bottom
        ));
    }

    #[test]
    fn test_vertical_always_valid() {
        for source in KINDS {
            for target in KINDS {
                assert!(is_valid_connection(source, Handle::Bottom, target, Handle::Top));
            }
        }
    }

    #[test]
    fn test_lateral_pairs_are_bidirectional() {
        for &(source, source_handle, target, target_handle) in LATERAL_CONNECTIONS {
            assert_eq!(source_handle, Handle::Right);
            assert_eq!(target_handle, Handle::Left);
            assert!(
                is_valid_connection(target, Handle::Right, source, Handle::Left),
                "{target} -> {source} should be allowed"
            );
        }
    }

    #[test]
    fn test_start_has_no_lateral_connections() {
        for kind in KINDS {
            assert!(!is_valid_connection(NodeKind::Start, Handle::Right, kind, Handle::Left));
            assert!(!is_valid_connection(kind, Handle::Right, NodeKind::Start, Handle::Left));
        }
    }

    #[test]
    fn test_note_to_note_rejected() {
        let err = validate_connection(NodeKind::Note, Handle::Right, NodeKind::Note, Handle::Left)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot connect note (right) to note (left)"
        );
    }

    #[test]
    fn test_only_listed_combinations_pass() {
        let mut allowed = 0;
        for source in KINDS {
            for source_handle in HANDLES {
                for target in KINDS {
                    for target_handle in HANDLES {
                        let vertical =
                            source_handle == Handle::Bottom && target_handle == Handle::Top;
                        if !vertical
                            && is_valid_connection(source, source_handle, target, target_handle)
                        {
                            allowed += 1;
                        }
                    }
                }
            }
        }
        assert_eq!(allowed, LATERAL_CONNECTIONS.len());
    }
}
