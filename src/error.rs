//! Error type for component tree and broadcast operations.

use color_eyre::eyre::Report;

use crate::component::Uid;
use crate::events::EventId;

/// Error type for component tree and broadcast operations.
#[derive(Debug)]
pub enum BroadcastError {
    /// A handler returned an error; the pass stopped at that component
    HandlerFault {
        uid: Uid,
        event: EventId,
        source: Report,
    },
    /// A handler table declared the same event twice
    DuplicateHandler(EventId),
    /// The requested parent is not mounted in this root
    UnknownParent(Uid),
    /// The component is not mounted in this root
    NotMounted(Uid),
    /// The component is already mounted somewhere
    AlreadyMounted(Uid),
    /// The window and external type already forward as another event
    ConflictingSubscription {
        external_type: String,
        existing: EventId,
        requested: EventId,
    },
    /// The root has been torn down
    TornDown,
}

impl std::fmt::Display for BroadcastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HandlerFault { uid, event, source } => {
                write!(f, "Handler for '{}' on {} failed: {}", event, uid, source)
            }
            Self::DuplicateHandler(id) => write!(f, "Duplicate handler for '{}'", id),
            Self::UnknownParent(uid) => write!(f, "Unknown parent: {}", uid),
            Self::NotMounted(uid) => write!(f, "Component not mounted: {}", uid),
            Self::AlreadyMounted(uid) => write!(f, "Component already mounted: {}", uid),
            Self::ConflictingSubscription {
                external_type,
                existing,
                requested,
            } => write!(
                f,
                "Native '{}' already forwards as '{}', cannot also forward as '{}'",
                external_type, existing, requested
            ),
            Self::TornDown => write!(f, "UI root has been torn down"),
        }
    }
}

impl std::error::Error for BroadcastError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HandlerFault { source, .. } => Some(&**source),
            _ => None,
        }
    }
}
