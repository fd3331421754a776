//! Core domain models for the chat server.

use std::fmt;

use linechat_shared::{SocketId, time::format_rfc3339};

use super::value_object::Timestamp;

/// Snapshot of one registered connection, as shown in the participant list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Socket identity
    pub id: SocketId,
    /// Display name, or the reserved guest name while still unnamed
    pub name: String,
    /// Whether the peer has established its identity (join announced)
    pub named: bool,
    /// Timestamp when the connection was accepted
    pub connected_at: Timestamp,
}

impl Participant {
    /// Create a new participant snapshot
    pub fn new(id: SocketId, name: String, named: bool, connected_at: Timestamp) -> Self {
        Self {
            id,
            name,
            named,
            connected_at,
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.name, self.id)?;
        if !self.named {
            write!(f, ", unnamed")?;
        }
        write!(f, ", since {})", format_rfc3339(self.connected_at.value()))
    }
}

/// Sort participants the way the listing shows them: by name, then by id
pub fn sort_participants(participants: &mut [Participant]) {
    participants.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
}

/// One-line listing of participants for the server log
pub fn roster(participants: &[Participant]) -> String {
    if participants.is_empty() {
        return "(nobody)".to_string();
    }
    participants
        .iter()
        .map(Participant::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
