//! Connection registry and broadcaster.
//!
//! The registry exclusively owns every accepted [`Connection`], keyed by its
//! socket id. It knows nothing about the reactor: entries it gives back
//! (unregistered, or pruned by a failing broadcast) are "retired" and the
//! server session unsubscribes and closes them before the current
//! notification handler returns, keeping subscriptions and entries in step.

use std::{
    collections::HashMap,
    io::{Read, Write},
};

use linechat_shared::{Command, Connection, SocketId};

use crate::domain::{
    GuestNameFactory, Nickname, Participant, RegistryError, Timestamp, sort_participants,
};

/// Default maximum number of registered connections
pub const DEFAULT_CAPACITY: usize = 64;

/// One registered connection.
#[derive(Debug)]
pub struct PeerEntry<S> {
    pub connection: Connection<S>,
    /// Name reserved at registration, adopted if the peer never picks one
    pub guest_name: Nickname,
    pub connected_at: Timestamp,
}

impl<S: Read + Write> PeerEntry<S> {
    pub fn id(&self) -> SocketId {
        self.connection.id()
    }

    /// Whether the peer has a display name (its join has been announced).
    pub fn is_named(&self) -> bool {
        self.connection.display_name().is_some()
    }

    /// Display name if set, otherwise the reserved guest name.
    pub fn effective_name(&self) -> &str {
        self.connection
            .display_name()
            .unwrap_or(self.guest_name.as_str())
    }

    fn participant(&self) -> Participant {
        Participant::new(
            self.id(),
            self.effective_name().to_string(),
            self.is_named(),
            self.connected_at,
        )
    }
}

/// Entries removed from the registry whose sockets still need teardown
pub type Retired<S> = Vec<PeerEntry<S>>;

/// Outcome of one broadcast pass.
#[derive(Debug)]
pub struct BroadcastReport<S> {
    /// Number of connections the line was written to
    pub delivered: usize,
    /// Entries whose write failed; already removed from the registry
    pub pruned: Retired<S>,
}

/// Live connections keyed by socket id.
#[derive(Debug)]
pub struct ConnectionRegistry<S> {
    entries: HashMap<SocketId, PeerEntry<S>>,
    guest_names: GuestNameFactory,
    capacity: usize,
}

impl<S: Read + Write> ConnectionRegistry<S> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            guest_names: GuestNameFactory::new(),
            capacity,
        }
    }

    /// Insert an accepted connection and reserve a guest name for it.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::CapacityExceeded` when the registry is full and
    /// `RegistryError::DuplicateSocket` when the id is already present. In
    /// both cases no guest number is consumed and the connection is dropped.
    pub fn register(
        &mut self,
        connection: Connection<S>,
        connected_at: Timestamp,
    ) -> Result<Nickname, RegistryError> {
        let id = connection.id();
        if self.entries.contains_key(&id) {
            return Err(RegistryError::DuplicateSocket(id));
        }
        if self.entries.len() >= self.capacity {
            return Err(RegistryError::CapacityExceeded {
                capacity: self.capacity,
                current: self.entries.len(),
            });
        }

        let guest_name = self.guest_names.generate();
        self.entries.insert(
            id,
            PeerEntry {
                connection,
                guest_name: guest_name.clone(),
                connected_at,
            },
        );
        Ok(guest_name)
    }

    /// Remove an entry; unknown ids are a no-op.
    pub fn unregister(&mut self, id: SocketId) -> Option<PeerEntry<S>> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: SocketId) -> Option<&PeerEntry<S>> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: SocketId) -> Option<&mut PeerEntry<S>> {
        self.entries.get_mut(&id)
    }

    pub fn contains(&self, id: SocketId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Participant listing, sorted by name.
    pub fn participants(&self) -> Vec<Participant> {
        let mut participants: Vec<_> = self.entries.values().map(PeerEntry::participant).collect();
        sort_participants(&mut participants);
        participants
    }

    /// Write `command` to every open entry except `except`.
    ///
    /// An entry whose write fails is removed during the same pass and
    /// returned in the report; the failure is not an error of the broadcast
    /// itself. Entries already closing are skipped.
    pub fn broadcast(&mut self, command: &Command, except: Option<SocketId>) -> BroadcastReport<S> {
        let wire = command.to_wire();
        let mut delivered = 0;
        let pruned: Retired<S> = self
            .entries
            .extract_if(|id, entry| {
                if Some(*id) == except || !entry.connection.is_open() {
                    return false;
                }
                match entry.connection.send_wire(&wire) {
                    Ok(()) => {
                        delivered += 1;
                        false
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Dropping {} ({}) after failed write: {}",
                            id,
                            entry.effective_name(),
                            e
                        );
                        true
                    }
                }
            })
            .map(|(_, entry)| entry)
            .collect();

        tracing::debug!("Broadcast {:?} to {} connection(s)", command.encode(), delivered);
        BroadcastReport { delivered, pruned }
    }

    /// Remove every entry (server shutdown).
    pub fn drain_all(&mut self) -> Retired<S> {
        self.entries.drain().map(|(_, entry)| entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        MockStream, failing_stream, open_connection, recording_stream, sent_lines,
    };

    #[test]
    fn test_register_assigns_guest_names_in_order() {
        // テスト項目: 名前なしで登録した 2 つの接続に Guest1, Guest2 が順に割り当てられる
        // given (前提条件):
        let mut registry = ConnectionRegistry::new(DEFAULT_CAPACITY);
        let (first, _) = recording_stream();
        let (second, _) = recording_stream();

        // when (操作):
        let first_name = registry
            .register(open_connection(1, first), Timestamp::new(0))
            .unwrap();
        let second_name = registry
            .register(open_connection(2, second), Timestamp::new(0))
            .unwrap();

        // then (期待する結果):
        assert_eq!(first_name.as_str(), "Guest1");
        assert_eq!(second_name.as_str(), "Guest2");
        assert_eq!(registry.len(), 2);
        assert!(!registry.get(SocketId::new(1)).unwrap().is_named());
    }

    #[test]
    fn test_register_rejects_duplicate_socket() {
        // テスト項目: 同じソケット ID の二重登録はエラーになり、ゲスト番号も消費しない
        // given (前提条件):
        let mut registry = ConnectionRegistry::new(DEFAULT_CAPACITY);
        registry
            .register(open_connection(1, MockStream::new()), Timestamp::new(0))
            .unwrap();

        // when (操作):
        let result = registry.register(open_connection(1, MockStream::new()), Timestamp::new(0));
        let next = registry
            .register(open_connection(2, MockStream::new()), Timestamp::new(0))
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            RegistryError::DuplicateSocket(SocketId::new(1))
        );
        assert_eq!(next.as_str(), "Guest2");
    }

    #[test]
    fn test_register_capacity_exceeded() {
        // テスト項目: 上限に達したレジストリへの登録はエラーになる
        // given (前提条件):
        let mut registry = ConnectionRegistry::new(1);
        registry
            .register(open_connection(1, MockStream::new()), Timestamp::new(0))
            .unwrap();

        // when (操作):
        let result = registry.register(open_connection(2, MockStream::new()), Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            RegistryError::CapacityExceeded {
                capacity: 1,
                current: 1
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        // テスト項目: 登録解除は存在しない ID に対しては何もしない
        // given (前提条件):
        let mut registry = ConnectionRegistry::new(DEFAULT_CAPACITY);
        registry
            .register(open_connection(1, MockStream::new()), Timestamp::new(0))
            .unwrap();

        // when (操作):
        let first = registry.unregister(SocketId::new(1));
        let second = registry.unregister(SocketId::new(1));

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_broadcast_reaches_every_entry_including_sender() {
        // テスト項目: A からのチャットは A と B の両方に FROM: 行として届く
        // given (前提条件):
        let mut registry = ConnectionRegistry::new(DEFAULT_CAPACITY);
        let (a, a_sink) = recording_stream();
        let (b, b_sink) = recording_stream();
        registry.register(open_connection(1, a), Timestamp::new(0)).unwrap();
        registry.register(open_connection(2, b), Timestamp::new(0)).unwrap();
        let line = Command::IncomingChat {
            nickname: "alice".to_string(),
            text: "hi".to_string(),
        };

        // when (操作):
        let report = registry.broadcast(&line, None);

        // then (期待する結果):
        assert_eq!(report.delivered, 2);
        assert!(report.pruned.is_empty());
        assert_eq!(sent_lines(&a_sink), vec!["FROM:alice:hi"]);
        assert_eq!(sent_lines(&b_sink), vec!["FROM:alice:hi"]);
    }

    #[test]
    fn test_broadcast_except_skips_one_entry() {
        // テスト項目: except に指定した接続には送られない
        // given (前提条件):
        let mut registry = ConnectionRegistry::new(DEFAULT_CAPACITY);
        let (a, a_sink) = recording_stream();
        let (b, b_sink) = recording_stream();
        registry.register(open_connection(1, a), Timestamp::new(0)).unwrap();
        registry.register(open_connection(2, b), Timestamp::new(0)).unwrap();

        // when (操作):
        let report = registry.broadcast(&Command::info("x"), Some(SocketId::new(1)));

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert!(sent_lines(&a_sink).is_empty());
        assert_eq!(sent_lines(&b_sink), vec!["INFO:x"]);
    }

    #[test]
    fn test_broadcast_prunes_failed_connection_without_error() {
        // テスト項目: 書き込みに失敗した接続はブロードキャスト中に取り除かれ、他には届く
        // given (前提条件):
        let mut registry = ConnectionRegistry::new(DEFAULT_CAPACITY);
        let (a, a_sink) = recording_stream();
        let (c, c_sink) = recording_stream();
        registry.register(open_connection(1, a), Timestamp::new(0)).unwrap();
        registry.register(open_connection(2, failing_stream()), Timestamp::new(0)).unwrap();
        registry.register(open_connection(3, c), Timestamp::new(0)).unwrap();

        // when (操作):
        let report = registry.broadcast(&Command::info("hello"), None);

        // then (期待する結果):
        assert_eq!(report.delivered, 2);
        assert_eq!(report.pruned.len(), 1);
        assert_eq!(report.pruned[0].id(), SocketId::new(2));
        assert!(!registry.contains(SocketId::new(2)));
        assert_eq!(registry.len(), 2);
        assert_eq!(sent_lines(&a_sink), vec!["INFO:hello"]);
        assert_eq!(sent_lines(&c_sink), vec!["INFO:hello"]);
    }

    #[test]
    fn test_participants_are_sorted_and_use_guest_fallback() {
        // テスト項目: 参加者一覧は名前順で、未命名の接続はゲスト名で表示される
        // given (前提条件):
        let mut registry = ConnectionRegistry::new(DEFAULT_CAPACITY);
        registry
            .register(open_connection(1, MockStream::new()), Timestamp::new(10))
            .unwrap();
        registry
            .register(open_connection(2, MockStream::new()), Timestamp::new(20))
            .unwrap();
        registry
            .get_mut(SocketId::new(2))
            .unwrap()
            .connection
            .set_display_name("alice")
            .unwrap();

        // when (操作):
        let participants = registry.participants();

        // then (期待する結果):
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0].name, "Guest1");
        assert!(!participants[0].named);
        assert_eq!(participants[1].name, "alice");
        assert!(participants[1].named);
        assert_eq!(participants[1].connected_at, Timestamp::new(20));
    }
}
