use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::http::connection::{CloseReason, Connection};

/// Stable identifier for an accepted connection.
///
/// Ids are handed out in accept order and never reused, so a stale id can
/// only ever miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns every live connection.
///
/// Entries are added only by the listener and removed only through
/// [`Registry::close`] or [`Registry::close_all`].
#[derive(Default)]
pub struct Registry {
    connections: HashMap<ConnectionId, Connection>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, connection: Connection) -> ConnectionId {
        let id = ConnectionId(self.next_id);
        self.next_id += 1;
        self.connections.insert(id, connection);
        id
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn get_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(&id)
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.connections.iter().map(|(id, conn)| (*id, conn))
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Removes the connection and releases its socket and any open file.
    ///
    /// Returns false if `id` was not registered.
    pub fn close(&mut self, id: ConnectionId, reason: CloseReason) -> bool {
        match self.connections.remove(&id) {
            Some(connection) => {
                connection.close(reason);
                debug!(conn = %id, open = self.connections.len(), "Connection deregistered");
                true
            }
            None => false,
        }
    }

    /// Closes every registered connection. Returns how many were closed.
    pub fn close_all(&mut self) -> usize {
        let count = self.connections.len();
        for (_, connection) in self.connections.drain() {
            connection.close(CloseReason::Shutdown);
        }
        count
    }
}
