//! Registry of sessions waiting for their live connection.
//!
//! Page requests insert concurrently and handshakes remove concurrently, so
//! the map is a `DashMap`. A session is handed out at most once. Entries that
//! wait longer than the configured TTL are swept on insert, and a handshake
//! that finds an expired entry is treated like one for an unknown id.

use std::borrow::Borrow;
use std::fmt;
use std::time::Duration;

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use super::PendingSession;
use crate::error::ProtocolError;

/// Identifier embedded in the bootstrap script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

pub struct SessionRegistry {
    pending: DashMap<SessionId, PendingSession>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            pending: DashMap::new(),
            ttl,
        }
    }

    /// Register a freshly rendered session.
    pub fn insert(&self, session: PendingSession) {
        self.sweep();
        debug!(session = %session.id(), path = session.path(), "session registered");
        self.pending.insert(session.id().clone(), session);
    }

    /// Hand out the session for a handshake arriving on `path`.
    ///
    /// The path must be the one the page was served at. A session requested
    /// from any other path stays registered.
    pub fn take(&self, id: &str, path: &str) -> Result<PendingSession, ProtocolError> {
        if let Some((_, session)) = self.pending.remove_if(id, |_, session| session.path() == path) {
            if session.age() > self.ttl {
                session.discard();
                return Err(ProtocolError::UnknownSession(id.to_owned()));
            }
            return Ok(session);
        }

        match self.pending.get(id) {
            Some(session) => Err(ProtocolError::RouteMismatch {
                id: id.to_owned(),
                expected: session.path().to_owned(),
                got: path.to_owned(),
            }),
            None => Err(ProtocolError::UnknownSession(id.to_owned())),
        }
    }

    /// Drop every session older than the TTL.
    pub fn sweep(&self) {
        let ttl = self.ttl;
        self.pending.retain(|id, session| {
            let keep = session.age() <= ttl;
            if !keep {
                debug!(session = %id, "pending session expired");
                session.discard();
            }
            keep
        });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
