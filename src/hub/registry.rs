//! Connection registry and broadcast fan-out.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::names::NameGenerator;

/// Outbound message as queued for a peer's writer task.
pub type Outbound = Arc<str>;

/// Identity of one accepted connection. Names may collide; ids do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Result of [`Registry::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub id: ConnectionId,
    pub name: String,
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Members in the snapshot the broadcast was taken from.
    pub recipients: usize,
    /// Messages queued for a writer.
    pub delivered: usize,
    /// Messages dropped because a peer's queue was full.
    pub dropped: usize,
    /// Peers removed because their writer is gone or they fell too far behind.
    pub evicted: usize,
}

/// A registered connection, as seen by the registry.
///
/// The registry only holds the sending half of the peer's outbox. The
/// socket itself belongs to the connection's writer task.
#[derive(Debug)]
struct Member {
    id: ConnectionId,
    name: String,
    remote: String,
    outbox: mpsc::Sender<Outbound>,
    /// Consecutive drops since the last message that fit in the queue.
    drops: AtomicU64,
}

/// The set of active connections.
pub struct Registry {
    members: RwLock<HashMap<ConnectionId, Arc<Member>>>,
    /// Mirrors `members.len()` so counts never wait on the lock.
    active_count: AtomicUsize,
    names: NameGenerator,
    max_drops: u64,
}

impl Registry {
    /// `max_drops` is how many messages in a row a peer may miss on a full
    /// queue before it is evicted.
    pub fn new(max_drops: u64) -> Self {
        Self {
            members: RwLock::new(HashMap::new()),
            active_count: AtomicUsize::new(0),
            names: NameGenerator::new(),
            max_drops,
        }
    }

    /// Adds a connection under a freshly generated display name.
    pub async fn register(&self, remote: impl Into<String>, outbox: mpsc::Sender<Outbound>) -> Registration {
        let member = Arc::new(Member {
            id: ConnectionId::new(),
            name: self.names.generate(),
            remote: remote.into(),
            outbox,
            drops: AtomicU64::new(0),
        });
        let registration = Registration {
            id: member.id,
            name: member.name.clone(),
        };

        let mut members = self.members.write().await;
        if members.insert(member.id, Arc::clone(&member)).is_none() {
            let _ = self.active_count.fetch_add(1, Ordering::Relaxed);
        }
        drop(members);

        info!(conn_id = %member.id, name = %member.name, remote = %member.remote, "Client connected");
        registration
    }

    /// Removes a connection. Returns `false` if it was not registered.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let removed = self.members.write().await.remove(&id);
        match removed {
            Some(member) => {
                let _ = self.active_count.fetch_sub(1, Ordering::Relaxed);
                info!(conn_id = %id, name = %member.name, remote = %member.remote, "Client disconnected");
                true
            }
            None => false,
        }
    }

    /// Queues `message` for every member present when the call starts.
    ///
    /// Never waits on a peer: each message goes into the peer's bounded
    /// queue or is dropped. Peers whose writer has gone, or that exceed the
    /// drop limit, are evicted.
    pub async fn broadcast(&self, message: impl Into<Outbound>) -> BroadcastReport {
        let message: Outbound = message.into();
        let snapshot: Vec<Arc<Member>> = self.members.read().await.values().cloned().collect();

        let mut report = BroadcastReport {
            recipients: snapshot.len(),
            ..BroadcastReport::default()
        };
        let mut to_remove = Vec::new();

        for member in &snapshot {
            match member.outbox.try_send(Arc::clone(&message)) {
                Ok(()) => {
                    report.delivered += 1;
                    member.drops.store(0, Ordering::Relaxed);
                }
                Err(TrySendError::Full(_)) => {
                    report.dropped += 1;
                    let drops = member.drops.fetch_add(1, Ordering::Relaxed) + 1;
                    if drops >= self.max_drops {
                        warn!(conn_id = %member.id, name = %member.name, drops, "Evicting slow client");
                        to_remove.push(member.id);
                    } else {
                        warn!(conn_id = %member.id, name = %member.name, drops, "Client queue full, message dropped");
                    }
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(conn_id = %member.id, "Client writer closed");
                    to_remove.push(member.id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut members = self.members.write().await;
            for id in &to_remove {
                if members.remove(id).is_some() {
                    let _ = self.active_count.fetch_sub(1, Ordering::Relaxed);
                    report.evicted += 1;
                }
            }
        }

        debug!(
            recipients = report.recipients,
            delivered = report.delivered,
            dropped = report.dropped,
            evicted = report.evicted,
            "Broadcast"
        );
        report
    }

    pub fn len(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.members.read().await.contains_key(&id)
    }

    /// Display names of the current members, in no particular order.
    pub async fn names(&self) -> Vec<String> {
        self.members
            .read()
            .await
            .values()
            .map(|m| m.name.clone())
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(100)
    }
}
