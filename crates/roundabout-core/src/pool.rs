//! Connection pool facade.
//!
//! The pool (load balancer over shards/replica groups) is an external
//! collaborator; this module defines the narrow interface the coordinator
//! consumes, plus an in-memory implementation for testing and development.
//!
//! The pool enforces the at-most-one-active-round invariant itself. Owner
//! labels passed to the round operations are advisory attribution strings,
//! not lock keys; the coordinator guarantees it passes the same label to the
//! start and end of one round.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Proof that write capacity was reserved from the pool for one round.
///
/// Obtained at round start and never reused across rounds; the type is
/// deliberately not `Clone`. Constructed only by pool implementations.
#[derive(Debug)]
pub struct RoundTicket {
    label: String,
}

impl RoundTicket {
    /// Issue a ticket attributed to `label`. Pool implementations call this
    /// from `reserve_ticket`; coordinator-side code never constructs tickets.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Label the reservation was attributed to.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// One underlying connection of the pool.
pub trait PoolConnection: Send + Sync {
    /// Whether this connection has primary-side changes not yet committed.
    fn has_pending_primary_change(&self) -> bool;

    /// Whether an explicit transaction is in progress on this connection.
    fn has_explicit_transaction(&self) -> bool;
}

/// Aggregated transaction-state view and round control over all connections.
pub trait ConnectionPool: Send + Sync {
    /// Whether any round is currently registered with the pool.
    fn has_active_round(&self) -> bool;

    /// Whether the pool is ready to accept round operations at all.
    fn ready_for_round_operations(&self) -> bool;

    /// Snapshot of the underlying connections.
    fn connections(&self) -> Vec<Arc<dyn PoolConnection>>;

    /// Reserve write capacity for one round. `None` means no capacity.
    fn reserve_ticket(&self, label: &str) -> Option<RoundTicket>;

    /// Open an explicit round that `commit_pending_round` must later close.
    fn begin_round(&self, owner: &str);

    /// Flush and open minimal round state without establishing a long-lived
    /// explicit round. Used for updates that forbid an explicit round; a
    /// later `commit_pending_round` only flushes whatever accumulated.
    fn commit_as_start_round(&self, owner: &str);

    /// Commit pending round changes under `owner`.
    fn commit_pending_round(&self, owner: &str);

    /// Roll back pending round changes, whichever way the round was opened.
    fn rollback_pending_round(&self, owner: &str);
}

/// A round operation recorded by [`MemoryPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOp {
    Begin { owner: String },
    CommitAsStart { owner: String },
    Commit { owner: String },
    Rollback { owner: String },
}

/// In-memory connection with settable transaction-state flags.
#[derive(Debug, Default)]
pub struct MemoryConnection {
    pending_primary_change: AtomicBool,
    explicit_transaction: AtomicBool,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pending_primary_change(&self, pending: bool) {
        self.pending_primary_change.store(pending, Ordering::Relaxed);
    }

    pub fn set_explicit_transaction(&self, active: bool) {
        self.explicit_transaction.store(active, Ordering::Relaxed);
    }
}

impl PoolConnection for MemoryConnection {
    fn has_pending_primary_change(&self) -> bool {
        self.pending_primary_change.load(Ordering::Relaxed)
    }

    fn has_explicit_transaction(&self) -> bool {
        self.explicit_transaction.load(Ordering::Relaxed)
    }
}

/// In-memory pool for testing and development.
///
/// Tracks the single-active-round flag, issues tickets unless told not to,
/// and journals every round operation so callers can assert exact sequences.
pub struct MemoryPool {
    ready: AtomicBool,
    round_active: AtomicBool,
    deny_tickets: AtomicBool,
    tickets_issued: AtomicU64,
    connections: Mutex<Vec<Arc<MemoryConnection>>>,
    journal: Mutex<Vec<RoundOp>>,
}

impl MemoryPool {
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
            round_active: AtomicBool::new(false),
            deny_tickets: AtomicBool::new(false),
            tickets_issued: AtomicU64::new(0),
            connections: Mutex::new(Vec::new()),
            journal: Mutex::new(Vec::new()),
        }
    }

    /// Register a connection with the pool.
    pub fn add_connection(&self, conn: Arc<MemoryConnection>) {
        self.connections.lock().push(conn);
    }

    /// Make the pool report (un)readiness for round operations.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Relaxed);
    }

    /// Make `reserve_ticket` return `None`.
    pub fn set_deny_tickets(&self, deny: bool) {
        self.deny_tickets.store(deny, Ordering::Relaxed);
    }

    /// Force the active-round flag, simulating a round opened elsewhere.
    pub fn set_round_active(&self, active: bool) {
        self.round_active.store(active, Ordering::Relaxed);
    }

    /// Number of tickets handed out so far.
    pub fn tickets_issued(&self) -> u64 {
        self.tickets_issued.load(Ordering::Relaxed)
    }

    /// Copy of the recorded round operations, in call order.
    pub fn journal(&self) -> Vec<RoundOp> {
        self.journal.lock().clone()
    }

    fn record(&self, op: RoundOp) {
        self.journal.lock().push(op);
    }
}

impl Default for MemoryPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionPool for MemoryPool {
    fn has_active_round(&self) -> bool {
        self.round_active.load(Ordering::Relaxed)
    }

    fn ready_for_round_operations(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    fn connections(&self) -> Vec<Arc<dyn PoolConnection>> {
        self.connections
            .lock()
            .iter()
            .map(|c| Arc::clone(c) as Arc<dyn PoolConnection>)
            .collect()
    }

    fn reserve_ticket(&self, label: &str) -> Option<RoundTicket> {
        if self.deny_tickets.load(Ordering::Relaxed) {
            return None;
        }
        self.tickets_issued.fetch_add(1, Ordering::Relaxed);
        Some(RoundTicket::new(label))
    }

    fn begin_round(&self, owner: &str) {
        self.round_active.store(true, Ordering::Relaxed);
        self.record(RoundOp::Begin {
            owner: owner.to_string(),
        });
    }

    fn commit_as_start_round(&self, owner: &str) {
        // No long-lived round is established; the flag stays down.
        self.record(RoundOp::CommitAsStart {
            owner: owner.to_string(),
        });
    }

    fn commit_pending_round(&self, owner: &str) {
        self.round_active.store(false, Ordering::Relaxed);
        self.record(RoundOp::Commit {
            owner: owner.to_string(),
        });
    }

    fn rollback_pending_round(&self, owner: &str) {
        self.round_active.store(false, Ordering::Relaxed);
        self.record(RoundOp::Rollback {
            owner: owner.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_carries_label() {
        let pool = MemoryPool::new();
        let ticket = pool.reserve_ticket("TestUpdate::run").unwrap();
        assert_eq!(ticket.label(), "TestUpdate::run");
        assert_eq!(pool.tickets_issued(), 1);
    }

    #[test]
    fn test_denied_tickets() {
        let pool = MemoryPool::new();
        pool.set_deny_tickets(true);
        assert!(pool.reserve_ticket("x").is_none());
        assert_eq!(pool.tickets_issued(), 0);
    }

    #[test]
    fn test_begin_commit_round_toggles_active_flag() {
        let pool = MemoryPool::new();
        assert!(!pool.has_active_round());

        pool.begin_round("a");
        assert!(pool.has_active_round());

        pool.commit_pending_round("a");
        assert!(!pool.has_active_round());

        assert_eq!(
            pool.journal(),
            vec![
                RoundOp::Begin {
                    owner: "a".to_string()
                },
                RoundOp::Commit {
                    owner: "a".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_commit_as_start_leaves_no_active_round() {
        let pool = MemoryPool::new();
        pool.commit_as_start_round("b");
        assert!(!pool.has_active_round());
    }

    #[test]
    fn test_connection_flags() {
        let pool = MemoryPool::new();
        let conn = Arc::new(MemoryConnection::new());
        pool.add_connection(Arc::clone(&conn));

        let snapshot = pool.connections();
        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot[0].has_pending_primary_change());

        conn.set_pending_primary_change(true);
        assert!(snapshot[0].has_pending_primary_change());
    }
}
