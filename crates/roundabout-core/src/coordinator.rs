//! Round coordinator: the begin/commit/rollback protocol around one update.
//!
//! ## Execution protocol
//!
//! ```text
//! Scheduler                      RoundCoordinator                 Pool
//!    │                                  │                           │
//!    │─── on_start(update) ────────────>│                           │
//!    │                                  │─── reserve_ticket ───────>│
//!    │                                  │<── Ticket ────────────────│
//!    │                                  │─── begin_round /          │
//!    │                                  │    commit_as_start_round >│
//!    │<── Ok ───────────────────────────│                           │
//!    │                                  │                           │
//!    │    (run the update body)         │                           │
//!    │                                  │                           │
//!    │─── on_end(update) ──────────────>│─── commit_pending_round ─>│
//!    │         — or, on failure —       │                           │
//!    │─── on_failed(update) ───────────>│─── rollback_pending_round>│
//! ```
//!
//! Strictly sequential per update: start, run, then exactly one of end or
//! failed. `on_start` re-validates the pool state and fails hard rather than
//! trusting an earlier eligibility check; nothing is opened on that path, so
//! there is never partial round state to unwind.

use crate::context::ExecutionContext;
use crate::error::{Result, TransactionError};
use crate::metrics::CoordinatorMetrics;
use crate::pool::ConnectionPool;
use crate::update::{DeferredUpdate, RoundRequirement};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// How the round around the current update was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundMode {
    /// Long-lived round the coordinator must later commit or roll back.
    Explicit,

    /// Lighter-weight commit-as-start, for updates that forbid holding an
    /// explicit round.
    Implicit,
}

/// Counters for round outcomes.
#[derive(Debug, Default)]
pub struct RoundStats {
    rounds_started: AtomicU64,
    rounds_committed: AtomicU64,
    rounds_rolled_back: AtomicU64,
}

impl RoundStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_start(&self) {
        self.rounds_started.fetch_add(1, Ordering::Relaxed);
    }

    fn record_commit(&self) {
        self.rounds_committed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_rollback(&self) {
        self.rounds_rolled_back.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rounds_started(&self) -> u64 {
        self.rounds_started.load(Ordering::Relaxed)
    }

    pub fn rounds_committed(&self) -> u64 {
        self.rounds_committed.load(Ordering::Relaxed)
    }

    pub fn rounds_rolled_back(&self) -> u64 {
        self.rounds_rolled_back.load(Ordering::Relaxed)
    }
}

/// Snapshot of round stats for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundStatsSnapshot {
    pub rounds_started: u64,
    pub rounds_committed: u64,
    pub rounds_rolled_back: u64,
}

impl From<&RoundStats> for RoundStatsSnapshot {
    fn from(stats: &RoundStats) -> Self {
        Self {
            rounds_started: stats.rounds_started(),
            rounds_committed: stats.rounds_committed(),
            rounds_rolled_back: stats.rounds_rolled_back(),
        }
    }
}

/// Owns the transaction-round protocol around a single update's execution.
///
/// Dependencies are constructor-injected; the coordinator holds no global
/// state and re-reads the pool on every call.
pub struct RoundCoordinator {
    pool: Arc<dyn ConnectionPool>,
    context: ExecutionContext,
    stats: RoundStats,
}

impl RoundCoordinator {
    pub fn new(pool: Arc<dyn ConnectionPool>, context: ExecutionContext) -> Self {
        Self {
            pool,
            context,
            stats: RoundStats::new(),
        }
    }

    /// Open a transaction round for `update`.
    ///
    /// Reserves write capacity, attaches the ticket when the update can hold
    /// one, and opens the round in the mode the update's declared requirement
    /// selects. On error nothing was opened and the update body must not run.
    pub fn on_start(&self, update: &mut dyn DeferredUpdate) -> Result<()> {
        CoordinatorMetrics::increment_updates_started(
            self.context.method_label(),
            &kind_label(update),
        );

        let owner = owner_label(update);

        // Reserve capacity and re-validate the round invariant. The earlier
        // eligibility answer may have gone stale; this check is the
        // authoritative one.
        let Some(ticket) = self.pool.reserve_ticket(&owner) else {
            return Err(TransactionError::TicketUnavailable { owner });
        };
        if self.pool.has_active_round() {
            return Err(TransactionError::RoundAlreadyActive { owner });
        }

        let mut ticket = Some(ticket);
        if let Some(slot) = update.ticket_slot() {
            *slot = ticket.take();
        }

        let mode = match update.round_requirement() {
            Some(RoundRequirement::Forbidden) => RoundMode::Implicit,
            // No declared requirement defaults to requiring a round.
            Some(RoundRequirement::Required) | None => RoundMode::Explicit,
        };
        match mode {
            RoundMode::Explicit => self.pool.begin_round(&owner),
            RoundMode::Implicit => self.pool.commit_as_start_round(&owner),
        }

        self.stats.record_start();
        tracing::debug!(owner = %owner, ?mode, "opened transaction round");
        Ok(())
    }

    /// Commit the round after the update body finished without error.
    /// Exactly once per successful execution, never after `on_failed`.
    pub fn on_end(&self, update: &dyn DeferredUpdate) {
        let owner = owner_label(update);
        self.pool.commit_pending_round(&owner);
        self.stats.record_commit();
        CoordinatorMetrics::increment_rounds_committed();
        tracing::debug!(owner = %owner, "committed transaction round");
    }

    /// Roll back the round after the update body failed. Unconditional,
    /// whichever mode the round was opened in; never after `on_end`.
    pub fn on_failed(&self, update: &dyn DeferredUpdate) {
        let owner = owner_label(update);
        self.pool.rollback_pending_round(&owner);
        self.stats.record_rollback();
        CoordinatorMetrics::increment_rounds_rolled_back();
        tracing::warn!(owner = %owner, "rolled back transaction round");
    }

    /// Round outcome counters.
    pub fn stats(&self) -> &RoundStats {
        &self.stats
    }
}

/// Diagnostic string attributing a round to its update. Must be identical
/// between the start and end of one round; `on_end`/`on_failed` recompute it
/// from the same inputs.
fn owner_label(update: &dyn DeferredUpdate) -> String {
    match update.origin() {
        Some(origin) => origin.to_string(),
        None => format!("{}::run", update.type_tag()),
    }
}

/// Metric label for the update kind: the type tag, suffixed with the origin
/// when the update carries one.
fn kind_label(update: &dyn DeferredUpdate) -> String {
    match update.origin() {
        Some(origin) => format!("{}_{origin}", update.type_tag()),
        None => update.type_tag().to_string(),
    }
}
