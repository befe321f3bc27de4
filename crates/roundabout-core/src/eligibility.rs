//! Round eligibility: may opportunistic work run right now?

use crate::config::Config;
use crate::context::ExecutionContext;
use crate::pool::ConnectionPool;
use std::sync::Arc;

/// Pure decision function over the execution context and the pool's
/// aggregated transaction state.
///
/// The answer is advisory: it may go stale the moment it is returned, since
/// the pool is shared process-wide state. Callers must still handle a
/// round-start failure from the coordinator, which re-validates.
pub struct RoundEligibility {
    pool: Arc<dyn ConnectionPool>,
    config: Config,
}

impl RoundEligibility {
    pub fn new(pool: Arc<dyn ConnectionPool>, config: Config) -> Self {
        Self { pool, config }
    }

    /// Whether a deferred update may run inline right now.
    ///
    /// False unconditionally for interactive contexts (there may be an outer
    /// request transaction to protect) and when disabled by configuration.
    /// Otherwise true only when the pool has no registered round, is ready
    /// for round operations, and no connection reports a pending primary
    /// change or an explicit transaction. No side effects.
    pub fn may_run_opportunistically(&self, ctx: &ExecutionContext) -> bool {
        if !ctx.is_batch() {
            return false;
        }
        if !self.config.opportunistic_enabled {
            tracing::debug!("opportunistic execution disabled by config");
            return false;
        }
        if self.pool.has_active_round() || !self.pool.ready_for_round_operations() {
            return false;
        }
        self.pool
            .connections()
            .iter()
            .all(|conn| !conn.has_pending_primary_change() && !conn.has_explicit_transaction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{MemoryConnection, MemoryPool};

    fn checker(pool: Arc<MemoryPool>) -> RoundEligibility {
        RoundEligibility::new(pool, Config::default())
    }

    #[test]
    fn test_interactive_context_never_eligible() {
        // Pool state is irrelevant for interactive entry points.
        let pool = Arc::new(MemoryPool::new());
        let eligibility = checker(Arc::clone(&pool));
        assert!(!eligibility.may_run_opportunistically(&ExecutionContext::interactive("GET")));

        pool.set_round_active(true);
        assert!(!eligibility.may_run_opportunistically(&ExecutionContext::interactive("POST")));
    }

    #[test]
    fn test_batch_context_with_quiet_pool_is_eligible() {
        let pool = Arc::new(MemoryPool::new());
        pool.add_connection(Arc::new(MemoryConnection::new()));
        let eligibility = checker(pool);
        assert!(eligibility.may_run_opportunistically(&ExecutionContext::Batch));
    }

    #[test]
    fn test_active_round_blocks_eligibility() {
        let pool = Arc::new(MemoryPool::new());
        pool.set_round_active(true);
        let eligibility = checker(pool);
        assert!(!eligibility.may_run_opportunistically(&ExecutionContext::Batch));
    }

    #[test]
    fn test_unready_pool_blocks_eligibility() {
        let pool = Arc::new(MemoryPool::new());
        pool.set_ready(false);
        let eligibility = checker(pool);
        assert!(!eligibility.may_run_opportunistically(&ExecutionContext::Batch));
    }

    #[test]
    fn test_pending_primary_change_blocks_eligibility() {
        let pool = Arc::new(MemoryPool::new());
        let busy = Arc::new(MemoryConnection::new());
        busy.set_pending_primary_change(true);
        pool.add_connection(Arc::new(MemoryConnection::new()));
        pool.add_connection(busy);

        let eligibility = checker(pool);
        assert!(!eligibility.may_run_opportunistically(&ExecutionContext::Batch));
    }

    #[test]
    fn test_explicit_transaction_blocks_eligibility() {
        let pool = Arc::new(MemoryPool::new());
        let busy = Arc::new(MemoryConnection::new());
        busy.set_explicit_transaction(true);
        pool.add_connection(busy);

        let eligibility = checker(pool);
        assert!(!eligibility.may_run_opportunistically(&ExecutionContext::Batch));
    }

    #[test]
    fn test_config_kill_switch() {
        let pool = Arc::new(MemoryPool::new());
        let eligibility = RoundEligibility::new(
            pool,
            Config::default().with_opportunistic_enabled(false),
        );
        assert!(!eligibility.may_run_opportunistically(&ExecutionContext::Batch));
    }
}
