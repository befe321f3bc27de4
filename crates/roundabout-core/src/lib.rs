//! # roundabout-core
//!
//! Transaction-scoped execution of deferred updates: a coordinator that
//! decides when background work may run opportunistically inside a batch
//! process, and wraps each execution in a transaction round against a sharded
//! connection pool so that either all of the update's primary-database writes
//! commit together or none do.
//!
//! ## Components
//!
//! - [`RoundEligibility`] — pure, advisory "may opportunistic work run right
//!   now?" check over the execution context and the pool's aggregated state.
//! - [`RoundCoordinator`] — the begin/commit/rollback protocol around one
//!   update's execution, choosing explicit vs implicit round mode from the
//!   update's declared requirement.
//! - [`ConnectionPool`] — the narrow facade this crate consumes; the pool
//!   itself (load balancing, shard management) is an external collaborator.
//!   [`MemoryPool`] is an in-memory implementation for testing and
//!   development.
//!
//! Enqueueing updates that declined inline execution lives in
//! `roundabout-queue`.
//!
//! ## Example
//!
//! ```rust
//! use roundabout_core::{
//!     Config, DeferredUpdate, ExecutionContext, MemoryPool, RoundCoordinator,
//!     RoundEligibility,
//! };
//! use std::sync::Arc;
//!
//! struct FlushCounters;
//!
//! impl DeferredUpdate for FlushCounters {
//!     fn type_tag(&self) -> &'static str {
//!         "FlushCounters"
//!     }
//! }
//!
//! let pool = Arc::new(MemoryPool::new());
//! let eligibility = RoundEligibility::new(pool.clone(), Config::default());
//! let coordinator = RoundCoordinator::new(pool, ExecutionContext::Batch);
//!
//! let mut update = FlushCounters;
//! if eligibility.may_run_opportunistically(&ExecutionContext::Batch) {
//!     coordinator.on_start(&mut update).unwrap();
//!     // ... run the update body; on error call on_failed instead ...
//!     coordinator.on_end(&update);
//! }
//! ```

pub mod config;
pub mod context;
pub mod coordinator;
pub mod eligibility;
pub mod error;
pub mod metrics;
pub mod pool;
pub mod update;

pub use config::Config;
pub use context::ExecutionContext;
pub use coordinator::{RoundCoordinator, RoundStats, RoundStatsSnapshot};
pub use eligibility::RoundEligibility;
pub use error::{Result, TransactionError};
pub use pool::{
    ConnectionPool, MemoryConnection, MemoryPool, PoolConnection, RoundOp, RoundTicket,
};
pub use update::{DeferredUpdate, EnqueueableUpdate, JobPayload, JobSpec, RoundRequirement};
