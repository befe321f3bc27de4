//! # roundabout-queue
//!
//! Queue transports and enqueue dispatch for deferred updates.
//!
//! When the scheduler may not run an update inline (interactive entry point,
//! busy pool, or the update simply prefers the queue), it hands the update to
//! the [`EnqueueDispatcher`], which obtains the update's [`JobSpec`], resolves
//! the transport serving its routing domain, and pushes the job. The actual
//! queue backends (job queue servers, brokers) live behind the
//! [`QueueTransport`] trait in their own crates; this crate ships the
//! registry-backed factory and an in-memory transport for testing and
//! development.
//!
//! [`JobSpec`]: roundabout_core::JobSpec

pub mod dispatch;
pub mod error;
pub mod transport;

pub use dispatch::EnqueueDispatcher;
pub use error::{QueueError, Result};
pub use transport::{
    MemoryQueueTransport, QueueTransport, QueueTransportFactory, TransportRegistry,
};
