//! Queue transport abstraction.
//!
//! A transport is the destination for jobs produced by updates that declined
//! inline execution. Transports are resolved by routing domain through a
//! factory; [`TransportRegistry`] is the registry-backed factory, and
//! [`MemoryQueueTransport`] an in-memory transport for testing and
//! development.

use crate::error::{QueueError, Result};
use parking_lot::{Mutex, RwLock};
use roundabout_core::JobPayload;
use std::collections::HashMap;
use std::sync::Arc;

/// Destination a job can be pushed to.
pub trait QueueTransport: Send + Sync + std::fmt::Debug {
    /// Push one job. Errors propagate unchanged; no retry here.
    fn push(&self, job: JobPayload) -> Result<()>;
}

/// Resolves the transport serving a routing domain.
pub trait QueueTransportFactory: Send + Sync {
    fn resolve(&self, domain: &str) -> Result<Arc<dyn QueueTransport>>;
}

/// Factory backed by named registrations.
#[derive(Default)]
pub struct TransportRegistry {
    transports: RwLock<HashMap<String, Arc<dyn QueueTransport>>>,
}

impl TransportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the transport serving `domain`, replacing any previous one.
    pub fn register(&self, domain: impl Into<String>, transport: Arc<dyn QueueTransport>) {
        self.transports.write().insert(domain.into(), transport);
    }
}

impl QueueTransportFactory for TransportRegistry {
    fn resolve(&self, domain: &str) -> Result<Arc<dyn QueueTransport>> {
        self.transports
            .read()
            .get(domain)
            .cloned()
            .ok_or_else(|| QueueError::UnknownDomain(domain.to_string()))
    }
}

/// In-memory transport for testing and development. Records pushed jobs in
/// order; `drain` hands them over to the caller.
#[derive(Debug, Default)]
pub struct MemoryQueueTransport {
    pushed: Mutex<Vec<JobPayload>>,
}

impl MemoryQueueTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all recorded jobs, leaving the transport empty.
    pub fn drain(&self) -> Vec<JobPayload> {
        std::mem::take(&mut *self.pushed.lock())
    }

    pub fn len(&self) -> usize {
        self.pushed.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl QueueTransport for MemoryQueueTransport {
    fn push(&self, job: JobPayload) -> Result<()> {
        self.pushed.lock().push(job);
        Ok(())
    }
}
