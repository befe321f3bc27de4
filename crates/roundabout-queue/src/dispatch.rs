//! Enqueue dispatch: the fallback path for updates that declined (or were
//! refused) opportunistic inline execution.

use crate::error::Result;
use crate::transport::QueueTransportFactory;
use metrics::counter;
use roundabout_core::{EnqueueableUpdate, JobSpec};
use std::sync::Arc;

/// Converts an update into a queued job and hands it to the transport
/// serving its routing domain.
pub struct EnqueueDispatcher {
    transports: Arc<dyn QueueTransportFactory>,
}

impl EnqueueDispatcher {
    pub fn new(transports: Arc<dyn QueueTransportFactory>) -> Self {
        Self { transports }
    }

    /// Queue `update` for later out-of-process execution.
    ///
    /// Resolve and push errors propagate unchanged; no retry here.
    pub fn queue(&self, update: &dyn EnqueueableUpdate) -> Result<()> {
        let JobSpec {
            routing_domain,
            job,
        } = update.job_spec();
        let kind = job.kind.clone();

        let transport = self.transports.resolve(&routing_domain)?;
        transport.push(job)?;

        counter!(
            "roundabout_queue_jobs_pushed_total",
            "domain" => routing_domain.clone(),
            "kind" => kind.clone()
        )
        .increment(1);
        tracing::debug!(domain = %routing_domain, kind = %kind, "queued deferred update");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueueError;
    use crate::transport::{MemoryQueueTransport, TransportRegistry};
    use roundabout_core::{DeferredUpdate, JobPayload};

    struct PurgeCachesUpdate {
        domain: String,
    }

    impl DeferredUpdate for PurgeCachesUpdate {
        fn type_tag(&self) -> &'static str {
            "PurgeCachesUpdate"
        }
    }

    impl EnqueueableUpdate for PurgeCachesUpdate {
        fn job_spec(&self) -> JobSpec {
            JobSpec {
                routing_domain: self.domain.clone(),
                job: JobPayload::new("purgeCaches", serde_json::json!({"scope": "all"})),
            }
        }
    }

    #[test]
    fn test_queue_pushes_to_resolved_transport_once() {
        let registry = Arc::new(TransportRegistry::new());
        let wiki_a = Arc::new(MemoryQueueTransport::new());
        let wiki_b = Arc::new(MemoryQueueTransport::new());
        registry.register("wikiA", wiki_a.clone());
        registry.register("wikiB", wiki_b.clone());

        let dispatcher = EnqueueDispatcher::new(registry);
        let update = PurgeCachesUpdate {
            domain: "wikiA".to_string(),
        };
        dispatcher.queue(&update).unwrap();

        let jobs = wiki_a.drain();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].kind, "purgeCaches");
        assert!(wiki_b.is_empty());
    }

    #[test]
    fn test_queue_propagates_unknown_domain() {
        let dispatcher = EnqueueDispatcher::new(Arc::new(TransportRegistry::new()));
        let update = PurgeCachesUpdate {
            domain: "missing".to_string(),
        };
        let err = dispatcher.queue(&update).unwrap_err();
        assert!(matches!(err, QueueError::UnknownDomain(d) if d == "missing"));
    }
}
