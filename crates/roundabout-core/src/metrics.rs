//! Metrics for the executor core.
//!
//! Uses the `metrics` crate facade for backend-agnostic instrumentation; the
//! Prometheus exporter is enabled by the `exporter` feature flag.
//!
//! All metrics follow the pattern `roundabout_{component}_{name}_{unit}`:
//!
//! - `roundabout_core_*` - coordinator metrics
//! - `roundabout_queue_*` - enqueue dispatcher metrics (from roundabout-queue)

#[cfg(feature = "exporter")]
use std::sync::OnceLock;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

#[cfg(feature = "exporter")]
static METRICS_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize the Prometheus metrics exporter.
///
/// Starts an HTTP server serving metrics at `/metrics`. Safe to call multiple
/// times (only initializes once), and everything works without it — the
/// facade just drops samples when no recorder is installed.
#[cfg(feature = "exporter")]
pub fn init_metrics(
    addr: std::net::SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    METRICS_INITIALIZED.get_or_init(
        || match metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
        {
            Ok(()) => {
                tracing::info!("Prometheus metrics server listening on http://{addr}/metrics");
            }
            Err(e) => {
                tracing::error!("Failed to start Prometheus exporter: {e}");
            }
        },
    );
    Ok(())
}

/// Static helpers recording coordinator metrics.
pub struct CoordinatorMetrics;

impl CoordinatorMetrics {
    /// One deferred update entered `on_start`, labeled by entry-point method
    /// and update kind.
    pub fn increment_updates_started(method: &str, kind: &str) {
        counter!(
            "roundabout_core_updates_started_total",
            "method" => method.to_string(),
            "kind" => kind.to_string()
        )
        .increment(1);
    }

    /// One round committed on the success path.
    pub fn increment_rounds_committed() {
        counter!("roundabout_core_rounds_committed_total").increment(1);
    }

    /// One round rolled back on the failure path.
    pub fn increment_rounds_rolled_back() {
        counter!("roundabout_core_rounds_rolled_back_total").increment(1);
    }
}
