use serde::{Deserialize, Serialize};

/// Label used for batch entry points in metrics.
const BATCH_METHOD_LABEL: &str = "batch";

/// Entry point an update execution is running under.
///
/// Opportunistic inline execution is reserved for batch/offline entry points;
/// interactive request handling always defers to the queue. The method label
/// is carried for metrics only and has no effect on gating beyond the
/// batch/interactive split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionContext {
    /// Offline/batch process (maintenance script, worker loop).
    Batch,

    /// Interactive request handling, labeled with the request verb.
    Interactive { method: String },
}

impl ExecutionContext {
    /// Create an interactive context from a request verb.
    pub fn interactive(method: impl Into<String>) -> Self {
        Self::Interactive {
            method: method.into(),
        }
    }

    /// Whether this is a batch/offline entry point.
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch)
    }

    /// Metric label for this entry point.
    pub fn method_label(&self) -> &str {
        match self {
            Self::Batch => BATCH_METHOD_LABEL,
            Self::Interactive { method } => method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_context_label() {
        assert!(ExecutionContext::Batch.is_batch());
        assert_eq!(ExecutionContext::Batch.method_label(), "batch");
    }

    #[test]
    fn test_interactive_context_label() {
        let ctx = ExecutionContext::interactive("POST");
        assert!(!ctx.is_batch());
        assert_eq!(ctx.method_label(), "POST");
    }
}
