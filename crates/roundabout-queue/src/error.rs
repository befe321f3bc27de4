use thiserror::Error;

/// Errors from queue transport resolution and job push.
///
/// Propagated unchanged to the caller; this crate performs no retries.
#[derive(Error, Debug)]
pub enum QueueError {
    /// No transport is registered for the requested routing domain.
    #[error("no queue transport registered for routing domain '{0}'")]
    UnknownDomain(String),

    /// The resolved transport rejected the push.
    #[error("push to routing domain '{domain}' rejected: {message}")]
    Push { domain: String, message: String },
}

pub type Result<T> = std::result::Result<T, QueueError>;
