use thiserror::Error;

/// Errors raised while opening a transaction round.
///
/// Both variants are precondition violations: they are raised before any
/// round is opened, so there is never partial round state to clean up on
/// these paths. The caller must treat the update's execution attempt as
/// failed and must not run the update body.
#[derive(Error, Debug)]
pub enum TransactionError {
    /// The pool could not reserve write capacity for a new round.
    #[error("no transaction ticket available for '{owner}'")]
    TicketUnavailable { owner: String },

    /// The pool already reports an active round. The earlier eligibility
    /// check is advisory; this is the authoritative answer.
    #[error("transaction round already active, '{owner}' cannot start a new one")]
    RoundAlreadyActive { owner: String },
}

pub type Result<T> = std::result::Result<T, TransactionError>;
