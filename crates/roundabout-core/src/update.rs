//! Deferred update data model.
//!
//! Updates are polymorphic over a small capability set. Capability presence,
//! not a type hierarchy, drives coordinator behavior: an update exposes an
//! origin label, a round requirement, or a ticket slot by overriding the
//! corresponding accessor, and a single update may expose any combination.

use crate::pool::RoundTicket;
use serde::{Deserialize, Serialize};

/// Declared relationship between an update and the transaction round the
/// coordinator opens around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundRequirement {
    /// The update wants (or tolerates) running inside an explicit round.
    /// This is also the behavior for updates that declare nothing.
    Required,

    /// The update must not run inside a long-lived explicit round; the
    /// coordinator uses the lighter-weight commit-as-start round instead.
    Forbidden,
}

/// A unit of background work whose execution the coordinator scopes in a
/// transaction round.
///
/// Only `type_tag` is mandatory. The remaining accessors are capability
/// probes with absent-by-default implementations:
///
/// - `origin` — a callback-style update reports where it was scheduled from;
///   the label replaces the type tag when attributing the round.
/// - `round_requirement` — round-aware updates declare whether they tolerate
///   an explicit round. Absence defaults to [`RoundRequirement::Required`]
///   semantics.
/// - `ticket_slot` — data updates accept the reservation ticket obtained at
///   round start so their writes can use the reserved capacity.
pub trait DeferredUpdate: Send {
    /// Stable name of the concrete update kind, used for round attribution
    /// and metric labels.
    fn type_tag(&self) -> &'static str;

    /// Origin label, when the update carries one.
    fn origin(&self) -> Option<&str> {
        None
    }

    /// Declared round requirement, when the update declares one.
    fn round_requirement(&self) -> Option<RoundRequirement> {
        None
    }

    /// Slot receiving the reservation ticket at round start, when the update
    /// can make use of reserved write capacity.
    fn ticket_slot(&mut self) -> Option<&mut Option<RoundTicket>> {
        None
    }
}

/// Opaque job payload pushed to a queue transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    /// Job kind understood by the consuming worker.
    pub kind: String,

    /// Kind-specific parameters. Opaque to this crate.
    pub params: serde_json::Value,
}

impl JobPayload {
    pub fn new(kind: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            params,
        }
    }
}

/// What an update hands over when it is queued instead of executed inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Logical destination (e.g. a data partition) the job must be pushed to.
    pub routing_domain: String,

    /// The job itself.
    pub job: JobPayload,
}

/// Capability of being converted into a queued job instead of running inline.
pub trait EnqueueableUpdate: DeferredUpdate {
    /// Produce the job specification equivalent to running this update.
    fn job_spec(&self) -> JobSpec;
}
