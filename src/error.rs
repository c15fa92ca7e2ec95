use crate::types::PropertyKey;
use thiserror::Error;

/// Failures surfaced by the object runtime. All of them are synchronous
/// programming-logic errors; no operation leaves a partial mutation behind.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// Attempt to reconfigure, reshape, or remove a non-configurable record,
    /// or (under strict policy) to write through a rejected path.
    #[error("cannot redefine non-configurable property `{key}`")]
    Configuration { key: PropertyKey },

    /// A delegate assignment that would make the node reachable from its
    /// own chain.
    #[error("delegate assignment would create a cycle")]
    Cycle,

    /// Raised inside a user-supplied factory or accessor body; propagated
    /// unchanged to the caller.
    #[error("{0}")]
    Host(String),
}
