//! Error types for the R-STDP tick engine

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while constructing or stepping the brain
#[derive(Error, Debug)]
pub enum CoreError {
    /// A `Params` value failed validation
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Reason the configuration was rejected
        reason: String,
    },

    /// Topology construction could not satisfy a structural constraint
    #[error("network topology error: {reason}")]
    NetworkTopology {
        /// Reason the topology is invalid
        reason: String,
    },

    /// An invariant that must always hold was observed to be false.
    ///
    /// This is fatal: per the error taxonomy, invariant violations are
    /// unreachable in correct code and are additionally guarded by
    /// `debug_assert!` at each mutation site, so in debug builds this
    /// variant should never actually be constructed.
    #[error("invariant violation: {detail}")]
    Invariant {
        /// Description of the violated invariant
        detail: String,
    },
}

impl CoreError {
    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Create a network topology error
    pub fn network_topology(reason: impl Into<String>) -> Self {
        Self::NetworkTopology {
            reason: reason.into(),
        }
    }

    /// Create an invariant violation error
    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::Invariant {
            detail: detail.into(),
        }
    }
}
