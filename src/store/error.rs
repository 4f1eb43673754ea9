//! Error types for the configuration store.

use thiserror::Error;

/// Failure to decode one domain's raw block into its typed object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A key held a value the domain cannot accept.
    #[error("invalid value for {key:?}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl DecodeError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        DecodeError::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Registry and store errors.
///
/// Everything here except `InitialDecode` is a caller bug: a domain read
/// before it was registered, or registered twice.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("domain {0:?} is already registered")]
    DuplicateDomain(String),

    #[error("domain {0:?} is not registered or has no decoded value")]
    DomainNotRegistered(String),

    #[error("domain {domain:?} does not hold a value of type {expected}")]
    TypeMismatch {
        domain: String,
        expected: &'static str,
    },

    #[error("domain {domain:?} could not produce an initial value: {source}")]
    InitialDecode {
        domain: String,
        #[source]
        source: DecodeError,
    },
}
