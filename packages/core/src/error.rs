//! Error types shared by every treekv operation.

use crate::Key;

/// Errors returned by providers, the capability wrapper and the registry.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No node exists at the given key.
    #[error("'{key}' does not exist")]
    NotFound { key: Key },

    /// Structural violation: directory/value mismatch, or a
    /// compare-and-swap value mismatch.
    #[error("cannot modify '{key}': {reason}")]
    Conflict { key: Key, reason: String },

    /// The provider does not implement the capability and it cannot be
    /// synthesized from the minimal contract.
    #[error("{operation} not supported by provider")]
    Unsupported { operation: &'static str },

    /// A synthesized recursive get descended past its depth guard.
    #[error("'{key}' exceeds the maximum tree depth of {limit}")]
    DepthExceeded { key: Key, limit: usize },

    /// A required registry configuration key is absent or empty.
    #[error("missing mandatory config key: {key}")]
    MissingConfig { key: String },

    /// No provider is registered under the given name.
    #[error("unknown provider: {name}")]
    UnknownProvider { name: String },

    /// A provider with this name is already registered. Only possible at
    /// startup; treat as fatal.
    #[error("provider '{name}' already registered")]
    AlreadyRegistered { name: String },

    /// Backend-internal failure from a concrete provider.
    #[error("backend error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn not_found(key: &Key) -> Error {
        Error::NotFound { key: key.clone() }
    }

    pub fn conflict(key: &Key, reason: impl Into<String>) -> Error {
        Error::Conflict {
            key: key.clone(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key;

    #[test]
    fn display_names_the_offending_key() {
        assert_eq!(
            Error::not_found(&key!("a/b")).to_string(),
            "'a/b' does not exist"
        );
        assert_eq!(
            Error::conflict(&key!("a"), "'a' is not a directory").to_string(),
            "cannot modify 'a': 'a' is not a directory"
        );
        assert_eq!(
            Error::MissingConfig { key: "endpoint".into() }.to_string(),
            "missing mandatory config key: endpoint"
        );
        assert_eq!(
            Error::Unsupported { operation: "watch" }.to_string(),
            "watch not supported by provider"
        );
    }

    #[test]
    fn backend_errors_keep_their_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = Error::Backend(Box::new(io));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("reset"));
    }
}
