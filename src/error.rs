//! Lab Router error types

use thiserror::Error;

/// A single relay delivery failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayFailure {
    /// Relay address that failed
    pub relay: String,
    /// Why the delivery failed (rejection message, transport error, timeout)
    pub reason: String,
}

impl std::fmt::Display for RelayFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.relay, self.reason)
    }
}

fn join_failures(failures: &[RelayFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Lab Router error type
#[derive(Error, Debug)]
pub enum Error {
    /// No signing identity is available
    #[error("Not authenticated: no signing identity available")]
    NotAuthenticated,

    /// The signer rejected the draft
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Every resolved relay failed or timed out
    #[error("All {attempted} relays unreachable: {}", join_failures(.failures))]
    AllRelaysUnreachable {
        attempted: usize,
        failures: Vec<RelayFailure>,
    },

    /// The private relay did not accept the event, only public mirrors did
    #[error("Private relay did not accept the event: {}", join_failures(.failures))]
    PrivateRelayRejected { failures: Vec<RelayFailure> },

    /// The caller cancelled the publish before all sends completed
    #[error("Publish cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Relay transport error
    #[error("Relay error: {0}")]
    Relay(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Whether the error is a publish failure a caller may retry at a higher level
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::AllRelaysUnreachable { .. } | Self::PrivateRelayRejected { .. } | Self::Relay(_)
        )
    }
}

/// Result type alias for Lab Router operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_relays_unreachable_message() {
        let err = Error::AllRelaysUnreachable {
            attempted: 2,
            failures: vec![
                RelayFailure {
                    relay: "wss://a.example".to_string(),
                    reason: "timed out".to_string(),
                },
                RelayFailure {
                    relay: "wss://b.example".to_string(),
                    reason: "blocked".to_string(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("All 2 relays"));
        assert!(msg.contains("wss://a.example: timed out"));
        assert!(msg.contains("wss://b.example: blocked"));
    }

    #[test]
    fn test_retryable() {
        assert!(!Error::NotAuthenticated.is_retryable());
        assert!(!Error::SigningFailed("bad".into()).is_retryable());
        assert!(Error::AllRelaysUnreachable {
            attempted: 1,
            failures: vec![]
        }
        .is_retryable());
    }
}
