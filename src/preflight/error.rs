//! Error taxonomy for preflight assessments.
//!
//! Only the first three variants ever abort an assessment. `NoRoute` and
//! `CredentialMissing` are modeled outcomes that collaborators report and the
//! checks fold into the report as informational text.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreflightError {
    /// Missing or malformed mint identifier. Raised before any I/O.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The identifier does not resolve to an initialized mint account.
    #[error("mint account not found: {0}")]
    NotFound(String),

    /// Transport failure, timeout or 5xx from the ledger or an aggregator.
    #[error("rpc unavailable: {0}")]
    RpcUnavailable(String),

    /// The quote aggregator has no path between the two assets.
    #[error("no route: {0}")]
    NoRoute(String),

    /// An optional collaborator has no credentials configured.
    #[error("credential missing: {0}")]
    CredentialMissing(String),
}

impl PreflightError {
    /// Whether this error leaves no meaningful report to produce.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PreflightError::InvalidInput(_)
                | PreflightError::NotFound(_)
                | PreflightError::RpcUnavailable(_)
        )
    }

    /// Whether repeating the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, PreflightError::RpcUnavailable(_))
    }
}

pub type PreflightResult<T> = std::result::Result<T, PreflightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(PreflightError::InvalidInput("x".into()).is_fatal());
        assert!(PreflightError::NotFound("x".into()).is_fatal());
        assert!(PreflightError::RpcUnavailable("x".into()).is_fatal());
        assert!(!PreflightError::NoRoute("x".into()).is_fatal());
        assert!(!PreflightError::CredentialMissing("x".into()).is_fatal());
    }

    #[test]
    fn test_only_transport_errors_are_transient() {
        assert!(PreflightError::RpcUnavailable("timeout".into()).is_transient());
        assert!(!PreflightError::NotFound("x".into()).is_transient());
        assert!(!PreflightError::NoRoute("x".into()).is_transient());
    }

    #[test]
    fn test_display_messages() {
        let err = PreflightError::NotFound("So111".into());
        assert_eq!(err.to_string(), "mint account not found: So111");
    }
}
