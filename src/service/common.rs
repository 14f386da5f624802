//! Common types and utilities for service modules

use anyhow::anyhow;

/// Outcome of a single completion call.
///
/// The handler branches on all three cases, so the provider wrapper reports
/// them as an explicit tagged result instead of folding safety blocks into
/// the generic error path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The provider returned a textual completion
    Success(String),
    /// The provider refused to generate, with the reported block reason
    Blocked(String),
    /// Any other provider-side or transport-side error
    Failure(String),
}

impl CompletionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Map common authentication errors to consistent error messages
pub fn map_auth_error(status: u16, provider: &str) -> Option<anyhow::Error> {
    match status {
        401 => Some(anyhow!("{} API key invalid or expired", provider)),
        403 => Some(anyhow!(
            "{} access denied, API key may be disabled",
            provider
        )),
        _ => None,
    }
}
