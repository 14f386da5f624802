//! Service modules for the LLM completion provider

pub mod common;
pub(crate) mod gemini;

// Re-export commonly used items
pub use common::{map_auth_error, CompletionOutcome};
pub use gemini::call_gemini_endpoint;
