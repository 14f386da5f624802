//! meta-critique library - HTTP backend for critiquing student peer feedback via an LLM

pub mod config;
pub mod critique;
pub mod server;
pub mod service;

// Re-export commonly used types
pub use config::{Config, ConfigOptions};
pub use critique::{CritiqueHandler, CritiqueResponse, FeedbackRequest, RewriteSuggestion};
pub use server::CritiqueServer;
pub use service::CompletionOutcome;
