//! Meta-critique pipeline: prompt assembly, handler, and postprocessing

pub mod handler;
pub mod postprocess;
pub mod prompt;

// Re-export commonly used items
pub use handler::{CritiqueHandler, FeedbackRequest, BLOCKED_MESSAGE};
pub use postprocess::{
    html_escape, postprocess_completion, render_full_rewrite, CritiqueResponse, PostprocessError,
    RewriteSuggestion,
};
pub use prompt::{build_prompt, SYSTEM_PROMPT};
