//! Request handler - prompt assembly, provider call, response branching

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use hyper::StatusCode;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::service::{call_gemini_endpoint, CompletionOutcome};

use super::postprocess::{postprocess_completion, CritiqueResponse};
use super::prompt::build_prompt;

/// Fixed message returned when the provider refuses to generate
pub const BLOCKED_MESSAGE: &str = "The prompt was blocked by safety filters.";

/// One feedback submission, constructed per HTTP request
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    pub feedback: String,
    #[serde(default)]
    pub custom_instructions: String,
    #[serde(default = "default_student_name")]
    pub student_name: String,
}

fn default_student_name() -> String {
    "Anonymous".to_string()
}

/// Stateless handler for the meta-critique endpoint.
/// Holds the configuration-derived provider client; no state is retained
/// across requests.
pub struct CritiqueHandler {
    config: Arc<Config>,
    client: Client,
}

impl CritiqueHandler {
    /// Create a handler with a provider client bounded by the configured
    /// request timeout.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Handle one feedback submission: exactly one upstream call, no
    /// retries. Every failure is terminal for the request and surfaced to
    /// the caller.
    pub async fn handle(&self, request: &FeedbackRequest) -> (StatusCode, CritiqueResponse) {
        let prompt = build_prompt(&request.feedback, &request.custom_instructions);

        match call_gemini_endpoint(&self.client, &self.config, &prompt).await {
            CompletionOutcome::Success(text) => {
                match postprocess_completion(&text, &request.student_name) {
                    Ok(response) => {
                        info!(
                            "Critique complete: {} rewrite suggestions",
                            response.rewrite_suggestions.len()
                        );
                        (StatusCode::OK, response)
                    }
                    Err(e) => {
                        error!("Postprocessing failed: {}", e);
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            CritiqueResponse::message_only(format!("An error occurred: {}", e)),
                        )
                    }
                }
            }
            CompletionOutcome::Blocked(reason) => {
                warn!("Prompt blocked by safety filters: {}", reason);
                (
                    StatusCode::BAD_REQUEST,
                    CritiqueResponse::message_only(BLOCKED_MESSAGE),
                )
            }
            CompletionOutcome::Failure(message) => {
                error!("Gemini API error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CritiqueResponse::message_only(format!("An error occurred: {}", message)),
                )
            }
        }
    }
}
