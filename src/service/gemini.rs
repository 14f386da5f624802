//! Gemini API service

use std::time::Instant;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::common::{map_auth_error, CompletionOutcome};
use crate::config::Config;

/// Gemini API request structure
#[derive(Debug, Serialize)]
struct GeminiApiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

/// Gemini API response structure
#[derive(Debug, Deserialize)]
struct GeminiApiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiPromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

fn build_gemini_url(base_url: &str, model: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    let base_url = base_url.strip_suffix("/v1beta").unwrap_or(base_url);
    format!("{}/v1beta/models/{}:generateContent", base_url, model)
}

/// Call the Gemini generateContent endpoint with a fully composed prompt.
///
/// This is a pure boundary wrapper: the prompt is sent verbatim and the
/// returned text is not transformed. Transport and provider errors become
/// `Failure`; a prompt rejected by content-safety filtering becomes
/// `Blocked`.
pub async fn call_gemini_endpoint(
    client: &Client,
    config: &Config,
    prompt: &str,
) -> CompletionOutcome {
    let payload = GeminiApiRequest {
        contents: vec![GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: prompt.to_string(),
            }],
        }],
    };

    let url = build_gemini_url(&config.base_url, &config.model);
    let start_time = Instant::now();

    info!("Calling Gemini API: {}", url);

    let response = client
        .post(&url)
        .header("Content-Type", "application/json")
        .header("x-goog-api-key", &config.api_key)
        .json(&payload)
        .send()
        .await;

    let duration_ms = start_time.elapsed().as_millis() as u64;
    info!("Gemini API call completed in {}ms", duration_ms);

    let resp = match response {
        Ok(resp) => resp,
        Err(e) => {
            return CompletionOutcome::Failure(format!("Gemini API request failed: {}", e));
        }
    };

    let status = resp.status();
    let body_text = resp.text().await.unwrap_or_default();

    if let Some(err) = map_auth_error(status.as_u16(), "Gemini") {
        return CompletionOutcome::Failure(err.to_string());
    }

    if !status.is_success() {
        return CompletionOutcome::Failure(format!(
            "Gemini API failed: {} - {}",
            status, body_text
        ));
    }

    let api_response: GeminiApiResponse = match serde_json::from_str(&body_text) {
        Ok(r) => r,
        Err(e) => {
            return CompletionOutcome::Failure(format!(
                "Failed to parse Gemini response: {} - {}",
                e, body_text
            ));
        }
    };

    if let Some(reason) = blocked_reason(&api_response) {
        warn!("Prompt blocked by Gemini safety filters: {}", reason);
        return CompletionOutcome::Blocked(reason);
    }

    let text = api_response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.first())
        .and_then(|p| p.text.clone());

    match text {
        Some(text) => CompletionOutcome::Success(text),
        None => CompletionOutcome::Failure("Gemini API returned empty response".to_string()),
    }
}

/// Detect a content-safety refusal in a 200-level response body.
/// The API reports either a prompt-level `blockReason` or a candidate
/// terminated with a safety finish reason and no content.
fn blocked_reason(response: &GeminiApiResponse) -> Option<String> {
    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = &feedback.block_reason {
            return Some(reason.clone());
        }
    }

    let candidate = response.candidates.first()?;
    let finish = candidate.finish_reason.as_deref()?;
    if matches!(finish, "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST") {
        return Some(finish.to_string());
    }

    None
}
