//! Critique Server - HTTP surface for the meta-critique endpoint

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{ACCESS_CONTROL_REQUEST_HEADERS, ORIGIN};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::ALLOWED_ORIGINS;
use crate::critique::{CritiqueHandler, FeedbackRequest};

/// Maximum request body size (1MB)
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Critique HTTP Server
pub struct CritiqueServer {
    addr: SocketAddr,
    handler: Arc<CritiqueHandler>,
}

impl CritiqueServer {
    pub fn new(addr: SocketAddr, handler: CritiqueHandler) -> Self {
        Self {
            addr,
            handler: Arc::new(handler),
        }
    }

    /// Bind and serve until the process is stopped
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| anyhow!("Failed to bind to {}: {}", self.addr, e))?;

        info!("Critique server started: http://{}", self.addr);

        loop {
            let (stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            let io = TokioIo::new(stream);
            let handler = self.handler.clone();

            tokio::spawn(async move {
                let service = service_fn(|req| {
                    let handler = handler.clone();
                    async move { handle_request(req, handler).await }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    // Clients hanging up mid-request are routine, not errors
                    if !e.is_incomplete_message() {
                        error!("Error serving connection: {}", e);
                    }
                }
            });
        }
    }
}

/// Handle HTTP request
async fn handle_request<B>(
    req: Request<B>,
    handler: Arc<CritiqueHandler>,
) -> Result<Response<Full<Bytes>>, hyper::Error>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let origin = req
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let requested_headers = req
        .headers()
        .get(ACCESS_CONTROL_REQUEST_HEADERS)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    // Handle CORS preflight
    if method == Method::OPTIONS {
        return Ok(cors_response(
            Response::builder()
                .status(StatusCode::OK)
                .body(Full::new(Bytes::new()))
                .unwrap(),
            origin.as_deref(),
            requested_headers.as_deref(),
        ));
    }

    let response = match (method, path.as_str()) {
        (Method::POST, "/meta_critique") => handle_meta_critique(req.into_body(), handler).await,
        (Method::GET, "/health") => json_response(StatusCode::OK, r#"{"status":"ok"}"#),
        _ => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header("Content-Type", "text/plain")
            .body(Full::new(Bytes::from("Not Found")))
            .unwrap(),
    };

    Ok(cors_response(
        response,
        origin.as_deref(),
        requested_headers.as_deref(),
    ))
}

/// Add CORS headers when the request origin is on the development allow-list.
/// Credentialed requests do not honor wildcard methods or headers, so the
/// methods are enumerated and the preflight's requested headers are
/// reflected back.
fn cors_response(
    mut response: Response<Full<Bytes>>,
    origin: Option<&str>,
    requested_headers: Option<&str>,
) -> Response<Full<Bytes>> {
    let Some(origin) = origin else {
        return response;
    };
    if !ALLOWED_ORIGINS.contains(&origin) {
        return response;
    }

    let headers = response.headers_mut();
    if let Ok(value) = origin.parse() {
        headers.insert("Access-Control-Allow-Origin", value);
    }
    headers.insert("Access-Control-Allow-Credentials", "true".parse().unwrap());
    headers.insert(
        "Access-Control-Allow-Methods",
        "GET, POST, OPTIONS".parse().unwrap(),
    );
    let allow_headers = requested_headers.unwrap_or("Content-Type");
    if let Ok(value) = allow_headers.parse() {
        headers.insert("Access-Control-Allow-Headers", value);
    }
    headers.insert("Vary", "Origin".parse().unwrap());
    response
}

/// Handle one feedback submission
async fn handle_meta_critique<B>(body: B, handler: Arc<CritiqueHandler>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let body = match read_body_with_limit(body, MAX_BODY_SIZE).await {
        Ok(b) => b,
        Err(e) => {
            return json_error_response(StatusCode::BAD_REQUEST, &e);
        }
    };

    let request: FeedbackRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(_) => {
            return json_error_response(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    let (status, critique) = handler.handle(&request).await;
    json_response(status, &serde_json::to_string(&critique).unwrap_or_default())
}

/// Read request body with size limit (streaming enforcement to prevent memory exhaustion)
async fn read_body_with_limit<B>(body: B, max_size: usize) -> Result<Bytes, String>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limited = Limited::new(body, max_size);
    match limited.collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) => {
            let err_str = e.to_string();
            if err_str.contains("length limit exceeded") {
                Err(format!("Request body too large (max {} bytes)", max_size))
            } else {
                Err("Failed to read body".to_string())
            }
        }
    }
}

/// Create JSON error response with safe serialization
fn json_error_response(status: StatusCode, error: &str) -> Response<Full<Bytes>> {
    let body = serde_json::to_string(&json!({"error": error})).unwrap();
    json_response(status, &body)
}

/// Create JSON response
fn json_response(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}
