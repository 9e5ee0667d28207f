//! HTTP access to the session manager web service.

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::io::Read;
use std::time::Duration;

const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("JSON error: {0}")]
    Decode(String),
}

impl FetchError {
    /// HTTP status of the failure; transport and decode failures have none.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FetchError::Status { message, .. } => message,
            FetchError::Transport(m) | FetchError::Decode(m) => m,
        }
    }
}

#[derive(Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn get_json(&self, path: &str) -> Result<JsonValue, FetchError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let req = self.agent.get(&url).set("Accept", "application/json");
        read_json(req.call())
    }

    pub fn post_json(&self, path: &str, body: &impl Serialize) -> Result<JsonValue, FetchError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let req = self
            .agent
            .post(&url)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json");
        read_json(req.send_json(body))
    }
}

fn read_json(result: Result<ureq::Response, ureq::Error>) -> Result<JsonValue, FetchError> {
    let response = match result {
        Ok(r) => r,
        Err(ureq::Error::Status(status, response)) => {
            let message = read_body_limited(response).unwrap_or_else(|e| e);
            return Err(FetchError::Status { status, message });
        }
        Err(ureq::Error::Transport(t)) => return Err(FetchError::Transport(t.to_string())),
    };
    let body = read_body_limited(response).map_err(FetchError::Transport)?;
    serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
}

fn read_body_limited(response: ureq::Response) -> Result<String, String> {
    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_RESPONSE_BYTES as u64 + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| format!("reading body: {e}"))?;
    if bytes.len() > MAX_RESPONSE_BYTES {
        return Err(format!("response exceeded {MAX_RESPONSE_BYTES} bytes"));
    }
    Ok(String::from_utf8_lossy(&bytes).trim().to_string())
}
