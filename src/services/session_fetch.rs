use crate::model::SessionOption;
use crate::services::http_client::{FetchError, HttpClient};
use serde_json::Value as JsonValue;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

pub const RETRIEVE_SESSION_PATH: &str = "/retrieve-session";

/// Shared cancel flag for one background request.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionsLoaded {
    Options(Vec<SessionOption>),
    // 200 response carrying {"error": ...} instead of a list
    ErrorEnvelope(String),
}

pub(crate) fn parse_sessions(v: &JsonValue) -> Result<SessionsLoaded, FetchError> {
    if let Some(err) = v.get("error") {
        let msg = err
            .as_str()
            .map(|s| s.to_string())
            .unwrap_or_else(|| err.to_string());
        return Ok(SessionsLoaded::ErrorEnvelope(msg));
    }
    if v.is_array() {
        let options: Vec<SessionOption> = serde_json::from_value(v.clone())
            .map_err(|e| FetchError::Decode(format!("session list: {e}")))?;
        return Ok(SessionsLoaded::Options(options));
    }
    if v.is_null() {
        return Ok(SessionsLoaded::Options(Vec::new()));
    }
    Err(FetchError::Decode(format!(
        "expected a list of sessions, got {}",
        kind_of(v)
    )))
}

fn kind_of(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

pub fn retrieve_sessions(client: &HttpClient) -> Result<SessionsLoaded, FetchError> {
    let v = client.get_json(RETRIEVE_SESSION_PATH)?;
    parse_sessions(&v)
}

/// Fetch prior sessions off-thread. Nothing is sent once `cancel` is set.
pub fn spawn_retrieve_sessions(
    client: HttpClient,
    generation: u64,
    cancel: CancelToken,
    tx: Sender<crate::ui::LoadMsg>,
) {
    thread::spawn(move || {
        if cancel.is_cancelled() {
            return;
        }
        let outcome = retrieve_sessions(&client);
        if cancel.is_cancelled() {
            tracing::debug!(generation, "session fetch finished after cancel; dropped");
            return;
        }
        let _ = tx.send(crate::ui::LoadMsg::Sessions {
            generation,
            outcome,
        });
    });
}
