use crate::model::ModelGeneratePayload;
use crate::services::http_client::{FetchError, HttpClient};
use serde_json::Value as JsonValue;
use std::sync::mpsc::Sender;
use std::thread;

pub const LOAD_DATA_PATH: &str = "/load-data";

pub fn submit_model_generate(
    client: &HttpClient,
    payload: &ModelGeneratePayload,
) -> Result<JsonValue, FetchError> {
    client.post_json(LOAD_DATA_PATH, payload)
}

// Send the form payload once and hand the server's reply back to the UI loop.
pub fn spawn_submit_model_generate(
    client: HttpClient,
    generation: u64,
    payload: ModelGeneratePayload,
    tx: Sender<crate::ui::LoadMsg>,
) {
    thread::spawn(move || {
        let outcome = submit_model_generate(&client, &payload);
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, session_id = payload.session_id, "model generate failed");
        }
        let _ = tx.send(crate::ui::LoadMsg::Submitted {
            generation,
            outcome,
        });
    });
}
