use crate::model::ModelGeneratePayload;
use crate::services::http_client::FetchError;
use crate::services::session_fetch::{CancelToken, SessionsLoaded};
use crate::store::actions::{set_login_state, set_logout_state};
use crate::store::Action;
use crate::ui::{AppState, ToastLevel, View};
use crate::widgets::model_generate::ModelGenerate;
use serde_json::Value as JsonValue;

pub enum AppMsg {
    MountForm,
    UnmountForm,
    LoadedSessions {
        generation: u64,
        outcome: Result<SessionsLoaded, FetchError>,
    },
    Submitted {
        generation: u64,
        outcome: Result<JsonValue, FetchError>,
    },
    Login(String),
    Logout,
}

#[derive(Debug)]
pub enum Effect {
    Dispatch(Action),
    RetrieveSessions {
        generation: u64,
        cancel: CancelToken,
    },
    SubmitModel {
        generation: u64,
        payload: ModelGeneratePayload,
    },
    PersistUsername(Option<String>),
    ShowToast {
        text: String,
        level: ToastLevel,
        seconds: u64,
    },
}

fn describe_sessions(outcome: &Result<SessionsLoaded, FetchError>) -> String {
    match outcome {
        Ok(SessionsLoaded::Options(v)) => format!("{} session(s)", v.len()),
        Ok(SessionsLoaded::ErrorEnvelope(e)) => format!("error envelope: {e}"),
        Err(e) => format!("failed: {e}"),
    }
}

pub fn update(state: &mut AppState, msg: AppMsg) -> Vec<Effect> {
    use AppMsg::*;
    let mut effects: Vec<Effect> = Vec::new();
    match msg {
        MountForm => {
            if state.form.is_some() {
                state.view = View::Analysis;
                return effects;
            }
            let generation = state.next_generation;
            state.next_generation += 1;
            let mut form = ModelGenerate::new(generation);
            effects.extend(form.mount());
            state.form = Some(form);
            state.view = View::Analysis;
            state.dbg(format!("mount model_generate (generation {generation})"));
        }
        UnmountForm => {
            if let Some(mut form) = state.form.take() {
                effects.extend(form.unmount());
                state.dbg(format!(
                    "unmount model_generate (generation {})",
                    form.generation()
                ));
            }
            state.view = View::Welcome;
        }
        LoadedSessions {
            generation,
            outcome,
        } => {
            let summary = describe_sessions(&outcome);
            let applied = match &mut state.form {
                Some(form) => form.apply_sessions(generation, outcome),
                None => false,
            };
            if applied {
                state.dbg(format!("retrieve-session: {summary}"));
            } else {
                state.dbg(format!(
                    "retrieve-session result for generation {generation} discarded"
                ));
            }
        }
        Submitted {
            generation,
            outcome,
        } => {
            // Only the mount that sent the request may re-enable its submit row.
            let current = state.form.as_ref().map(|f| f.generation());
            if current.is_some_and(|g| g != generation) {
                state.dbg(format!(
                    "load-data reply for generation {generation} after remount"
                ));
            } else {
                if let Some(form) = &mut state.form {
                    form.finish_submit();
                }
                state.status_text = None;
            }
            match outcome {
                Ok(v) => {
                    state.result.show_json(&v);
                    state.dbg("load-data: ok");
                    effects.push(Effect::ShowToast {
                        text: "Model generation submitted".into(),
                        level: ToastLevel::Success,
                        seconds: 3,
                    });
                }
                Err(e) => {
                    let msg = e.to_string();
                    state.dbg(format!("load-data: {msg}"));
                    state.result.show_error(msg.clone());
                    effects.push(Effect::ShowToast {
                        text: msg,
                        level: ToastLevel::Error,
                        seconds: 5,
                    });
                }
            }
        }
        Login(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return effects;
            }
            state.dbg(format!("login as {name}"));
            effects.push(Effect::Dispatch(set_login_state(name.clone())));
            effects.push(Effect::PersistUsername(Some(name.clone())));
            effects.push(Effect::ShowToast {
                text: format!("Signed in as {name}"),
                level: ToastLevel::Info,
                seconds: 2,
            });
        }
        Logout => {
            state.dbg("logout");
            effects.push(Effect::Dispatch(set_logout_state()));
            effects.push(Effect::PersistUsername(None));
        }
    }
    effects
}
