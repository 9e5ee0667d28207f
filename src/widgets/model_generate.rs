//! "Generate Model" form: pick a prior session, a model type and a kernel.
//!
//! Field values live here as typed options (`None` renders as `--Select--`).
//! Every change event re-validates the changed field and pushes the derived
//! submit flag to the store as a `set_sv_button` dispatch. The component never
//! touches the store itself; callers run the returned effects.

use crate::app::Effect;
use crate::model::{KernelType, ModelGeneratePayload, ModelType, SessionOption};
use crate::services::http_client::FetchError;
use crate::services::session_fetch::{CancelToken, SessionsLoaded};
use crate::store::actions::{set_page_status, set_sv_button};
use crate::validator::{parse_session_id, PLACEHOLDER};
use crate::widgets::analysis_layout::LayoutProps;
use crate::widgets::chrome::panel_block;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;

pub const OPTIONS_VISIBLE: usize = 8;
pub const PAGE_STATUS: &str = "model_generate";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldId {
    SessionId,
    ModelType,
    KernelType,
}

impl FieldId {
    pub const ALL: [FieldId; 3] = [FieldId::SessionId, FieldId::ModelType, FieldId::KernelType];

    pub fn label(self) -> &'static str {
        match self {
            FieldId::SessionId => "Session",
            FieldId::ModelType => "Model type",
            FieldId::KernelType => "Kernel type",
        }
    }
}

// Row index of the Submit button (after the three fields)
const SUBMIT_ROW: usize = 3;

#[derive(Debug)]
pub struct ModelGenerate {
    pub session_id: Option<i64>,
    pub model_type: Option<ModelType>,
    pub kernel_type: Option<KernelType>,
    pub options: Option<Vec<SessionOption>>,
    pub done_error: Option<String>,
    pub fail_status: Option<u16>,
    pub fail_error: Option<String>,
    pub display_spinner: bool,
    pub submitting: bool,
    pub selected: usize,
    pub picker: Option<usize>,
    generation: u64,
    fetch: Option<CancelToken>,
    props: Option<LayoutProps>,
}

impl ModelGenerate {
    pub fn new(generation: u64) -> Self {
        Self {
            session_id: None,
            model_type: None,
            kernel_type: None,
            options: None,
            done_error: None,
            fail_status: None,
            fail_error: None,
            display_spinner: false,
            submitting: false,
            selected: 0,
            picker: None,
            generation,
            fetch: None,
            props: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True iff all three fields hold validated values.
    pub fn submit_enabled(&self) -> bool {
        self.session_id.is_some() && self.model_type.is_some() && self.kernel_type.is_some()
    }

    pub fn payload(&self) -> Option<ModelGeneratePayload> {
        Some(ModelGeneratePayload::new(
            self.session_id?,
            self.model_type?,
            self.kernel_type?,
        ))
    }

    fn sync_submit(&self) -> Vec<Effect> {
        vec![Effect::Dispatch(set_sv_button(self.submit_enabled()))]
    }

    pub fn change_session_id(&mut self, raw: &str) -> Vec<Effect> {
        self.session_id = parse_session_id(raw);
        if self.session_id.is_none() {
            tracing::debug!(raw, "session id reset to placeholder");
        }
        self.sync_submit()
    }

    pub fn change_model_type(&mut self, raw: &str) -> Vec<Effect> {
        self.model_type = ModelType::parse(raw);
        if self.model_type.is_none() {
            tracing::debug!(raw, "model type reset to placeholder");
        }
        self.sync_submit()
    }

    pub fn change_kernel_type(&mut self, raw: &str) -> Vec<Effect> {
        self.kernel_type = KernelType::parse(raw);
        if self.kernel_type.is_none() {
            tracing::debug!(raw, "kernel type reset to placeholder");
        }
        self.sync_submit()
    }

    pub fn change(&mut self, field: FieldId, raw: &str) -> Vec<Effect> {
        match field {
            FieldId::SessionId => self.change_session_id(raw),
            FieldId::ModelType => self.change_model_type(raw),
            FieldId::KernelType => self.change_kernel_type(raw),
        }
    }

    /// Start the prior-session request; the loading indicator stays up until it resolves.
    pub fn mount(&mut self) -> Vec<Effect> {
        if let Some(old) = self.fetch.take() {
            old.cancel();
        }
        let cancel = CancelToken::new();
        self.fetch = Some(cancel.clone());
        self.display_spinner = true;
        vec![
            Effect::Dispatch(set_page_status(PAGE_STATUS)),
            Effect::RetrieveSessions {
                generation: self.generation,
                cancel,
            },
        ]
    }

    /// Cancel any pending fetch and force the shared submit flag off.
    pub fn unmount(&mut self) -> Vec<Effect> {
        if let Some(task) = self.fetch.take() {
            task.cancel();
        }
        self.display_spinner = false;
        self.picker = None;
        vec![
            Effect::Dispatch(set_sv_button(false)),
            Effect::Dispatch(set_page_status("default")),
        ]
    }

    /// Apply a fetch outcome. Returns false when it belongs to a cancelled or
    /// superseded request, in which case nothing is touched.
    pub fn apply_sessions(
        &mut self,
        generation: u64,
        outcome: Result<SessionsLoaded, FetchError>,
    ) -> bool {
        let live = generation == self.generation
            && self.fetch.as_ref().is_some_and(|t| !t.is_cancelled());
        if !live {
            tracing::debug!(generation, current = self.generation, "stale session list ignored");
            return false;
        }
        self.fetch = None;
        match outcome {
            Ok(SessionsLoaded::Options(opts)) => {
                tracing::info!(count = opts.len(), "prior sessions loaded");
                self.options = Some(opts);
            }
            Ok(SessionsLoaded::ErrorEnvelope(err)) => {
                tracing::warn!(error = %err, "retrieve-session returned an error");
                self.done_error = Some(err);
            }
            Err(e) => {
                if let Some(status) = e.status() {
                    tracing::warn!("Error Status: {status}");
                }
                tracing::warn!("Error Thrown: {}", e.message());
                self.fail_status = e.status();
                self.fail_error = Some(e.message().to_string());
            }
        }
        self.display_spinner = false;
        true
    }

    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    pub fn set_props(&mut self, props: LayoutProps) {
        self.props = Some(props);
    }

    // Submit follows the store flag handed down by the layout.
    fn submit_allowed(&self) -> bool {
        let from_store = self.props.as_ref().is_some_and(|p| p.submit_analysis);
        from_store && !self.submitting && self.payload().is_some()
    }

    pub fn is_picking(&self) -> bool {
        self.picker.is_some()
    }

    /// `(label, raw value)` rows for a field's selector; row 0 is the placeholder.
    pub fn choices(&self, field: FieldId) -> Vec<(String, String)> {
        let mut out = vec![(PLACEHOLDER.to_string(), String::new())];
        match field {
            FieldId::SessionId => {
                for o in self.options.iter().flatten() {
                    out.push((format!("{}: {}", o.id, o.title), o.id.to_string()));
                }
            }
            FieldId::ModelType => {
                for m in ModelType::ALL {
                    out.push((m.label().to_string(), m.value().to_string()));
                }
            }
            FieldId::KernelType => {
                for k in KernelType::ALL {
                    out.push((k.label().to_string(), k.value().to_string()));
                }
            }
        }
        out
    }

    fn current_raw(&self, field: FieldId) -> String {
        match field {
            FieldId::SessionId => self.session_id.map(|v| v.to_string()),
            FieldId::ModelType => self.model_type.map(|m| m.value().to_string()),
            FieldId::KernelType => self.kernel_type.map(|k| k.value().to_string()),
        }
        .unwrap_or_default()
    }

    fn current_label(&self, field: FieldId) -> String {
        let raw = self.current_raw(field);
        self.choices(field)
            .into_iter()
            .find(|(_, v)| *v == raw)
            .map(|(l, _)| l)
            .unwrap_or(raw)
    }

    fn open_picker(&mut self) {
        if let Some(field) = FieldId::ALL.get(self.selected).copied() {
            let raw = self.current_raw(field);
            let idx = self
                .choices(field)
                .iter()
                .position(|(_, v)| *v == raw)
                .unwrap_or(0);
            self.picker = Some(idx);
        }
    }
}

impl crate::widgets::Widget for ModelGenerate {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, tick: u64) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(Span::styled(
            "Select past session, model type, and kernel type",
            crate::theme::text_muted(),
        )));
        lines.push(Line::from(""));
        for (i, field) in FieldId::ALL.iter().enumerate() {
            let sel = if i == self.selected { '›' } else { ' ' };
            let editing = i == self.selected && self.picker.is_some();
            let value_style = if editing {
                crate::theme::text_editing_bold()
            } else if i == self.selected {
                crate::theme::text_active_bold()
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::raw(format!("{sel} {} *: ", field.label())),
                Span::styled(self.current_label(*field), value_style),
            ]));
            if let (true, Some(cursor)) = (editing, self.picker) {
                let choices = self.choices(*field);
                let raw = self.current_raw(*field);
                let start = cursor.saturating_sub(OPTIONS_VISIBLE - 1);
                let end = (start + OPTIONS_VISIBLE).min(choices.len());
                for (ci, (label, value)) in choices.iter().enumerate().take(end).skip(start) {
                    let mark = if *value == raw { "(•)" } else { "( )" };
                    let cur = if ci == cursor { '›' } else { ' ' };
                    let st = if ci == cursor {
                        crate::theme::list_cursor_style()
                    } else {
                        crate::theme::text_muted()
                    };
                    lines.push(Line::from(Span::styled(
                        format!("  {cur} {mark} {label}"),
                        st,
                    )));
                }
            }
        }
        if self.display_spinner {
            let spinner = ["⠋", "⠙", "⠸", "⠴", "⠦", "⠇"][tick as usize % 6];
            lines.push(Line::from(Span::styled(
                format!("  {spinner} loading sessions..."),
                crate::theme::text_muted(),
            )));
        }
        lines.push(Line::from(""));
        let can_submit = self.submit_allowed();
        let submit_style = if self.selected == SUBMIT_ROW {
            if can_submit {
                crate::theme::list_cursor_style()
            } else {
                crate::theme::text_muted().add_modifier(Modifier::REVERSED)
            }
        } else if can_submit {
            crate::theme::text_active_bold()
        } else {
            crate::theme::text_muted()
        };
        let submit_label = if self.submitting {
            "[ Submitting... ]"
        } else {
            "[ Submit ]"
        };
        lines.push(Line::from(Span::styled(
            format!("  {submit_label}"),
            submit_style,
        )));
        let p = Paragraph::new(lines)
            .block(panel_block("Generate Model", focused))
            .wrap(Wrap { trim: false });
        f.render_widget(p, area);
    }

    fn on_key(&mut self, key: KeyCode) -> Vec<Effect> {
        let mut effects: Vec<Effect> = Vec::new();
        if self.submitting {
            return effects;
        }
        if let Some(cursor) = self.picker {
            let Some(field) = FieldId::ALL.get(self.selected).copied() else {
                self.picker = None;
                return effects;
            };
            let total = self.choices(field).len();
            match key {
                KeyCode::Up => self.picker = Some(cursor.saturating_sub(1)),
                KeyCode::Down => self.picker = Some((cursor + 1).min(total.saturating_sub(1))),
                KeyCode::Home => self.picker = Some(0),
                KeyCode::End => self.picker = Some(total.saturating_sub(1)),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let raw = self
                        .choices(field)
                        .get(cursor)
                        .map(|(_, v)| v.clone())
                        .unwrap_or_default();
                    self.picker = None;
                    effects.extend(self.change(field, &raw));
                }
                KeyCode::Esc => self.picker = None,
                _ => {}
            }
            return effects;
        }
        match key {
            KeyCode::Up | KeyCode::BackTab => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Tab => self.selected = (self.selected + 1).min(SUBMIT_ROW),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.selected < SUBMIT_ROW {
                    self.open_picker();
                } else if self.submit_allowed() {
                    if let Some(payload) = self.payload() {
                        self.submitting = true;
                        effects.push(Effect::SubmitModel {
                            generation: self.generation,
                            payload,
                        });
                    }
                }
            }
            KeyCode::Delete | KeyCode::Backspace => {
                if let Some(field) = FieldId::ALL.get(self.selected).copied() {
                    effects.extend(self.change(field, ""));
                }
            }
            _ => {}
        }
        effects
    }
}

#[cfg(test)]
mod tests;
