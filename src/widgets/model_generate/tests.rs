use super::*;
use crate::store::{SharedState, Store};
use crate::validator::{check_valid_int, check_valid_string, is_placeholder};
use crate::widgets::Widget;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

fn apply(store: &mut Store, effects: Vec<Effect>) {
    for eff in effects {
        if let Effect::Dispatch(action) = eff {
            store.dispatch(action);
        }
    }
}

fn analysis(store: &Store) -> bool {
    store.state().page.submit_button.analysis
}

fn filled(store: &mut Store) -> ModelGenerate {
    let mut form = ModelGenerate::new(1);
    apply(store, form.change_session_id("12"));
    apply(store, form.change_model_type("svm"));
    apply(store, form.change_kernel_type("rbf"));
    form
}

#[test]
fn complete_triple_enables_submit() {
    let mut store = Store::default();
    let form = filled(&mut store);
    assert!(form.submit_enabled());
    assert!(analysis(&store));
    assert_eq!(
        form.payload(),
        Some(ModelGeneratePayload::new(12, ModelType::Svm, KernelType::Rbf))
    );
}

#[test]
fn non_integer_session_resets_to_placeholder() {
    let mut store = Store::default();
    let mut form = filled(&mut store);
    apply(&mut store, form.change_session_id("abc"));
    assert_eq!(form.session_id, None);
    assert_eq!(form.current_label(FieldId::SessionId), "--Select--");
    assert!(!form.submit_enabled());
    assert!(!analysis(&store));
}

fn in_enumeration(raw: &str, values: &[&str]) -> bool {
    let v = raw.trim().to_ascii_lowercase();
    values.contains(&v.as_str())
}

#[test]
fn submit_flag_matches_conjunction_for_all_triples() {
    let sessions = ["", "--Select--", "abc", "12", "0", "-3", "1.5", " "];
    let models = ["", "--Select--", "svm", "svr", "SVM", "knn", " "];
    let kernels = ["", "--Select--", "linear", "poly", "rbf", " rbf ", "sigmoid", "cubic", " "];
    let model_values: Vec<&str> = ModelType::ALL.iter().map(|m| m.value()).collect();
    let kernel_values: Vec<&str> = KernelType::ALL.iter().map(|k| k.value()).collect();
    for s in sessions {
        for m in models {
            for k in kernels {
                let mut store = Store::default();
                let mut form = ModelGenerate::new(1);
                apply(&mut store, form.change_session_id(s));
                apply(&mut store, form.change_model_type(m));
                apply(&mut store, form.change_kernel_type(k));
                // selector values must also name a known model or kernel
                let expected = (!is_placeholder(s) && check_valid_int(s))
                    && (!is_placeholder(m) && check_valid_string(m))
                    && in_enumeration(m, &model_values)
                    && (!is_placeholder(k) && check_valid_string(k))
                    && in_enumeration(k, &kernel_values);
                assert_eq!(form.submit_enabled(), expected, "{s:?} {m:?} {k:?}");
                assert_eq!(analysis(&store), expected, "{s:?} {m:?} {k:?}");
            }
        }
    }
}

#[test]
fn unknown_model_with_valid_fields_keeps_submit_off() {
    let mut store = Store::default();
    let mut form = ModelGenerate::new(1);
    apply(&mut store, form.change_session_id("12"));
    apply(&mut store, form.change_model_type("knn"));
    apply(&mut store, form.change_kernel_type("rbf"));
    assert!(!form.submit_enabled());
    assert!(!analysis(&store));
    apply(&mut store, form.change_model_type("SVM"));
    assert_eq!(form.model_type, Some(ModelType::Svm));
    assert!(analysis(&store));
}

#[test]
fn invalidating_any_single_field_disables_submit() {
    for field in FieldId::ALL {
        for bad in ["", "--Select--"] {
            let mut store = Store::default();
            let mut form = filled(&mut store);
            assert!(analysis(&store));
            apply(&mut store, form.change(field, bad));
            assert!(!form.submit_enabled(), "{field:?} {bad:?}");
            assert!(!analysis(&store), "{field:?} {bad:?}");
        }
    }
}

#[test]
fn unknown_enumeration_values_are_rejected() {
    let mut store = Store::default();
    let mut form = filled(&mut store);
    apply(&mut store, form.change_kernel_type("cubic"));
    assert_eq!(form.kernel_type, None);
    assert!(!analysis(&store));
}

#[test]
fn every_change_dispatches_once() {
    let mut form = ModelGenerate::new(1);
    let effs = form.change_model_type("svr");
    assert_eq!(effs.len(), 1);
    assert!(matches!(
        &effs[0],
        Effect::Dispatch(a) if *a == set_sv_button(false)
    ));
}

#[test]
fn unmount_forces_submit_flag_off() {
    let mut store = Store::default();
    let mut form = filled(&mut store);
    assert!(analysis(&store));
    apply(&mut store, form.unmount());
    assert!(!analysis(&store));
    assert_eq!(store.state().page.status, "default");
}

#[test]
fn mount_requests_sessions_and_shows_spinner() {
    let mut store = Store::new(SharedState::initial(None));
    let mut form = ModelGenerate::new(5);
    let effs = form.mount();
    assert!(form.display_spinner);
    assert!(effs
        .iter()
        .any(|e| matches!(e, Effect::RetrieveSessions { generation: 5, .. })));
    apply(&mut store, effs);
    assert_eq!(store.state().page.status, PAGE_STATUS);
}

#[test]
fn fetch_failure_leaves_selector_empty() {
    let mut form = ModelGenerate::new(2);
    let _ = form.mount();
    let applied = form.apply_sessions(
        2,
        Err(FetchError::Status {
            status: 500,
            message: "Internal Server Error".into(),
        }),
    );
    assert!(applied);
    assert!(!form.display_spinner);
    assert!(form.options.is_none());
    assert_eq!(form.fail_status, Some(500));
    assert_eq!(form.fail_error.as_deref(), Some("Internal Server Error"));
    assert_eq!(form.choices(FieldId::SessionId).len(), 1);
}

#[test]
fn fetch_success_populates_session_choices() {
    let mut form = ModelGenerate::new(2);
    let _ = form.mount();
    let opts = vec![SessionOption {
        id: 12,
        title: "iris".into(),
    }];
    assert!(form.apply_sessions(2, Ok(SessionsLoaded::Options(opts))));
    assert!(!form.display_spinner);
    let choices = form.choices(FieldId::SessionId);
    assert_eq!(choices[1], ("12: iris".to_string(), "12".to_string()));
}

#[test]
fn error_envelope_is_recorded_and_spinner_cleared() {
    let mut form = ModelGenerate::new(2);
    let _ = form.mount();
    assert!(form.apply_sessions(2, Ok(SessionsLoaded::ErrorEnvelope("db offline".into()))));
    assert_eq!(form.done_error.as_deref(), Some("db offline"));
    assert!(!form.display_spinner);
}

#[test]
fn late_result_after_unmount_is_discarded() {
    let mut form = ModelGenerate::new(3);
    let effs = form.mount();
    let token = effs
        .into_iter()
        .find_map(|e| match e {
            Effect::RetrieveSessions { cancel, .. } => Some(cancel),
            _ => None,
        })
        .unwrap();
    let _ = form.unmount();
    assert!(token.is_cancelled());
    assert!(!form.apply_sessions(3, Ok(SessionsLoaded::Options(vec![]))));
    assert!(form.options.is_none());
}

#[test]
fn result_for_other_generation_is_discarded() {
    let mut form = ModelGenerate::new(7);
    let _ = form.mount();
    assert!(!form.apply_sessions(6, Ok(SessionsLoaded::Options(vec![]))));
    assert!(form.display_spinner);
}

#[test]
fn keyboard_selection_drives_change_events() {
    let mut store = Store::default();
    let mut form = ModelGenerate::new(1);
    let _ = form.mount();
    form.apply_sessions(
        1,
        Ok(SessionsLoaded::Options(vec![SessionOption {
            id: 12,
            title: "iris".into(),
        }])),
    );
    // session: open, move to first real option, commit
    apply(&mut store, form.on_key(KeyCode::Enter));
    apply(&mut store, form.on_key(KeyCode::Down));
    apply(&mut store, form.on_key(KeyCode::Enter));
    assert_eq!(form.session_id, Some(12));
    // model: svr is the second real option
    apply(&mut store, form.on_key(KeyCode::Down));
    apply(&mut store, form.on_key(KeyCode::Enter));
    apply(&mut store, form.on_key(KeyCode::Down));
    apply(&mut store, form.on_key(KeyCode::Down));
    apply(&mut store, form.on_key(KeyCode::Enter));
    assert_eq!(form.model_type, Some(ModelType::Svr));
    assert!(!analysis(&store));
    // kernel: sigmoid is last
    apply(&mut store, form.on_key(KeyCode::Down));
    apply(&mut store, form.on_key(KeyCode::Enter));
    apply(&mut store, form.on_key(KeyCode::End));
    apply(&mut store, form.on_key(KeyCode::Enter));
    assert_eq!(form.kernel_type, Some(KernelType::Sigmoid));
    assert!(analysis(&store));

    // submit row honours the store flag handed down by the layout
    form.set_props(LayoutProps::from_state(store.state()));
    let _ = form.on_key(KeyCode::Down);
    let effs = form.on_key(KeyCode::Enter);
    assert!(matches!(effs.as_slice(), [Effect::SubmitModel { .. }]));
    assert!(form.submitting);
    assert!(form.on_key(KeyCode::Enter).is_empty());
}

#[test]
fn placeholder_row_clears_field() {
    let mut store = Store::default();
    let mut form = filled(&mut store);
    form.selected = 1;
    apply(&mut store, form.on_key(KeyCode::Enter));
    apply(&mut store, form.on_key(KeyCode::Home));
    apply(&mut store, form.on_key(KeyCode::Enter));
    assert_eq!(form.model_type, None);
    assert!(!analysis(&store));
}

#[test]
fn submit_ignored_while_store_flag_is_off() {
    let mut store = Store::default();
    let mut form = filled(&mut store);
    form.set_props(LayoutProps::from_state(&SharedState::initial(None)));
    form.selected = SUBMIT_ROW;
    assert!(form.on_key(KeyCode::Enter).is_empty());
    assert!(!form.submitting);
}

#[test]
fn render_shows_placeholders_and_spinner() {
    let mut form = ModelGenerate::new(1);
    let _ = form.mount();
    let backend = TestBackend::new(60, 12);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|f| {
            let area = f.area();
            form.render(f, area, true, 0);
        })
        .unwrap();
    let buf = terminal.backend().buffer().clone();
    let mut text = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            text.push_str(buf[(x, y)].symbol());
        }
        text.push('\n');
    }
    assert!(text.contains("Generate Model"));
    assert!(text.contains("Session *: --Select--"));
    assert!(text.contains("Kernel type *: --Select--"));
    assert!(text.contains("loading sessions"));
    assert!(text.contains("[ Submit ]"));
}
