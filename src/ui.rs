use crate::app::{update, AppMsg, Effect};
use crate::model::{validate_app_config, AppConfig};
use crate::services::http_client::{FetchError, HttpClient};
use crate::services::session_fetch::{spawn_retrieve_sessions, SessionsLoaded};
use crate::services::session_storage::SessionStorage;
use crate::services::submit::spawn_submit_model_generate;
use crate::store::{Store, USERNAME_KEY};
use crate::widgets::analysis_layout::LayoutProps;
use crate::widgets::model_generate::ModelGenerate;
use crate::widgets::result_viewer::ResultViewer;
use crate::widgets::Widget;
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::*;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

pub const CONFIG_FILE: &str = "ml-session.yaml";
const CONFIG_DIR_ENV: &str = "ML_TUI_CONFIG_DIR";

#[derive(Default)]
pub(crate) struct AppState {
    pub(crate) config: AppConfig,
    pub(crate) store: Store,
    pub(crate) storage: Option<SessionStorage>,
    pub(crate) http: Option<HttpClient>,
    pub(crate) view: View,
    pub(crate) form: Option<ModelGenerate>,
    pub(crate) next_generation: u64,
    pub(crate) result: ResultViewer,
    pub(crate) login_input: Option<String>,
    pub(crate) status_text: Option<String>,
    pub(crate) toast: Option<Toast>,
    pub(crate) tick: u64,
    pub(crate) theme: crate::theme::Theme,
    // Debug log (rendered in bottom debug pane)
    pub(crate) debug_log: VecDeque<String>,
    pub(crate) tx: Option<Sender<LoadMsg>>,
    pub(crate) rx: Option<Receiver<LoadMsg>>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    #[default]
    Welcome,
    Analysis,
}

impl AppState {
    pub fn dbg(&mut self, msg: impl Into<String>) {
        const MAX_LOG_LINES: usize = 200;
        let msg = msg.into();
        tracing::debug!(target: "ml_session_tui::ui", "{msg}");
        if self.debug_log.len() >= MAX_LOG_LINES {
            self.debug_log.pop_front();
        }
        self.debug_log.push_back(msg);
    }

    pub fn props(&self) -> LayoutProps {
        LayoutProps::from_state(self.store.state())
    }

    // Spinner frame; frozen when animations are off.
    pub fn frame(&self) -> u64 {
        if self.config.animations {
            self.tick
        } else {
            0
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub expires_at_tick: u64,
}

// -------- Background results -------------------------------------------------
pub(crate) enum LoadMsg {
    Sessions {
        generation: u64,
        outcome: Result<SessionsLoaded, FetchError>,
    },
    Submitted {
        generation: u64,
        outcome: Result<JsonValue, FetchError>,
    },
}

pub(crate) fn run_effects(state: &mut AppState, effects: Vec<Effect>) {
    for eff in effects {
        match eff {
            Effect::Dispatch(action) => {
                state.store.dispatch(action);
            }
            Effect::RetrieveSessions { generation, cancel } => {
                state.dbg(format!("GET /retrieve-session (generation {generation})"));
                if let (Some(tx), Some(http)) = (&state.tx, &state.http) {
                    spawn_retrieve_sessions(http.clone(), generation, cancel, tx.clone());
                }
            }
            Effect::SubmitModel {
                generation,
                payload,
            } => {
                state.dbg(format!(
                    "POST /load-data session={} model={} kernel={}",
                    payload.session_id,
                    payload.model_type.value(),
                    payload.sv_kernel_type.value()
                ));
                state.status_text = Some("Submitting...".into());
                if let (Some(tx), Some(http)) = (&state.tx, &state.http) {
                    spawn_submit_model_generate(http.clone(), generation, payload, tx.clone());
                }
            }
            Effect::PersistUsername(name) => {
                let Some(storage) = state.storage.clone() else {
                    continue;
                };
                let res = match &name {
                    Some(n) => storage.set_item(USERNAME_KEY, n),
                    None => storage.remove_item(USERNAME_KEY),
                };
                if let Err(e) = res {
                    let msg = format!("session storage {:?}: {e:#}", storage.path());
                    tracing::warn!("{msg}");
                    state.dbg(msg);
                }
            }
            Effect::ShowToast {
                text,
                level,
                seconds,
            } => {
                let ticks = seconds.saturating_mul(5); // ~200ms tick
                let exp = state.tick.saturating_add(ticks);
                state.toast = Some(Toast {
                    text,
                    level,
                    expires_at_tick: exp,
                });
            }
        }
    }
}

fn pump_loads(state: &mut AppState) {
    let mut drained: Vec<LoadMsg> = Vec::new();
    if let Some(rx) = &state.rx {
        while let Ok(msg) = rx.try_recv() {
            drained.push(msg);
        }
    }
    for msg in drained {
        let effects = match msg {
            LoadMsg::Sessions {
                generation,
                outcome,
            } => update(
                state,
                AppMsg::LoadedSessions {
                    generation,
                    outcome,
                },
            ),
            LoadMsg::Submitted {
                generation,
                outcome,
            } => update(
                state,
                AppMsg::Submitted {
                    generation,
                    outcome,
                },
            ),
        };
        run_effects(state, effects);
    }
}

/// Route one key press. Returns true when the app should quit.
pub(crate) fn handle_key(state: &mut AppState, key: KeyCode) -> bool {
    if let Some(mut input) = state.login_input.take() {
        match key {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Esc => return false,
            KeyCode::Enter => {
                let effs = update(state, AppMsg::Login(input));
                run_effects(state, effs);
                return false;
            }
            _ => {}
        }
        state.login_input = Some(input);
        return false;
    }
    let picking = state.form.as_ref().is_some_and(|f| f.is_picking());
    if picking {
        if let Some(form) = &mut state.form {
            let effs = form.on_key(key);
            run_effects(state, effs);
        }
        return false;
    }
    match key {
        KeyCode::Char('q') => {
            let effs = update(state, AppMsg::UnmountForm);
            run_effects(state, effs);
            return true;
        }
        KeyCode::Char('l') if state.props().is_anonymous() => {
            state.login_input = Some(String::new());
        }
        KeyCode::Char('o') if !state.props().is_anonymous() => {
            let effs = update(state, AppMsg::Logout);
            run_effects(state, effs);
        }
        KeyCode::Char('g') => {
            let effs = update(state, AppMsg::MountForm);
            run_effects(state, effs);
        }
        KeyCode::Enter if state.form.is_none() => {
            let effs = update(state, AppMsg::MountForm);
            run_effects(state, effs);
        }
        KeyCode::Esc => {
            let effs = update(state, AppMsg::UnmountForm);
            run_effects(state, effs);
        }
        KeyCode::PageUp | KeyCode::PageDown => {
            let effs = state.result.on_key(key);
            run_effects(state, effs);
        }
        _ => {
            if let Some(form) = &mut state.form {
                let effs = form.on_key(key);
                run_effects(state, effs);
            }
        }
    }
    false
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

pub fn run() -> Result<()> {
    let loaded = load_config()?;
    validate_app_config(&loaded.config).map_err(|e| anyhow::anyhow!("invalid config: {e}"))?;
    let log_dir = crate::services::logging::log_dir(loaded.dir.as_deref());
    // Logging is best effort; the UI runs without it.
    let log_note = match crate::services::logging::init(&log_dir) {
        Ok(p) => format!("log file: {}", p.display()),
        Err(e) => format!("logging disabled: {e}"),
    };

    let storage = SessionStorage::new(session_file_path(&loaded));
    let mut store = Store::from_storage(&storage);
    let change_log = store.subscribe(|st| {
        tracing::debug!(
            user = %st.user.name,
            status = %st.page.status,
            analysis = st.page.submit_button.analysis,
            "store changed"
        );
    });
    let http = HttpClient::new(
        &loaded.config.server_url,
        Duration::from_secs(loaded.config.request_timeout_secs),
    );
    let mut state = AppState {
        config: loaded.config,
        store,
        storage: Some(storage),
        http: Some(http),
        next_generation: 1,
        ..Default::default()
    };
    state.dbg(log_note);
    if let Some(dir) = &loaded.dir {
        state.dbg(format!("config dir: {}", dir.display()));
    }
    let (tx, rx) = mpsc::channel::<LoadMsg>();
    state.tx = Some(tx);
    state.rx = Some(rx);

    if env_flag("ML_TUI_HEADLESS") {
        let ticks: u64 = std::env::var("ML_TUI_TICKS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);
        let res = run_headless(&mut state, ticks, env_flag("ML_TUI_HEADLESS_MOUNT"));
        state.store.unsubscribe(change_log);
        return res;
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();
    let res: Result<()> = loop {
        if let Err(e) = terminal.draw(|f| ui(f, &mut state)) {
            break Err(e.into());
        }
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));
        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if handle_key(&mut state, key.code) {
                        break Ok(());
                    }
                }
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            },
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }
        pump_loads(&mut state);
        if last_tick.elapsed() >= tick_rate {
            state.tick = state.tick.wrapping_add(1);
            last_tick = Instant::now();
        }
    };
    disable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    tracing::info!(
        analysis = state.store.state().page.submit_button.analysis,
        "exiting"
    );
    state.store.unsubscribe(change_log);
    res
}

// Smoke mode: render into a TestBackend for a fixed number of ticks.
fn run_headless(state: &mut AppState, ticks: u64, mount: bool) -> Result<()> {
    let backend = ratatui::backend::TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend)?;
    if mount {
        let effs = update(state, AppMsg::MountForm);
        run_effects(state, effs);
    }
    for _ in 0..ticks {
        terminal.draw(|f| ui(f, state))?;
        pump_loads(state);
        state.tick = state.tick.wrapping_add(1);
        std::thread::sleep(Duration::from_millis(200));
    }
    if env_flag("ML_TUI_SMOKE_SUMMARY") {
        println!("{}", smoke_summary(state));
    }
    let effs = update(state, AppMsg::UnmountForm);
    run_effects(state, effs);
    Ok(())
}

fn smoke_summary(state: &AppState) -> JsonValue {
    let view = match state.view {
        View::Welcome => "Welcome",
        View::Analysis => "Analysis",
    };
    let form = state.form.as_ref();
    serde_json::json!({
        "view": view,
        "mounted": form.is_some(),
        "loading": form.is_some_and(|f| f.display_spinner),
        "options": form.and_then(|f| f.options.as_ref()).map(|o| o.len()),
        "fetch_status": form.and_then(|f| f.fail_status),
        "fetch_error": form.and_then(|f| f.fail_error.clone().or_else(|| f.done_error.clone())),
        "submit_enabled": state.store.state().page.submit_button.analysis,
        "user": state.store.state().user.name,
        "dispatches": state.store.dispatch_count(),
    })
}

pub(crate) struct LoadedConfig {
    pub(crate) config: AppConfig,
    pub(crate) dir: Option<PathBuf>,
}

fn read_config(path: &Path) -> Result<LoadedConfig> {
    let s = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
    let config: AppConfig =
        serde_yaml::from_str(&s).with_context(|| format!("parsing {path:?}"))?;
    Ok(LoadedConfig {
        config,
        dir: path.parent().map(|p| p.to_path_buf()),
    })
}

fn load_config() -> Result<LoadedConfig> {
    let env_dir = std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .map(PathBuf::from);
    load_config_from(find_config(&cwd, env_dir.as_deref(), home.as_deref()))
}

fn load_config_from(found: Option<PathBuf>) -> Result<LoadedConfig> {
    match found {
        Some(p) => read_config(&p),
        None => Ok(LoadedConfig {
            config: AppConfig::default(),
            dir: None,
        }),
    }
}

/// Locate `ml-session.yaml`. An explicit directory is returned even when the
/// file is missing so that reading it reports the error.
pub(crate) fn find_config(
    cwd: &Path,
    env_dir: Option<&Path>,
    home: Option<&Path>,
) -> Option<PathBuf> {
    // 1) Explicit directory
    if let Some(base) = env_dir {
        return Some(base.join(CONFIG_FILE));
    }
    // 2) CWD, CWD/.tui, then <ancestor>/.tui
    for p in [cwd.join(CONFIG_FILE), cwd.join(".tui").join(CONFIG_FILE)] {
        if p.exists() {
            return Some(p);
        }
    }
    let mut cur = cwd;
    while let Some(parent) = cur.parent() {
        let p = parent.join(".tui").join(CONFIG_FILE);
        if p.exists() {
            return Some(p);
        }
        cur = parent;
    }
    // 3) ~/.tui
    let p = home?.join(".tui").join(CONFIG_FILE);
    p.exists().then_some(p)
}

pub(crate) fn session_file_path(loaded: &LoadedConfig) -> PathBuf {
    if let Ok(p) = std::env::var("ML_TUI_SESSION_FILE") {
        if !p.trim().is_empty() {
            return PathBuf::from(p);
        }
    }
    let base = loaded
        .dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("ml-session-tui"));
    match &loaded.config.session_file {
        Some(f) => {
            let pb = PathBuf::from(f);
            if pb.is_absolute() {
                pb
            } else {
                base.join(pb)
            }
        }
        None => base.join("session.yaml"),
    }
}

// -------- Drawing --------------------------------------------------------------
fn ui(f: &mut Frame, state: &mut AppState) {
    if let Some(t) = &state.toast {
        if state.tick >= t.expires_at_tick {
            state.toast = None;
        }
    }
    let screen = f.area();
    f.render_widget(Block::default().style(state.theme.base_style()), screen);

    const DEBUG_H: u16 = 4;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(DEBUG_H),
            Constraint::Length(1),
        ])
        .split(screen);

    let props = state.props();
    crate::widgets::user_menu::draw_user_menu(f, chunks[0], &state.config.title, &props);

    let main = chunks[1];
    match state.view {
        View::Welcome => draw_welcome(f, main, state),
        View::Analysis => draw_analysis(f, main, state, props),
    }
    if let Some(input) = &state.login_input {
        let area = centered_rect(50, 3, main);
        crate::widgets::user_menu::draw_login_prompt(f, area, input, state.tick % 2 == 0);
    }
    draw_debug(f, chunks[2], state);
    let help = match state.view {
        View::Welcome => "g/Enter generate model  l sign in  o log out  q quit",
        View::Analysis => "↑/↓ field  Enter choose  Del clear  PgUp/PgDn result  Esc close  q quit",
    };
    crate::widgets::status_bar::draw_footer(f, chunks[3], state, help);
}

fn draw_welcome(f: &mut Frame, area: Rect, state: &AppState) {
    let block = crate::widgets::chrome::panel_block("Sessions", true);
    let text = format!(
        "Connected to {}\n\nPress g to open the Generate Model form.",
        state.config.server_url
    );
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_analysis(f: &mut Frame, area: Rect, state: &mut AppState, props: LayoutProps) {
    let tick = state.frame();
    let Some(form) = &mut state.form else {
        return;
    };
    form.set_props(props);
    if state.result.is_empty() {
        form.render(f, area, true, tick);
        return;
    }
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    form.render(f, cols[0], true, tick);
    state.result.render(f, cols[1], false, tick);
}

fn draw_debug(f: &mut Frame, area: Rect, state: &AppState) {
    let b = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            "Debug",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ));
    let h = area.height.saturating_sub(1) as usize;
    let start = state.debug_log.len().saturating_sub(h);
    let lines: Vec<Line> = state
        .debug_log
        .iter()
        .skip(start)
        .map(|s| Line::raw(s.clone()))
        .collect();
    let p = Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .block(b)
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let w = r.width.saturating_mul(percent_x) / 100;
    let h = height.min(r.height);
    Rect {
        x: r.x + (r.width.saturating_sub(w)) / 2,
        y: r.y + (r.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState {
            next_generation: 1,
            ..Default::default()
        }
    }

    #[test]
    fn esc_unmounts_and_clears_submit_flag() {
        let mut st = state();
        assert!(!handle_key(&mut st, KeyCode::Char('g')));
        let form = st.form.as_mut().unwrap();
        let effs = [
            form.change_session_id("12"),
            form.change_model_type("svm"),
            form.change_kernel_type("rbf"),
        ]
        .into_iter()
        .flatten()
        .collect();
        run_effects(&mut st, effs);
        assert!(st.store.state().page.submit_button.analysis);

        handle_key(&mut st, KeyCode::Esc);
        assert!(st.form.is_none());
        assert_eq!(st.view, View::Welcome);
        assert!(!st.store.state().page.submit_button.analysis);
    }

    #[test]
    fn quit_unmounts_first() {
        let mut st = state();
        handle_key(&mut st, KeyCode::Enter);
        assert!(st.form.is_some());
        assert!(handle_key(&mut st, KeyCode::Char('q')));
        assert!(st.form.is_none());
    }

    #[test]
    fn esc_inside_picker_only_closes_picker() {
        let mut st = state();
        handle_key(&mut st, KeyCode::Char('g'));
        handle_key(&mut st, KeyCode::Enter);
        assert!(st.form.as_ref().unwrap().is_picking());
        handle_key(&mut st, KeyCode::Esc);
        assert!(st.form.is_some());
        assert!(!st.form.as_ref().unwrap().is_picking());
    }

    #[test]
    fn login_prompt_and_logout_update_store_and_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::new(dir.path().join("session.yaml"));
        let mut st = AppState {
            storage: Some(storage.clone()),
            ..state()
        };
        handle_key(&mut st, KeyCode::Char('l'));
        for c in "ada".chars() {
            handle_key(&mut st, KeyCode::Char(c));
        }
        handle_key(&mut st, KeyCode::Enter);
        assert!(st.login_input.is_none());
        assert_eq!(st.store.state().user.name, "ada");
        assert_eq!(storage.get_item(USERNAME_KEY).as_deref(), Some("ada"));

        handle_key(&mut st, KeyCode::Char('o'));
        assert_eq!(st.store.state().user.name, "anonymous");
        assert_eq!(storage.get_item(USERNAME_KEY), None);
    }

    fn write_config(dir: &Path, title: &str) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let p = dir.join(CONFIG_FILE);
        fs::write(&p, format!("title: {title}\n")).unwrap();
        p
    }

    #[test]
    fn config_dir_from_env_wins_over_cwd() {
        let root = tempfile::tempdir().unwrap();
        let cwd = root.path().join("work");
        write_config(&cwd, "cwd");
        let env_dir = root.path().join("etc");
        let from_env = write_config(&env_dir, "env");
        assert_eq!(find_config(&cwd, Some(&env_dir), None), Some(from_env.clone()));
        let loaded = load_config_from(Some(from_env)).unwrap();
        assert_eq!(loaded.config.title, "env");
        assert_eq!(loaded.dir.as_deref(), Some(env_dir.as_path()));
    }

    #[test]
    fn cwd_config_wins_over_ancestor_tui_dir() {
        let root = tempfile::tempdir().unwrap();
        let cwd = root.path().join("a").join("b");
        let ancestor = write_config(&root.path().join("a").join(".tui"), "ancestor");
        fs::create_dir_all(&cwd).unwrap();
        assert_eq!(find_config(&cwd, None, None), Some(ancestor));

        let local = write_config(&cwd.join(".tui"), "local");
        assert_eq!(find_config(&cwd, None, None), Some(local));
        let direct = write_config(&cwd, "direct");
        assert_eq!(find_config(&cwd, None, None), Some(direct));
    }

    #[test]
    fn home_tui_dir_is_last_resort_and_defaults_apply_otherwise() {
        let root = tempfile::tempdir().unwrap();
        let cwd = root.path().join("work");
        fs::create_dir_all(&cwd).unwrap();
        let home = root.path().join("home");
        fs::create_dir_all(&home).unwrap();
        assert_eq!(find_config(&cwd, None, Some(&home)), None);

        let loaded = load_config_from(None).unwrap();
        assert_eq!(loaded.config.title, AppConfig::default().title);
        assert!(loaded.dir.is_none());

        let in_home = write_config(&home.join(".tui"), "home");
        assert_eq!(find_config(&cwd, None, Some(&home)), Some(in_home));
    }

    #[test]
    fn explicit_config_dir_without_file_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let found = find_config(root.path(), Some(root.path()), None);
        assert!(load_config_from(found).is_err());
    }

    #[test]
    fn headless_run_mounts_then_cleans_up() {
        let mut st = state();
        run_headless(&mut st, 0, true).unwrap();
        assert!(st.form.is_none());
        assert_eq!(st.view, View::Welcome);
        assert_eq!(st.store.state().page.status, "default");
        assert!(!st.store.state().page.submit_button.analysis);
        assert!(st.debug_log.iter().any(|l| l.contains("mount model_generate")));
    }

    #[test]
    fn smoke_summary_reports_failed_fetch() {
        let mut st = state();
        handle_key(&mut st, KeyCode::Char('g'));
        let effs = update(
            &mut st,
            AppMsg::LoadedSessions {
                generation: 1,
                outcome: Err(FetchError::Status {
                    status: 500,
                    message: "down".into(),
                }),
            },
        );
        run_effects(&mut st, effs);
        let v = smoke_summary(&st);
        assert_eq!(v["view"], "Analysis");
        assert_eq!(v["mounted"], true);
        assert_eq!(v["loading"], false);
        assert!(v["options"].is_null());
        assert_eq!(v["fetch_status"], 500);
        assert_eq!(v["fetch_error"], "down");
        assert_eq!(v["submit_enabled"], false);
        assert_eq!(v["user"], "anonymous");
        assert_eq!(v["dispatches"], 1);
    }

    #[test]
    fn session_file_resolves_against_config_dir() {
        let loaded = LoadedConfig {
            config: AppConfig {
                session_file: Some("state/s.yaml".into()),
                ..Default::default()
            },
            dir: Some(PathBuf::from("/etc/ml")),
        };
        if std::env::var("ML_TUI_SESSION_FILE").is_err() {
            assert_eq!(
                session_file_path(&loaded),
                PathBuf::from("/etc/ml/state/s.yaml")
            );
        }
    }

    #[test]
    fn analysis_screen_renders_form_and_identity() {
        let mut st = state();
        st.store = Store::new(crate::store::SharedState::initial(Some("ada".into())));
        handle_key(&mut st, KeyCode::Char('g'));
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, &mut st)).unwrap();
        let buf = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        assert!(text.contains("Logged in as ada"));
        assert!(text.contains("Generate Model"));
        assert!(text.contains("submit: off"));
    }
}
