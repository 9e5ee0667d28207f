use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::widgets::chrome::panel_block;

/// Last `/load-data` reply, pretty-printed, or the error that replaced it.
#[derive(Debug, Default)]
pub struct ResultViewer {
    pub json_pretty: Option<String>,
    pub error: Option<String>,
    pub scroll_y: u16,
}

impl ResultViewer {
    pub fn show_json(&mut self, v: &serde_json::Value) {
        self.json_pretty =
            Some(serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()));
        self.error = None;
        self.scroll_y = 0;
    }

    pub fn show_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
        self.json_pretty = None;
        self.scroll_y = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.json_pretty.is_none() && self.error.is_none()
    }

    pub fn scroll(&mut self, delta: i32) {
        let total = self
            .json_pretty
            .as_deref()
            .map(|s| s.lines().count())
            .unwrap_or(0) as i32;
        let next = (self.scroll_y as i32 + delta).clamp(0, total.saturating_sub(1).max(0));
        self.scroll_y = next as u16;
    }
}

impl crate::widgets::Widget for ResultViewer {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, _tick: u64) {
        let block = panel_block("Result", focused);
        let p = if let Some(err) = &self.error {
            Paragraph::new(Span::styled(err.clone(), crate::theme::text_error()))
        } else {
            let text = self.json_pretty.clone().unwrap_or_default();
            Paragraph::new(text).scroll((self.scroll_y, 0))
        };
        f.render_widget(p.block(block).wrap(Wrap { trim: false }), area);
    }

    fn on_key(&mut self, key: crossterm::event::KeyCode) -> Vec<crate::app::Effect> {
        use crossterm::event::KeyCode;
        match key {
            KeyCode::PageUp => self.scroll(-10),
            KeyCode::PageDown => self.scroll(10),
            _ => {}
        }
        Vec::new()
    }
}
