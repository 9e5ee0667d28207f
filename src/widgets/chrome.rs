use ratatui::widgets::{Block, Borders};

pub fn panel_block<'a>(title: &'a str, focused: bool) -> Block<'a> {
    let border = if focused {
        crate::theme::border_focused()
    } else {
        crate::theme::border_unfocused()
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border)
}
