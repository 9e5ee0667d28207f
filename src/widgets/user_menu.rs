use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::widgets::analysis_layout::LayoutProps;

/// Header row: app title on the left, identity actions on the right.
pub fn draw_user_menu(f: &mut Frame, area: Rect, title: &str, props: &LayoutProps) {
    let right: Vec<Span> = if props.is_anonymous() {
        vec![
            Span::styled("[l] Sign in", crate::theme::text_active_bold()),
            Span::raw("  "),
        ]
    } else {
        vec![
            Span::raw("Logged in as "),
            Span::styled(props.username.clone(), crate::theme::text_active_bold()),
            Span::raw("  "),
            Span::styled("[o] Log out", crate::theme::text_muted()),
            Span::raw("  "),
        ]
    };
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_width(&right))])
        .split(area);
    let mut left = vec![Span::styled(
        format!(" {title}"),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if props.page_status != "default" {
        left.push(Span::styled(
            format!("  / {}", props.page_status),
            crate::theme::text_muted(),
        ));
    }
    let left = Paragraph::new(Line::from(left)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(crate::theme::border_unfocused()),
    );
    f.render_widget(left, cols[0]);
    let right = Paragraph::new(Line::from(right))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(crate::theme::border_unfocused()),
        );
    f.render_widget(right, cols[1]);
}

fn right_width(spans: &[Span]) -> u16 {
    spans.iter().fold(0u16, |acc, s| {
        acc.saturating_add(u16::try_from(s.width()).unwrap_or(u16::MAX))
    })
}

/// One-line username prompt shown while signing in.
pub fn draw_login_prompt(f: &mut Frame, area: Rect, input: &str, cursor_on: bool) {
    let mut text = input.to_string();
    if cursor_on {
        text.push('▏');
    }
    let p = Paragraph::new(Line::from(vec![
        Span::raw("Username: "),
        Span::styled(text, crate::theme::text_editing_bold()),
    ]))
    .block(crate::widgets::chrome::panel_block(
        "Sign in (Enter confirm, Esc cancel)",
        true,
    ));
    f.render_widget(Clear, area);
    f.render_widget(p, area);
}
