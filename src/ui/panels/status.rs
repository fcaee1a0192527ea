use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::app::App;
use crate::ui::markdown;
use crate::ui::style::{COLOR_BUSY, COLOR_IDLE, ICON_BUSY, link_style, make_block};

pub fn draw_status(frame: &mut Frame, app: &App, area: Rect, focused: bool) {
    let block = make_block("Status", focused);

    let mut lines: Vec<Line> = Vec::new();

    if app.busy {
        let label = app
            .phase
            .as_ref()
            .map(|p| p.label())
            .unwrap_or_else(|| "Working…".to_string());
        lines.push(Line::from(Span::styled(
            format!("{ICON_BUSY} {label}"),
            Style::default()
                .fg(COLOR_BUSY)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::default());
    }

    lines.extend(markdown::to_lines(&app.status));

    if !app.busy
        && let Some(entry) = app.selected_demo()
    {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("Selected: ", Style::default().fg(COLOR_IDLE)),
            Span::raw(entry.name.clone()),
            Span::styled("  ", Style::default()),
            Span::styled(entry.url.clone(), link_style()),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
