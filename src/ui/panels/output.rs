use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::app::App;
use crate::ui::style::{COLOR_IDLE, make_block};

pub fn draw_output(frame: &mut Frame, app: &App, area: Rect, focused: bool) {
    let block = make_block("Output", focused);

    let lines: Vec<Line> = if app.output.is_empty() {
        vec![Line::from(Span::styled(
            "No compose output yet",
            Style::default().fg(COLOR_IDLE),
        ))]
    } else {
        app.output.iter().map(|l| Line::raw(l.as_str())).collect()
    };

    // Follow the tail unless the user scrolled.
    let visible = area.height.saturating_sub(2);
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let tail = total.saturating_sub(visible);
    let scroll = if app.output_scroll == 0 {
        tail
    } else {
        tail.saturating_sub(app.output_scroll)
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}
