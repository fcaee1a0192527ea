use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Panel};
use crate::ui::overlay::draw_help_overlay;
use crate::ui::panels::{draw_demos, draw_output, draw_status};
use crate::ui::style::{COLOR_BUSY, COLOR_IDLE, COLOR_TITLE};

pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    // Title | body | key hints
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(size);

    let title = Paragraph::new(Line::from(Span::styled(
        app.title.as_str(),
        Style::default()
            .fg(COLOR_TITLE)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, rows[0]);

    // Body: demo list (left) | status over output (right)
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(columns[1]);

    draw_demos(frame, app, columns[0], app.focused_panel == Panel::Demos);
    draw_status(frame, app, right[0], app.focused_panel == Panel::Status);
    draw_output(frame, app, right[1], app.focused_panel == Panel::Output);

    frame.render_widget(footer(app), rows[2]);

    if app.show_help {
        draw_help_overlay(frame, size);
    }
}

fn footer(app: &App) -> Paragraph<'static> {
    let hint = if app.busy {
        Span::styled(
            " working…  Esc cancel  q quit",
            Style::default().fg(COLOR_BUSY),
        )
    } else {
        Span::styled(
            " Enter launch  s stop all  ? help  q quit",
            Style::default().fg(COLOR_IDLE),
        )
    };
    Paragraph::new(Line::from(hint))
}
