use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};

use crate::app::App;
use crate::ui::style::{
    COLOR_ACTIVE, COLOR_BUSY, COLOR_IDLE, COLOR_SELECTED_BG, ICON_ACTIVE, ICON_BUSY, ICON_IDLE,
    make_block,
};

pub fn draw_demos(frame: &mut Frame, app: &App, area: Rect, focused: bool) {
    let block = make_block("Demos", focused);

    if app.demos.is_empty() {
        let item = ListItem::new(Line::from(Span::styled(
            "No demos configured",
            Style::default().fg(COLOR_IDLE),
        )));
        frame.render_widget(List::new(vec![item]).block(block), area);
        return;
    }

    let starting = match &app.phase {
        Some(crate::launcher::LaunchPhase::Starting { demo }) => Some(demo.as_str()),
        _ => None,
    };

    let items: Vec<ListItem> = app
        .demos
        .iter()
        .map(|entry| {
            let (icon, color) = if starting == Some(entry.name.as_str()) {
                (ICON_BUSY, COLOR_BUSY)
            } else if app.active.as_deref() == Some(entry.name.as_str()) {
                (ICON_ACTIVE, COLOR_ACTIVE)
            } else {
                (ICON_IDLE, COLOR_IDLE)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{icon} "), Style::default().fg(color)),
                Span::raw(entry.name.clone()),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.selected));

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(COLOR_SELECTED_BG)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_stateful_widget(list, area, &mut state);
}
