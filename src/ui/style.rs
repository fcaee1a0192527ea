use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

// ── Colour constants ──────────────────────────────────────────────────
pub const COLOR_ACTIVE: Color = Color::Green;
pub const COLOR_BUSY: Color = Color::Yellow;
pub const COLOR_IDLE: Color = Color::DarkGray;
pub const COLOR_SELECTED_BG: Color = Color::DarkGray;
pub const COLOR_LINK: Color = Color::Cyan;
pub const COLOR_TITLE: Color = Color::Cyan;

// ── Icon constants ────────────────────────────────────────────────────
pub const ICON_ACTIVE: &str = "●";
pub const ICON_IDLE: &str = "○";
pub const ICON_BUSY: &str = "◉";

// ── Helpers ───────────────────────────────────────────────────────────

pub fn link_style() -> Style {
    Style::default()
        .fg(COLOR_LINK)
        .add_modifier(Modifier::UNDERLINED)
}

pub fn make_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style)
}
