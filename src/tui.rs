// Terminal front end: event loop, key handling, background operations.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use crate::app::{App, Panel};
use crate::docker::CancelToken;
use crate::launcher::{self, SharedLauncher};
use crate::ui;

/// Something the key handler wants the loop to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Launch(String),
    StopAll,
}

/// Run the terminal UI until the user quits.
pub fn run(shared: SharedLauncher, title: &str) -> Result<()> {
    // Ensure terminal is restored on panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let mut app = {
        let launcher = launcher::lock(&shared);
        App::new(title, launcher.registry())
    };

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, &shared);
    restore_terminal()?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    shared: &SharedLauncher,
) -> Result<()> {
    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Short timeout while busy to drain launcher events promptly, longer
        // when idle to save CPU.
        let poll_timeout = if app.busy {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(200)
        };
        if event::poll(poll_timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(action) = handle_key(app, key)
        {
            start(app, shared, action);
        }

        app.drain_events();
    }

    if let Some(token) = &app.cancel_token {
        token.cancel();
    }
    Ok(())
}

fn start(app: &mut App, shared: &SharedLauncher, action: Action) {
    match action {
        Action::Launch(name) => {
            info!(demo = %name, "launch requested");
            let cancel = CancelToken::new();
            let rx = launcher::spawn_launch(shared.clone(), Some(name), cancel.clone());
            app.begin(rx, Some(cancel));
        }
        Action::StopAll => {
            info!("stop all requested");
            let rx = launcher::spawn_stop_all(shared.clone());
            app.begin(rx, None);
        }
    }
}

/// Apply a key press. Returns an action for the loop to run, if any.
///
/// Launch and stop are ignored while an operation is in flight.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    if app.show_help {
        app.show_help = false;
        return None;
    }

    // Global keys.
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), _) => {
            app.running = false;
            return None;
        }
        (KeyCode::Char('?'), _) => {
            app.show_help = true;
            return None;
        }
        (KeyCode::Esc, _) => {
            if let Some(token) = &app.cancel_token {
                token.cancel();
            }
            return None;
        }
        (KeyCode::Char('s'), _) => {
            return (!app.busy).then_some(Action::StopAll);
        }
        (KeyCode::Enter, _) | (KeyCode::Char('L'), _) => {
            if app.busy {
                return None;
            }
            return app.selected_demo().map(|d| Action::Launch(d.name.clone()));
        }
        _ => {}
    }

    // Panel switching.
    match key.code {
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
            app.focused_panel = app.focused_panel.next();
            return None;
        }
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
            app.focused_panel = app.focused_panel.prev();
            return None;
        }
        KeyCode::Char(c @ '1'..='3') => {
            if let Some(panel) = Panel::from_index((c as usize) - ('1' as usize)) {
                app.focused_panel = panel;
            }
            return None;
        }
        KeyCode::PageUp => {
            app.output_scroll = app.output_scroll.saturating_add(5);
            return None;
        }
        KeyCode::PageDown => {
            app.output_scroll = app.output_scroll.saturating_sub(5);
            return None;
        }
        _ => {}
    }

    // Panel-specific keys.
    match app.focused_panel {
        Panel::Demos => match key.code {
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Home | KeyCode::Char('g') => app.select_first(),
            KeyCode::End | KeyCode::Char('G') => app.select_last(),
            _ => {}
        },
        Panel::Output => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                app.output_scroll = app.output_scroll.saturating_add(1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.output_scroll = app.output_scroll.saturating_sub(1)
            }
            _ => {}
        },
        Panel::Status => {}
    }
    None
}
