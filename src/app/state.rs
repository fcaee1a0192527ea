use std::sync::mpsc::Receiver;

use crate::docker::CancelToken;
use crate::launcher::{INITIAL_STATUS, LaunchPhase, LauncherEvent};
use crate::registry::DemoRegistry;

/// Oldest output lines are dropped past this many.
const MAX_OUTPUT_LINES: usize = 500;

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Demos,
    Status,
    Output,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Demos, Panel::Status, Panel::Output];

    pub fn index(self) -> usize {
        match self {
            Panel::Demos => 0,
            Panel::Status => 1,
            Panel::Output => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn next(self) -> Self {
        let i = (self.index() + 1) % Self::ALL.len();
        Self::ALL[i]
    }

    pub fn prev(self) -> Self {
        let i = (self.index() + Self::ALL.len() - 1) % Self::ALL.len();
        Self::ALL[i]
    }
}

/// One row of the demo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoEntry {
    pub name: String,
    pub url: String,
}

/// Top-level application state.
pub struct App {
    pub running: bool,
    pub title: String,
    pub focused_panel: Panel,
    pub show_help: bool,

    pub demos: Vec<DemoEntry>,
    /// Index of the highlighted demo.
    pub selected: usize,
    /// Demo the last launch started. Display only.
    pub active: Option<String>,

    /// Markdown shown in the status panel.
    pub status: String,
    /// Phase of the operation in flight, if any.
    pub phase: Option<LaunchPhase>,
    /// Whether a launch or stop is running.
    pub busy: bool,

    /// Compose output of the current or last launch.
    pub output: Vec<String>,
    pub output_scroll: u16,

    pub event_rx: Option<Receiver<LauncherEvent>>,
    pub cancel_token: Option<CancelToken>,
}

impl App {
    pub fn new(title: &str, registry: &DemoRegistry) -> Self {
        Self {
            running: true,
            title: title.to_string(),
            focused_panel: Panel::Demos,
            show_help: false,
            demos: registry
                .iter()
                .map(|d| DemoEntry {
                    name: d.display_name.clone(),
                    url: d.url.clone(),
                })
                .collect(),
            selected: 0,
            active: None,
            status: INITIAL_STATUS.to_string(),
            phase: None,
            busy: false,
            output: Vec::new(),
            output_scroll: 0,
            event_rx: None,
            cancel_token: None,
        }
    }

    pub fn selected_demo(&self) -> Option<&DemoEntry> {
        self.demos.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.demos.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.demos.len().saturating_sub(1);
    }

    /// Mark an operation as started and wire up its event stream.
    pub fn begin(&mut self, rx: Receiver<LauncherEvent>, cancel: Option<CancelToken>) {
        self.event_rx = Some(rx);
        self.cancel_token = cancel;
        self.busy = true;
        self.phase = None;
        self.output.clear();
        self.output_scroll = 0;
    }

    /// Fold one event into the state. Returns true on `Finished`.
    pub fn apply_event(&mut self, event: LauncherEvent) -> bool {
        match event {
            LauncherEvent::PhaseChanged(phase) => {
                self.phase = Some(phase);
                false
            }
            LauncherEvent::Log(line) => {
                self.output.push(line);
                if self.output.len() > MAX_OUTPUT_LINES {
                    let excess = self.output.len() - MAX_OUTPUT_LINES;
                    self.output.drain(..excess);
                }
                false
            }
            LauncherEvent::Finished(done) => {
                self.status = done.message;
                self.active = done.launched;
                self.phase = None;
                self.busy = false;
                true
            }
        }
    }

    /// Drain pending events without blocking.
    pub fn drain_events(&mut self) {
        let Some(rx) = self.event_rx.take() else {
            return;
        };
        let mut finished = false;
        while let Ok(ev) = rx.try_recv() {
            if self.apply_event(ev) {
                finished = true;
                break;
            }
        }
        if finished {
            self.cancel_token = None;
        } else {
            self.event_rx = Some(rx);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::launcher::Completion;

    fn app() -> App {
        App::new("Demos", &DemoRegistry::default())
    }

    #[test]
    fn panel_cycles_wrap() {
        assert_eq!(Panel::Demos.next(), Panel::Status);
        assert_eq!(Panel::Output.next(), Panel::Demos);
        assert_eq!(Panel::Demos.prev(), Panel::Output);
        assert_eq!(Panel::from_index(2), Some(Panel::Output));
        assert_eq!(Panel::from_index(3), None);
    }

    #[test]
    fn new_app_lists_registry_in_order() {
        let app = app();
        assert_eq!(app.demos.len(), 3);
        assert_eq!(app.demos[0].name, "Object Detection (YOLO)");
        assert_eq!(app.status, INITIAL_STATUS);
        assert!(!app.busy);
    }

    #[test]
    fn selection_is_clamped() {
        let mut app = app();
        app.select_prev();
        assert_eq!(app.selected, 0);
        for _ in 0..10 {
            app.select_next();
        }
        assert_eq!(app.selected, 2);
        app.select_first();
        assert_eq!(app.selected, 0);
        app.select_last();
        assert_eq!(app.selected_demo().unwrap().name, "LLM Chat (Ollama)");
    }

    #[test]
    fn drain_applies_until_finished() {
        let mut app = app();
        let (tx, rx) = mpsc::channel();
        app.begin(rx, Some(CancelToken::new()));
        tx.send(LauncherEvent::PhaseChanged(LaunchPhase::StoppingAll)).unwrap();
        tx.send(LauncherEvent::Log("Container a  Started".into())).unwrap();

        app.drain_events();
        assert!(app.busy);
        assert_eq!(app.phase, Some(LaunchPhase::StoppingAll));
        assert_eq!(app.output, vec!["Container a  Started".to_string()]);

        tx.send(LauncherEvent::Finished(Completion {
            message: "done".into(),
            launched: Some("A".into()),
        }))
        .unwrap();
        app.drain_events();
        assert!(!app.busy);
        assert!(app.event_rx.is_none());
        assert!(app.cancel_token.is_none());
        assert_eq!(app.status, "done");
        assert_eq!(app.active.as_deref(), Some("A"));
        assert!(app.phase.is_none());
    }

    #[test]
    fn output_is_bounded() {
        let mut app = app();
        for i in 0..(MAX_OUTPUT_LINES + 10) {
            app.apply_event(LauncherEvent::Log(format!("line {i}")));
        }
        assert_eq!(app.output.len(), MAX_OUTPUT_LINES);
        assert_eq!(app.output[0], "line 10");
    }
}
