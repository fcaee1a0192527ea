mod state;

pub use state::{App, DemoEntry, Panel};
