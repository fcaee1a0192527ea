pub mod app;
pub mod config;
pub mod docker;
pub mod launcher;
pub mod logging;
pub mod registry;
pub mod server;
pub mod tui;
pub mod ui;
