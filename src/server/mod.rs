// Web front end: the launcher page served over HTTP.

pub mod handler;
pub mod page;

pub use handler::{ApiResponse, AppState, DemoInfo, router, serve};
