mod draw;
pub mod markdown;
mod overlay;
mod panels;
pub mod style;

pub use draw::draw;
