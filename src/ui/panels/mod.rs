mod demos;
mod output;
mod status;

pub use demos::draw_demos;
pub use output::draw_output;
pub use status::draw_status;
