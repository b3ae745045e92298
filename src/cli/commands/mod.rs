mod browse;
mod render;
mod search;
mod trending;

pub use browse::{browse_lines, cmd_browse};
pub use search::{cmd_discover, cmd_search};
pub use trending::cmd_trending;
