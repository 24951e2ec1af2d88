pub mod commands;
pub mod render;

pub use commands::{is_recoverable_read_error, parse_command, Command, CommandError, HELP_TEXT};
pub use render::{render_card, render_controls, render_error, render_page, render_results};
