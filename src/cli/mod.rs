mod commands;
mod handlers;

pub use commands::{Cli, Commands, ComposeArgs};
pub use handlers::{handle_compose, handle_guide};
