//! Shared output formatting helpers for commands

pub mod screen;
pub mod status;

pub use screen::{print_screen, screen_json};
pub use status::{print_json, print_json_status};
