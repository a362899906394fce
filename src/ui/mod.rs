//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `render` - View rendering dispatch
//! - `categories` - Category sidebar widget
//! - `chips` - Subcategory / language chip row
//! - `videos` - Video list widget
//! - `player` - Playback view for the selected video
//! - `status` - Status bar widget
//! - `help` - Keybinding help overlay

mod categories;
mod chips;
mod help;
mod input;
mod loop_runner;
mod player;
mod render;
mod status;
mod videos;

pub use input::handle_input;
pub use loop_runner::{run, Action};
