//! Terminal browser for a curated catalog of interview-prep videos.
//!
//! - [`catalog`]: taxonomy, the `Video` record and the HTTP client
//! - [`selection`]: the browsing state and its pure transition function
//! - [`orchestrator`]: runs fetches as tokio tasks and feeds results back
//! - [`app`] / [`ui`]: the ratatui front end

pub mod app;
pub mod catalog;
pub mod config;
pub mod keybindings;
pub mod orchestrator;
pub mod selection;
pub mod theme;
pub mod ui;
pub mod util;
