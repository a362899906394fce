//! Utility functions shared by the UI.
//!
//! - **Text processing**: Unicode-aware width and truncation, control
//!   character stripping
//! - **URL validation**: checks before handing a URL to the system browser

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};
