//! Presentation layer handling terminal UI and user input.
//!
//! Renders the statistics bar, applicant list and applicant card with
//! ratatui and maps key presses to application intents.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
