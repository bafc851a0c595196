//! Application layer managing state and reviewer workflows.
//!
//! Sits between the domain store and the presentation layer, tracking
//! selection and UI mode and dispatching review intents.

pub mod state;

pub use state::*;
