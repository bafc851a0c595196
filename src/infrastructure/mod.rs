//! Infrastructure layer providing external service integrations.
//!
//! Storage backends, CSV file output, configuration and logging setup.

pub mod persistence;
pub mod export;
pub mod config;
pub mod logging;

pub use persistence::*;
pub use export::*;
pub use config::*;
pub use logging::*;
