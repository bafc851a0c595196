//! shortlist - Application Review Dashboard Library
//!
//! Review candidate applications in the terminal: mark each one
//! Shortlisted, Rejected or New, keep the decisions in local storage and
//! export everything as CSV.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
