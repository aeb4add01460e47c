//! Observability subsystem
//!
//! Structured JSON-line logging of typed engine events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No global configuration or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use surveycut::observability::{Event, Logger};
//!
//! Logger::event(Event::BatchStart, &[("cuts", "4")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
