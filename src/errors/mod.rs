//! Centralized error handling module
//!
//! Initialization failures surface as [`InitError`]; per-send failures
//! are converted into a uniform `SendResult` by the messaging layer and
//! never raised past the public boundary.

pub mod types;

pub use types::{InitError, NotificationError, TransportError, ValidationCode};
