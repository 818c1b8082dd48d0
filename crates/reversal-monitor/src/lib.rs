//! Logging and diagnostics.

mod logging;

pub use logging::{default_filter, setup_logging};
