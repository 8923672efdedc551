//! Logging setup.
//!
//! The library itself only emits through the `log` facade; hosts call
//! [`init_logging`] once at startup to route records to stderr.

mod init;

pub use init::{init_logging, LoggingConfig};
