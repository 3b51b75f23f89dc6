//! Driven adapters: concrete implementations of the domain port traits.

pub mod hardware;
pub mod log_sink;

pub use hardware::HardwareAdapter;
pub use log_sink::LogEventSink;
