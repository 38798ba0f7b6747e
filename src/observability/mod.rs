//! Observability subsystem.
//!
//! # Design Decisions
//! - Library code only emits `tracing` events; the binary installs the
//!   subscriber once at startup
//! - Log level comes from `RUST_LOG`, falling back to info for this crate

pub mod logging;
