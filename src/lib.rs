//! Settings loader for the audit-protocol backend services.
//!
//! The payload committer, pruning service, DAG verifier and consensus
//! submitter all start by loading the same JSON settings file. This crate
//! owns that file's schema, the load-time defaults, and the startup binary
//! that checks a settings file before deployment.

pub mod config;
pub mod observability;

pub use config::{load_settings, ConfigError, Settings, SettingsProfile};
