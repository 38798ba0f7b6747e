//! Settings management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (JSON)
//!     → loader.rs (read whole file & deserialize)
//!     → defaults.rs (fill unset fields for the service profile)
//!     → Settings (defaulted, read-only from here on)
//!     → handed to the payload committer / pruner / DAG verifier
//! ```
//!
//! # Design Decisions
//! - One superset schema; per-service sections are optional
//! - Missing or `null` keys decode to zero values, defaults are applied once afterwards
//! - Nested sections must be JSON objects
//! - Any read or decode failure is returned to the caller, which aborts startup

pub mod de;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod schema;

pub use defaults::{SettingsProfile, UnknownProfile};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_settings, parse_settings};
pub use schema::{RateLimit, Settings};
