//! Settings loading from disk.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::config::de;
use crate::config::defaults::SettingsProfile;
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::schema::Settings;

/// Load settings from a JSON file and apply defaults for `profile`.
///
/// The whole file is read before decoding. Either a fully defaulted record
/// is returned or an error; nothing partial escapes. Errors are returned,
/// not logged; the caller decides how startup ends.
pub fn load_settings(path: &Path, profile: SettingsProfile) -> ConfigResult<Settings> {
    tracing::info!(path = %path.display(), %profile, "Reading settings");

    let data = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(data = %String::from_utf8_lossy(&data), "Settings json data");

    let settings = decode_settings(&data, profile).map_err(|source| ConfigError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    // Includes credentials (queue passwords, API tokens).
    tracing::info!(settings = ?settings, "Final settings object being used");

    Ok(settings)
}

/// Decode settings from an in-memory JSON document and apply defaults.
pub fn parse_settings(json: &str, profile: SettingsProfile) -> Result<Settings, serde_json::Error> {
    decode_settings(json.as_bytes(), profile)
}

/// `null` anywhere in an object counts as unset, and a `null` document
/// decodes to an all-zero record.
fn decode_settings(data: &[u8], profile: SettingsProfile) -> Result<Settings, serde_json::Error> {
    let mut value: Value = serde_json::from_slice(data)?;
    de::strip_nulls(&mut value);

    let mut settings: Settings = de::record(value)?;
    settings.apply_defaults(profile);
    Ok(settings)
}

impl Settings {
    /// See [`load_settings`].
    pub fn load(path: impl AsRef<Path>, profile: SettingsProfile) -> ConfigResult<Self> {
        load_settings(path.as_ref(), profile)
    }
}
