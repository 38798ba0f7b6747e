//! Load-time defaults for unset settings.
//!
//! Only a handful of fields are defaulted; everything else keeps whatever the
//! file supplied (or the zero value) and is left to the consuming service.
//! A field counts as unset when it holds its zero value, so an explicit `0`
//! in the file is treated the same as a missing key. The one exception is
//! `retry_count`, where absence and `0` mean different things.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use thiserror::Error;

use crate::config::schema::{DagVerifierSettings, Settings};

pub const DEFAULT_RETRY_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_HTTP_CLIENT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAYLOAD_COMMIT_CONCURRENCY: usize = 20;
pub const DEFAULT_UPLOAD_URL_SUFFIX: &str = "/upload";

pub const DEFAULT_VERIFIER_RUN_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_VERIFIER_SUPPRESS_NOTIFICATION_SECS: u64 = 1800;
pub const DEFAULT_VERIFIER_CONCURRENCY: usize = 10;

/// Which family of services the settings are loaded for.
///
/// The payload committer runs with the reduced settings set; the auditor
/// services (pruning, DAG verifier, consensus submission) use the extended
/// one and always carry a DAG verifier section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum SettingsProfile {
    PayloadCommit,
    #[default]
    Auditor,
}

impl SettingsProfile {
    /// Retry count used when the file does not set `retry_count`.
    pub fn default_retry_count(self) -> i64 {
        match self {
            SettingsProfile::PayloadCommit => 15,
            SettingsProfile::Auditor => 10,
        }
    }

    /// Whether the DAG verifier section is materialized and defaulted.
    pub fn has_dag_verifier(self) -> bool {
        matches!(self, SettingsProfile::Auditor)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SettingsProfile::PayloadCommit => "payload-commit",
            SettingsProfile::Auditor => "auditor",
        }
    }
}

impl fmt::Display for SettingsProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A profile name that is neither `payload-commit` nor `auditor`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown settings profile `{0}`, expected `payload-commit` or `auditor`")]
pub struct UnknownProfile(pub String);

impl FromStr for SettingsProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payload-commit" => Ok(SettingsProfile::PayloadCommit),
            "auditor" => Ok(SettingsProfile::Auditor),
            other => Err(UnknownProfile(other.to_string())),
        }
    }
}

impl Settings {
    /// Fill unset fields with their defaults.
    ///
    /// Applying twice yields the same record as applying once.
    pub fn apply_defaults(&mut self, profile: SettingsProfile) {
        self.retry_count = Some(match self.retry_count {
            None => profile.default_retry_count(),
            // 0 in the file means retry forever.
            Some(0) => i64::MAX,
            Some(count) => count,
        });

        if self.retry_interval_secs == 0 {
            self.retry_interval_secs = DEFAULT_RETRY_INTERVAL_SECS;
        }
        if self.http_client_timeout_secs == 0 {
            self.http_client_timeout_secs = DEFAULT_HTTP_CLIENT_TIMEOUT_SECS;
        }
        if self.payload_commit_concurrency == 0 {
            self.payload_commit_concurrency = DEFAULT_PAYLOAD_COMMIT_CONCURRENCY;
        }
        if self.web3_storage.upload_url_suffix.is_empty() {
            self.web3_storage.upload_url_suffix = DEFAULT_UPLOAD_URL_SUFFIX.to_string();
        }

        if profile.has_dag_verifier() {
            self.dag_verifier
                .get_or_insert_with(DagVerifierSettings::default)
                .apply_defaults();
        }
    }
}

impl DagVerifierSettings {
    fn apply_defaults(&mut self) {
        if self.run_interval_secs == 0 {
            self.run_interval_secs = DEFAULT_VERIFIER_RUN_INTERVAL_SECS;
        }
        if self.slack_notify_url.is_empty() {
            tracing::warn!(
                "Slack notification URL is not set, issues observed by the DAG verifier will not be notified"
            );
        }
        if self.suppress_notification_secs == 0 {
            self.suppress_notification_secs = DEFAULT_VERIFIER_SUPPRESS_NOTIFICATION_SECS;
        }
        if self.concurrency == 0 {
            self.concurrency = DEFAULT_VERIFIER_CONCURRENCY;
        }
    }
}
