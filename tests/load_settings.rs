//! Settings loading from files on disk.

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use audit_settings::config::defaults::{
    DEFAULT_UPLOAD_URL_SUFFIX, DEFAULT_VERIFIER_CONCURRENCY, DEFAULT_VERIFIER_RUN_INTERVAL_SECS,
    DEFAULT_VERIFIER_SUPPRESS_NOTIFICATION_SECS,
};
use audit_settings::config::schema::RedisSettings;
use audit_settings::config::{load_settings, parse_settings, RateLimit};
use audit_settings::{ConfigError, Settings, SettingsProfile};

mod common;

#[test]
fn test_load_full_settings() {
    let dir = tempdir().unwrap();
    let path = common::write_settings(&dir, common::FULL_SETTINGS);

    let settings = load_settings(&path, SettingsProfile::Auditor).unwrap();

    assert_eq!(settings.host, "0.0.0.0");
    assert_eq!(settings.port, 9000);
    assert_eq!(settings.rabbitmq.setup.core.exchange, "audit-protocol-commit-payloads");
    assert_eq!(
        settings.redis,
        RedisSettings {
            host: "redis".into(),
            port: 6379,
            db: 0,
            password: None,
        }
    );
    assert_eq!(settings.redis_reader.password.as_deref(), Some("reader-secret"));
    assert_eq!(settings.bloom_filter_settings.error_rate, 0.01);
    assert_eq!(settings.bloom_filter_settings.filename, serde_json::json!("bloom_filter.bin"));

    // 0 in the file means unbounded retries.
    assert_eq!(settings.retry_count, Some(i64::MAX));
    assert!(settings.retries_unbounded());

    // Unset in the file: defaulted.
    assert_eq!(settings.retry_interval_secs, 5);
    assert_eq!(settings.web3_storage.upload_url_suffix, DEFAULT_UPLOAD_URL_SUFFIX);

    // Set in the file: kept.
    assert_eq!(settings.http_client_timeout_secs, 30);
    assert_eq!(settings.payload_commit_concurrency, 8);

    let verifier = settings.dag_verifier.as_ref().unwrap();
    assert_eq!(verifier.run_interval_secs, DEFAULT_VERIFIER_RUN_INTERVAL_SECS);
    assert_eq!(verifier.suppress_notification_secs, DEFAULT_VERIFIER_SUPPRESS_NOTIFICATION_SECS);
    assert_eq!(verifier.concurrency, DEFAULT_VERIFIER_CONCURRENCY);
    assert_eq!(verifier.redis_pool_size, 20);
    assert!(verifier.pruning_verification);

    let pruning = settings.pruning.as_ref().unwrap();
    assert_eq!(pruning.segment_size, 700);
    assert_eq!(
        pruning.web3_storage.rate_limit,
        Some(RateLimit { burst: 3, requests_per_sec: 3 })
    );

    assert!(settings.use_consensus);
    let consensus = settings.consensus_config.as_ref().unwrap();
    assert_eq!(consensus.service_url, "https://consensus.example.org");
    assert_eq!(consensus.finalization_wait_secs, 60);

    assert_eq!(settings.rate_limits().len(), 7);
}

#[test]
fn test_load_via_settings_load() {
    let dir = tempdir().unwrap();
    let path = common::write_settings(&dir, common::FULL_SETTINGS);

    let a = Settings::load(&path, SettingsProfile::PayloadCommit).unwrap();
    let b = parse_settings(common::FULL_SETTINGS, SettingsProfile::PayloadCommit).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_retry_count_per_profile() {
    let dir = tempdir().unwrap();

    let path = common::write_settings(&dir, r#"{"host": "localhost"}"#);
    assert_eq!(load_settings(&path, SettingsProfile::PayloadCommit).unwrap().retry_count, Some(15));
    assert_eq!(load_settings(&path, SettingsProfile::Auditor).unwrap().retry_count, Some(10));

    let path = common::write_settings(&dir, r#"{"retry_count": 7}"#);
    assert_eq!(load_settings(&path, SettingsProfile::Auditor).unwrap().retry_count(), 7);

    let path = common::write_settings(&dir, r#"{"retry_count": -1}"#);
    assert_eq!(load_settings(&path, SettingsProfile::Auditor).unwrap().retry_count(), -1);

    let path = common::write_settings(&dir, r#"{"retry_count": 0}"#);
    assert_eq!(load_settings(&path, SettingsProfile::PayloadCommit).unwrap().retry_count(), i64::MAX);
}

#[test]
fn test_optional_sections_stay_absent() {
    let dir = tempdir().unwrap();
    let path = common::write_settings(
        &dir,
        r#"{"web3_storage": {"url": "https://api.web3.storage", "timeout_secs": 30}}"#,
    );

    let settings = load_settings(&path, SettingsProfile::PayloadCommit).unwrap();

    assert!(settings.pruning.is_none());
    assert!(settings.consensus_config.is_none());
    assert!(settings.dag_verifier.is_none());
    assert!(settings.web3_storage.rate_limit.is_none());
    assert!(settings.rate_limits().is_empty());
    assert_eq!(settings.web3_storage.upload_url_suffix, "/upload");
    assert!(settings.contract_addresses.weth.is_empty());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let path = common::missing_settings(&dir);

    let err = load_settings(&path, SettingsProfile::Auditor).unwrap_err();
    match &err {
        ConfigError::Io { source, .. } => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
        }
        other => panic!("expected io error, got {other:?}"),
    }
    assert_eq!(err.path(), path.as_path());
}

#[test]
fn test_invalid_json_is_decode_error() {
    let dir = tempdir().unwrap();

    for bad in [
        r#"{"host": "localhost","#,
        "not json at all",
        r#"{"port": "9000"}"#,
        "",
        r#"["evil-host", 1234]"#,
        r#"{"redis": ["cache", 6380, 2]}"#,
        r#"{"dag_verifier": {"ipfs_rate_limit": [20, 20]}}"#,
    ] {
        let path = common::write_settings(&dir, bad);
        let err = load_settings(&path, SettingsProfile::Auditor).unwrap_err();
        assert!(matches!(err, ConfigError::Decode { .. }), "{bad:?} gave {err:?}");
    }
}

#[test]
fn test_load_failure_is_not_logged_as_error() {
    let dir = tempdir().unwrap();
    let missing = common::missing_settings(&dir);
    let malformed = common::write_settings(&dir, "[]");

    for path in [missing, malformed] {
        let (result, logs) = common::with_captured_logs(|| load_settings(&path, SettingsProfile::Auditor));
        assert!(result.is_err());
        assert!(!logs.contains("ERROR"), "logs: {logs}");
    }
}

#[test]
fn test_nulls_load_as_zero_values() {
    let dir = tempdir().unwrap();
    let path = common::write_settings(
        &dir,
        r#"{
            "host": null,
            "retry_count": null,
            "backup_targets": null,
            "web3_storage": null,
            "pruning": null,
            "dag_verifier": {"slack_notify_URL": "https://hooks.slack.com/x", "additional_projects_to_track_prefixes": null}
        }"#,
    );

    let settings = load_settings(&path, SettingsProfile::PayloadCommit).unwrap();

    assert!(settings.host.is_empty());
    assert_eq!(settings.retry_count, Some(15));
    assert!(settings.backup_targets.is_empty());
    assert_eq!(settings.web3_storage.upload_url_suffix, "/upload");
    assert!(settings.pruning.is_none());
    assert!(settings.dag_verifier.unwrap().summary_projects_to_track.is_empty());
}

#[test]
fn test_empty_notification_url_warns() {
    let dir = tempdir().unwrap();
    let path = common::write_settings(&dir, r#"{"dag_verifier": {"slack_notify_URL": ""}}"#);

    let (result, logs) = common::with_captured_logs(|| load_settings(&path, SettingsProfile::Auditor));

    let settings = result.unwrap();
    assert!(!settings.dag_verifier.unwrap().notifications_enabled());
    assert!(logs.contains("WARN"), "logs: {logs}");
    assert!(logs.contains("Slack notification URL is not set"), "logs: {logs}");
}

#[test]
fn test_configured_notification_url_does_not_warn() {
    let dir = tempdir().unwrap();
    let path = common::write_settings(&dir, common::FULL_SETTINGS);

    let (result, logs) = common::with_captured_logs(|| load_settings(&path, SettingsProfile::Auditor));

    assert!(result.is_ok());
    assert!(!logs.contains("Slack notification URL is not set"));
    assert!(logs.contains("Final settings object being used"));
}

#[test]
fn test_payload_commit_profile_never_warns() {
    let (result, logs) = common::with_captured_logs(|| parse_settings("{}", SettingsProfile::PayloadCommit));

    assert!(result.unwrap().dag_verifier.is_none());
    assert!(!logs.contains("WARN"));
}

#[test]
fn test_defaults_are_idempotent_after_load() {
    let dir = tempdir().unwrap();
    let path = common::write_settings(&dir, r#"{"retry_count": 0, "payload_commit_concurrency": 0}"#);

    let loaded = load_settings(&path, SettingsProfile::Auditor).unwrap();
    let mut again = loaded.clone();
    again.apply_defaults(SettingsProfile::Auditor);

    assert_eq!(loaded, again);
}
