//! Settings schema definitions.
//!
//! One superset schema shared by every audit-protocol service. Sections that
//! only some services use (`dag_verifier`, `pruning`, `consensus_config`) are
//! optional. Every record derives `#[serde(default)]`, so keys missing from
//! the file decode to the zero value of their type; unknown keys are ignored.
//! Nested records only accept JSON objects (see [`crate::config::de`]).
//!
//! Key names follow the JSON settings files verbatim, including historical
//! misspellings such as `aiohtttp_timeouts` and `retreivals_single`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::de;

/// Root settings record for the audit-protocol services.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    #[serde(deserialize_with = "de::record")]
    pub webhook_listener: WebhookListenerSettings,

    /// IPFS API endpoint used for writes.
    pub ipfs_url: String,
    /// IPFS endpoint used for reads, when split from `ipfs_url`.
    pub ipfs_reader_url: String,

    pub snapshot_interval: u64,
    #[serde(deserialize_with = "de::record")]
    pub rlimit: RlimitSettings,
    #[serde(deserialize_with = "de::record")]
    pub rabbitmq: RabbitMqSettings,

    pub contract_call_backend: String,
    #[serde(deserialize_with = "de::optional_record")]
    pub contract_rate_limit: Option<RateLimit>,

    /// Number of retries for outbound calls.
    ///
    /// `None` before defaulting means "not configured". A literal `0` in the
    /// file means "retry forever" and becomes `i64::MAX` once defaults apply.
    /// Negative values pass through unchanged.
    pub retry_count: Option<i64>,
    pub retry_interval_secs: u64,
    pub http_client_timeout_secs: u64,

    pub rpc_matic: String,
    pub rpc_url: String,

    #[serde(deserialize_with = "de::record")]
    pub contract_addresses: ContractAddresses,

    pub metadata_cache: String,
    pub dag_table_name: String,
    pub seed: String,

    #[serde(deserialize_with = "de::record")]
    pub redis: RedisSettings,
    #[serde(deserialize_with = "de::record")]
    pub redis_reader: RedisSettings,

    #[serde(deserialize_with = "de::record")]
    pub table_names: TableNames,

    pub cleanup_service_interval: u64,
    pub audit_contract: String,
    pub app_name: String,
    pub powergate_client_addr: String,
    pub max_ipfs_blocks: u64,
    pub max_pending_payload_commits: u64,

    /// Storage backend identifier for DAG blocks.
    pub block_storage: String,
    /// Storage backend identifier for snapshot payloads.
    pub payload_storage: String,

    pub container_height: u64,
    #[serde(deserialize_with = "de::record")]
    pub bloom_filter_settings: BloomFilterSettings,

    pub payload_commit_interval: u64,
    pub payload_commit_concurrency: usize,
    pub pruning_service_interval: u64,
    pub retrieval_service_interval: u64,
    pub deal_watcher_service_interval: u64,

    pub backup_targets: Vec<String>,
    pub max_payload_commits: u64,
    pub unpin_mode: String,
    pub max_pending_events: u64,

    pub ipfs_timeout: u64,
    #[serde(deserialize_with = "de::optional_record")]
    pub ipfs_rate_limit: Option<RateLimit>,

    pub span_expire_timeout: u64,
    pub api_key: String,

    #[serde(rename = "aiohtttp_timeouts", deserialize_with = "de::record")]
    pub http_timeouts: HttpTimeouts,

    #[serde(deserialize_with = "de::record")]
    pub web3_storage: Web3StorageSettings,

    pub local_cache_path: String,
    pub calculate_diff: bool,

    /// DAG verifier section. Always materialized under the auditor profile.
    #[serde(deserialize_with = "de::optional_record")]
    pub dag_verifier: Option<DagVerifierSettings>,

    /// Pruning service section; absent means pruning is disabled.
    #[serde(deserialize_with = "de::optional_record")]
    pub pruning: Option<PruningSettings>,

    pub use_consensus: bool,
    #[serde(deserialize_with = "de::optional_record")]
    pub consensus_config: Option<ConsensusSettings>,

    pub instance_id: String,
}

impl Settings {
    /// Retry budget for outbound calls, `i64::MAX` meaning unbounded.
    ///
    /// Returns 0 only for a record that never had defaults applied.
    pub fn retry_count(&self) -> i64 {
        self.retry_count.unwrap_or(0)
    }

    /// Whether outbound calls should retry indefinitely.
    pub fn retries_unbounded(&self) -> bool {
        self.retry_count == Some(i64::MAX)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    pub fn http_client_timeout(&self) -> Duration {
        Duration::from_secs(self.http_client_timeout_secs)
    }

    /// Every rate limiter present in the file, keyed by its dotted path.
    pub fn rate_limits(&self) -> Vec<(&'static str, RateLimit)> {
        let mut limits = Vec::new();
        let mut push = |name: &'static str, limit: Option<RateLimit>| {
            if let Some(limit) = limit {
                limits.push((name, limit));
            }
        };

        push("webhook_listener.rate_limit", self.webhook_listener.rate_limit);
        push("contract_rate_limit", self.contract_rate_limit);
        push("ipfs_rate_limit", self.ipfs_rate_limit);
        push("web3_storage.rate_limit", self.web3_storage.rate_limit);
        if let Some(verifier) = &self.dag_verifier {
            push("dag_verifier.ipfs_rate_limit", verifier.ipfs_rate_limit);
        }
        if let Some(pruning) = &self.pruning {
            push("pruning.ipfs_rate_limit", pruning.ipfs_rate_limit);
            push("pruning.web3_storage.rate_limit", pruning.web3_storage.rate_limit);
        }
        if let Some(consensus) = &self.consensus_config {
            push("consensus_config.rate_limit", consensus.rate_limit);
        }

        limits
    }
}

/// Burst and sustained rate for a downstream dependency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimit {
    pub burst: u32,
    #[serde(rename = "req_per_sec")]
    pub requests_per_sec: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookListenerSettings {
    pub host: String,
    pub port: u16,
    #[serde(deserialize_with = "de::optional_record")]
    pub rate_limit: Option<RateLimit>,
    pub validate_header_sig: bool,
    pub keepalive_secs: u64,
    pub redis_lock_lifetime: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RlimitSettings {
    pub file_descriptors: u64,
}

/// RabbitMQ connection and routing topology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RabbitMqSettings {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    #[serde(deserialize_with = "de::record")]
    pub setup: RabbitMqSetup,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RabbitMqSetup {
    #[serde(deserialize_with = "de::record")]
    pub core: CoreExchange,
    #[serde(deserialize_with = "de::record")]
    pub queues: QueueSetup,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CoreExchange {
    pub exchange: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueSetup {
    #[serde(rename = "commit-payloads", deserialize_with = "de::record")]
    pub commit_payloads: QueueRouting,
    #[serde(rename = "diff-requests", deserialize_with = "de::record")]
    pub diff_requests: QueueRouting,
}

/// Queue name and routing key prefixes; services append their namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueRouting {
    pub queue_name_prefix: String,
    pub routing_key_prefix: String,
}

/// Named token and contract addresses. Never defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractAddresses {
    pub iuniswap_v2_factory: String,
    pub iuniswap_v2_router: String,
    pub iuniswap_v2_pair: String,
    #[serde(rename = "USDT")]
    pub usdt: String,
    #[serde(rename = "DAI")]
    pub dai: String,
    #[serde(rename = "USDC")]
    pub usdc: String,
    #[serde(rename = "WETH")]
    pub weth: String,
    #[serde(rename = "MAKER")]
    pub maker: String,
    #[serde(rename = "WETH-USDT")]
    pub weth_usdt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub db: u32,
    /// `null` in the file for password-less instances.
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TableNames {
    pub api_keys: String,
    pub accounting_records: String,
    #[serde(rename = "retreivals_single")]
    pub retrievals_single: String,
    #[serde(rename = "retreivals_bulk")]
    pub retrievals_bulk: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BloomFilterSettings {
    pub max_elements: u64,
    pub error_rate: f64,
    /// Free-form: a path string, `null`, or whatever the consumer expects.
    pub filename: serde_json::Value,
}

/// Socket-level timeouts, in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpTimeouts {
    pub sock_read: u64,
    pub sock_connect: u64,
    pub connect: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Web3StorageSettings {
    pub url: String,
    pub api_token: String,
    pub timeout_secs: u64,
    pub max_idle_conns: u64,
    pub idle_conn_timeout: u64,
    #[serde(deserialize_with = "de::optional_record")]
    pub rate_limit: Option<RateLimit>,
    /// Appended to `url` for uploads. Defaults to `/upload`.
    pub upload_url_suffix: String,
}

/// DAG verifier service settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DagVerifierSettings {
    /// Slack webhook for issue notifications; empty disables notifications.
    #[serde(rename = "slack_notify_URL")]
    pub slack_notify_url: String,
    pub run_interval_secs: u64,
    #[serde(rename = "suppress_notification_for_secs")]
    pub suppress_notification_secs: u64,
    #[serde(rename = "additional_projects_to_track_prefixes")]
    pub summary_projects_to_track: Vec<String>,
    #[serde(deserialize_with = "de::optional_record")]
    pub ipfs_rate_limit: Option<RateLimit>,
    pub concurrency: usize,
    pub redis_pool_size: usize,
    pub pruning_verification: bool,
}

impl DagVerifierSettings {
    pub fn run_interval(&self) -> Duration {
        Duration::from_secs(self.run_interval_secs)
    }

    pub fn notifications_enabled(&self) -> bool {
        !self.slack_notify_url.is_empty()
    }
}

/// Pruning service settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PruningSettings {
    pub run_interval_mins: u64,
    #[serde(deserialize_with = "de::optional_record")]
    pub ipfs_rate_limit: Option<RateLimit>,
    pub concurrency: usize,
    pub car_storage_path: String,
    pub perform_archival: bool,
    pub perform_ipfs_unpin: bool,
    pub prune_redis_zsets: bool,
    pub oldest_project_index: String,
    #[serde(rename = "backup_redis_zsets_to_file")]
    pub backup_redis_zsets: bool,
    pub ipfs_timeout_secs: u64,
    pub summary_projects_prune_height_behind_head: u64,
    pub pruning_height_behind_oldest_index: u64,
    pub segment_size: u64,
    #[serde(deserialize_with = "de::record")]
    pub web3_storage: PruningWeb3Storage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PruningWeb3Storage {
    pub timeout_secs: u64,
    #[serde(deserialize_with = "de::optional_record")]
    pub rate_limit: Option<RateLimit>,
}

/// Consensus service client settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsensusSettings {
    pub service_url: String,
    #[serde(deserialize_with = "de::optional_record")]
    pub rate_limit: Option<RateLimit>,
    pub timeout_secs: u64,
    pub max_idle_conns: u64,
    pub idle_conn_timeout: u64,
    #[serde(rename = "finalization_wait_time_secs")]
    pub finalization_wait_secs: u64,
}
