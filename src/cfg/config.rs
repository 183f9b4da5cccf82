// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cfg::enums::YesNo;

/// Top-level gateway configuration, loaded from a single YAML file (§1
/// ambient stack).
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    #[serde(rename = "Cloud")]
    /// Cloud endpoint and timeout settings.
    pub cloud: CloudConfig,
    #[serde(rename = "TrustStore")]
    /// Trust-store sizing hints.
    pub trust_store: TrustStoreConfig,
    #[serde(rename = "Runtime")]
    /// Implementation/runtime parameters outside the protocol itself.
    pub runtime: RuntimeConfig,
}

/// Settings for the cloud adapter's transport (§4.F). The transport itself
/// is out of scope for this core; these fields only describe how to reach
/// and time out against it.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CloudConfig {
    #[serde(rename = "BaseUrl")]
    /// Base URL of the cloud's JSON-over-HTTP/RPC API.
    pub base_url: String,

    #[serde(rename = "RequestTimeout", with = "serde_secs")]
    /// Timeout applied to a single cloud adapter call.
    pub request_timeout: Duration,

    #[serde(default = "default_retries", rename = "MaxRetries")]
    /// Number of retries the transport may attempt before surfacing a
    /// cloud failure to the dispatcher as a result code.
    pub max_retries: u8,

    #[serde(default = "default_verify_tls", rename = "VerifyTls")]
    /// Whether the cloud transport validates the peer's TLS certificate.
    /// Never disable outside local development against a self-signed cloud.
    pub verify_tls: YesNo,
}

fn default_retries() -> u8 {
    2
}

fn default_verify_tls() -> YesNo {
    YesNo::Yes
}

/// Sizing hints for the in-memory trust store (§4.B). None of these are
/// hard limits enforced by [`crate::trust::store::TrustStore`] itself —
/// that map grows unbounded — they exist so an operator can size the
/// process's expected working set.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TrustStoreConfig {
    #[serde(rename = "ExpectedConnections")]
    /// Expected steady-state number of concurrently trusted connections.
    pub expected_connections: u32,

    #[serde(rename = "ShardCount")]
    /// Concurrency shard count hint for the underlying map.
    pub shard_count: u8,
}

/// Runtime-only settings that do not map to a protocol or cloud concept.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RuntimeConfig {
    #[serde(rename = "LogConfigPath")]
    /// Path to the logger's own YAML configuration (§ambient logging).
    pub log_config_path: String,
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path.as_ref()))?;
        let mut cfg: Config = serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Validates invariants that the YAML deserializer cannot express on
    /// its own.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        ensure!(!self.cloud.base_url.is_empty(), "Cloud.BaseUrl must not be empty");
        ensure!(
            self.cloud.request_timeout > Duration::ZERO,
            "Cloud.RequestTimeout must be > 0"
        );
        ensure!(
            self.trust_store.expected_connections >= 1,
            "TrustStore.ExpectedConnections must be >= 1"
        );
        ensure!(
            self.trust_store.shard_count >= 1,
            "TrustStore.ShardCount must be >= 1"
        );
        Ok(())
    }
}

/// Serde helpers for representing `Duration` as a number of seconds.
mod serde_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}
