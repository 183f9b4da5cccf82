// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! A deterministic, in-memory [`CloudAdapter`] for tests (§4.F): "production
//! HTTP transport is out of scope" for this core, but the dispatcher needs
//! something to call so it can be exercised end-to-end without a network.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::cloud::{CloudAdapter, CloudCredential, SignInState};
use crate::models::result::ResultCode;
use crate::models::schema::SchemaEntry;
use crate::trust::ConfigEntry;

#[derive(Debug, Clone)]
struct NodeRecord {
    device_id: u64,
    token: String,
    schema: Vec<SchemaEntry>,
    config: Vec<ConfigEntry>,
}

/// Call counters exposed for test assertions (e.g. E2's "mknode was called
/// exactly once across both register attempts").
#[derive(Debug, Default)]
pub struct CallCounts {
    pub mknode: AtomicUsize,
    pub rmnode: AtomicUsize,
    pub signin: AtomicUsize,
    pub submit_schema: AtomicUsize,
    pub push_data: AtomicUsize,
    pub pull_data: AtomicUsize,
    pub ack_setdata: AtomicUsize,
}

/// An in-memory cloud: `device_id -> uuid` for idempotent `mknode`, plus
/// `uuid -> NodeRecord` for everything sign-in needs.
#[derive(Debug, Default)]
pub struct InMemoryCloud {
    by_device_id: DashMap<u64, String>,
    by_uuid: DashMap<String, NodeRecord>,
    pub calls: CallCounts,
}

impl InMemoryCloud {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_uuid(&self, _device_id: u64) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn next_token(uuid: &str) -> String {
        format!("token-{uuid}")
    }
}

#[async_trait]
impl CloudAdapter for InMemoryCloud {
    async fn mknode(
        &self,
        device_name: &str,
        device_id: u64,
    ) -> Result<CloudCredential, ResultCode> {
        self.calls.mknode.fetch_add(1, Ordering::Relaxed);
        if device_name.is_empty() {
            return Err(ResultCode::RegisterInvalidDeviceName);
        }

        if let Some(uuid) = self.by_device_id.get(&device_id) {
            let record = self.by_uuid.get(uuid.value()).expect("dangling device_id entry");
            return Ok(CloudCredential {
                uuid: uuid.value().clone(),
                token: record.token.clone(),
            });
        }

        let uuid = self.next_uuid(device_id);
        let token = Self::next_token(&uuid);
        self.by_device_id.insert(device_id, uuid.clone());
        self.by_uuid.insert(
            uuid.clone(),
            NodeRecord {
                device_id,
                token: token.clone(),
                schema: Vec::new(),
                config: Vec::new(),
            },
        );

        Ok(CloudCredential { uuid, token })
    }

    async fn rmnode(&self, uuid: &str, token: &str) -> Result<(), ResultCode> {
        self.calls.rmnode.fetch_add(1, Ordering::Relaxed);
        let record = self
            .by_uuid
            .get(uuid)
            .ok_or(ResultCode::CredentialUnauthorized)?;
        if record.token != token {
            return Err(ResultCode::CredentialUnauthorized);
        }
        let device_id = record.device_id;
        drop(record);
        self.by_uuid.remove(uuid);
        self.by_device_id.remove(&device_id);
        Ok(())
    }

    async fn signin(&self, uuid: &str, token: &str) -> Result<SignInState, ResultCode> {
        self.calls.signin.fetch_add(1, Ordering::Relaxed);
        let record = self
            .by_uuid
            .get(uuid)
            .ok_or(ResultCode::CredentialUnauthorized)?;
        if record.token != token {
            return Err(ResultCode::CredentialUnauthorized);
        }
        Ok(SignInState {
            schema: record.schema.clone(),
            config: record.config.clone(),
        })
    }

    async fn submit_schema(
        &self,
        uuid: &str,
        token: &str,
        schema: &[SchemaEntry],
    ) -> Result<(), ResultCode> {
        self.calls.submit_schema.fetch_add(1, Ordering::Relaxed);
        let mut record = self
            .by_uuid
            .get_mut(uuid)
            .ok_or(ResultCode::CredentialUnauthorized)?;
        if record.token != token {
            return Err(ResultCode::CredentialUnauthorized);
        }
        record.schema = schema.to_vec();
        Ok(())
    }

    async fn push_data(
        &self,
        uuid: &str,
        token: &str,
        _sensor_id: u8,
        _value_type: u8,
        _payload: &[u8],
    ) -> Result<(), ResultCode> {
        self.calls.push_data.fetch_add(1, Ordering::Relaxed);
        let record = self
            .by_uuid
            .get(uuid)
            .ok_or(ResultCode::CredentialUnauthorized)?;
        if record.token != token {
            return Err(ResultCode::CredentialUnauthorized);
        }
        Ok(())
    }

    async fn pull_data(&self, uuid: &str, token: &str, _sensor_id: u8) -> Result<(), ResultCode> {
        self.calls.pull_data.fetch_add(1, Ordering::Relaxed);
        let record = self
            .by_uuid
            .get(uuid)
            .ok_or(ResultCode::CredentialUnauthorized)?;
        if record.token != token {
            return Err(ResultCode::CredentialUnauthorized);
        }
        Ok(())
    }

    async fn ack_setdata(&self, uuid: &str, token: &str, _sensor_id: u8) -> Result<(), ResultCode> {
        self.calls.ack_setdata.fetch_add(1, Ordering::Relaxed);
        let record = self
            .by_uuid
            .get(uuid)
            .ok_or(ResultCode::CredentialUnauthorized)?;
        if record.token != token {
            return Err(ResultCode::CredentialUnauthorized);
        }
        Ok(())
    }
}
