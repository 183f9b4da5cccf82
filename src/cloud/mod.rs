// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

pub mod mock;

use async_trait::async_trait;

use crate::models::schema::SchemaEntry;
use crate::models::result::ResultCode;
use crate::trust::ConfigEntry;

/// A credential minted by the cloud for a node: `(uuid, token)` (§4.F).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudCredential {
    pub uuid: String,
    pub token: String,
}

/// Result of a successful sign-in: the cloud's view of the node's committed
/// schema and config (§4.E, AUTH_REQ).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInState {
    pub schema: Vec<SchemaEntry>,
    pub config: Vec<ConfigEntry>,
}

/// The cloud capability the dispatcher relies on (§4.F). Modeled as an
/// object-safe async trait so the dispatcher can hold `&dyn CloudAdapter`
/// (or an `Arc<dyn CloudAdapter>`) without knowing whether requests go over
/// HTTP, gRPC, or — in tests — nowhere at all.
///
/// Every method returns `ResultCode` on failure rather than an error type:
/// per §4.F, a cloud failure is itself one of the protocol's shared result
/// codes, relayed to the node rather than translated.
#[async_trait]
pub trait CloudAdapter: Send + Sync {
    async fn mknode(
        &self,
        device_name: &str,
        device_id: u64,
    ) -> Result<CloudCredential, ResultCode>;

    async fn rmnode(&self, uuid: &str, token: &str) -> Result<(), ResultCode>;

    async fn signin(&self, uuid: &str, token: &str) -> Result<SignInState, ResultCode>;

    async fn submit_schema(
        &self,
        uuid: &str,
        token: &str,
        schema: &[SchemaEntry],
    ) -> Result<(), ResultCode>;

    async fn push_data(
        &self,
        uuid: &str,
        token: &str,
        sensor_id: u8,
        value_type: u8,
        payload: &[u8],
    ) -> Result<(), ResultCode>;

    async fn pull_data(&self, uuid: &str, token: &str, sensor_id: u8) -> Result<(), ResultCode>;

    async fn ack_setdata(&self, uuid: &str, token: &str, sensor_id: u8) -> Result<(), ResultCode>;
}
