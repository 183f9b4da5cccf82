// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The message dispatcher (§4.E): the central state machine that takes a
//! decoded PDU on a connection handle and produces a reply.

pub mod peer;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::cloud::CloudAdapter;
use crate::dispatcher::peer::PeerPidResolver;
use crate::models::common::{HeaderSplitError, KNOT_MSG_MAX};
use crate::models::opcode::MessageType;
use crate::models::parse::{self, PduBody};
use crate::models::reply::encode_result_reply;
use crate::models::result::ResultCode;
use crate::trust::store::{ConnectionHandle, SharedTrust, TrustStore};
use crate::trust::Trust;
use crate::validate::{validate_config, validate_schema};

/// What the dispatcher produced for one PDU (§4.E "Reply assembly").
///
/// This stays an enum rather than the spec's raw byte-count convention
/// (negative/zero/positive) because that convention exists to cross a C ABI
/// this crate never has to cross; the three cases it distinguishes —
/// "write this reply", "write nothing", "the input was not even a PDU" —
/// map onto `Reply` / `NoReply` / `Err(DispatchError)` one for one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A reply PDU to transmit back to the node.
    Reply(Vec<u8>),
    /// No reply PDU is sent (e.g. CONFIG_RESP, DATA_RESP).
    NoReply,
}

/// A structural failure that leaves no reply possible (§4.E, pre-dispatch
/// checks 1 and 3).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("output buffer smaller than the {KNOT_MSG_MAX}-byte PDU maximum")]
    OutputTooSmall,
    #[error(transparent)]
    Decode(#[from] crate::models::common::DecodeError),
}

/// The KNOT message-processing state machine (§2, component E).
///
/// Owns the trust store and holds the cloud adapter and peer-pid resolver
/// behind trait objects, so the transport, the cloud's wire protocol, and
/// the local-peer-credential lookup can all vary independently of this
/// core.
pub struct Dispatcher {
    store: TrustStore,
    cloud: Arc<dyn CloudAdapter>,
    peer_pid: Arc<dyn PeerPidResolver>,
}

impl Dispatcher {
    pub fn new(cloud: Arc<dyn CloudAdapter>, peer_pid: Arc<dyn PeerPidResolver>) -> Self {
        Self {
            store: TrustStore::new(),
            cloud,
            peer_pid,
        }
    }

    pub fn store(&self) -> &TrustStore {
        &self.store
    }

    /// Entry point: decode `input` and dispatch it (§4.E pre-dispatch check
    /// 1 is the caller's responsibility — transports size their reply
    /// buffers, this core only ever returns a `Vec` sized to what it wrote).
    #[instrument(skip(self, input), fields(handle = handle.0))]
    pub async fn dispatch(
        &self,
        handle: ConnectionHandle,
        input: &[u8],
    ) -> Result<DispatchOutcome, DispatchError> {
        let (header, body) = match parse::decode(input) {
            Ok(parsed) => parsed,
            Err(HeaderSplitError::Decode(e)) => return Err(DispatchError::Decode(e)),
            Err(HeaderSplitError::Unknown(unknown)) => {
                warn!(raw_type = unknown.raw_type, "unknown KNOT message type");
                return Ok(DispatchOutcome::NoReply);
            },
        };
        debug!(?header.msg_type, "dispatching PDU");

        match body {
            PduBody::RegisterReq(req) => Ok(self.handle_register_req(handle, req).await),
            PduBody::AuthReq(cred) => Ok(self.handle_auth_req(handle, cred).await),
            PduBody::Schema(entry) => Ok(self.handle_schema(handle, entry, false).await),
            PduBody::SchemaEnd(entry) => Ok(self.handle_schema(handle, entry, true).await),
            PduBody::Data(data) => Ok(self.handle_data(handle, data).await),
            PduBody::DataResp(data) => Ok(self.handle_data_resp(handle, data).await),
            PduBody::ConfigResp(resp) => Ok(self.handle_config_resp(handle, resp).await),
            PduBody::UnregisterReq(_) => Ok(self.handle_unregister_req(handle).await),
            // Replies the gateway itself would never receive as inbound
            // PDUs; a node sending one back gets the generic error.
            PduBody::RegisterResp(_)
            | PduBody::UnregisterResp(_)
            | PduBody::AuthResp(_)
            | PduBody::SchemaResp(_)
            | PduBody::SchemaEndResp(_) => {
                Ok(self.reply(MessageType::DataResp, ResultCode::InvalidData))
            },
        }
    }

    fn reply(&self, msg_type: MessageType, result: ResultCode) -> DispatchOutcome {
        let mut buf = [0u8; 3];
        let n = encode_result_reply(&mut buf, msg_type, result);
        DispatchOutcome::Reply(buf[..n].to_vec())
    }

    fn reply_register_credential(&self, uuid: &str, token: &str) -> DispatchOutcome {
        use crate::models::common::HEADER_LEN;
        use crate::models::credential::{Credential, TOKEN_LEN, UUID_LEN};
        use crate::models::register::response::encode_register_resp;

        let cred = Credential::new(uuid, token);
        let mut buf = vec![0u8; HEADER_LEN + UUID_LEN + TOKEN_LEN];
        encode_register_resp(&mut buf, &cred);
        DispatchOutcome::Reply(buf)
    }

    async fn handle_register_req(
        &self,
        handle: ConnectionHandle,
        req: crate::models::register::RegisterReqBody,
    ) -> DispatchOutcome {
        if !req.has_valid_device_name() {
            return self.reply(MessageType::RegisterResp, ResultCode::RegisterInvalidDeviceName);
        }

        let peer_pid = self.peer_pid.resolve(handle);

        if let Some(shared) = self.store.lookup(handle) {
            let trust = shared.lock().await;
            if trust.device_id == req.device_id && trust.peer_pid == peer_pid {
                let (uuid, token) = (trust.uuid.clone(), trust.token.clone());
                drop(trust);
                return self.reply_register_credential(&uuid, &token);
            }
            drop(trust);
            // A different device (or peer) re-registering on a handle that
            // already holds one: roll back the stale trust's provisional
            // cloud registration, if any, before it's replaced, rather than
            // let `store.insert` below fail against an occupied handle.
            self.teardown(handle).await;
        }

        let device_name = String::from_utf8_lossy(&req.device_name).into_owned();
        let cred = match self.cloud.mknode(&device_name, req.device_id).await {
            Ok(cred) => cred,
            Err(result) => return self.reply(MessageType::RegisterResp, result),
        };

        if let Err(result) = self.cloud.signin(&cred.uuid, &cred.token).await {
            return self.reply(MessageType::RegisterResp, result);
        }

        let trust = Trust::new_provisional(peer_pid, req.device_id, cred.uuid.clone(), cred.token.clone());
        match self.store.insert(handle, trust) {
            Ok(_) => self.reply_register_credential(&cred.uuid, &cred.token),
            Err(_) => {
                warn!(handle = handle.0, "register_req lost a race inserting trust");
                self.reply(MessageType::RegisterResp, ResultCode::ErrorUnknown)
            },
        }
    }

    async fn handle_auth_req(
        &self,
        handle: ConnectionHandle,
        cred: crate::models::credential::Credential,
    ) -> DispatchOutcome {
        if self.store.lookup(handle).is_some() {
            return self.reply(MessageType::AuthResp, ResultCode::Success);
        }

        let (uuid, token) = (cred.uuid_str(), cred.token_str());
        let signed_in = match self.cloud.signin(&uuid, &token).await {
            Ok(state) => state,
            Err(result) => return self.reply(MessageType::AuthResp, result),
        };

        if signed_in.schema.is_empty() {
            return self.reply(MessageType::AuthResp, ResultCode::SchemaEmpty);
        }

        let config = if validate_config(&signed_in.config).is_ok() {
            signed_in.config
        } else {
            Vec::new()
        };

        let peer_pid = self.peer_pid.resolve(handle);
        let trust = Trust::new_signed_in(peer_pid, 0, uuid, token, signed_in.schema, config);
        match self.store.insert(handle, trust) {
            Ok(_) => self.reply(MessageType::AuthResp, ResultCode::Success),
            Err(_) => {
                warn!(handle = handle.0, "auth_req lost a race inserting trust");
                self.reply(MessageType::AuthResp, ResultCode::ErrorUnknown)
            },
        }
    }

    async fn handle_schema(
        &self,
        handle: ConnectionHandle,
        entry: crate::models::schema::SchemaEntry,
        eof: bool,
    ) -> DispatchOutcome {
        let resp_type = if eof {
            MessageType::SchemaEndResp
        } else {
            MessageType::SchemaResp
        };

        let Some(shared) = self.store.lookup(handle) else {
            return self.reply(resp_type, ResultCode::CredentialUnauthorized);
        };

        let (uuid, token, staging) = {
            let mut trust = shared.lock().await;
            trust.rollback = false;
            trust.stage_schema_entry(entry);
            (trust.uuid.clone(), trust.token.clone(), trust.schema_staging.clone())
        };

        if !eof {
            return self.reply(resp_type, ResultCode::Success);
        }

        match self.cloud.submit_schema(&uuid, &token, &staging).await {
            Ok(()) => {
                let mut trust = shared.lock().await;
                trust.commit_schema_staging();
                self.reply(resp_type, ResultCode::Success)
            },
            Err(result) => {
                let mut trust = shared.lock().await;
                trust.discard_schema_staging();
                self.reply(resp_type, result)
            },
        }
    }

    /// Validate `data.sensor_id` against the trust's committed schema
    /// (§4.E DATA / DATA_RESP: "look up schema entry", "validate via
    /// 4.C"), without yet calling into the cloud.
    async fn validate_against_schema(
        &self,
        handle: ConnectionHandle,
        sensor_id: u8,
    ) -> Result<(String, String, u8), ResultCode> {
        let shared = self.store.lookup(handle).ok_or(ResultCode::CredentialUnauthorized)?;
        let trust = shared.lock().await;

        let entry = trust.find_schema(sensor_id).ok_or(ResultCode::InvalidData)?;
        validate_schema(entry.type_id, entry.value_type, entry.unit)
            .map_err(|_| ResultCode::InvalidData)?;

        Ok((trust.uuid.clone(), trust.token.clone(), entry.value_type))
    }

    async fn handle_data(
        &self,
        handle: ConnectionHandle,
        data: crate::models::data::DataBody,
    ) -> DispatchOutcome {
        let (uuid, token, value_type) =
            match self.validate_against_schema(handle, data.sensor_id).await {
                Ok(v) => v,
                Err(result) => return self.reply(MessageType::DataResp, result),
            };

        let outcome = self
            .cloud
            .push_data(&uuid, &token, data.sensor_id, value_type, &data.payload)
            .await;
        let _ = self.cloud.pull_data(&uuid, &token, data.sensor_id).await;

        match outcome {
            Ok(()) => self.reply(MessageType::DataResp, ResultCode::Success),
            Err(result) => self.reply(MessageType::DataResp, result),
        }
    }

    async fn handle_data_resp(
        &self,
        handle: ConnectionHandle,
        data: crate::models::data::DataBody,
    ) -> DispatchOutcome {
        if let Ok((uuid, token, value_type)) =
            self.validate_against_schema(handle, data.sensor_id).await
        {
            let _ = self.cloud.ack_setdata(&uuid, &token, data.sensor_id).await;
            let _ = self
                .cloud
                .push_data(&uuid, &token, data.sensor_id, value_type, &data.payload)
                .await;
        }
        DispatchOutcome::NoReply
    }

    async fn handle_config_resp(
        &self,
        handle: ConnectionHandle,
        resp: crate::models::config::ConfigRespBody,
    ) -> DispatchOutcome {
        if let Some(shared) = self.store.lookup(handle) {
            shared.lock().await.acknowledge_config(resp.sensor_id);
        }
        DispatchOutcome::NoReply
    }

    async fn handle_unregister_req(&self, handle: ConnectionHandle) -> DispatchOutcome {
        let Some(shared) = self.store.lookup(handle) else {
            return self.reply(MessageType::UnregisterResp, ResultCode::CredentialUnauthorized);
        };

        let (uuid, token) = {
            let trust = shared.lock().await;
            (trust.uuid.clone(), trust.token.clone())
        };

        match self.cloud.rmnode(&uuid, &token).await {
            Ok(()) => {
                self.store.remove(handle);
                self.reply(MessageType::UnregisterResp, ResultCode::Success)
            },
            Err(result) => self.reply(MessageType::UnregisterResp, result),
        }
    }

    /// Tear down one connection, e.g. because the transport observed it
    /// close (§3 "Lifecycle": "destroyed on ... connection teardown").
    ///
    /// If the trust was still in the provisional rollback state —
    /// registered with the cloud but never confirmed by a completed schema
    /// upload — the device must be removed from the cloud so an
    /// unconfirmed or cloned registration is not left orphaned (§3, §9
    /// anti-clone protection). A rollback failure is logged and otherwise
    /// ignored: the connection is gone either way.
    #[instrument(skip(self), fields(handle = handle.0))]
    pub async fn teardown(&self, handle: ConnectionHandle) {
        let Some(shared) = self.store.remove(handle) else {
            return;
        };
        Self::rollback_if_needed(&*self.cloud, shared).await;
    }

    /// Tear down every connection currently trusted (§4.B `destroy_all(f)`),
    /// applying the same rollback rule as [`Self::teardown`] to each entry.
    /// Used on gateway shutdown.
    pub async fn shutdown(&self) {
        for (_, shared) in self.store.drain() {
            Self::rollback_if_needed(&*self.cloud, shared).await;
        }
    }

    async fn rollback_if_needed(cloud: &dyn CloudAdapter, shared: SharedTrust) {
        let trust = shared.lock().await;
        if !trust.rollback {
            return;
        }
        let (uuid, token) = (trust.uuid.clone(), trust.token.clone());
        drop(trust);

        if let Err(result) = cloud.rmnode(&uuid, &token).await {
            warn!(?result, "rollback rmnode failed on teardown");
        }
    }
}
