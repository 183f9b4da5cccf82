// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use knot_gateway_core::cloud::mock::InMemoryCloud;
use knot_gateway_core::dispatcher::peer::NullPeerPidResolver;
use knot_gateway_core::dispatcher::{DispatchOutcome, Dispatcher};
use knot_gateway_core::models::common::{write_header, HEADER_LEN};
use knot_gateway_core::models::opcode::MessageType;
use knot_gateway_core::trust::store::ConnectionHandle;

/// A dispatcher wired to an in-memory cloud, for end-to-end scenario tests.
pub struct Harness {
    pub dispatcher: Dispatcher,
    pub cloud: Arc<InMemoryCloud>,
}

impl Harness {
    pub fn new() -> Self {
        let cloud = Arc::new(InMemoryCloud::new());
        let dispatcher = Dispatcher::new(cloud.clone(), Arc::new(NullPeerPidResolver));
        Self { dispatcher, cloud }
    }

    pub async fn send(&self, handle: ConnectionHandle, pdu: &[u8]) -> DispatchOutcome {
        self.dispatcher.dispatch(handle, pdu).await.expect("dispatch")
    }
}

pub fn register_req(device_id: u64, device_name: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_LEN + 8 + device_name.len()];
    write_header(&mut buf, MessageType::RegisterReq, (8 + device_name.len()) as u8);
    buf[HEADER_LEN..HEADER_LEN + 8].copy_from_slice(&device_id.to_le_bytes());
    buf[HEADER_LEN + 8..].copy_from_slice(device_name);
    buf
}

pub fn auth_req(uuid: &str, token: &str) -> Vec<u8> {
    use knot_gateway_core::models::credential::{Credential, TOKEN_LEN, UUID_LEN};

    let cred = Credential::new(uuid, token);
    let mut buf = vec![0u8; HEADER_LEN + UUID_LEN + TOKEN_LEN];
    write_header(&mut buf, MessageType::AuthReq, (UUID_LEN + TOKEN_LEN) as u8);
    cred.encode_body(&mut buf[HEADER_LEN..]);
    buf
}

pub fn schema_pdu(eof: bool, sensor_id: u8, type_id: u16, value_type: u8, unit: u8, name: &[u8]) -> Vec<u8> {
    use knot_gateway_core::models::schema::SchemaEntry;

    let entry = SchemaEntry::new(sensor_id, type_id, value_type, unit, name);
    let mut payload = vec![0u8; 128];
    let n = entry.encode_body(&mut payload);

    let msg_type = if eof { MessageType::SchemaEnd } else { MessageType::Schema };
    let mut buf = vec![0u8; HEADER_LEN + n];
    write_header(&mut buf, msg_type, n as u8);
    buf[HEADER_LEN..].copy_from_slice(&payload[..n]);
    buf
}

pub fn data_pdu(sensor_id: u8, payload: &[u8]) -> Vec<u8> {
    build_data(MessageType::Data, sensor_id, payload)
}

pub fn data_resp_pdu(sensor_id: u8, payload: &[u8]) -> Vec<u8> {
    build_data(MessageType::DataResp, sensor_id, payload)
}

fn build_data(msg_type: MessageType, sensor_id: u8, payload: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_LEN + 1 + payload.len()];
    write_header(&mut buf, msg_type, (1 + payload.len()) as u8);
    buf[HEADER_LEN] = sensor_id;
    buf[HEADER_LEN + 1..].copy_from_slice(payload);
    buf
}

pub fn unregister_req() -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_LEN];
    write_header(&mut buf, MessageType::UnregisterReq, 0);
    buf
}

/// Temperature triple accepted by the schema validator's compatibility table.
pub const TEMPERATURE: (u16, u8, u8) = (
    knot_gateway_core::validate::schema::type_id::TEMPERATURE,
    knot_gateway_core::validate::schema::value_type::FLOAT,
    knot_gateway_core::validate::schema::unit::CELSIUS,
);

pub const HUMIDITY: (u16, u8, u8) = (
    knot_gateway_core::validate::schema::type_id::HUMIDITY,
    knot_gateway_core::validate::schema::value_type::FLOAT,
    knot_gateway_core::validate::schema::unit::PERCENT,
);

pub const PRESSURE: (u16, u8, u8) = (
    knot_gateway_core::validate::schema::type_id::PRESSURE,
    knot_gateway_core::validate::schema::value_type::FLOAT,
    knot_gateway_core::validate::schema::unit::HECTOPASCAL,
);
