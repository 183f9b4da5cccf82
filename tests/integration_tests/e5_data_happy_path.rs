// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::atomic::Ordering;

use knot_gateway_core::dispatcher::DispatchOutcome;
use knot_gateway_core::models::opcode::MessageType;
use knot_gateway_core::models::parse::{decode, PduBody};
use knot_gateway_core::trust::store::ConnectionHandle;

use crate::integration_tests::common::{data_pdu, register_req, schema_pdu, Harness, TEMPERATURE};

#[tokio::test]
async fn valid_data_pushes_and_pulls_exactly_once() {
    let harness = Harness::new();
    let handle = ConnectionHandle(1);
    harness.send(handle, &register_req(1, b"sensor-A")).await;
    harness
        .send(handle, &schema_pdu(true, 1, TEMPERATURE.0, TEMPERATURE.1, TEMPERATURE.2, b"temp"))
        .await;

    let outcome = harness.send(handle, &data_pdu(1, &[0x2A])).await;

    let DispatchOutcome::Reply(bytes) = outcome else {
        panic!("expected a reply");
    };
    let (header, body) = decode(&bytes).expect("decode");
    assert_eq!(header.msg_type, MessageType::DataResp);
    assert_eq!(body, PduBody::DataResp(0));

    assert_eq!(harness.cloud.calls.push_data.load(Ordering::Relaxed), 1);
    assert_eq!(harness.cloud.calls.pull_data.load(Ordering::Relaxed), 1);
}
