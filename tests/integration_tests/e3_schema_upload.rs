// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use knot_gateway_core::dispatcher::DispatchOutcome;
use knot_gateway_core::models::opcode::MessageType;
use knot_gateway_core::models::parse::{decode, PduBody};
use knot_gateway_core::trust::store::ConnectionHandle;

use crate::integration_tests::common::{register_req, schema_pdu, Harness, HUMIDITY, PRESSURE, TEMPERATURE};

async fn registered_handle(harness: &Harness) -> ConnectionHandle {
    let handle = ConnectionHandle(1);
    harness.send(handle, &register_req(1, b"sensor-A")).await;
    handle
}

#[tokio::test]
async fn three_entries_commit_and_flip_rollback() {
    let harness = Harness::new();
    let handle = registered_handle(&harness).await;

    let outcome_1 = harness
        .send(handle, &schema_pdu(false, 1, TEMPERATURE.0, TEMPERATURE.1, TEMPERATURE.2, b"temp"))
        .await;
    let outcome_2 = harness
        .send(handle, &schema_pdu(false, 2, HUMIDITY.0, HUMIDITY.1, HUMIDITY.2, b"hum"))
        .await;
    let outcome_3 = harness
        .send(handle, &schema_pdu(true, 3, PRESSURE.0, PRESSURE.1, PRESSURE.2, b"pres"))
        .await;

    for (outcome, expected_type) in [
        (outcome_1, MessageType::SchemaResp),
        (outcome_2, MessageType::SchemaResp),
        (outcome_3, MessageType::SchemaEndResp),
    ] {
        let DispatchOutcome::Reply(bytes) = outcome else {
            panic!("expected a reply");
        };
        let (header, body) = decode(&bytes).expect("decode");
        assert_eq!(header.msg_type, expected_type);
        let result_byte = match body {
            PduBody::SchemaResp(r) | PduBody::SchemaEndResp(r) => r,
            other => panic!("unexpected body: {other:?}"),
        };
        assert_eq!(result_byte, 0, "expected SUCCESS");
    }

    let trust = harness.dispatcher.store().lookup(handle).expect("trust present");
    let trust = trust.lock().await;
    assert_eq!(trust.schema.len(), 3);
    assert!(!trust.rollback);
}
