// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use knot_gateway_core::dispatcher::DispatchOutcome;
use knot_gateway_core::models::parse::{decode, PduBody};
use knot_gateway_core::trust::store::ConnectionHandle;

use crate::integration_tests::common::{
    data_pdu, data_resp_pdu, schema_pdu, unregister_req, Harness, TEMPERATURE,
};

const CREDENTIAL_UNAUTHORIZED: u8 = 1;

/// Property 4: DATA, SCHEMA, CONFIG_RESP, DATA_RESP and UNREGISTER_REQ on a
/// handle with no trust all come back CREDENTIAL_UNAUTHORIZED (CONFIG_RESP
/// and DATA_RESP send no reply at all, so they are checked by trust-store
/// absence instead).
#[tokio::test]
async fn data_on_untrusted_handle_is_unauthorized() {
    let harness = Harness::new();
    let handle = ConnectionHandle(42);

    let DispatchOutcome::Reply(bytes) = harness.send(handle, &data_pdu(1, &[0x00])).await else {
        panic!("expected a reply");
    };
    let (_, body) = decode(&bytes).expect("decode");
    assert_eq!(body, PduBody::DataResp(CREDENTIAL_UNAUTHORIZED));
}

#[tokio::test]
async fn schema_on_untrusted_handle_is_unauthorized() {
    let harness = Harness::new();
    let handle = ConnectionHandle(42);

    let pdu = schema_pdu(false, 1, TEMPERATURE.0, TEMPERATURE.1, TEMPERATURE.2, b"temp");
    let DispatchOutcome::Reply(bytes) = harness.send(handle, &pdu).await else {
        panic!("expected a reply");
    };
    let (_, body) = decode(&bytes).expect("decode");
    assert_eq!(body, PduBody::SchemaResp(CREDENTIAL_UNAUTHORIZED));
}

#[tokio::test]
async fn unregister_on_untrusted_handle_is_unauthorized() {
    let harness = Harness::new();
    let handle = ConnectionHandle(42);

    let DispatchOutcome::Reply(bytes) = harness.send(handle, &unregister_req()).await else {
        panic!("expected a reply");
    };
    let (_, body) = decode(&bytes).expect("decode");
    assert_eq!(body, PduBody::UnregisterResp(CREDENTIAL_UNAUTHORIZED));
}

#[tokio::test]
async fn data_resp_on_untrusted_handle_sends_no_reply() {
    let harness = Harness::new();
    let handle = ConnectionHandle(42);

    let outcome = harness.send(handle, &data_resp_pdu(1, &[0x00])).await;
    assert_eq!(outcome, DispatchOutcome::NoReply);
    assert!(harness.dispatcher.store().lookup(handle).is_none());
}
