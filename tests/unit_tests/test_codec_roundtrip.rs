// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use knot_gateway_core::models::common::{write_header, HeaderSplitError, HEADER_LEN};
use knot_gateway_core::models::credential::Credential;
use knot_gateway_core::models::opcode::MessageType;
use knot_gateway_core::models::parse::{decode, PduBody};
use knot_gateway_core::models::reply::encode_result_reply;
use knot_gateway_core::models::result::ResultCode;
use knot_gateway_core::models::schema::SchemaEntry;

/// Property 1: decode(encode(h, b)) == (h, b), for every PDU shape the
/// codec both encodes and decodes.
#[test]
fn result_reply_round_trips_for_every_resp_type() {
    let resp_types = [
        MessageType::UnregisterResp,
        MessageType::AuthResp,
        MessageType::SchemaResp,
        MessageType::SchemaEndResp,
    ];

    for &msg_type in &resp_types {
        let mut buf = [0u8; HEADER_LEN + 1];
        encode_result_reply(&mut buf, msg_type, ResultCode::Success);

        let (header, body) = decode(&buf).expect("decode");
        assert_eq!(header.msg_type, msg_type);
        assert_eq!(header.payload_len, 1);

        let expected = match msg_type {
            MessageType::UnregisterResp => PduBody::UnregisterResp(0),
            MessageType::AuthResp => PduBody::AuthResp(0),
            MessageType::SchemaResp => PduBody::SchemaResp(0),
            MessageType::SchemaEndResp => PduBody::SchemaEndResp(0),
            other => panic!("unexpected message type in test table: {other:?}"),
        };
        assert_eq!(body, expected);
    }
}

#[test]
fn register_resp_credential_round_trips() {
    use knot_gateway_core::models::credential::{TOKEN_LEN, UUID_LEN};
    use knot_gateway_core::models::register::response::encode_register_resp;

    let cred = Credential::new("aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa", &"t".repeat(TOKEN_LEN));
    let mut buf = vec![0u8; HEADER_LEN + UUID_LEN + TOKEN_LEN];
    encode_register_resp(&mut buf, &cred);

    let (header, body) = decode(&buf).expect("decode");
    assert_eq!(header.msg_type, MessageType::RegisterResp);
    assert_eq!(body, PduBody::RegisterResp(cred));
}

#[test]
fn schema_entry_round_trips_through_decode() {
    let entry = SchemaEntry::new(1, 7, 2, 3, b"temperature");
    let mut payload = vec![0u8; 64];
    let n = entry.encode_body(&mut payload);

    let mut buf = vec![0u8; HEADER_LEN + n];
    write_header(&mut buf, MessageType::Schema, n as u8);
    buf[HEADER_LEN..].copy_from_slice(&payload[..n]);

    let (header, body) = decode(&buf).expect("decode");
    assert_eq!(header.msg_type, MessageType::Schema);
    assert_eq!(body, PduBody::Schema(entry));
}

/// Property 2: any input whose total length differs from
/// `HEADER_LEN + payload_len` yields a structural error, never a parsed PDU.
#[test]
fn length_mismatch_is_always_a_structural_error() {
    let mut buf = [0u8; HEADER_LEN + 4];
    write_header(&mut buf, MessageType::AuthResp, 1);

    let err = decode(&buf).unwrap_err();
    assert!(matches!(err, HeaderSplitError::Decode(_)));
}

#[test]
fn truncated_input_below_header_is_a_structural_error() {
    let err = decode(&[MessageType::AuthResp.as_u8()]).unwrap_err();
    assert!(matches!(err, HeaderSplitError::Decode(_)));
}
