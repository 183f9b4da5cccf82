// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::models::common::{write_header, DecodeError, HEADER_LEN};
use crate::models::credential::Credential;
use crate::models::opcode::MessageType;

/// REGISTER_RESP body: the cloud-assigned credential. Unlike every other
/// `*_RESP` shape, the payload here is the credential rather than a single
/// result byte — a fresh registration either succeeds with a credential or
/// fails with a `Cloud(..)`/`ErrorUnknown` result encoded via
/// [`crate::models::reply::encode_result_reply`] instead.
pub type RegisterRespBody = Credential;

/// Encode a successful REGISTER_RESP: header + 76-byte credential.
pub fn encode_register_resp(buf: &mut [u8], credential: &Credential) -> usize {
    let payload_len = (credential.uuid.len() + credential.token.len()) as u8;
    write_header(buf, MessageType::RegisterResp, payload_len);
    HEADER_LEN + credential.encode_body(&mut buf[HEADER_LEN..])
}

pub fn decode_register_resp(body: &[u8]) -> Result<Credential, DecodeError> {
    Credential::decode_body(MessageType::RegisterResp, body)
}
