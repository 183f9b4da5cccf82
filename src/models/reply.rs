// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Shared encode/decode for the common "single result byte" response shape
//! used by every `*_RESP` message except `REGISTER_RESP` (which carries a
//! credential instead, see [`crate::models::credential`]).

use crate::models::common::{DecodeError, HEADER_LEN, write_header};
use crate::models::opcode::MessageType;
use crate::models::result::ResultCode;

/// Encode `msg_type` with a 1-byte `result` payload into `buf`, returning the
/// total number of bytes written (`HEADER_LEN + 1`), matching §4.E's "Reply
/// assembly" rule of a default payload length of 1.
pub fn encode_result_reply(buf: &mut [u8], msg_type: MessageType, result: ResultCode) -> usize {
    write_header(buf, msg_type, 1);
    buf[HEADER_LEN] = result.as_byte();
    HEADER_LEN + 1
}

/// Decode a 1-byte result body (the shape of every `*_RESP` PDU this crate
/// never needs to synthesize from scratch but may still receive, e.g. in
/// codec round-trip tests).
pub fn decode_result_body(msg_type: MessageType, body: &[u8]) -> Result<u8, DecodeError> {
    match body.first() {
        Some(&b) => Ok(b),
        None => Err(DecodeError::BodyTooShort {
            msg_type,
            need: 1,
            got: 0,
        }),
    }
}
