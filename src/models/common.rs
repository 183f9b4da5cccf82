// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::models::opcode::MessageType;

/// Length of the fixed KNOT PDU header: `type` + `payload_len`.
pub const HEADER_LEN: usize = 2;

/// Upper bound on a whole KNOT PDU (header + payload), mirroring the
/// `sizeof(knot_msg)` buffer the original protocol sizes its messages to.
pub const KNOT_MSG_MAX: usize = 128;

/// The 2-byte Basic Header of every KNOT PDU.
///
/// Both fields are single bytes, so there is no endianness to get wrong;
/// `zerocopy` is used here purely so the header can be read out of (and
/// written into) a raw byte slice without a manual field-by-field copy, the
/// same role it plays for the fixed-size BHS structs this crate's layout is
/// modeled on.
#[repr(C)]
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable,
)]
pub struct RawHeader {
    pub msg_type: u8,
    pub payload_len: u8,
}

/// A decoded, semantically-typed header: a known [`MessageType`] plus the
/// declared payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub msg_type: MessageType,
    pub payload_len: u8,
}

/// Structural decode failures: the input could not even be parsed into a
/// header/body pair. These never produce a reply PDU (§7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("input shorter than the {HEADER_LEN}-byte header")]
    InvalidLength,
    #[error("declared payload_len {declared} does not match input length {actual}")]
    LengthMismatch { declared: u8, actual: usize },
    #[error("body too short for {msg_type:?}: need at least {need} bytes, got {got}")]
    BodyTooShort {
        msg_type: MessageType,
        need: usize,
        got: usize,
    },
}

/// The raw header parsed, but with a message type this gateway does not
/// recognize. The dispatcher treats this distinctly from [`DecodeError`]:
/// per §4.E it is not a structural failure, just a message the dispatcher
/// has no handler for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownHeader {
    pub raw_type: u8,
    pub payload_len: u8,
}

/// Outcome of [`split_header`]: either a structural failure (no reply
/// possible) or a header whose type byte is simply not one we know about
/// (dispatcher decides what, if anything, to reply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderSplitError {
    Decode(DecodeError),
    Unknown(UnknownHeader),
}

/// Split raw input into its header and the raw body slice, validating only
/// the structural invariants from §4.A: minimum length and the
/// `payload_len == total_len - HEADER_LEN` relationship. No semantic
/// validation of the body happens here.
pub fn split_header(input: &[u8]) -> Result<(Header, &[u8]), HeaderSplitError> {
    if input.len() < HEADER_LEN {
        return Err(HeaderSplitError::Decode(DecodeError::InvalidLength));
    }

    let raw = RawHeader::ref_from_bytes(&input[..HEADER_LEN])
        .map_err(|_| HeaderSplitError::Decode(DecodeError::InvalidLength))?;

    let expected_total = HEADER_LEN + raw.payload_len as usize;
    if input.len() != expected_total {
        return Err(HeaderSplitError::Decode(DecodeError::LengthMismatch {
            declared: raw.payload_len,
            actual: input.len(),
        }));
    }

    let body = &input[HEADER_LEN..];

    match MessageType::from_u8(raw.msg_type) {
        Some(msg_type) => Ok((
            Header {
                msg_type,
                payload_len: raw.payload_len,
            },
            body,
        )),
        None => Err(HeaderSplitError::Unknown(UnknownHeader {
            raw_type: raw.msg_type,
            payload_len: raw.payload_len,
        })),
    }
}

/// Write the 2-byte header into `buf[..HEADER_LEN]`.
pub fn write_header(buf: &mut [u8], msg_type: MessageType, payload_len: u8) {
    let raw = RawHeader {
        msg_type: msg_type.as_u8(),
        payload_len,
    };
    buf[..HEADER_LEN].copy_from_slice(raw.as_bytes());
}

/// Copy `src` into a zero-padded, fixed-size buffer of length `N`, as the
/// codec must for every embedded string field (§4.A): strings on the wire
/// are never null-terminated, so the padding is purely a buffer-size
/// convention of the decoded representation, not a wire marker.
pub fn zero_padded<const N: usize>(src: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    let n = src.len().min(N);
    buf[..n].copy_from_slice(&src[..n]);
    buf
}
