// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `(uuid, token)` credential pair the cloud assigns a device. The same
//! 76-byte shape is carried by REGISTER_RESP (gateway → node, on a fresh
//! registration) and by AUTH_REQ (node → gateway, on sign-in).

use crate::models::common::DecodeError;
use crate::models::opcode::MessageType;

/// Exact wire length of the cloud-assigned device UUID (§3).
pub const UUID_LEN: usize = 36;
/// Exact wire length of the cloud-assigned auth token (§3).
pub const TOKEN_LEN: usize = 40;

/// A decoded `(uuid, token)` pair, copied out of the wire buffer into owned,
/// exact-length arrays — these fields are fixed-length on the wire, unlike
/// the zero-padded variable-length strings elsewhere in the protocol.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub uuid: [u8; UUID_LEN],
    pub token: [u8; TOKEN_LEN],
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("uuid", &self.uuid_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Credential {
    pub fn new(uuid: &str, token: &str) -> Self {
        let mut uuid_buf = [0u8; UUID_LEN];
        let mut token_buf = [0u8; TOKEN_LEN];
        let n = uuid.as_bytes().len().min(UUID_LEN);
        uuid_buf[..n].copy_from_slice(&uuid.as_bytes()[..n]);
        let n = token.as_bytes().len().min(TOKEN_LEN);
        token_buf[..n].copy_from_slice(&token.as_bytes()[..n]);
        Self {
            uuid: uuid_buf,
            token: token_buf,
        }
    }

    pub fn uuid_str(&self) -> String {
        String::from_utf8_lossy(&self.uuid).into_owned()
    }

    pub fn token_str(&self) -> String {
        String::from_utf8_lossy(&self.token).into_owned()
    }

    /// Decode a credential body for the given message type (used for its
    /// error reporting only; both REGISTER_RESP and AUTH_REQ share this
    /// layout).
    pub fn decode_body(msg_type: MessageType, body: &[u8]) -> Result<Self, DecodeError> {
        let need = UUID_LEN + TOKEN_LEN;
        if body.len() != need {
            return Err(DecodeError::BodyTooShort {
                msg_type,
                need,
                got: body.len(),
            });
        }
        let mut uuid = [0u8; UUID_LEN];
        uuid.copy_from_slice(&body[..UUID_LEN]);
        let mut token = [0u8; TOKEN_LEN];
        token.copy_from_slice(&body[UUID_LEN..need]);
        Ok(Self { uuid, token })
    }

    /// Encode into `buf`, returning the number of payload bytes written
    /// (always `UUID_LEN + TOKEN_LEN`).
    pub fn encode_body(&self, buf: &mut [u8]) -> usize {
        let need = UUID_LEN + TOKEN_LEN;
        buf[..UUID_LEN].copy_from_slice(&self.uuid);
        buf[UUID_LEN..need].copy_from_slice(&self.token);
        need
    }
}
