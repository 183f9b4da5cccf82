// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use zerocopy::little_endian::U64;
use zerocopy::FromBytes;

use crate::models::common::DecodeError;
use crate::models::opcode::MessageType;

/// Maximum length of `device_name` (§6); names longer than this on the wire
/// are not rejected at decode time, since §4.E's acceptance rule (non-empty,
/// first byte non-zero) is the only length-independent check the dispatcher
/// performs — the codec just hands the bytes through.
pub const DEVICE_NAME_MAX: usize = 63;

/// Decoded REGISTER_REQ body: `device_id: u64` followed by the device's
/// self-reported name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterReqBody {
    pub device_id: u64,
    pub device_name: Vec<u8>,
}

impl RegisterReqBody {
    pub fn decode_body(body: &[u8]) -> Result<Self, DecodeError> {
        const DEVICE_ID_LEN: usize = 8;
        if body.len() < DEVICE_ID_LEN {
            return Err(DecodeError::BodyTooShort {
                msg_type: MessageType::RegisterReq,
                need: DEVICE_ID_LEN,
                got: body.len(),
            });
        }
        let device_id = U64::<zerocopy::byteorder::LittleEndian>::ref_from_bytes(
            &body[..DEVICE_ID_LEN],
        )
        .map_err(|_| DecodeError::BodyTooShort {
            msg_type: MessageType::RegisterReq,
            need: DEVICE_ID_LEN,
            got: body.len(),
        })?
        .get();

        Ok(Self {
            device_id,
            device_name: body[DEVICE_ID_LEN..].to_vec(),
        })
    }

    /// §4.E's acceptance rule: the PDU must contain at least one name byte
    /// and that byte must be non-zero.
    pub fn has_valid_device_name(&self) -> bool {
        matches!(self.device_name.first(), Some(&b) if b != 0)
    }
}
