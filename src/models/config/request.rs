// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::models::common::DecodeError;
use crate::models::opcode::MessageType;

/// CONFIG_RESP body: the node acknowledging it has applied a config entry
/// for `sensor_id` (§4.E). The gateway drops the matching entry from
/// `trust.config` and sends no reply of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigRespBody {
    pub sensor_id: u8,
}

impl ConfigRespBody {
    pub fn decode_body(body: &[u8]) -> Result<Self, DecodeError> {
        match body.first() {
            Some(&sensor_id) => Ok(Self { sensor_id }),
            None => Err(DecodeError::BodyTooShort {
                msg_type: MessageType::ConfigResp,
                need: 1,
                got: 0,
            }),
        }
    }
}
