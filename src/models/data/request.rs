// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::models::common::DecodeError;
use crate::models::opcode::MessageType;

/// DATA and DATA_RESP (received as input, i.e. the node acking a
/// previously pushed set-data) share this shape: a sensor id and a payload
/// whose layout `value_type` from the schema would determine. The core
/// never interprets that layout itself (§6) — it only validates the sensor
/// against the schema and relays the raw bytes to the cloud adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBody {
    pub sensor_id: u8,
    pub payload: Vec<u8>,
}

impl DataBody {
    pub fn decode_body(msg_type: MessageType, body: &[u8]) -> Result<Self, DecodeError> {
        let Some((&sensor_id, payload)) = body.split_first() else {
            return Err(DecodeError::BodyTooShort {
                msg_type,
                need: 1,
                got: 0,
            });
        };
        Ok(Self {
            sensor_id,
            payload: payload.to_vec(),
        })
    }
}
