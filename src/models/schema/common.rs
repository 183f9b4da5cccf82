// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use zerocopy::little_endian::U16;
use zerocopy::FromBytes;

use crate::models::common::{zero_padded, DecodeError};
use crate::models::opcode::MessageType;

/// Maximum length of a schema entry's `name` field (§3).
pub const NAME_MAX: usize = 23;
/// Fixed prefix preceding `name`: `sensor_id + type_id + value_type + unit`.
const PREFIX_LEN: usize = 1 + 2 + 1 + 1;

/// One declared sensor, as uploaded by the node (SCHEMA/SCHEMA_END) or held
/// committed in a trust's `schema` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub sensor_id: u8,
    pub type_id: u16,
    pub value_type: u8,
    pub unit: u8,
    pub name: [u8; NAME_MAX],
}

impl SchemaEntry {
    pub fn new(sensor_id: u8, type_id: u16, value_type: u8, unit: u8, name: &[u8]) -> Self {
        Self {
            sensor_id,
            type_id,
            value_type,
            unit,
            name: zero_padded(name),
        }
    }

    pub fn name_str(&self) -> String {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(NAME_MAX);
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }

    /// Decode a single schema entry from a SCHEMA / SCHEMA_END body.
    pub fn decode_body(msg_type: MessageType, body: &[u8]) -> Result<Self, DecodeError> {
        if body.len() < PREFIX_LEN {
            return Err(DecodeError::BodyTooShort {
                msg_type,
                need: PREFIX_LEN,
                got: body.len(),
            });
        }
        let sensor_id = body[0];
        let type_id = U16::<zerocopy::byteorder::LittleEndian>::ref_from_bytes(&body[1..3])
            .map_err(|_| DecodeError::BodyTooShort {
                msg_type,
                need: PREFIX_LEN,
                got: body.len(),
            })?
            .get();
        let value_type = body[3];
        let unit = body[4];
        let name = &body[PREFIX_LEN..];

        Ok(Self::new(sensor_id, type_id, value_type, unit, name))
    }

    /// Encode this entry's body (used when re-emitting a schema entry, e.g.
    /// in fixtures and round-trip tests; the dispatcher itself never needs
    /// to re-encode a SCHEMA/SCHEMA_END body as a reply).
    pub fn encode_body(&self, buf: &mut [u8]) -> usize {
        buf[0] = self.sensor_id;
        buf[1..3].copy_from_slice(&self.type_id.to_le_bytes());
        buf[3] = self.value_type;
        buf[4] = self.unit;
        let name_len = self.name.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        buf[PREFIX_LEN..PREFIX_LEN + name_len].copy_from_slice(&self.name[..name_len]);
        PREFIX_LEN + name_len
    }
}
