// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The KNOT message type occupies the whole first octet of every PDU header
//! (unlike the iSCSI BHS this crate's layout is modeled on, there is no
//! Immediate-style flag bit stealing part of the byte).

use std::convert::TryFrom;

use thiserror::Error;

/// All message types defined by the KNOT wire protocol this gateway speaks.
///
/// Numeric values are an assignment internal to this implementation — the
/// distilled specification pins relative protocol behaviour but not concrete
/// byte values, so these are chosen for this crate and documented in
/// `DESIGN.md`.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    #[default]
    RegisterReq = 0x01,
    RegisterResp = 0x02,
    UnregisterReq = 0x03,
    UnregisterResp = 0x04,
    AuthReq = 0x05,
    AuthResp = 0x06,
    Schema = 0x07,
    SchemaResp = 0x08,
    SchemaEnd = 0x09,
    SchemaEndResp = 0x0A,
    Data = 0x0B,
    DataResp = 0x0C,
    ConfigResp = 0x0D,
}

impl MessageType {
    #[inline]
    pub const fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0x01 => Self::RegisterReq,
            0x02 => Self::RegisterResp,
            0x03 => Self::UnregisterReq,
            0x04 => Self::UnregisterResp,
            0x05 => Self::AuthReq,
            0x06 => Self::AuthResp,
            0x07 => Self::Schema,
            0x08 => Self::SchemaResp,
            0x09 => Self::SchemaEnd,
            0x0A => Self::SchemaEndResp,
            0x0B => Self::Data,
            0x0C => Self::DataResp,
            0x0D => Self::ConfigResp,
            _ => return None,
        })
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageType {
    type Error = UnknownMessageType;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_u8(byte).ok_or(UnknownMessageType(byte))
    }
}

impl From<MessageType> for u8 {
    fn from(t: MessageType) -> u8 {
        t.as_u8()
    }
}

/// Returned when the header's message-type octet is not one this gateway
/// recognizes. The dispatcher treats this as the "unknown message type"
/// case (§4.E), not as a structural decode failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unknown KNOT message type: 0x{0:02x}")]
pub struct UnknownMessageType(pub u8);
