// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::models::common::{split_header, Header, HeaderSplitError};
use crate::models::config::ConfigRespBody;
use crate::models::credential::Credential;
use crate::models::data::DataBody;
use crate::models::opcode::MessageType;
use crate::models::register::RegisterReqBody;
use crate::models::reply::decode_result_body;
use crate::models::schema::SchemaEntry;
use crate::models::unregister::UnregisterReqBody;

/// A decoded PDU body, tagged by its message type (§9 design notes: "tagged
/// sum: one arm per message type, each carrying its typed body").
///
/// Every variant here is one the codec can decode from raw wire bytes;
/// whether the dispatcher ever expects to *receive* that shape from a node
/// (as opposed to only emitting it) is a dispatcher-level concern, not a
/// codec one — the codec stays agnostic to message direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PduBody {
    RegisterReq(RegisterReqBody),
    RegisterResp(Credential),
    UnregisterReq(UnregisterReqBody),
    UnregisterResp(u8),
    AuthReq(Credential),
    AuthResp(u8),
    Schema(SchemaEntry),
    SchemaResp(u8),
    SchemaEnd(SchemaEntry),
    SchemaEndResp(u8),
    Data(DataBody),
    DataResp(DataBody),
    ConfigResp(ConfigRespBody),
}

impl PduBody {
    pub fn msg_type(&self) -> MessageType {
        match self {
            Self::RegisterReq(_) => MessageType::RegisterReq,
            Self::RegisterResp(_) => MessageType::RegisterResp,
            Self::UnregisterReq(_) => MessageType::UnregisterReq,
            Self::UnregisterResp(_) => MessageType::UnregisterResp,
            Self::AuthReq(_) => MessageType::AuthReq,
            Self::AuthResp(_) => MessageType::AuthResp,
            Self::Schema(_) => MessageType::Schema,
            Self::SchemaResp(_) => MessageType::SchemaResp,
            Self::SchemaEnd(_) => MessageType::SchemaEnd,
            Self::SchemaEndResp(_) => MessageType::SchemaEndResp,
            Self::Data(_) => MessageType::Data,
            Self::DataResp(_) => MessageType::DataResp,
            Self::ConfigResp(_) => MessageType::ConfigResp,
        }
    }
}

/// Decode a whole PDU: split the header, then decode the variant body keyed
/// by message type (§4.A). Structural failures and unknown message types are
/// both surfaced via [`HeaderSplitError`]; a recognized header whose body is
/// too short for its shape is folded into the same error type so callers
/// have one failure path for "no reply possible".
pub fn decode(input: &[u8]) -> Result<(Header, PduBody), HeaderSplitError> {
    let (header, body) = split_header(input)?;

    let parsed = match header.msg_type {
        MessageType::RegisterReq => PduBody::RegisterReq(
            RegisterReqBody::decode_body(body).map_err(HeaderSplitError::Decode)?,
        ),
        MessageType::RegisterResp => PduBody::RegisterResp(
            Credential::decode_body(MessageType::RegisterResp, body)
                .map_err(HeaderSplitError::Decode)?,
        ),
        MessageType::UnregisterReq => PduBody::UnregisterReq(UnregisterReqBody::decode_body(body)),
        MessageType::UnregisterResp => PduBody::UnregisterResp(
            decode_result_body(MessageType::UnregisterResp, body)
                .map_err(HeaderSplitError::Decode)?,
        ),
        MessageType::AuthReq => PduBody::AuthReq(
            Credential::decode_body(MessageType::AuthReq, body).map_err(HeaderSplitError::Decode)?,
        ),
        MessageType::AuthResp => PduBody::AuthResp(
            decode_result_body(MessageType::AuthResp, body).map_err(HeaderSplitError::Decode)?,
        ),
        MessageType::Schema => PduBody::Schema(
            SchemaEntry::decode_body(MessageType::Schema, body).map_err(HeaderSplitError::Decode)?,
        ),
        MessageType::SchemaResp => PduBody::SchemaResp(
            decode_result_body(MessageType::SchemaResp, body).map_err(HeaderSplitError::Decode)?,
        ),
        MessageType::SchemaEnd => PduBody::SchemaEnd(
            SchemaEntry::decode_body(MessageType::SchemaEnd, body)
                .map_err(HeaderSplitError::Decode)?,
        ),
        MessageType::SchemaEndResp => PduBody::SchemaEndResp(
            decode_result_body(MessageType::SchemaEndResp, body)
                .map_err(HeaderSplitError::Decode)?,
        ),
        MessageType::Data => PduBody::Data(
            DataBody::decode_body(MessageType::Data, body).map_err(HeaderSplitError::Decode)?,
        ),
        MessageType::DataResp => PduBody::DataResp(
            DataBody::decode_body(MessageType::DataResp, body).map_err(HeaderSplitError::Decode)?,
        ),
        MessageType::ConfigResp => PduBody::ConfigResp(
            ConfigRespBody::decode_body(body).map_err(HeaderSplitError::Decode)?,
        ),
    };

    Ok((header, parsed))
}
