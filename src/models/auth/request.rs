// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::models::common::DecodeError;
use crate::models::credential::Credential;
use crate::models::opcode::MessageType;

/// AUTH_REQ body: the `(uuid, token)` pair the node already holds from a
/// prior registration, presented on sign-in.
pub type AuthReqBody = Credential;

pub fn decode_auth_req(body: &[u8]) -> Result<Credential, DecodeError> {
    Credential::decode_body(MessageType::AuthReq, body)
}
