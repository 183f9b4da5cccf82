// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! DATA_RESP, when emitted as the gateway's own reply to an inbound DATA
//! PDU, is a plain result reply; see
//! [`crate::models::reply::encode_result_reply`].
