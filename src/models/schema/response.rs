// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! SCHEMA_RESP and SCHEMA_END_RESP are plain result replies; see
//! [`crate::models::reply::encode_result_reply`].
