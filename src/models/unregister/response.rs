// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! UNREGISTER_RESP is a plain result reply; see
//! [`crate::models::reply::encode_result_reply`].
