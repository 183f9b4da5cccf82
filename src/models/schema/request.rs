// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! SCHEMA and SCHEMA_END share the same body shape; see
//! [`crate::models::schema::common::SchemaEntry`].
