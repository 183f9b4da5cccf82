// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

pub mod config;
pub mod schema;

pub use config::{validate_config, ConfigValidationError};
pub use schema::{validate_schema, SchemaValidationError};
