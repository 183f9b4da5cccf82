// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

pub mod cfg;
pub mod cloud;
pub mod dispatcher;
pub mod models;
pub mod trust;
pub mod validate;
