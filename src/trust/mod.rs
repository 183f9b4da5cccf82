// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

pub mod store;

use crate::models::schema::SchemaEntry;

/// Limit of a config threshold, expressed as the protocol's
/// floating-point-like `(integer_part, decimal_part)` pair (§3). Ordered
/// lexicographically by `(integer_part, decimal_part)`, matching §4.D's
/// comparison rule exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Limit {
    pub integer_part: i32,
    pub decimal_part: u32,
}

impl Limit {
    pub const fn new(integer_part: i32, decimal_part: u32) -> Self {
        Self {
            integer_part,
            decimal_part,
        }
    }
}

bitflags::bitflags! {
    /// Event flags a config entry may request (§4.D). Any bit outside this
    /// set is a validation failure.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EventFlags: u8 {
        const NONE              = 0b0000_0000;
        const TIME              = 0b0000_0001;
        const LOWER_THRESHOLD   = 0b0000_0010;
        const UPPER_THRESHOLD   = 0b0000_0100;
        const CHANGE            = 0b0000_1000;
        const UNREGISTERED      = 0b0001_0000;
    }
}

/// A config entry as held in `trust.config`, last received from the cloud
/// (§3). The only part of a config entry that ever crosses the KNOT wire is
/// the `sensor_id` the node echoes back in CONFIG_RESP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigEntry {
    pub sensor_id: u8,
    pub event_flags: EventFlags,
    pub time_sec: u16,
    pub lower_limit: Limit,
    pub upper_limit: Limit,
}

/// Per-connection authenticated session state (§3).
///
/// `schema` and `config` are never `None` — an empty `Vec` represents "no
/// entries yet", matching the invariant that these fields exist (possibly
/// empty) for the lifetime of the trust.
#[derive(Debug, Clone)]
pub struct Trust {
    pub peer_pid: u32,
    pub device_id: u64,
    pub uuid: String,
    pub token: String,
    pub rollback: bool,
    pub schema: Vec<SchemaEntry>,
    pub schema_staging: Vec<SchemaEntry>,
    pub config: Vec<ConfigEntry>,
}

impl Trust {
    /// Construct a freshly registered trust: `rollback = true` until the
    /// first SCHEMA PDU arrives (§3).
    pub fn new_provisional(peer_pid: u32, device_id: u64, uuid: String, token: String) -> Self {
        Self {
            peer_pid,
            device_id,
            uuid,
            token,
            rollback: true,
            schema: Vec::new(),
            schema_staging: Vec::new(),
            config: Vec::new(),
        }
    }

    /// Construct a trust from a successful sign-in: `rollback = false`
    /// immediately, since the node already held a cloud-issued credential.
    pub fn new_signed_in(
        peer_pid: u32,
        device_id: u64,
        uuid: String,
        token: String,
        schema: Vec<SchemaEntry>,
        config: Vec<ConfigEntry>,
    ) -> Self {
        Self {
            peer_pid,
            device_id,
            uuid,
            token,
            rollback: false,
            schema,
            schema_staging: Vec::new(),
            config,
        }
    }

    /// Linear search of the committed schema list (§4.C); the core never
    /// assumes any particular ordering by `sensor_id`.
    pub fn find_schema(&self, sensor_id: u8) -> Option<&SchemaEntry> {
        self.schema.iter().find(|e| e.sensor_id == sensor_id)
    }

    /// Append `entry` to `schema_staging` unless an entry with the same
    /// `sensor_id` is already staged (first-write-wins, §3).
    pub fn stage_schema_entry(&mut self, entry: SchemaEntry) {
        if !self.schema_staging.iter().any(|e| e.sensor_id == entry.sensor_id) {
            self.schema_staging.push(entry);
        }
    }

    /// Promote `schema_staging` to `schema`, clearing the staging list
    /// (§3: "must not be partially committed").
    pub fn commit_schema_staging(&mut self) {
        self.schema = std::mem::take(&mut self.schema_staging);
    }

    /// Drop `schema_staging` without touching the committed `schema` list
    /// (cloud rejected `submit_schema`).
    pub fn discard_schema_staging(&mut self) {
        self.schema_staging.clear();
    }

    /// Acknowledge a config entry: the node applied the config for
    /// `sensor_id`, so it is removed from the pending list (§4.E,
    /// CONFIG_RESP).
    pub fn acknowledge_config(&mut self, sensor_id: u8) {
        self.config.retain(|c| c.sensor_id != sensor_id);
    }
}
