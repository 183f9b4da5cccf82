// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::trust::Trust;

/// Returned by [`TrustStore::insert`] when `handle` already holds a trust
/// (§4.B: `insert(h, t)` "fails if `h` already present").
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("a trust is already present for this connection handle")]
pub struct AlreadyPresent;

/// Opaque identifier of a connection, stable for the lifetime of that
/// connection (§3). The dispatcher hands these out; the store never
/// interprets them beyond equality/hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionHandle(pub u64);

/// A trust, guarded for safe mutation across the `.await` points a handler
/// needs to cross (cloud adapter calls, §9 design note). Handlers must clone
/// the `Arc` out of the store *before* awaiting anything, rather than
/// holding a `DashMap` entry guard across a suspension point.
pub type SharedTrust = Arc<Mutex<Trust>>;

/// Concurrent `connection_handle -> trust` mapping (§4.B).
///
/// Built on [`DashMap`] for the same reason the teacher's session pool uses
/// it: many connections are inserted, looked up and removed concurrently,
/// and no single global lock should serialize unrelated connections.
#[derive(Debug, Default)]
pub struct TrustStore {
    inner: DashMap<ConnectionHandle, SharedTrust>,
}

impl TrustStore {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Insert a newly established trust (§4.B). Fails without touching the
    /// map if `handle` already holds a trust — callers must explicitly
    /// [`Self::remove`] (and run any release logic, e.g. rollback) before
    /// inserting a replacement, rather than have a stale trust silently
    /// dropped out from under an outstanding borrow.
    pub fn insert(&self, handle: ConnectionHandle, trust: Trust) -> Result<SharedTrust, AlreadyPresent> {
        let shared = Arc::new(Mutex::new(trust));
        match self.inner.entry(handle) {
            Entry::Occupied(_) => Err(AlreadyPresent),
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&shared));
                Ok(shared)
            },
        }
    }

    /// Look up a trust by connection handle, cloning out the `Arc` so the
    /// caller can drop the map's internal shard lock before taking the
    /// trust's own mutex.
    pub fn lookup(&self, handle: ConnectionHandle) -> Option<SharedTrust> {
        self.inner.get(&handle).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove and return the trust for `handle`, if any (§4.B: torn down on
    /// disconnect or explicit unregister).
    pub fn remove(&self, handle: ConnectionHandle) -> Option<SharedTrust> {
        self.inner.remove(&handle).map(|(_, shared)| shared)
    }

    /// Tear down every trust in the store. Used on gateway shutdown; the
    /// spec does not require this to be synchronized with in-flight
    /// handlers, since shutdown implies no further PDUs will be dispatched.
    pub fn destroy_all(&self) {
        self.inner.clear();
    }

    /// Remove and return every `(handle, trust)` pair in the store (§4.B
    /// `destroy_all(f)`). Unlike [`Self::destroy_all`], this hands the
    /// caller each trust so it can run per-entry release logic — the
    /// rollback-on-teardown rule (§3) — before the map is emptied.
    pub fn drain(&self) -> Vec<(ConnectionHandle, SharedTrust)> {
        let items: Vec<_> = self
            .inner
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        self.inner.clear();
        items
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of outstanding references to the trust at `handle`, standing
    /// in for the spec's explicit `refs` counter (§9 design note): the
    /// store itself always holds one strong reference, so a handler with no
    /// other clone in flight sees exactly `1`.
    pub fn ref_count(&self, handle: ConnectionHandle) -> Option<usize> {
        self.inner.get(&handle).map(|entry| Arc::strong_count(entry.value()))
    }
}
