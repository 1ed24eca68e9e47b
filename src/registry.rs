// LSF Panel - Daemon Registry
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Registry of framework daemons rebuilt from controller status reports.

use anyhow::{ensure, Context, Result};
use serde_json::Value;

use crate::channel::names;
use crate::models::{Cell, DaemonEntry};

/// Upper bound on registry rows; status entries beyond this are ignored.
pub const REGISTRY_CAPACITY: usize = 99;

/// The set of known daemons, keyed by D-Bus name.
///
/// The registry is replaced wholesale on every successful status poll.
/// A malformed status response leaves the previous contents untouched;
/// the caller decides how to treat the now-stale data.
#[derive(Debug, Default)]
pub struct DaemonRegistry {
    entries: Vec<DaemonEntry>,
}

impl DaemonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[DaemonEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DaemonEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, dbus_name: &str) -> Option<&DaemonEntry> {
        self.entries.iter().find(|e| e.dbus_name == dbus_name)
    }

    pub fn find_index(&self, dbus_name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.dbus_name == dbus_name)
    }

    /// Record that rendering elements exist for an entry.
    pub fn mark_materialized(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.materialized = true;
        }
    }

    /// Replace the registry from a `GET_STATUS` response. On any parse
    /// failure the registry is left unchanged and the error is returned.
    pub fn rebuild_from_status(&mut self, response: &Value) -> Result<usize> {
        let entries = parse_status(response)?;
        let count = entries.len();
        self.entries = entries;
        Ok(count)
    }
}

/// Parse the controller's status response:
/// `{"return":{"result":[{dbus_name, display_name, status:[{exe_stat, auth_stat}]}]}}`.
///
/// `auth_stat` is only present (and only consulted) for running modules.
pub fn parse_status(response: &Value) -> Result<Vec<DaemonEntry>> {
    let modules = response
        .get("return")
        .and_then(|v| v.get("result"))
        .and_then(Value::as_array)
        .context("status response has no return.result array")?;
    ensure!(!modules.is_empty(), "status response lists no modules");

    let mut entries = Vec::with_capacity(modules.len().min(REGISTRY_CAPACITY));

    for (index, module) in modules.iter().take(REGISTRY_CAPACITY).enumerate() {
        let dbus_name = module
            .get("dbus_name")
            .and_then(Value::as_str)
            .context("module record has no dbus_name")?;
        let display_name = module
            .get("display_name")
            .and_then(Value::as_str)
            .context("module record has no display_name")?;
        let status = module
            .get("status")
            .and_then(Value::as_array)
            .and_then(|list| list.first())
            .context("module record has no status entry")?;

        let running = status
            .get("exe_stat")
            .and_then(Value::as_str)
            .context("status entry has no exe_stat")?
            == "running";
        let authenticated = if running {
            status
                .get("auth_stat")
                .and_then(Value::as_str)
                .context("running module has no auth_stat")?
                == "auth"
        } else {
            false
        };

        entries.push(DaemonEntry {
            dbus_name: dbus_name.to_string(),
            display_name: display_name.to_string(),
            cell: Cell::classify(dbus_name),
            running,
            authenticated,
            index,
            materialized: false,
        });
    }

    Ok(entries)
}

/// Resolve the centralized-policy topology flag from the controller's
/// config response. Anything short of an explicit `"false"` for the
/// controller module leaves the flag enabled.
pub fn parse_topology(response: &Value) -> bool {
    let Some(modules) = response
        .get("return")
        .and_then(|v| v.get("value"))
        .and_then(Value::as_array)
    else {
        return true;
    };

    for module in modules {
        if module.get("dbus_name").and_then(Value::as_str) != Some(names::CONTROLLER) {
            continue;
        }
        return module
            .get("settings")
            .and_then(|s| s.get("topology_on"))
            .and_then(Value::as_str)
            != Some("false");
    }

    true
}
