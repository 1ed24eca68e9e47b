// LSF Panel - Daemon Model
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! One framework daemon as reported by the controller.

use super::Cell;

/// A daemon row in the registry.
///
/// Entries are rebuilt wholesale on every status poll; nothing outside a
/// poll cycle mutates them except the `materialized` flag, which records
/// whether the rendering side has built elements for this entry yet.
#[derive(Debug, Clone)]
pub struct DaemonEntry {
    /// Stable D-Bus style identifier.
    pub dbus_name: String,
    /// Human-readable name shown in the topology.
    pub display_name: String,
    /// Resolved topology role.
    pub cell: Cell,
    /// Process is currently running.
    pub running: bool,
    /// Process holds a valid framework session.
    pub authenticated: bool,
    /// Stable position for rendering bindings.
    pub index: usize,
    /// Rendering elements have been built for this entry.
    pub materialized: bool,
}

impl DaemonEntry {
    pub fn is_app(&self) -> bool {
        self.cell == Cell::App
    }
}
