// LSF Panel - Cell Model
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Topology cell classification.

use std::fmt;

use crate::channel::names;

/// Role of an endpoint in the framework topology.
///
/// Every daemon identifier maps to exactly one cell. The five fixed roles
/// match by exact D-Bus name; everything else reported by the controller
/// is a generic security app. The gateway (GPMS server) has no D-Bus name
/// and only ever appears as the far end of the agent link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Panel,
    Hub,
    Auth,
    Controller,
    Agent,
    Gateway,
    App,
}

impl Cell {
    /// Resolve a fixed-role daemon identifier. App identifiers do not
    /// match here; they need a registry lookup.
    pub fn fixed(dbus_name: &str) -> Option<Cell> {
        match dbus_name {
            names::PANEL => Some(Cell::Panel),
            names::HUB => Some(Cell::Hub),
            names::AUTH => Some(Cell::Auth),
            names::CONTROLLER => Some(Cell::Controller),
            names::AGENT => Some(Cell::Agent),
            _ => None,
        }
    }

    /// Classify a daemon identifier from a status report. Unknown
    /// identifiers are generic apps.
    pub fn classify(dbus_name: &str) -> Cell {
        Cell::fixed(dbus_name).unwrap_or(Cell::App)
    }

    /// Short label used in the transition log.
    pub fn label(self) -> &'static str {
        match self {
            Cell::Panel => "CC",
            Cell::Hub => "GHUB",
            Cell::Auth => "GAUTH",
            Cell::Controller => "GCTRL",
            Cell::Agent => "AGENT",
            Cell::Gateway => "GPMS",
            Cell::App => "APPS",
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
