// LSF Panel - Models
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Data models for the panel.

mod cell;
mod daemon;
mod event;

pub use cell::Cell;
pub use daemon::DaemonEntry;
pub use event::IpcEvent;
