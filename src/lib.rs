// LSF Panel - Library Root
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Control-center panel for the Gooroom Linux Security Framework (LSF).
//!
//! The panel authenticates against the framework hub, polls daemon status
//! through the controller, tails the daily message log and animates the
//! observed IPC traffic as a topology scene. App settings pages for the
//! managed security applications are relayed through the same channel.

pub mod bridge;
pub mod channel;
pub mod config;
pub mod models;
pub mod panel;
pub mod registry;
pub mod scene;
pub mod session;
pub mod tailer;
