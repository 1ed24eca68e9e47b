// LSF Panel - Main Entry Point
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Headless runner: drives the panel loop with a tracing-backed view.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::time::{interval, interval_at, Instant};
use tracing::info;

use lsf_panel::channel::DbusChannel;
use lsf_panel::config::{self, LsfConf};
use lsf_panel::panel::{Panel, PRESENTER_PERIOD, STATUS_PERIOD};
use lsf_panel::scene::TraceView;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    if !config::framework_installed() {
        info!("Security framework is not installed, nothing to monitor");
        return Ok(());
    }
    let conf = LsfConf::load(config::LSF_CONF_PATH)?;
    if !conf.control_center_enabled() {
        info!("Control-center panel is deactivated in lsf.conf");
        return Ok(());
    }

    let channel = Arc::new(
        DbusChannel::connect().context("Failed to reach the framework hub on the system bus")?,
    );
    let mut panel = Panel::new(channel, true, config::current_log_path(), TraceView);
    panel.bootstrap();

    // Single event loop; scene ticks and status polls never overlap.
    let mut presenter = interval(PRESENTER_PERIOD);
    let mut status = interval_at(Instant::now() + STATUS_PERIOD, STATUS_PERIOD);
    loop {
        tokio::select! {
            _ = presenter.tick() => panel.present(),
            _ = status.tick() => panel.refresh(),
        }
    }
}
