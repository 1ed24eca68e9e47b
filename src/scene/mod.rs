// LSF Panel - Scene Module
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Topology animation: scene classification and the tick schedule.

mod director;
mod view;

pub use director::SceneDirector;
pub use view::{link_paint, Link, LinkPaint, SceneView, TraceView};

/// Ticks in one non-idle scene activation.
pub const SCENE_TICKS: u8 = 17;

/// Final destination-highlight tick; the only one that consults the
/// endpoint's live running state.
pub const TARGET_FINAL_TICK: u8 = 15;

/// Endpoint opacity while highlighted.
pub const OPACITY_FULL: f64 = 1.0;

/// Endpoint opacity at rest.
pub const OPACITY_DIM: f64 = 0.3;

/// One classified animation episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scene {
    /// Nothing animating; the tailer may be polled.
    #[default]
    Idle,
    /// A call away from the hub side, drawn source-to-destination.
    ForwardCall,
    /// A call originating at the hub, drawn destination-first.
    ReverseCall,
    /// The agent pulling a policy update from the gateway.
    PolicyReload,
}
