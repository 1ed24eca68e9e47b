// LSF Panel - Scene Director
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! State machine turning IPC events into timed rendering callouts.

use tracing::debug;

use super::{Link, Scene, SceneView, OPACITY_DIM, OPACITY_FULL, SCENE_TICKS, TARGET_FINAL_TICK};
use crate::models::{Cell, IpcEvent};
use crate::registry::DaemonRegistry;

/// Drives one scene at a time through the fixed tick schedule.
///
/// Exactly one event is consumed per idle period and none are queued, so
/// log bursts throttle naturally to one visualized transition at a time.
/// The tick counter stays in `[0, SCENE_TICKS)`; scene changes happen
/// only at the first or last tick.
#[derive(Debug)]
pub struct SceneDirector {
    scene: Scene,
    tick: u8,
    animating: bool,
    from: Cell,
    to: Cell,
    /// Registry index of the app endpoint, when one side is an app.
    selected_app: Option<usize>,
    /// Sequence number of the event that started the current scene.
    cur_seq: u64,
    policy_reload_seq: u64,
    policy_reload_in_progress: bool,
    /// Transition text queued by classification, emitted at tick 0.
    pending_log: Option<String>,
}

impl Default for SceneDirector {
    fn default() -> Self {
        Self {
            scene: Scene::Idle,
            tick: 0,
            animating: false,
            from: Cell::Hub,
            to: Cell::Hub,
            selected_app: None,
            cur_seq: 0,
            policy_reload_seq: 0,
            policy_reload_in_progress: false,
            pending_log: None,
        }
    }
}

impl SceneDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn is_idle(&self) -> bool {
        self.scene == Scene::Idle
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn tick(&self) -> u8 {
        self.tick
    }

    pub fn policy_reload_in_progress(&self) -> bool {
        self.policy_reload_in_progress
    }

    /// Classify an event into the next scene. Only valid while idle.
    /// Returns `false` (and consumes the event) when either endpoint
    /// cannot be resolved against the fixed roles or the registry.
    pub fn observe(&mut self, event: &IpcEvent, registry: &DaemonRegistry) -> bool {
        if self.scene != Scene::Idle {
            return false;
        }

        let Some((from, from_app)) = resolve(&event.from, registry) else {
            debug!("dropping event {} from unknown endpoint {}", event.seq, event.from);
            return false;
        };
        let Some((to, to_app)) = resolve(&event.to, registry) else {
            debug!("dropping event {} to unknown endpoint {}", event.seq, event.to);
            return false;
        };

        self.cur_seq = event.seq;
        self.from = from;
        self.to = to;
        self.selected_app = to_app.or(from_app);

        let from_label = endpoint_label(from, from_app, registry);
        let to_label = endpoint_label(to, to_app, registry);
        self.pending_log = Some(format!(
            "{}\t-->\t{}\t{} , {}",
            from_label, to_label, event.glyph, event.function
        ));

        self.scene = if event.glyph == "O" && from == Cell::Agent && to == Cell::Hub {
            self.policy_reload_seq = event.seq;
            Scene::PolicyReload
        } else if from == Cell::Hub {
            Scene::ReverseCall
        } else {
            Scene::ForwardCall
        };

        true
    }

    /// Run one presenter tick, externalizing the scheduled visual-state
    /// changes for the current tick to the view.
    pub fn advance(&mut self, registry: &DaemonRegistry, view: &mut dyn SceneView) {
        if self.scene == Scene::Idle {
            self.animating = false;
            self.tick = 0;
            view.redraw_links();
            return;
        }

        match self.tick {
            0 => {
                self.animating = true;
                match self.scene {
                    Scene::PolicyReload => self.policy_reload_in_progress = true,
                    Scene::ForwardCall | Scene::ReverseCall => {
                        // A call with a different sequence supersedes a
                        // pending policy reload.
                        if self.policy_reload_in_progress && self.policy_reload_seq != self.cur_seq
                        {
                            self.policy_reload_in_progress = false;
                        }
                    }
                    Scene::Idle => unreachable!(),
                }
                if let Some(line) = self.pending_log.take() {
                    view.append_transition(&line);
                }
            }
            1 | 3 | 5 => self.paint_source(view, OPACITY_FULL),
            2 | 4 => {
                self.paint_source(view, OPACITY_DIM);
                view.redraw_links();
            }
            6..=10 => {
                if let Some(link) = self.active_link() {
                    view.redraw_link(link);
                }
            }
            11 | 13 | 15 => self.paint_target(registry, view, OPACITY_FULL),
            12 | 14 => self.paint_target(registry, view, OPACITY_DIM),
            16 => {
                match self.scene {
                    // Chain straight into the propagation step; the
                    // reload never lands in idle directly.
                    Scene::PolicyReload => {
                        self.scene = Scene::ForwardCall;
                        self.from = Cell::Agent;
                        self.to = Cell::Hub;
                        self.selected_app = None;
                    }
                    _ => {
                        self.scene = Scene::Idle;
                        self.animating = false;
                    }
                }
                view.redraw_links();
            }
            _ => {}
        }

        self.tick = (self.tick + 1) % SCENE_TICKS;
    }

    fn paint_source(&self, view: &mut dyn SceneView, opacity: f64) {
        match self.scene {
            Scene::PolicyReload => view.set_cell_opacity(Cell::Gateway, opacity),
            _ => self.paint_endpoint(self.from, view, opacity),
        }
    }

    fn paint_target(&self, registry: &DaemonRegistry, view: &mut dyn SceneView, opacity: f64) {
        match self.scene {
            Scene::PolicyReload => view.set_cell_opacity(Cell::Agent, opacity),
            _ => {
                // An app that is no longer running stays dimmed on the
                // final highlight.
                if self.to == Cell::App && self.tick == TARGET_FINAL_TICK {
                    if let Some(index) = self.selected_app {
                        let running = registry.get(index).map(|e| e.running).unwrap_or(false);
                        let opacity = if running { opacity } else { OPACITY_DIM };
                        view.set_app_opacity(index, opacity);
                    }
                    return;
                }
                self.paint_endpoint(self.to, view, opacity);
            }
        }
    }

    fn paint_endpoint(&self, cell: Cell, view: &mut dyn SceneView, opacity: f64) {
        if cell == Cell::App {
            if let Some(index) = self.selected_app {
                view.set_app_opacity(index, opacity);
            }
        } else {
            view.set_cell_opacity(cell, opacity);
        }
    }

    /// The connector being exercised by the current scene.
    fn active_link(&self) -> Option<Link> {
        let endpoint = match self.scene {
            Scene::PolicyReload => return Some(Link::AgentGateway),
            Scene::ForwardCall => self.from,
            Scene::ReverseCall => self.to,
            Scene::Idle => return None,
        };
        match endpoint {
            Cell::Panel => Some(Link::HubPanel),
            Cell::Auth => Some(Link::HubAuth),
            Cell::Controller => Some(Link::HubController),
            Cell::Agent => Some(Link::HubAgent),
            Cell::App => Some(Link::HubApps),
            Cell::Gateway => Some(Link::AgentGateway),
            Cell::Hub => None,
        }
    }
}

fn resolve(dbus_name: &str, registry: &DaemonRegistry) -> Option<(Cell, Option<usize>)> {
    if let Some(cell) = Cell::fixed(dbus_name) {
        return Some((cell, None));
    }
    registry
        .find_index(dbus_name)
        .map(|index| (Cell::App, Some(index)))
}

fn endpoint_label(cell: Cell, app: Option<usize>, registry: &DaemonRegistry) -> String {
    match app.and_then(|index| registry.get(index)) {
        Some(entry) => entry.display_name.clone(),
        None => cell.label().to_string(),
    }
}
