// LSF Panel - Scene View
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Rendering collaborator interface and connector paint resolution.

use tracing::debug;

use crate::models::Cell;
use crate::registry::DaemonRegistry;

/// A connector between two topology cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    HubPanel,
    HubAuth,
    HubController,
    HubAgent,
    HubApps,
    AgentGateway,
}

/// Paint for a connector, derived from live daemon state at render time
/// rather than stored in the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPaint {
    /// Endpoint not authenticated (or not running); drawn muted.
    Inactive,
    /// Both endpoints hold framework sessions; drawn green.
    Secured,
    /// Agent-to-gateway transport is up; drawn blue.
    Direct,
}

/// Resolve the paint for a connector from the current registry.
///
/// Daemons only report an auth state through the hub, so the far
/// endpoint's flag stands for the whole link.
pub fn link_paint(registry: &DaemonRegistry, link: Link) -> LinkPaint {
    let authenticated = |cell: Cell| {
        registry
            .entries()
            .iter()
            .any(|e| e.cell == cell && e.authenticated)
    };

    match link {
        Link::HubPanel if authenticated(Cell::Panel) => LinkPaint::Secured,
        Link::HubAuth if authenticated(Cell::Auth) => LinkPaint::Secured,
        Link::HubController if authenticated(Cell::Controller) => LinkPaint::Secured,
        Link::HubAgent if authenticated(Cell::Agent) => LinkPaint::Secured,
        Link::HubApps if authenticated(Cell::App) => LinkPaint::Secured,
        Link::AgentGateway => {
            let agent_running = registry
                .entries()
                .iter()
                .any(|e| e.cell == Cell::Agent && e.running);
            if agent_running {
                LinkPaint::Direct
            } else {
                LinkPaint::Inactive
            }
        }
        _ => LinkPaint::Inactive,
    }
}

/// Rendering collaborator driven by the scene director.
///
/// Implementations own the visual side entirely; the director only
/// dictates when endpoints light up and which connector to redraw.
pub trait SceneView {
    /// Set the opacity of a fixed topology cell.
    fn set_cell_opacity(&mut self, cell: Cell, opacity: f64);

    /// Set the opacity of an app entry by registry index.
    fn set_app_opacity(&mut self, index: usize, opacity: f64);

    /// Redraw a single connector.
    fn redraw_link(&mut self, link: Link);

    /// Redraw every connector.
    fn redraw_links(&mut self);

    /// A transition line became visible in the log area.
    fn append_transition(&mut self, line: &str);
}

/// Headless view that traces rendering callouts, used by the runner
/// binary and anywhere a real renderer is not attached.
#[derive(Debug, Default)]
pub struct TraceView;

impl SceneView for TraceView {
    fn set_cell_opacity(&mut self, cell: Cell, opacity: f64) {
        debug!("cell {} opacity {:.1}", cell, opacity);
    }

    fn set_app_opacity(&mut self, index: usize, opacity: f64) {
        debug!("app #{} opacity {:.1}", index, opacity);
    }

    fn redraw_link(&mut self, link: Link) {
        debug!("redraw {:?}", link);
    }

    fn redraw_links(&mut self) {}

    fn append_transition(&mut self, line: &str) {
        tracing::info!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DaemonRegistry;
    use serde_json::json;

    fn registry(agent_exe: &str, agent_auth: &str) -> DaemonRegistry {
        let mut registry = DaemonRegistry::new();
        let mut status = json!({"exe_stat": agent_exe});
        if agent_exe == "running" {
            status["auth_stat"] = json!(agent_auth);
        }
        registry
            .rebuild_from_status(&json!({"return": {"result": [
                {"dbus_name": "kr.gooroom.agent", "display_name": "Agent", "status": [status]},
                {"dbus_name": "kr.gooroom.ahnlab.v3", "display_name": "V3",
                 "status": [{"exe_stat": "stopped"}]}
            ]}}))
            .unwrap();
        registry
    }

    #[test]
    fn test_agent_link_requires_auth() {
        assert_eq!(
            link_paint(&registry("running", "auth"), Link::HubAgent),
            LinkPaint::Secured
        );
        assert_eq!(
            link_paint(&registry("running", "none"), Link::HubAgent),
            LinkPaint::Inactive
        );
    }

    #[test]
    fn test_gateway_link_requires_running_only() {
        assert_eq!(
            link_paint(&registry("running", "none"), Link::AgentGateway),
            LinkPaint::Direct
        );
        assert_eq!(
            link_paint(&registry("stopped", ""), Link::AgentGateway),
            LinkPaint::Inactive
        );
    }

    #[test]
    fn test_apps_link_inactive_without_authenticated_app() {
        assert_eq!(
            link_paint(&registry("running", "auth"), Link::HubApps),
            LinkPaint::Inactive
        );
    }
}
