// LSF Panel - Panel Orchestrator
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Ties the session, registry, tailer and scene together and runs the
//! control actions the panel exposes.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::bridge::{SettingsBridge, SettingsSurface};
use crate::channel::{names, SecureChannel};
use crate::models::Cell;
use crate::registry::{parse_topology, DaemonRegistry};
use crate::scene::{SceneDirector, SceneView, OPACITY_DIM, OPACITY_FULL};
use crate::session::{SendError, SessionManager};
use crate::tailer::LogTailer;

/// Presenter tick period; one scene tick per expiry.
pub const PRESENTER_PERIOD: Duration = Duration::from_millis(50);

/// Daemon status poll period.
pub const STATUS_PERIOD: Duration = Duration::from_secs(60);

/// Visible rows in the recent-transition area.
pub const TRANSITION_LOG_CAPACITY: usize = 10;

/// Transition lines shown by the panel: a bounded ring of recent rows
/// plus the full text accumulated since activation.
#[derive(Debug, Default)]
pub struct TransitionLog {
    recent: VecDeque<String>,
    full: String,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line that is not a transition, such as the activation
    /// banner. It appears in the full text only.
    pub fn banner(&mut self, line: &str) {
        self.full.push_str(line);
        self.full.push('\n');
    }

    pub fn push(&mut self, line: &str) {
        if self.recent.len() == TRANSITION_LOG_CAPACITY {
            self.recent.pop_front();
        }
        self.recent.push_back(line.to_string());
        self.full.push_str(line);
        self.full.push('\n');
    }

    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().map(String::as_str)
    }

    pub fn full(&self) -> &str {
        &self.full
    }
}

/// A panel-initiated controller request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRequest {
    /// Read the centralized-policy settings.
    GetConfig,
    EnableTopology,
    DisableTopology,
    LaunchAgent,
    KillAgent,
    LaunchApp(String),
    KillApp(String),
    /// Poll the status of every module.
    Status,
}

impl ControlRequest {
    pub fn function(&self) -> &'static str {
        match self {
            Self::GetConfig => "getsettings",
            Self::EnableTopology | Self::DisableTopology => "setsettings",
            Self::LaunchAgent | Self::LaunchApp(_) => "start",
            Self::KillAgent | Self::KillApp(_) => "stop",
            Self::Status => "app_status",
        }
    }

    pub fn params(&self) -> Value {
        match self {
            Self::GetConfig => json!({}),
            Self::Status => json!({"targets": "all"}),
            Self::EnableTopology => topology_params("true"),
            Self::DisableTopology => topology_params("false"),
            Self::LaunchAgent | Self::KillAgent => json!({"targets": names::AGENT}),
            Self::LaunchApp(name) | Self::KillApp(name) => json!({"targets": name}),
        }
    }
}

fn topology_params(value: &str) -> Value {
    json!({
        "policy": [{
            "dbus_name": names::CONTROLLER,
            "abs_path": "/usr/bin/gcontroller",
            "settings": {"topology_on": value}
        }]
    })
}

/// View adapter that copies transition lines into the log before handing
/// them to the real renderer.
struct PanelView<'a, V: SceneView> {
    inner: &'a mut V,
    transitions: &'a mut TransitionLog,
}

impl<V: SceneView> SceneView for PanelView<'_, V> {
    fn set_cell_opacity(&mut self, cell: Cell, opacity: f64) {
        self.inner.set_cell_opacity(cell, opacity);
    }
    fn set_app_opacity(&mut self, index: usize, opacity: f64) {
        self.inner.set_app_opacity(index, opacity);
    }
    fn redraw_link(&mut self, link: crate::scene::Link) {
        self.inner.redraw_link(link);
    }
    fn redraw_links(&mut self) {
        self.inner.redraw_links();
    }
    fn append_transition(&mut self, line: &str) {
        self.transitions.push(line);
        self.inner.append_transition(line);
    }
}

/// The security framework panel.
pub struct Panel<V: SceneView> {
    session: SessionManager,
    registry: DaemonRegistry,
    tailer: LogTailer,
    director: SceneDirector,
    transitions: TransitionLog,
    bridge: SettingsBridge,
    topology_enabled: bool,
    view: V,
}

impl<V: SceneView> Panel<V> {
    pub fn new(
        channel: Arc<dyn SecureChannel>,
        installed: bool,
        log_path: PathBuf,
        view: V,
    ) -> Self {
        Self {
            session: SessionManager::new(channel),
            registry: DaemonRegistry::new(),
            tailer: LogTailer::new(log_path),
            director: SceneDirector::new(),
            transitions: TransitionLog::new(),
            bridge: SettingsBridge::new(installed),
            topology_enabled: true,
            view,
        }
    }

    pub fn registry(&self) -> &DaemonRegistry {
        &self.registry
    }

    pub fn transitions(&self) -> &TransitionLog {
        &self.transitions
    }

    pub fn topology_enabled(&self) -> bool {
        self.topology_enabled
    }

    /// Authenticate, read the topology policy and take the first status
    /// poll. Each step degrades independently; a dead framework leaves an
    /// empty panel rather than an error.
    pub fn bootstrap(&mut self) {
        self.transitions
            .banner(&format!("==== LSF messages {} ====", Local::now().format("%F")));

        if let Err(e) = self.session.authenticate() {
            warn!("Panel authentication failed: {}", e);
            return;
        }

        match self.control(ControlRequest::GetConfig) {
            Ok(response) => self.topology_enabled = parse_topology(&response),
            Err(e) => warn!("Reading topology policy failed: {}", e),
        }

        self.refresh();
    }

    /// Send one controller request and return the parsed response.
    pub fn control(&mut self, request: ControlRequest) -> Result<Value, SendError> {
        self.session
            .send(names::CONTROLLER, request.function(), request.params())
    }

    /// Run a state-changing action and re-poll status so the topology
    /// reflects the outcome immediately instead of at the next period.
    pub fn run_action(&mut self, request: ControlRequest) -> Result<(), SendError> {
        info!("Running panel action {:?}", request);
        let toggles_topology = matches!(
            request,
            ControlRequest::EnableTopology | ControlRequest::DisableTopology
        );
        let enabled = request == ControlRequest::EnableTopology;

        self.control(request)?;
        if toggles_topology {
            self.topology_enabled = enabled;
        }
        self.refresh();
        Ok(())
    }

    /// Poll module status and rebuild the registry. Failures keep the
    /// previous registry on screen as stale data.
    pub fn refresh(&mut self) {
        match self.control(ControlRequest::Status) {
            Ok(response) => match self.registry.rebuild_from_status(&response) {
                Ok(count) => info!("Status poll listed {} modules", count),
                Err(e) => warn!("Discarding malformed status response: {:#}", e),
            },
            Err(e) => warn!("Status poll failed, keeping stale registry: {}", e),
        }
        self.sync_opacity();
    }

    /// One presenter tick: consume at most one log event while idle, then
    /// advance the scene.
    pub fn present(&mut self) {
        if self.director.is_idle() {
            if let Some(event) = self.tailer.poll() {
                self.director.observe(&event, &self.registry);
            }
        }

        let mut view = PanelView {
            inner: &mut self.view,
            transitions: &mut self.transitions,
        };
        self.director.advance(&self.registry, &mut view);
    }

    /// Relay one app settings message from an embedded surface.
    pub fn surface_message(
        &mut self,
        target: &str,
        message: &str,
        surface: &mut dyn SettingsSurface,
    ) -> Result<(), SendError> {
        self.bridge.handle(&mut self.session, target, message, surface)
    }

    /// Repaint rest-state opacity from the registry: running modules at
    /// full strength, stopped ones dimmed. An empty registry dims every
    /// fixed cell so a dead framework is visibly grayed out.
    fn sync_opacity(&mut self) {
        if self.registry.is_empty() {
            for cell in [
                Cell::Panel,
                Cell::Hub,
                Cell::Auth,
                Cell::Controller,
                Cell::Agent,
                Cell::Gateway,
            ] {
                self.view.set_cell_opacity(cell, OPACITY_DIM);
            }
            self.view.redraw_links();
            return;
        }

        for index in 0..self.registry.len() {
            let Some(entry) = self.registry.get(index) else { continue };
            let opacity = if entry.running { OPACITY_FULL } else { OPACITY_DIM };
            if entry.is_app() {
                self.view.set_app_opacity(index, opacity);
            } else {
                self.view.set_cell_opacity(entry.cell, opacity);
            }
            self.registry.mark_materialized(index);
        }
        self.view.redraw_links();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{AuthHandshake, SendStatus};
    use crate::scene::SCENE_TICKS;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const STATUS_BODY: &str = r#"{"return":{"result":[
        {"dbus_name":"kr.gooroom.ghub","display_name":"Hub",
         "status":[{"exe_stat":"running","auth_stat":"auth"}]},
        {"dbus_name":"kr.gooroom.gauth","display_name":"Auth",
         "status":[{"exe_stat":"running","auth_stat":"auth"}]},
        {"dbus_name":"kr.gooroom.ahnlab.v3","display_name":"V3",
         "status":[{"exe_stat":"stopped"}]}
    ]}}"#;

    struct ScriptedChannel {
        bodies: Mutex<Vec<String>>,
        sends: AtomicUsize,
        requests: Mutex<Vec<String>>,
    }

    impl ScriptedChannel {
        fn new(bodies: Vec<&str>) -> Arc<Self> {
            Arc::new(Self {
                bodies: Mutex::new(bodies.into_iter().map(String::from).collect()),
                sends: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    impl SecureChannel for ScriptedChannel {
        fn authenticate(&self, _passphrase: &str) -> anyhow::Result<Option<AuthHandshake>> {
            Ok(Some(AuthHandshake {
                symm_key: "key".into(),
                access_token: "token".into(),
            }))
        }
        fn send_request(&self, _symm_key: &str, request: &str) -> anyhow::Result<(SendStatus, String)> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.to_string());
            let mut bodies = bodies_lock(&self.bodies);
            let body = if bodies.is_empty() {
                STATUS_BODY.to_string()
            } else {
                bodies.remove(0)
            };
            Ok((SendStatus::Ok, body))
        }
    }

    fn bodies_lock(bodies: &Mutex<Vec<String>>) -> std::sync::MutexGuard<'_, Vec<String>> {
        bodies.lock().unwrap()
    }

    #[derive(Default)]
    struct NullView;

    impl SceneView for NullView {
        fn set_cell_opacity(&mut self, _cell: Cell, _opacity: f64) {}
        fn set_app_opacity(&mut self, _index: usize, _opacity: f64) {}
        fn redraw_link(&mut self, _link: crate::scene::Link) {}
        fn redraw_links(&mut self) {}
        fn append_transition(&mut self, _line: &str) {}
    }

    /// View handing its recorded opacity calls out through a shared cell.
    struct SharedView {
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl SceneView for SharedView {
        fn set_cell_opacity(&mut self, cell: Cell, opacity: f64) {
            self.calls
                .borrow_mut()
                .push(format!("cell:{}:{:.1}", cell, opacity));
        }
        fn set_app_opacity(&mut self, index: usize, opacity: f64) {
            self.calls
                .borrow_mut()
                .push(format!("app:{}:{:.1}", index, opacity));
        }
        fn redraw_link(&mut self, _link: crate::scene::Link) {}
        fn redraw_links(&mut self) {}
        fn append_transition(&mut self, _line: &str) {}
    }

    fn panel(channel: Arc<ScriptedChannel>, log_path: PathBuf) -> Panel<NullView> {
        Panel::new(channel, true, log_path, NullView)
    }

    #[test]
    fn test_transition_log_ring_is_bounded() {
        let mut log = TransitionLog::new();
        log.banner("==== banner ====");
        for i in 0..TRANSITION_LOG_CAPACITY + 5 {
            log.push(&format!("line {}", i));
        }
        assert_eq!(log.recent().count(), TRANSITION_LOG_CAPACITY);
        assert_eq!(log.recent().next(), Some("line 5"));
        // The full text keeps everything, banner included.
        assert!(log.full().starts_with("==== banner ====\n"));
        assert!(log.full().contains("line 0\n"));
        assert!(log.full().contains("line 14\n"));
    }

    #[test]
    fn test_bootstrap_reads_topology_and_status() {
        let config_off = r#"{"return":{"value":[
            {"dbus_name":"kr.gooroom.gcontroller","settings":{"topology_on":"false"}}
        ]}}"#;
        let channel = ScriptedChannel::new(vec![config_off, STATUS_BODY]);
        let mut panel = panel(Arc::clone(&channel), PathBuf::from("/nonexistent.log"));
        panel.bootstrap();

        assert!(!panel.topology_enabled());
        assert_eq!(panel.registry().len(), 3);

        let requests = channel.requests.lock().unwrap();
        assert!(requests[0].contains(r#""function":"getsettings""#));
        // The settings read carries no parameters.
        assert!(requests[0].contains(r#""params":{}"#));
        assert!(requests[1].contains(r#""function":"app_status""#));
    }

    #[test]
    fn test_action_triggers_status_refresh() {
        let channel = ScriptedChannel::new(vec![]);
        let mut panel = panel(Arc::clone(&channel), PathBuf::from("/nonexistent.log"));
        panel.bootstrap();
        let polled = channel.sends.load(Ordering::SeqCst);

        panel.run_action(ControlRequest::KillAgent).unwrap();
        assert_eq!(channel.sends.load(Ordering::SeqCst), polled + 2);

        let requests = channel.requests.lock().unwrap();
        let stop = &requests[requests.len() - 2];
        assert!(stop.contains(r#""function":"stop""#));
        assert!(stop.contains(r#""targets":"kr.gooroom.agent""#));
        assert!(requests.last().unwrap().contains(r#""function":"app_status""#));
    }

    #[test]
    fn test_topology_toggle_updates_flag() {
        let channel = ScriptedChannel::new(vec![]);
        let mut panel = panel(channel, PathBuf::from("/nonexistent.log"));
        panel.bootstrap();
        assert!(panel.topology_enabled());

        panel.run_action(ControlRequest::DisableTopology).unwrap();
        assert!(!panel.topology_enabled());
        panel.run_action(ControlRequest::EnableTopology).unwrap();
        assert!(panel.topology_enabled());
    }

    #[test]
    fn test_topology_toggle_wraps_settings_in_policy_list() {
        let channel = ScriptedChannel::new(vec![]);
        let mut panel = panel(Arc::clone(&channel), PathBuf::from("/nonexistent.log"));
        panel.bootstrap();

        panel.run_action(ControlRequest::DisableTopology).unwrap();
        let requests = channel.requests.lock().unwrap();
        let set = &requests[requests.len() - 2];
        assert!(set.contains(r#""function":"setsettings""#));
        assert!(set.contains(r#""policy":[{"#));
        assert!(set.contains(r#""dbus_name":"kr.gooroom.gcontroller""#));
        assert!(set.contains(r#""abs_path":"/usr/bin/gcontroller""#));
        assert!(set.contains(r#""topology_on":"false""#));
    }

    #[test]
    fn test_malformed_status_keeps_stale_registry() {
        let channel = ScriptedChannel::new(vec![
            r#"{"return":{"value":[]}}"#,
            STATUS_BODY,
            r#"{"return":{}}"#,
        ]);
        let mut panel = panel(channel, PathBuf::from("/nonexistent.log"));
        panel.bootstrap();
        assert_eq!(panel.registry().len(), 3);

        panel.refresh();
        assert_eq!(panel.registry().len(), 3);
    }

    #[test]
    fn test_log_event_lands_in_transition_log() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let channel = ScriptedChannel::new(vec![]);
        let mut panel = panel(channel, file.path().to_path_buf());
        panel.bootstrap();

        // First present opens the tail at EOF.
        panel.present();
        file.write_all(
            b"t d 3,O,call,/x,I,kr.gooroom.gauth,kr.gooroom.ghub,sync,0,{}\n",
        )
        .unwrap();
        file.flush().unwrap();

        for _ in 0..=SCENE_TICKS {
            panel.present();
        }
        let lines: Vec<_> = panel.transitions().recent().collect();
        assert_eq!(lines, vec!["GAUTH\t-->\tGHUB\tI , sync"]);
    }

    #[test]
    fn test_present_runs_with_topology_disabled() {
        // The topology flag only drives the configuration-management
        // menu state; the scene keeps animating either way.
        let config_off = r#"{"return":{"value":[
            {"dbus_name":"kr.gooroom.gcontroller","settings":{"topology_on":"false"}}
        ]}}"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let channel = ScriptedChannel::new(vec![config_off]);
        let mut panel = panel(channel, file.path().to_path_buf());
        panel.bootstrap();
        assert!(!panel.topology_enabled());

        panel.present();
        file.write_all(b"t d 3,O,call,/x,I,kr.gooroom.gauth,kr.gooroom.ghub,sync,0,{}\n")
            .unwrap();
        file.flush().unwrap();

        for _ in 0..=SCENE_TICKS {
            panel.present();
        }
        assert_eq!(panel.transitions().recent().count(), 1);
    }

    #[test]
    fn test_empty_registry_dims_every_cell() {
        let broken_status = r#"{"return":{}}"#;
        let channel = ScriptedChannel::new(vec![
            r#"{"return":{"value":[]}}"#,
            broken_status,
        ]);
        let calls = Rc::new(RefCell::new(Vec::new()));
        let view = SharedView {
            calls: Rc::clone(&calls),
        };
        let mut panel = Panel::new(channel, true, PathBuf::from("/nonexistent.log"), view);
        panel.bootstrap();

        assert!(panel.registry().is_empty());
        let calls = calls.borrow();
        let dimmed: Vec<_> = calls
            .iter()
            .filter(|c| c.ends_with(":0.3"))
            .collect();
        assert_eq!(dimmed.len(), 6);
        assert!(calls.contains(&"cell:GPMS:0.3".to_string()));
        assert!(calls.contains(&"cell:GHUB:0.3".to_string()));
    }
}
