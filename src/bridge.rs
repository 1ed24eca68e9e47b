// LSF Panel - App Settings Bridge
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Relay between embedded app settings surfaces and their daemons.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::channel::SendStatus;
use crate::session::{Envelope, SendError, SessionManager};

/// Fixed key the raw response lands under in the surface store.
pub const SURFACE_RESPONSE_KEY: &str = "lsfMsg";

const GET_SETTINGS: &str = "lsf_get_settings";
const SET_SETTINGS: &str = "lsf_set_settings";

/// Local storage and notice surface of an embedded settings page.
pub trait SettingsSurface {
    /// Put a raw JSON response into the surface's key-value store.
    fn store_response(&mut self, key: &str, response: &str);

    /// Tell the user the security framework is not installed.
    fn notify_framework_missing(&mut self);
}

/// Message posted by a settings surface.
#[derive(Debug, Deserialize)]
struct SurfaceRequest {
    method: String,
    #[serde(default)]
    app_conf: Option<Value>,
}

/// Relays surface messages to the owning daemon.
///
/// Unlike panel requests, a surface request is never re-issued after a
/// token refresh; the surface simply sees no response for that round and
/// asks again on its own.
pub struct SettingsBridge {
    installed: bool,
}

impl SettingsBridge {
    pub fn new(installed: bool) -> Self {
        Self { installed }
    }

    /// Handle one message from the surface of the selected tab, targeted
    /// at that tab's daemon.
    pub fn handle(
        &self,
        session: &mut SessionManager,
        target: &str,
        message: &str,
        surface: &mut dyn SettingsSurface,
    ) -> Result<(), SendError> {
        if !self.installed {
            surface.notify_framework_missing();
            return Ok(());
        }

        let request: SurfaceRequest = match serde_json::from_str(message) {
            Ok(request) => request,
            Err(e) => {
                warn!("Ignoring malformed surface message: {}", e);
                return Ok(());
            }
        };

        match request.method.as_str() {
            GET_SETTINGS => self.relay(session, target, GET_SETTINGS, None, surface),
            SET_SETTINGS => {
                self.relay(session, target, SET_SETTINGS, request.app_conf.as_ref(), surface)
            }
            other => {
                warn!("Ignoring unknown surface method {}", other);
                Ok(())
            }
        }
    }

    fn relay(
        &self,
        session: &mut SessionManager,
        target: &str,
        method: &str,
        app_conf: Option<&Value>,
        surface: &mut dyn SettingsSurface,
    ) -> Result<(), SendError> {
        let token = session
            .session()
            .ok_or(SendError::NoSession)?
            .access_token
            .clone();

        let envelope = Envelope::settings(target, &token, method, app_conf);
        let (status, body) = session.dispatch_envelope(&envelope)?;

        match status {
            SendStatus::Ok => {
                if serde_json::from_str::<Value>(&body).is_ok() {
                    surface.store_response(SURFACE_RESPONSE_KEY, &body);
                } else {
                    warn!("Discarding unparseable settings response from {}", target);
                }
            }
            SendStatus::ReauthRequired => {
                // Refresh the session; the surface request stays
                // unresolved for this round.
                if let Err(e) = session.authenticate() {
                    warn!("Re-authentication failed: {}", e);
                }
            }
            SendStatus::SendError => {
                warn!("Settings relay to {} failed to send", target);
            }
        }

        Ok(())
    }
}
