// LSF Panel - Session Manager
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Authenticated request sending with one-shot re-authentication.

use std::sync::Arc;
use std::thread;

use anyhow::anyhow;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::channel::{names, SecureChannel, SendStatus, PANEL_PASSPHRASE};

/// Authentication failures against the security subsystem.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication rejected by the security subsystem")]
    Rejected,
    #[error("security subsystem unreachable")]
    Unreachable(#[source] anyhow::Error),
}

/// Request failures surfaced to callers.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("no active session")]
    NoSession,
    #[error("message send failed")]
    Transport,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("channel failure")]
    Channel(#[source] anyhow::Error),
    #[error("malformed response")]
    Malformed(#[source] serde_json::Error),
}

/// Current panel credentials, replaced wholesale on every successful
/// handshake. Last writer wins; in-flight requests pick up the new token
/// on their retry, never mid-flight.
#[derive(Debug, Clone)]
pub struct Session {
    pub symm_key: String,
    pub access_token: String,
}

/// JSON request envelope.
///
/// Field order is the declaration order and is part of the wire contract;
/// the struct must serialize `to` first and the body last.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    to: &'a str,
    from: &'a str,
    access_token: &'a str,
    function: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_conf: Option<&'a Value>,
}

impl<'a> Envelope<'a> {
    /// Envelope for a controller function call.
    pub fn call(to: &'a str, access_token: &'a str, function: &'a str, params: &'a Value) -> Self {
        Self {
            to,
            from: names::PANEL,
            access_token,
            function,
            params: Some(params),
            app_conf: None,
        }
    }

    /// Envelope for an app settings exchange. `app_conf` rides in place
    /// of `params` and is omitted entirely for reads.
    pub fn settings(to: &'a str, access_token: &'a str, method: &'a str, app_conf: Option<&'a Value>) -> Self {
        Self {
            to,
            from: names::PANEL,
            access_token,
            function: method,
            params: None,
            app_conf,
        }
    }
}

/// Holds the panel session and performs authenticated request round
/// trips over the secure channel.
pub struct SessionManager {
    channel: Arc<dyn SecureChannel>,
    session: Option<Session>,
}

impl SessionManager {
    pub fn new(channel: Arc<dyn SecureChannel>) -> Self {
        Self {
            channel,
            session: None,
        }
    }

    /// The current session, if authenticated.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Perform the passphrase handshake, replacing any prior session.
    /// Like requests, the handshake runs on a short-lived worker thread
    /// so the channel is never driven from the event thread.
    pub fn authenticate(&mut self) -> Result<(), AuthError> {
        let channel = Arc::clone(&self.channel);
        let worker = thread::spawn(move || channel.authenticate(PANEL_PASSPHRASE));
        let handshake = worker
            .join()
            .map_err(|_| AuthError::Unreachable(anyhow!("handshake worker panicked")))?
            .map_err(AuthError::Unreachable)?
            .ok_or(AuthError::Rejected)?;

        self.session = Some(Session {
            symm_key: handshake.symm_key,
            access_token: handshake.access_token,
        });
        Ok(())
    }

    /// Send a function call to a framework daemon and parse the response.
    ///
    /// A transport failure is returned as-is. An expired access token
    /// triggers one synchronous re-authentication followed by exactly one
    /// re-issue of the original request; there is no further retry.
    pub fn send(&mut self, target: &str, function: &str, params: Value) -> Result<Value, SendError> {
        let raw = match self.round_trip(target, function, &params)? {
            (SendStatus::Ok, body) => body,
            (SendStatus::SendError, _) => return Err(SendError::Transport),
            (SendStatus::ReauthRequired, _) => {
                info!("Access token expired, re-authenticating");
                self.authenticate()?;
                match self.round_trip(target, function, &params)? {
                    (SendStatus::Ok, body) => body,
                    (SendStatus::ReauthRequired, _) => {
                        warn!("Fresh token still rejected by {}", target);
                        return Err(AuthError::Rejected.into());
                    }
                    (SendStatus::SendError, _) => return Err(SendError::Transport),
                }
            }
        };

        serde_json::from_str(&raw).map_err(SendError::Malformed)
    }

    fn round_trip(
        &self,
        target: &str,
        function: &str,
        params: &Value,
    ) -> Result<(SendStatus, String), SendError> {
        let session = self.session.as_ref().ok_or(SendError::NoSession)?;
        let envelope = Envelope::call(target, &session.access_token, function, params);
        self.dispatch_envelope(&envelope)
    }

    /// One request round trip with no retry handling. The request runs on
    /// a short-lived worker thread which is joined before returning, so
    /// the session is never touched from two threads at once.
    pub fn dispatch_envelope(&self, envelope: &Envelope<'_>) -> Result<(SendStatus, String), SendError> {
        let session = self.session.as_ref().ok_or(SendError::NoSession)?;
        let request = serde_json::to_string(envelope).map_err(SendError::Malformed)?;
        let symm_key = session.symm_key.clone();

        let channel = Arc::clone(&self.channel);
        let worker = thread::spawn(move || channel.send_request(&symm_key, &request));
        worker
            .join()
            .map_err(|_| SendError::Channel(anyhow!("request worker panicked")))?
            .map_err(SendError::Channel)
    }
}
