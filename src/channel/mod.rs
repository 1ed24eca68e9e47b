// LSF Panel - Secure Channel
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Secure channel to the security framework hub.
//!
//! The channel carries encrypted JSON envelopes between the panel and the
//! framework daemons. Encryption and decryption happen behind the hub's
//! D-Bus surface; the panel only holds the session key and forwards it
//! with every request.

mod dbus;

pub use dbus::DbusChannel;

/// Well-known D-Bus identifiers of the fixed framework daemons.
pub mod names {
    /// The control-center panel itself.
    pub const PANEL: &str = "kr.gooroom.controlcenter";
    /// Message hub daemon.
    pub const HUB: &str = "kr.gooroom.ghub";
    /// Authentication daemon.
    pub const AUTH: &str = "kr.gooroom.gauth";
    /// Controller daemon (status and configuration authority).
    pub const CONTROLLER: &str = "kr.gooroom.gcontroller";
    /// Policy agent daemon.
    pub const AGENT: &str = "kr.gooroom.agent";
}

/// Passphrase the panel identifies itself with during the handshake.
pub const PANEL_PASSPHRASE: &str = "n6x6myibEAvfN9vIDDPQi+iCoE7yTuHP//eC195+g7w=";

/// Wire status codes returned by the hub.
pub const MESSAGE_RESP_OK: i32 = 0;
pub const MESSAGE_SEND_ERROR: i32 = 1;
pub const MESSAGE_RE_AUTH: i32 = 2;
pub const AUTH_STAT_OK: i32 = 0;

/// Outcome of a single request round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    /// Response delivered.
    Ok,
    /// Transport failure; the response body is meaningless.
    SendError,
    /// The access token has expired and must be refreshed.
    ReauthRequired,
}

impl SendStatus {
    /// Map a wire status code. Unknown codes count as send failures.
    pub fn from_code(code: i32) -> Self {
        match code {
            MESSAGE_RESP_OK => SendStatus::Ok,
            MESSAGE_RE_AUTH => SendStatus::ReauthRequired,
            _ => SendStatus::SendError,
        }
    }
}

/// Credentials issued by a successful handshake.
#[derive(Debug, Clone)]
pub struct AuthHandshake {
    pub symm_key: String,
    pub access_token: String,
}

/// Transport to the security subsystem.
///
/// `authenticate` returns `Ok(None)` when the subsystem rejects the
/// passphrase; `Err` means the subsystem could not be reached at all.
pub trait SecureChannel: Send + Sync {
    fn authenticate(&self, passphrase: &str) -> anyhow::Result<Option<AuthHandshake>>;
    fn send_request(&self, symm_key: &str, request: &str) -> anyhow::Result<(SendStatus, String)>;
}
