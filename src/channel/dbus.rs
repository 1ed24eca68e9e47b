// LSF Panel - Hub D-Bus Client
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! D-Bus transport to the message hub daemon.

use anyhow::{Context, Result};
use tracing::info;
use zbus::blocking::Connection;

use super::{names, AuthHandshake, SecureChannel, SendStatus, AUTH_STAT_OK};

const HUB_PATH: &str = "/kr/gooroom/ghub";
const HUB_INTERFACE: &str = "kr.gooroom.ghub";

/// Secure channel backed by the hub's D-Bus interface.
pub struct DbusChannel {
    connection: Connection,
}

impl DbusChannel {
    /// Connect to the system bus.
    pub fn connect() -> Result<Self> {
        info!("Connecting to the security framework hub...");

        let connection = Connection::system()
            .context("Failed to connect to system D-Bus")?;

        Ok(Self { connection })
    }
}

impl SecureChannel for DbusChannel {
    fn authenticate(&self, passphrase: &str) -> Result<Option<AuthHandshake>> {
        let (status, symm_key, access_token): (i32, String, String) = self
            .connection
            .call_method(
                Some(names::HUB),
                HUB_PATH,
                Some(HUB_INTERFACE),
                "authenticate",
                &(passphrase,),
            )
            .context("Authentication call to the hub failed")?
            .body()
            .deserialize()?;

        if status != AUTH_STAT_OK {
            return Ok(None);
        }

        info!("Authenticated against the security framework");
        Ok(Some(AuthHandshake {
            symm_key,
            access_token,
        }))
    }

    fn send_request(&self, symm_key: &str, request: &str) -> Result<(SendStatus, String)> {
        let (code, response): (i32, String) = self
            .connection
            .call_method(
                Some(names::HUB),
                HUB_PATH,
                Some(HUB_INTERFACE),
                "send_message",
                &(symm_key, request),
            )
            .context("Message call to the hub failed")?
            .body()
            .deserialize()?;

        Ok((SendStatus::from_code(code), response))
    }
}
