// LSF Panel - Configuration
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Framework configuration file and ambient paths.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Framework configuration file. Its presence is what marks the security
/// framework as installed on the host.
pub const LSF_CONF_PATH: &str = "/etc/gooroom/lsf/lsf.conf";

/// Directory holding the daily framework message logs.
pub const LOG_DIRECTORY: &str = "/var/log/lsf";

/// File name prefix of the daily message log.
pub const LOG_FILE_PREFIX: &str = "message";

/// Parsed `key = value` framework configuration.
#[derive(Debug, Default)]
pub struct LsfConf {
    values: HashMap<String, String>,
}

impl LsfConf {
    /// Load and parse the configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
        Ok(Self::parse(&content))
    }

    /// Parse `key = value` lines. Lines without a separator are skipped;
    /// surrounding whitespace is insignificant.
    pub fn parse(content: &str) -> Self {
        let mut values = HashMap::new();

        for line in content.lines() {
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                values.insert(key.to_string(), value.trim().to_string());
            }
        }

        Self { values }
    }

    /// Look up a raw value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether the control-center panel is enabled at all
    /// (`control_center_use = yes`).
    pub fn control_center_enabled(&self) -> bool {
        self.get("control_center_use") == Some("yes")
    }
}

/// Whether the security framework is installed on this host.
pub fn framework_installed() -> bool {
    Path::new(LSF_CONF_PATH).exists()
}

/// Path of the message log for the given day.
pub fn daily_log_path(date: NaiveDate) -> PathBuf {
    PathBuf::from(LOG_DIRECTORY).join(format!(
        "{}-{}.log",
        LOG_FILE_PREFIX,
        date.format("%Y-%m-%d")
    ))
}

/// Path of today's message log.
pub fn current_log_path() -> PathBuf {
    daily_log_path(chrono::Local::now().date_naive())
}
