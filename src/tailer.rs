// LSF Panel - Log Tailer
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Incremental reader of the daily framework message log.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::IpcEvent;

/// Tails the framework message log one line per poll.
///
/// The file is opened lazily; the first successful open seeks to the end
/// so history is never replayed. The byte cursor advances past every line
/// read, whether or not it parses, so a malformed line can never stall
/// the tail. A missing log file is not an error; the open is retried on
/// the next poll.
pub struct LogTailer {
    path: PathBuf,
    file: Option<File>,
    pos: u64,
}

impl LogTailer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
            pos: 0,
        }
    }

    /// The log file being tailed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current byte offset into the log.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Read at most one new line and parse it. Returns `None` when there
    /// is no new line, the file does not exist yet, or the line is
    /// malformed; only in the first two cases does the cursor stay put.
    pub fn poll(&mut self) -> Option<IpcEvent> {
        if self.file.is_none() {
            let mut file = match File::open(&self.path) {
                Ok(file) => file,
                Err(_) => return None,
            };
            self.pos = file.seek(SeekFrom::End(0)).ok()?;
            self.file = Some(file);
            debug!("Tailing {} from offset {}", self.path.display(), self.pos);
        }

        let file = self.file.as_mut()?;
        file.seek(SeekFrom::Start(self.pos)).ok()?;

        // Byte-oriented on purpose: a line that is not valid UTF-8 must
        // still be consumed, or the tail would re-read it forever.
        let mut reader = BufReader::new(file);
        let mut line = Vec::new();
        let read = reader.read_until(b'\n', &mut line).ok()?;
        if read == 0 {
            return None;
        }
        self.pos += read as u64;

        IpcEvent::parse(&String::from_utf8_lossy(&line))
    }
}
