// LSF Panel - IPC Event Model
// Copyright (C) 2026 Gooroom <gooroom@gooroom.kr>
// SPDX-License-Identifier: GPL-2.0-or-later

//! One IPC exchange as described by a framework log line.

/// Number of comma-separated fields in a message record.
const RECORD_FIELDS: usize = 10;

/// A parsed framework log line.
///
/// The log format is space-delimited with the message record in the third
/// field, itself comma-delimited with fixed positions:
/// `seq,direction,method,abs_path,glyph,from,to,function,error,payload`.
#[derive(Debug, Clone)]
pub struct IpcEvent {
    /// Monotonic message sequence number.
    pub seq: u64,
    /// Direction code, `O` for outbound.
    pub direction: String,
    /// IPC method kind.
    pub method: String,
    /// Absolute path of the sending binary.
    pub abs_path: String,
    /// One-character marker echoed into the transition log.
    pub glyph: String,
    /// Sender identifier.
    pub from: String,
    /// Receiver identifier.
    pub to: String,
    /// Invoked function name.
    pub function: String,
    /// Error code reported by the receiver.
    pub error: String,
    /// Opaque payload.
    pub payload: String,
}

impl IpcEvent {
    /// Parse a raw log line. Returns `None` on any format violation; the
    /// caller is expected to treat the line as consumed either way.
    pub fn parse(line: &str) -> Option<IpcEvent> {
        let record = line.split_whitespace().nth(2)?;
        let fields: Vec<&str> = record.split(',').collect();
        if fields.len() < RECORD_FIELDS {
            return None;
        }

        Some(IpcEvent {
            seq: fields[0].parse().ok()?,
            direction: fields[1].to_string(),
            method: fields[2].to_string(),
            abs_path: fields[3].to_string(),
            glyph: fields[4].to_string(),
            from: fields[5].to_string(),
            to: fields[6].to_string(),
            function: fields[7].to_string(),
            error: fields[8].to_string(),
            payload: fields[9].to_string(),
        })
    }
}
