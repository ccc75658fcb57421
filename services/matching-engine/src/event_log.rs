//! Deterministic event log
//!
//! When the engine runs in deterministic mode, every inbound intent and
//! every outbound event is appended as one JSON object per line:
//! `{"type": T, "seq": N, "ts": N, "data": {...}}`. Replaying the
//! NEW_ORDER/CANCEL/REPLACE records through a fresh engine with the same
//! clock reproduces the run. Outside deterministic mode every call is a
//! no-op.
//!
//! Log writes are best-effort: an I/O failure is reported through
//! `tracing` and never disturbs matching.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use types::events::{
    OrderAcceptedEvent, OrderCancelledEvent, OrderRejectedEvent, OrderReplacedEvent, TradeEvent,
};
use types::numeric::Timestamp;

use crate::messages::{CancelRequest, NewOrderRequest, ReplaceRequest};

/// Conventional log location for deterministic engines.
pub const DEFAULT_LOG_PATH: &str = "logs/events.log";

#[derive(Error, Debug)]
pub enum EventLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Record discriminator, stored in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogEntryType {
    NewOrder,
    Cancel,
    Replace,
    OrderAccepted,
    OrderRejected,
    OrderCancelled,
    OrderReplaced,
    Trade,
}

/// One parsed log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "type")]
    pub entry_type: LogEntryType,
    #[serde(rename = "seq")]
    pub sequence_number: u64,
    #[serde(rename = "ts")]
    pub timestamp: Timestamp,
    pub data: Value,
}

/// Append-only intent/event log gated by the deterministic flag.
pub struct EventLog {
    deterministic: bool,
    log_path: PathBuf,
    writer: Option<BufWriter<File>>,
    sequence_number: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            deterministic: false,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            writer: None,
            sequence_number: 0,
        }
    }

    pub fn with_path(path: impl Into<PathBuf>, deterministic: bool) -> Self {
        Self {
            deterministic,
            log_path: path.into(),
            writer: None,
            sequence_number: 0,
        }
    }

    pub fn set_deterministic(&mut self, enabled: bool) {
        self.deterministic = enabled;
    }

    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    /// Point the log at a new file; takes effect on the next write.
    pub fn set_log_path(&mut self, path: impl Into<PathBuf>) {
        self.flush();
        self.log_path = path.into();
        self.writer = None;
    }

    // ── Inbound intents ─────────────────────────────────────────────

    pub fn log_new_order(&mut self, request: &NewOrderRequest) {
        self.record(LogEntryType::NewOrder, request.timestamp, request);
    }

    pub fn log_cancel(&mut self, request: &CancelRequest) {
        self.record(LogEntryType::Cancel, request.timestamp, request);
    }

    pub fn log_replace(&mut self, request: &ReplaceRequest) {
        self.record(LogEntryType::Replace, request.timestamp, request);
    }

    // ── Outbound events ─────────────────────────────────────────────

    pub fn log_accepted(&mut self, event: &OrderAcceptedEvent) {
        self.record(LogEntryType::OrderAccepted, event.timestamp, event);
    }

    pub fn log_rejected(&mut self, event: &OrderRejectedEvent) {
        self.record(LogEntryType::OrderRejected, event.timestamp, event);
    }

    pub fn log_cancelled(&mut self, event: &OrderCancelledEvent) {
        self.record(LogEntryType::OrderCancelled, event.timestamp, event);
    }

    pub fn log_replaced(&mut self, event: &OrderReplacedEvent) {
        self.record(LogEntryType::OrderReplaced, event.timestamp, event);
    }

    pub fn log_trade(&mut self, event: &TradeEvent) {
        self.record(LogEntryType::Trade, event.timestamp, event);
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            if let Err(error) = writer.flush() {
                warn!(%error, "event log flush failed");
            }
        }
    }

    /// Parse a log file back into entries. Malformed lines are skipped.
    pub fn load_log(path: impl AsRef<Path>) -> Result<Vec<LogEntry>, EventLogError> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);

        let mut entries = Vec::new();
        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<LogEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(error) => {
                    warn!(line = line_number + 1, %error, "skipping malformed log line");
                }
            }
        }

        Ok(entries)
    }

    // ── Internals ───────────────────────────────────────────────────

    fn record<T: Serialize>(&mut self, entry_type: LogEntryType, timestamp: Timestamp, data: &T) {
        if !self.deterministic {
            return;
        }

        let data = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(error) => {
                warn!(%error, "event log serialization failed");
                return;
            }
        };

        self.sequence_number += 1;
        let entry = LogEntry {
            entry_type,
            sequence_number: self.sequence_number,
            timestamp,
            data,
        };

        let Some(writer) = self.ensure_open() else {
            return;
        };
        // LogEntry serialization cannot fail once `data` is a Value.
        let line = serde_json::to_string(&entry).expect("log entry serializes");
        if let Err(error) = writeln!(writer, "{line}") {
            warn!(%error, "event log write failed");
        }
    }

    fn ensure_open(&mut self) -> Option<&mut BufWriter<File>> {
        if self.writer.is_none() {
            if let Some(parent) = self.log_path.parent() {
                if !parent.as_os_str().is_empty() {
                    if let Err(error) = fs::create_dir_all(parent) {
                        warn!(%error, path = %self.log_path.display(), "cannot create log directory");
                        return None;
                    }
                }
            }

            match OpenOptions::new().create(true).append(true).open(&self.log_path) {
                Ok(file) => self.writer = Some(BufWriter::new(file)),
                Err(error) => {
                    warn!(%error, path = %self.log_path.display(), "cannot open event log");
                    return None;
                }
            }
        }

        self.writer.as_mut()
    }
}

impl Drop for EventLog {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::{OrderId, TraderId};
    use types::numeric::Price;
    use types::order::{OrderType, Side, TimeInForce};

    fn make_request(id: u64) -> NewOrderRequest {
        NewOrderRequest {
            order_id: OrderId::new(id),
            trader_id: TraderId::new(100),
            symbol: "TEST".to_string(),
            side: Side::Buy,
            order_type: OrderType::Limit,
            price: Price::new(10_000),
            quantity: 50,
            time_in_force: TimeInForce::Day,
            timestamp: id,
        }
    }

    #[test]
    fn test_non_deterministic_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.log");

        let mut log = EventLog::with_path(&path, false);
        log.log_new_order(&make_request(1));
        log.flush();

        assert!(!path.exists());
    }

    #[test]
    fn test_write_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.log");

        let mut log = EventLog::with_path(&path, true);
        log.log_new_order(&make_request(1));
        log.log_cancel(&CancelRequest {
            order_id: OrderId::new(1),
            symbol: "TEST".to_string(),
            timestamp: 2,
        });
        log.flush();

        let entries = EventLog::load_log(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entry_type, LogEntryType::NewOrder);
        assert_eq!(entries[0].sequence_number, 1);
        assert_eq!(entries[0].timestamp, 1);
        assert_eq!(entries[0].data["symbol"], "TEST");
        assert_eq!(entries[1].entry_type, LogEntryType::Cancel);
        assert_eq!(entries[1].sequence_number, 2);
    }

    #[test]
    fn test_intent_roundtrips_through_data_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.log");

        let request = make_request(7);
        let mut log = EventLog::with_path(&path, true);
        log.log_new_order(&request);
        log.flush();

        let entries = EventLog::load_log(&path).unwrap();
        let replayed: NewOrderRequest =
            serde_json::from_value(entries[0].data.clone()).unwrap();
        assert_eq!(replayed, request);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.log");

        let mut log = EventLog::with_path(&path, true);
        log.log_new_order(&make_request(1));
        log.flush();
        drop(log);

        fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap()
            .write_all(b"not json\n")
            .unwrap();

        let entries = EventLog::load_log(&path).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_entry_line_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.log");

        let mut log = EventLog::with_path(&path, true);
        log.log_new_order(&make_request(1));
        log.flush();

        let contents = fs::read_to_string(&path).unwrap();
        let value: Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        assert_eq!(value["type"], "NEW_ORDER");
        assert_eq!(value["seq"], 1);
        assert_eq!(value["ts"], 1);
        assert!(value["data"].is_object());
    }
}
