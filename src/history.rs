//! Record of the calls a simulated device received, for diagnostics and tests.

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Direction of a recorded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// A call made by the console
    Call,
    /// A reply delivered back to the console
    Reply,
}

/// A recorded message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub msg_type: MessageType,
    pub method: String,
    pub message: Value,
    /// Seconds since the log was created
    pub timestamp: f64,
}

/// Bounded log of calls and replies.
#[derive(Debug, Clone)]
pub struct CallLog {
    counts: HashMap<MessageType, usize>,
    start_time: Instant,
    entries: Vec<HistoryEntry>,
    max_entries: usize,
}

impl Default for CallLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CallLog {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            start_time: Instant::now(),
            entries: Vec::new(),
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::new()
        }
    }

    /// Record a `{"method": .., "params": ..}` message; anything without a
    /// method is ignored.
    pub fn record(&mut self, msg_type: MessageType, message: &Value) {
        let Some(method) = message.get("method").and_then(|m| m.as_str()) else {
            return;
        };

        *self.counts.entry(msg_type).or_default() += 1;

        self.entries.push(HistoryEntry {
            msg_type,
            method: method.to_string(),
            message: message.clone(),
            timestamp: self.start_time.elapsed().as_secs_f64(),
        });

        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }

    /// Methods of the recorded calls, oldest first.
    pub fn calls(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.msg_type == MessageType::Call)
            .map(|entry| entry.method.as_str())
            .collect()
    }

    /// Parameters of the most recent call to `method`.
    pub fn last_params(&self, method: &str) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.msg_type == MessageType::Call && entry.method == method)
            .and_then(|entry| entry.message.get("params"))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> HistorySummary {
        let count = |t: MessageType| self.counts.get(&t).copied().unwrap_or(0);
        HistorySummary {
            call_count: count(MessageType::Call),
            reply_count: count(MessageType::Reply),
            total_entries: self.entries.len(),
        }
    }
}

/// Summary of a call log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub call_count: usize,
    pub reply_count: usize,
    pub total_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_message() {
        let mut log = CallLog::new();
        log.record(
            MessageType::Call,
            &json!({"method": "set_power", "params": true}),
        );

        assert_eq!(log.len(), 1);
        assert_eq!(log.calls(), vec!["set_power"]);
        assert_eq!(log.last_params("set_power"), Some(&json!(true)));
    }

    #[test]
    fn test_message_without_method_is_ignored() {
        let mut log = CallLog::new();
        log.record(MessageType::Reply, &json!({"params": 1}));
        assert!(log.is_empty());
    }

    #[test]
    fn test_max_entries() {
        let mut log = CallLog::with_max_entries(2);
        for i in 0..5 {
            log.record(MessageType::Call, &json!({"method": format!("method{}", i)}));
        }
        assert_eq!(log.len(), 2);
        assert_eq!(log.calls(), vec!["method3", "method4"]);
        assert_eq!(log.summary().call_count, 5);
    }
}
