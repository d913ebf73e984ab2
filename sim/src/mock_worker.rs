//! Stand-in worker that "executes" a task after a short random delay

use std::thread;
use std::time::Duration;

use agentic_economy::instructions::constants::MAX_DELIVERY_LEN;
use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::errors::{Result, SimError};

pub const DELIVERY_SCHEME: &str = "mock://delivery/";

const SUMMARY_PREFIX_CHARS: usize = 120;
const CONFIDENCE: f64 = 0.92;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockWorkResult {
    pub summary: String,
    pub confidence: f64,
    pub output: Value,
}

#[derive(Debug, Clone, Copy)]
pub struct MockWorker {
    min_delay: Duration,
    max_delay: Duration,
}

impl MockWorker {
    pub fn new(min_delay: Duration, max_delay: Duration) -> Result<Self> {
        if min_delay > max_delay {
            return Err(SimError::InvalidDelay {
                min_ms: min_delay.as_millis() as u64,
                max_ms: max_delay.as_millis() as u64,
            });
        }
        Ok(Self { min_delay, max_delay })
    }

    /// No waiting at all
    pub fn instant() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn execute<R: Rng>(&self, prompt: &str, rng: &mut R) -> Result<MockWorkResult> {
        let normalized = normalize(prompt);
        if normalized.is_empty() {
            return Err(SimError::EmptyPrompt);
        }

        let delay = if self.min_delay == self.max_delay {
            self.min_delay
        } else {
            rng.gen_range(self.min_delay..=self.max_delay)
        };
        debug!(delay_ms = delay.as_millis() as u64, "mock worker running");
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        let summary = format!(
            "Task analyzed and completed for: {}",
            truncate_chars(&normalized, SUMMARY_PREFIX_CHARS)
        );
        let output = json!({
            "task": normalized,
            "status": "completed",
            "result": {
                "headline": "Mock worker finished execution",
                "artifacts": ["analysis.txt", "result.json"],
                "notes": "Generated in demo mode by MockWorkerLogic",
            },
            "timestamp_utc": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        });
        info!(confidence = CONFIDENCE, "mock work completed");

        Ok(MockWorkResult {
            summary,
            confidence: CONFIDENCE,
            output,
        })
    }
}

/// `mock://delivery/<compact json>`, ASCII only, with the task text shortened
/// until the reference fits the delivery length limit.
pub fn format_delivery_uri(output: &Value) -> Result<String> {
    let uri = format!("{DELIVERY_SCHEME}{}", ascii_json(output)?);
    if uri.len() <= MAX_DELIVERY_LEN {
        return Ok(uri);
    }

    let task = output.get("task").and_then(Value::as_str).unwrap_or_default();
    let overflow = uri.len() - MAX_DELIVERY_LEN;
    // Escaping can make a char cost more than one byte
    let mut keep = task.chars().count().saturating_sub(overflow);
    loop {
        let mut shortened = output.clone();
        shortened["task"] = Value::String(truncate_chars(task, keep));
        let uri = format!("{DELIVERY_SCHEME}{}", ascii_json(&shortened)?);
        if uri.len() <= MAX_DELIVERY_LEN || keep == 0 {
            return Ok(uri);
        }
        keep = keep.saturating_sub(overflow.max(8));
    }
}

/// Compact JSON with every non-ASCII char written as a `\u` escape
fn ascii_json(value: &Value) -> Result<String> {
    let compact = serde_json::to_string(value)?;
    let mut escaped = String::with_capacity(compact.len());
    for ch in compact.chars() {
        if ch.is_ascii() {
            escaped.push(ch);
        } else {
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    Ok(escaped)
}

fn normalize(prompt: &str) -> String {
    prompt.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
