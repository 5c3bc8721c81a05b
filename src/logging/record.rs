//! One JSON log record and the tracing visitor that fills it.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::field::{Field, Visit};

use super::fields::Level;

/// A single entry in the JSON-array log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: String,
    pub module: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_response: Option<String>,
}

/// Collects the fields `Logger` attaches to its events.
///
/// Fields emitted by other crates' events are ignored, except `message`.
#[derive(Debug, Default)]
pub(crate) struct RecordVisitor {
    pub message: String,
    pub module: Option<String>,
    pub prompt: Option<String>,
    pub response: Option<String>,
    pub critical: bool,
}

impl RecordVisitor {
    pub fn level(&self, level: &tracing::Level) -> Level {
        Level::from_tracing(level, self.critical)
    }

    pub fn into_record(self, metadata: &tracing::Metadata<'_>) -> LogRecord {
        let level = self.level(metadata.level());
        let module = self
            .module
            .unwrap_or_else(|| metadata.module_path().unwrap_or(metadata.target()).to_string());
        LogRecord {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            level: level.as_str().to_string(),
            module,
            message: self.message,
            input_prompt: self.prompt,
            api_response: self.response,
        }
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "module" => self.module = Some(value.to_string()),
            "prompt" => self.prompt = Some(value.to_string()),
            "response" => self.response = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "critical" {
            self.critical = value;
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        // `message` arrives as fmt::Arguments, whose Debug output is unquoted.
        self.record_str(field, &format!("{value:?}"));
    }
}
