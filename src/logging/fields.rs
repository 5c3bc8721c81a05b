use std::fmt;

/// Severity of a log call. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// Map a tracing level onto ours. `critical` marks an ERROR event raised via `Level::Critical`.
    pub(crate) fn from_tracing(level: &tracing::Level, critical: bool) -> Self {
        match *level {
            tracing::Level::ERROR if critical => Level::Critical,
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warning,
            tracing::Level::INFO => Level::Info,
            // TRACE is folded into DEBUG; nothing in this crate emits it.
            _ => Level::Debug,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional context attached to a single log call.
///
/// `prompt` ends up under `input_prompt` and `response` under `api_response`
/// in the JSON log. A `None` field is left out of the record entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFields {
    pub prompt: Option<String>,
    pub response: Option<String>,
}

impl LogFields {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            response: None,
        }
    }

    pub fn response(response: impl Into<String>) -> Self {
        Self {
            prompt: None,
            response: Some(response.into()),
        }
    }

    /// Prompt and response together, the common shape for request/response records.
    pub fn exchange(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            response: Some(response.into()),
        }
    }
}
