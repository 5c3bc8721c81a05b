//! Deterministic completion source for tests and offline runs.
//!
//! Replays scripted outcomes in order and records every request it sees.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::completion::{ChatCompletion, CompletionError};
use super::request::PromptRequest;

pub struct StubCompletion {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    fallback: Option<String>,
    requests: Mutex<Vec<PromptRequest>>,
}

impl StubCompletion {
    /// Answers every request with the same text.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(text.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns the scripted outcomes in order, then fails once the script runs out.
    pub fn scripted(outcomes: impl IntoIterator<Item = Result<String, CompletionError>>) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails `failures` times with a transient error, then answers with `text`.
    pub fn failing_then(failures: usize, text: impl Into<String>) -> Self {
        let mut outcomes: Vec<_> = (1..=failures)
            .map(|i| Err(CompletionError::transient(format!("stub failure #{i}"))))
            .collect();
        outcomes.push(Ok(text.into()));
        Self::scripted(outcomes)
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<PromptRequest> {
        match self.requests.lock() {
            Ok(r) => r.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests().len()
    }

    /// The last request received, if any.
    pub fn last_request(&self) -> Option<PromptRequest> {
        self.requests().pop()
    }
}

impl ChatCompletion for StubCompletion {
    fn complete(&self, request: &PromptRequest) -> Result<String, CompletionError> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match (next, &self.fallback) {
            (Some(outcome), _) => outcome,
            (None, Some(text)) => Ok(text.clone()),
            (None, None) => Err(CompletionError::transient("stub script exhausted")),
        }
    }
}
