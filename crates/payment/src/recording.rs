//! In-memory Payment capability for tests and dry runs.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use serde_json::{Value as JsonValue, json};

use crate::payment::{DispatchOutcome, Payment};

/// One request observed by [`RecordingPayment`].
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchCall {
    pub endpoint: String,
    pub payload: Option<JsonValue>,
}

/// Records every dispatch and answers from a script.
///
/// - No IO
/// - Scripted outcomes are returned in FIFO order
/// - Once the script runs dry every call succeeds with `{}`
#[derive(Debug, Default)]
pub struct RecordingPayment {
    calls: Mutex<Vec<DispatchCall>>,
    script: Mutex<VecDeque<DispatchOutcome>>,
}

impl RecordingPayment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome for the next unanswered call.
    pub fn respond(&self, outcome: DispatchOutcome) -> &Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
        self
    }

    pub fn respond_success(&self, response: JsonValue) -> &Self {
        self.respond(DispatchOutcome::success(response))
    }

    pub fn respond_failure(&self, response: JsonValue) -> &Self {
        self.respond(DispatchOutcome::failure(response))
    }

    /// Snapshot of the calls seen so far.
    pub fn calls(&self) -> Vec<DispatchCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_call(&self) -> Option<DispatchCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Payment for RecordingPayment {
    fn process(&self, endpoint: &str, payload: Option<&JsonValue>) -> DispatchOutcome {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DispatchCall {
                endpoint: endpoint.to_string(),
                payload: payload.cloned(),
            });

        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| DispatchOutcome::success(json!({})))
    }
}
