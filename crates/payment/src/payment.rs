//! Dispatcher contract.

use std::sync::Arc;

use serde_json::{Value as JsonValue, json};
use thiserror::Error;

/// Capability that performs a single round trip against a named endpoint.
///
/// - `payload: Some(_)` sends the JSON body (create-style calls).
/// - `payload: None` sends no body (status queries).
///
/// Implementations report remote and transport failures through
/// [`DispatchOutcome::success`] rather than by returning an error, and never
/// retry on their own.
pub trait Payment {
    fn process(&self, endpoint: &str, payload: Option<&JsonValue>) -> DispatchOutcome;
}

impl<P: Payment + ?Sized> Payment for &P {
    fn process(&self, endpoint: &str, payload: Option<&JsonValue>) -> DispatchOutcome {
        (**self).process(endpoint, payload)
    }
}

impl<P: Payment + ?Sized> Payment for Box<P> {
    fn process(&self, endpoint: &str, payload: Option<&JsonValue>) -> DispatchOutcome {
        (**self).process(endpoint, payload)
    }
}

impl<P: Payment + ?Sized> Payment for Arc<P> {
    fn process(&self, endpoint: &str, payload: Option<&JsonValue>) -> DispatchOutcome {
        (**self).process(endpoint, payload)
    }
}

/// `(success, response)` pair returned by every dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub success: bool,
    pub response: JsonValue,
}

impl DispatchOutcome {
    pub fn success(response: JsonValue) -> Self {
        Self {
            success: true,
            response,
        }
    }

    pub fn failure(response: JsonValue) -> Self {
        Self {
            success: false,
            response,
        }
    }

    pub fn into_parts(self) -> (bool, JsonValue) {
        (self.success, self.response)
    }
}

impl From<DispatchError> for DispatchOutcome {
    /// Fold a dispatcher-level failure into a failed outcome.
    fn from(err: DispatchError) -> Self {
        DispatchOutcome::failure(json!({
            "response_code": err.status_code(),
            "response_text": err.to_string(),
        }))
    }
}

/// Dispatcher-level failure (network, remote, decoding).
///
/// These never escape a [`Payment`] implementation; they are logged and
/// folded into a failed [`DispatchOutcome`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The processor answered with a body that is not JSON.
    #[error("undecodable response (HTTP {status}): {body}")]
    Decode { status: u16, body: String },
}

impl DispatchError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// HTTP status associated with the failure, if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DispatchError::Transport(_) => None,
            DispatchError::Decode { status, .. } => Some(*status),
        }
    }
}
