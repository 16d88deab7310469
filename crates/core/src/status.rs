//! Invoice settlement status as reported by the remote processor.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Settlement status surfaced by `confirm`.
///
/// The controller never acts on this value; it exists so callers can branch on
/// a typed status instead of raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Completed,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Completed => "completed",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a status string, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(InvoiceStatus::Pending),
            "completed" => Some(InvoiceStatus::Completed),
            "cancelled" => Some(InvoiceStatus::Cancelled),
            _ => None,
        }
    }

    /// Read the `status` field of a confirm response.
    pub fn from_response(response: &JsonValue) -> Option<Self> {
        response.get("status").and_then(JsonValue::as_str).and_then(Self::parse)
    }

    /// Terminal statuses are never left once observed.
    pub fn is_terminal(self) -> bool {
        !matches!(self, InvoiceStatus::Pending)
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
