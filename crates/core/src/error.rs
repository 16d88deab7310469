//! Checkout error model.

use thiserror::Error;

/// Result type used across the invoice layer.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Local, deterministic failures raised while building or driving an invoice.
///
/// Remote failures are deliberately absent: the processor's verdict travels
/// back through the `(success, response)` pair, never through this enum.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// An item's `total_price` could not be read as a decimal number.
    #[error("malformed item {key}: {reason}")]
    MalformedItem { key: String, reason: String },

    /// `confirm` had no explicit token and none could be recovered from a
    /// previous response.
    #[error("no invoice token available; call create first or pass a token")]
    MissingToken,

    /// A token cannot be used as a single path segment of the confirm
    /// endpoint (empty, `.`/`..`, or containing reserved characters).
    #[error("invalid invoice token {0:?}")]
    InvalidToken(String),

    /// A numeric amount does not fit the decimal range.
    #[error("amount out of range: {0}")]
    AmountOutOfRange(String),

    /// The payload could not be turned into JSON.
    #[error("payload serialization failed: {0}")]
    Serialization(String),
}

impl CheckoutError {
    pub fn malformed_item(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedItem {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_token(token: impl Into<String>) -> Self {
        Self::InvalidToken(token.into())
    }

    pub fn amount_out_of_range(msg: impl Into<String>) -> Self {
        Self::AmountOutOfRange(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(value: serde_json::Error) -> Self {
        Self::serialization(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_item_message_names_the_key() {
        let err = CheckoutError::malformed_item("item_3", "invalid digit");
        assert_eq!(err.to_string(), "malformed item item_3: invalid digit");
    }

    #[test]
    fn invalid_token_message_quotes_the_token() {
        let err = CheckoutError::invalid_token("a/b");
        assert_eq!(err.to_string(), "invalid invoice token \"a/b\"");
    }
}
