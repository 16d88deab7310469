//! Canonical request body for `checkout-invoice/create`.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use checkout_core::{CheckoutResult, StoreInfo};

use crate::item::{Item, Tax};
use crate::ledger::Ledger;

/// Snapshot of an invoice in the shape the processor expects:
///
/// ```text
/// {
///   "invoice": { "items", "taxes", "total_amount", "description" },
///   "store": { "name", ... },
///   "custom_data": { ... },
///   "actions": { "cancel_url", "return_url" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutPayload {
    pub invoice: InvoiceSection,
    pub store: StoreInfo,
    pub custom_data: Map<String, JsonValue>,
    pub actions: Actions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceSection {
    pub items: Ledger<Item>,
    pub taxes: Ledger<Tax>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actions {
    pub cancel_url: Option<String>,
    pub return_url: Option<String>,
}

impl CheckoutPayload {
    pub fn to_json(&self) -> CheckoutResult<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }
}
