//! Invoice lifecycle: create, then confirm with the processor-issued token.
//!
//! This module drives a single [`Invoice`] through the hosted checkout API. It
//! composes the aggregator with a [`Payment`] capability; it performs no IO
//! itself and knows nothing about HTTP, credentials or retries.
//!
//! ## Lifecycle
//!
//! ```text
//! add_items / add_taxes / add_custom_data   (any number of times)
//!   ↓
//! create   → POST checkout-invoice/create         → token stored
//!   ↓
//! confirm  → GET  checkout-invoice/confirm/{token} → pending | completed | cancelled
//! ```
//!
//! The state machine is driven entirely by the caller:
//!
//! - **uninitialized → pending**: a successful `create` returns a token.
//! - **pending → completed | cancelled**: observed by a later `confirm`.
//!
//! The controller never polls, keeps no timers and never interprets the
//! returned status. Calling `confirm` again is the only way to observe a
//! transition.
//!
//! ## Failure model
//!
//! - **Local failures** (`MalformedItem`, `AmountOutOfRange`, `MissingToken`,
//!   `InvalidToken`) are returned as `Err` before anything is sent, and leave
//!   the ledger exactly as it was.
//! - **Remote failures** are not errors: they come back as an
//!   `Ok(DispatchOutcome { success: false, .. })` and the caller decides
//!   whether to try again. Nothing here retries.

use serde_json::{Map, Value as JsonValue};

use checkout_core::{CheckoutError, CheckoutResult};
use checkout_payment::{DispatchOutcome, Payment};

use crate::invoice::Invoice;
use crate::item::{Item, Tax};

pub const CREATE_ENDPOINT: &str = "checkout-invoice/create";
pub const CONFIRM_ENDPOINT: &str = "checkout-invoice/confirm";

/// Drives one invoice through the processor using a [`Payment`] capability.
///
/// ## Token recovery
///
/// Every response is kept (see [`Checkout::response`]). Whenever a response
/// carries a non-empty `token` string it becomes the current token, so a
/// later failed `confirm` without a token does not lose the one issued by
/// `create`.
///
/// ## Token safety
///
/// Tokens are opaque data from the processor but end up in a URL path. Only
/// RFC 3986 unreserved characters (`A-Z a-z 0-9 - . _ ~`) are accepted, and
/// `.`/`..` are refused, so a token always addresses exactly one resource
/// under `checkout-invoice/confirm/`.
///
/// ## Usage
///
/// ```ignore
/// let store: Arc<dyn Store> = Arc::new(StaticStore::named("FooBar Shop"));
/// let mut checkout = Checkout::new(Invoice::new(store), HttpPayment::from_env()?);
///
/// let created = checkout.create(vec![ticket], Vec::new(), Map::new())?;
/// if created.success {
///     // Later, once the customer has been through the hosted page:
///     let status = checkout.confirm(None)?;
///     println!("{:?}", InvoiceStatus::from_response(&status.response));
/// }
/// ```
///
/// ## Concurrency
///
/// Single writer: mutation goes through `&mut self`, and the only blocking
/// point is the call into the [`Payment`] capability.
#[derive(Debug)]
pub struct Checkout<P> {
    invoice: Invoice,
    payment: P,
    response: Option<JsonValue>,
    token: Option<String>,
}

impl<P> Checkout<P> {
    pub fn new(invoice: Invoice, payment: P) -> Self {
        Self {
            invoice,
            payment,
            response: None,
            token: None,
        }
    }

    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    pub fn invoice_mut(&mut self) -> &mut Invoice {
        &mut self.invoice
    }

    pub fn payment(&self) -> &P {
        &self.payment
    }

    /// Raw response of the most recent dispatch, successful or not.
    pub fn response(&self) -> Option<&JsonValue> {
        self.response.as_ref()
    }

    /// Most recent token reported by the processor.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn record(&mut self, outcome: &DispatchOutcome) {
        if let Some(token) = token_of(&outcome.response) {
            self.token = Some(token.to_string());
        }
        self.response = Some(outcome.response.clone());
    }
}

impl<P: Payment> Checkout<P> {
    /// Add the given records and submit the whole invoice.
    ///
    /// Calling this again re-sends the full current ledger, not a diff. If the
    /// payload cannot be built, the additions are discarded and nothing is sent.
    pub fn create(
        &mut self,
        items: Vec<Item>,
        taxes: Vec<Tax>,
        custom_data: Map<String, JsonValue>,
    ) -> CheckoutResult<DispatchOutcome> {
        let mut staged = self.invoice.clone();
        staged.add_items(items);
        staged.add_taxes(taxes);
        staged.add_custom_data(custom_data);

        let payload = staged.prepare_data()?;
        let body = payload.to_json()?;
        self.invoice = staged;

        tracing::info!("creating checkout invoice");
        tracing::debug!(
            items = payload.invoice.items.len(),
            taxes = payload.invoice.taxes.len(),
            total_amount = %payload.invoice.total_amount,
            "checkout payload built"
        );

        let outcome = self.payment.process(CREATE_ENDPOINT, Some(&body));
        self.record(&outcome);

        if outcome.success {
            tracing::info!(token = ?self.token, "checkout invoice created");
        } else {
            tracing::warn!(response = %outcome.response, "checkout invoice creation failed");
        }

        Ok(outcome)
    }

    /// Query settlement status for `token`, or for the token recovered from
    /// the last response carrying one.
    pub fn confirm(&mut self, token: Option<&str>) -> CheckoutResult<DispatchOutcome> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or(self.token.as_deref())
            .ok_or(CheckoutError::MissingToken)?
            .to_string();

        let endpoint = confirm_endpoint(&token)?;
        tracing::info!(%token, "confirming checkout invoice");

        let outcome = self.payment.process(&endpoint, None);
        self.record(&outcome);

        tracing::debug!(
            success = outcome.success,
            status = ?outcome.response.get("status"),
            "confirm response received"
        );

        Ok(outcome)
    }
}

/// `checkout-invoice/confirm/{token}`, provided the token is one path segment.
pub fn confirm_endpoint(token: &str) -> CheckoutResult<String> {
    let is_unreserved = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~');
    if token.is_empty() || token == "." || token == ".." || !token.chars().all(is_unreserved) {
        return Err(CheckoutError::invalid_token(token));
    }
    Ok(format!("{CONFIRM_ENDPOINT}/{token}"))
}

fn token_of(response: &JsonValue) -> Option<&str> {
    response
        .get("token")
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use checkout_core::{InvoiceStatus, StaticStore, Store, StoreInfo};
    use checkout_payment::RecordingPayment;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn test_store() -> Arc<dyn Store> {
        Arc::new(StaticStore::new(
            StoreInfo::new("FooBar Shop").with_website_url("https://foobar.example"),
        ))
    }

    fn vip_ticket() -> Item {
        Item::new("VIP Ticket", 2, "35.0", "70.0")
    }

    fn upgrade() -> Item {
        Item::new("Upgrade", 1, "30.0", "30.0")
    }

    fn checkout() -> Checkout<RecordingPayment> {
        let mut invoice = Invoice::new(test_store());
        invoice.add_items(std::iter::repeat_n(vip_ticket(), 10));
        invoice.add_taxes([("NHIS TAX", dec!(23.8)), ("VAT", dec!(5))]);
        invoice.add_custom_data([("phone_brand", "Motorola V3"), ("model", "65456AH23")]);
        Checkout::new(invoice, RecordingPayment::new())
    }

    #[test]
    fn create_posts_the_full_payload() {
        let mut checkout = checkout();
        checkout
            .payment()
            .respond_success(json!({"response_code": "00", "token": "T123"}));

        let (success, response) = checkout
            .create(Vec::new(), Vec::new(), Map::new())
            .unwrap()
            .into_parts();

        assert!(success);
        assert_eq!(response["token"], "T123");

        let call = checkout.payment().last_call().unwrap();
        assert_eq!(call.endpoint, CREATE_ENDPOINT);
        let body = call.payload.unwrap();
        assert_eq!(body["invoice"]["total_amount"], json!(700.0));
        assert_eq!(body["invoice"]["items"].as_object().unwrap().len(), 10);
        assert_eq!(body["invoice"]["taxes"]["tax_1"]["name"], "VAT");
        assert_eq!(body["store"]["website_url"], "https://foobar.example");
        assert_eq!(body["custom_data"]["model"], "65456AH23");
    }

    #[test]
    fn create_arguments_are_merged_into_the_ledger() {
        let mut checkout = checkout();
        let mut data = Map::new();
        data.insert("Category".to_string(), json!("Sports"));

        checkout
            .create(vec![upgrade()], vec![Tax::new("Foo_TAX", dec!(9))], data)
            .unwrap();

        assert_eq!(checkout.invoice().items().len(), 11);
        assert_eq!(checkout.invoice().taxes().len(), 3);
        assert_eq!(checkout.invoice().custom_data()["Category"], "Sports");

        let body = checkout.payment().last_call().unwrap().payload.unwrap();
        assert_eq!(body["invoice"]["items"]["item_10"]["name"], "Upgrade");
        assert_eq!(body["invoice"]["total_amount"], json!(730.0));
    }

    #[test]
    fn second_create_resends_the_whole_ledger() {
        let mut checkout = checkout();
        checkout.create(Vec::new(), Vec::new(), Map::new()).unwrap();
        checkout
            .create(vec![upgrade()], Vec::new(), Map::new())
            .unwrap();

        let calls = checkout.payment().calls();
        assert_eq!(calls.len(), 2);
        let second = calls[1].payload.as_ref().unwrap();
        assert_eq!(second["invoice"]["items"].as_object().unwrap().len(), 11);
    }

    #[test]
    fn malformed_item_aborts_create_without_side_effects() {
        let mut checkout = checkout();

        let err = checkout
            .create(vec![Item::new("Broken", 1, "1", "oops")], Vec::new(), Map::new())
            .unwrap_err();

        assert!(matches!(err, CheckoutError::MalformedItem { .. }));
        assert_eq!(checkout.invoice().items().len(), 10);
        assert!(checkout.payment().calls().is_empty());
        assert!(checkout.response().is_none());
    }

    #[test]
    fn confirm_without_token_uses_the_one_from_create() {
        let mut checkout = checkout();
        checkout
            .payment()
            .respond_success(json!({"response_code": "00", "token": "T123"}))
            .respond_success(json!({"status": "pending"}));

        checkout.create(Vec::new(), Vec::new(), Map::new()).unwrap();
        let outcome = checkout.confirm(None).unwrap();

        let call = checkout.payment().last_call().unwrap();
        assert_eq!(call.endpoint, "checkout-invoice/confirm/T123");
        assert_eq!(call.payload, None);
        assert_eq!(
            InvoiceStatus::from_response(&outcome.response),
            Some(InvoiceStatus::Pending)
        );
    }

    #[test]
    fn confirm_without_any_token_is_missing_token() {
        let mut checkout = checkout();
        assert_eq!(checkout.confirm(None).unwrap_err(), CheckoutError::MissingToken);
        assert_eq!(checkout.confirm(Some("  ")).unwrap_err(), CheckoutError::MissingToken);
        assert!(checkout.payment().calls().is_empty());
    }

    #[test]
    fn failed_create_without_token_leaves_confirm_unresolvable() {
        let mut checkout = checkout();
        checkout
            .payment()
            .respond_failure(json!({"response_code": "1001", "response_text": "invalid keys"}));

        let (success, response) = checkout
            .create(Vec::new(), Vec::new(), Map::new())
            .unwrap()
            .into_parts();

        assert!(!success);
        assert_eq!(checkout.response(), Some(&response));
        assert_eq!(checkout.confirm(None).unwrap_err(), CheckoutError::MissingToken);
    }

    #[test]
    fn token_that_escapes_the_confirm_path_is_refused() {
        let mut checkout = checkout();
        checkout
            .payment()
            .respond_success(json!({"token": "../../create?x=1"}));
        checkout.create(Vec::new(), Vec::new(), Map::new()).unwrap();

        assert_eq!(
            checkout.confirm(None).unwrap_err(),
            CheckoutError::invalid_token("../../create?x=1")
        );
        for token in ["a/b", "T1?x=1", "T1#frag", "..", ".", "T 1", "caf\u{e9}"] {
            assert!(
                matches!(checkout.confirm(Some(token)), Err(CheckoutError::InvalidToken(_))),
                "{token:?} should be refused"
            );
        }
        // Only the create call went out.
        assert_eq!(checkout.payment().calls().len(), 1);
    }

    #[test]
    fn unreserved_token_characters_are_accepted() {
        assert_eq!(
            confirm_endpoint("test_a1B2-c.3~").unwrap(),
            "checkout-invoice/confirm/test_a1B2-c.3~"
        );
    }

    #[test]
    fn explicit_token_takes_precedence() {
        let mut checkout = checkout();
        checkout.payment().respond_success(json!({"token": "T123"}));
        checkout.create(Vec::new(), Vec::new(), Map::new()).unwrap();

        checkout.confirm(Some("OTHER")).unwrap();
        assert_eq!(
            checkout.payment().last_call().unwrap().endpoint,
            "checkout-invoice/confirm/OTHER"
        );
    }

    #[test]
    fn confirm_is_repeatable_and_leaves_the_ledger_alone() {
        let mut checkout = checkout();
        checkout
            .payment()
            .respond_success(json!({"token": "T123"}))
            .respond_success(json!({"status": "pending"}))
            .respond_failure(json!({"response_text": "gateway timeout"}))
            .respond_success(json!({"status": "completed"}));
        checkout.create(Vec::new(), Vec::new(), Map::new()).unwrap();
        let before = checkout.invoice().prepare_data().unwrap();

        let statuses: Vec<Option<InvoiceStatus>> = (0..3)
            .map(|_| InvoiceStatus::from_response(&checkout.confirm(None).unwrap().response))
            .collect();

        assert_eq!(
            statuses,
            [Some(InvoiceStatus::Pending), None, Some(InvoiceStatus::Completed)]
        );
        // The failed confirm carried no token, so T123 is still used afterwards.
        let calls = checkout.payment().calls();
        assert!(calls[1..].iter().all(|c| c.endpoint == "checkout-invoice/confirm/T123"));
        assert_eq!(checkout.invoice().prepare_data().unwrap(), before);
    }
}
