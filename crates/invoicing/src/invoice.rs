//! Invoice aggregator: ledger mutation, totals and payload construction.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::{Map, Value as JsonValue};

use checkout_core::{CheckoutError, CheckoutResult, Store};

use crate::item::{Item, Tax};
use crate::ledger::Ledger;
use crate::payload::{Actions, CheckoutPayload, InvoiceSection};

pub const ITEM_KEY_PREFIX: &str = "item";
pub const TAX_KEY_PREFIX: &str = "tax";

/// Aggregate root: everything a checkout request is built from.
///
/// The store is shared and read-only. Totals and payloads are derived on
/// demand from the current ledger; nothing derived is cached.
#[derive(Clone)]
pub struct Invoice {
    store: Arc<dyn Store>,
    items: Ledger<Item>,
    taxes: Ledger<Tax>,
    custom_data: Map<String, JsonValue>,
    total_amount: Option<Decimal>,
    description: Option<String>,
    cancel_url: Option<String>,
    return_url: Option<String>,
}

impl Invoice {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            items: Ledger::new(ITEM_KEY_PREFIX),
            taxes: Ledger::new(TAX_KEY_PREFIX),
            custom_data: Map::new(),
            total_amount: None,
            description: None,
            cancel_url: None,
            return_url: None,
        }
    }

    pub fn items(&self) -> &Ledger<Item> {
        &self.items
    }

    pub fn taxes(&self) -> &Ledger<Tax> {
        &self.taxes
    }

    pub fn custom_data(&self) -> &Map<String, JsonValue> {
        &self.custom_data
    }

    /// Explicit total override, if one is set.
    pub fn total_amount(&self) -> Option<Decimal> {
        self.total_amount
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn cancel_url(&self) -> Option<&str> {
        self.cancel_url.as_deref()
    }

    pub fn return_url(&self) -> Option<&str> {
        self.return_url.as_deref()
    }

    /// Override the derived total. A zero override counts as unset.
    pub fn set_total_amount(&mut self, amount: Decimal) {
        self.total_amount = Some(amount);
    }

    pub fn clear_total_amount(&mut self) {
        self.total_amount = None;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn set_cancel_url(&mut self, url: impl Into<String>) {
        self.cancel_url = Some(url.into());
    }

    pub fn set_return_url(&mut self, url: impl Into<String>) {
        self.return_url = Some(url.into());
    }

    /// Append items after those already recorded.
    pub fn add_items<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = Item>,
    {
        self.items.append(items);
    }

    /// Append taxes; accepts [`Tax`] values or `(name, amount)` pairs.
    pub fn add_taxes<I, T>(&mut self, taxes: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Tax>,
    {
        self.taxes.append(taxes.into_iter().map(Into::into));
    }

    /// Merge key/value pairs into the custom data; later values win.
    pub fn add_custom_data<I, K, V>(&mut self, data: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<JsonValue>,
    {
        self.custom_data
            .extend(data.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Sum of every item's `total_price`.
    pub fn calculate_total_amount(&self) -> CheckoutResult<Decimal> {
        sum_total_prices(self.items.iter())
    }

    /// Sum of `total_price` over `items`, or over this invoice's items when
    /// `items` is empty.
    pub fn calculate_total_amount_of(&self, items: &[Item]) -> CheckoutResult<Decimal> {
        if items.is_empty() {
            return self.calculate_total_amount();
        }
        sum_total_prices(
            items
                .iter()
                .enumerate()
                .map(|(position, item)| (self.items.key_for(position), item)),
        )
    }

    /// The override when set and non-zero, otherwise the live item sum.
    pub fn effective_total_amount(&self) -> CheckoutResult<Decimal> {
        match self.total_amount {
            Some(amount) if !amount.is_zero() => Ok(amount),
            _ => self.calculate_total_amount(),
        }
    }

    /// Build the request body from the current state.
    pub fn prepare_data(&self) -> CheckoutResult<CheckoutPayload> {
        Ok(CheckoutPayload {
            invoice: InvoiceSection {
                items: self.items.clone(),
                taxes: self.taxes.clone(),
                total_amount: self.effective_total_amount()?,
                description: self.description.clone(),
            },
            store: self.store.info(),
            custom_data: self.custom_data.clone(),
            actions: Actions {
                cancel_url: self.cancel_url.clone(),
                return_url: self.return_url.clone(),
            },
        })
    }
}

impl core::fmt::Debug for Invoice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Invoice")
            .field("store", &self.store.info().name)
            .field("items", &self.items)
            .field("taxes", &self.taxes)
            .field("custom_data", &self.custom_data)
            .field("total_amount", &self.total_amount)
            .field("description", &self.description)
            .field("cancel_url", &self.cancel_url)
            .field("return_url", &self.return_url)
            .finish()
    }
}

fn sum_total_prices<'a, I>(entries: I) -> CheckoutResult<Decimal>
where
    I: IntoIterator<Item = (String, &'a Item)>,
{
    entries
        .into_iter()
        .try_fold(Decimal::ZERO, |total, (key, item)| {
            let price = item.total_price_amount(&key)?;
            total
                .checked_add(price)
                .ok_or_else(|| {
                    CheckoutError::amount_out_of_range(format!(
                        "total_amount exceeds the decimal range at {key}"
                    ))
                })
        })
}
