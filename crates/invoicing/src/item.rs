//! Line-item records carried by an invoice.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use checkout_core::{CheckoutError, CheckoutResult, ValueObject};

/// One purchasable line.
///
/// Prices travel as decimal strings. `total_price` is trusted as given; it is
/// never cross-checked against `quantity * unit_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub total_price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ValueObject for Item {}

impl Item {
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        unit_price: impl Into<String>,
        total_price: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price: unit_price.into(),
            total_price: total_price.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// `total_price` as a number; `key` names the item in the error.
    ///
    /// Anything a float parser accepts is numeric. Values with more
    /// fractional digits than a `Decimal` holds are rounded into range
    /// (magnitudes below 1e-28 become zero); values beyond `Decimal::MAX`
    /// fail with [`CheckoutError::AmountOutOfRange`].
    pub fn total_price_amount(&self, key: &str) -> CheckoutResult<Decimal> {
        let raw = self.total_price.trim();
        if raw.is_empty() {
            return Err(CheckoutError::malformed_item(key, "missing total_price"));
        }
        if let Ok(amount) = Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) {
            return Ok(amount);
        }

        let value = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                CheckoutError::malformed_item(key, format!("total_price {raw:?} is not numeric"))
            })?;

        if value.abs() < MIN_REPRESENTABLE {
            return Ok(Decimal::ZERO);
        }
        Decimal::try_from(value).map_err(|_| {
            CheckoutError::amount_out_of_range(format!(
                "{key} total_price {raw} exceeds the decimal range"
            ))
        })
    }
}

// Smallest magnitude a 28-digit scale can express.
const MIN_REPRESENTABLE: f64 = 1e-28;

/// A named tax line. Taxes with the same name are kept as separate entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl ValueObject for Tax {}

impl Tax {
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

impl<N: Into<String>> From<(N, Decimal)> for Tax {
    fn from((name, amount): (N, Decimal)) -> Self {
        Tax::new(name, amount)
    }
}
