//! Hosted checkout invoices.
//!
//! This crate accumulates line items, taxes and custom metadata into an
//! [`Invoice`], derives its totals, renders the canonical request payload and
//! drives the create → confirm exchange with the payment processor through a
//! [`checkout_payment::Payment`] capability.

pub mod checkout;
pub mod invoice;
pub mod item;
pub mod ledger;
pub mod payload;

pub use checkout::{CONFIRM_ENDPOINT, CREATE_ENDPOINT, Checkout, confirm_endpoint};
pub use invoice::Invoice;
pub use item::{Item, Tax};
pub use ledger::Ledger;
pub use payload::{Actions, CheckoutPayload, InvoiceSection};
