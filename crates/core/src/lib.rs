//! `checkout-core` — shared building blocks for hosted checkout invoices.
//!
//! This crate holds the pieces every other crate agrees on: the error taxonomy,
//! the merchant Store capability and the invoice status vocabulary reported by
//! the remote processor. It performs no IO.

pub mod error;
pub mod status;
pub mod store;
pub mod value_object;

pub use error::{CheckoutError, CheckoutResult};
pub use status::InvoiceStatus;
pub use store::{StaticStore, Store, StoreInfo};
pub use value_object::ValueObject;
