//! `checkout-payment` — the Payment capability.
//!
//! Turns an endpoint plus optional JSON payload into one request/response round
//! trip against the hosted checkout API. Invoices depend only on the
//! [`Payment`] trait; transport, authentication and configuration live here.

pub mod config;
pub mod http;
pub mod payment;
pub mod recording;

pub use config::{ConfigError, Mode, PaymentConfig};
pub use http::HttpPayment;
pub use payment::{DispatchError, DispatchOutcome, Payment};
pub use recording::{DispatchCall, RecordingPayment};
