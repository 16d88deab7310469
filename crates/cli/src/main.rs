//! `checkout` — create and confirm hosted checkout invoices from the shell.
//!
//! Credentials come from `CHECKOUT_MASTER_KEY`, `CHECKOUT_PRIVATE_KEY` and
//! `CHECKOUT_TOKEN` (see `checkout_payment::PaymentConfig`). `--dry-run`
//! skips the network entirely.

mod args;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde_json::{Map, Value as JsonValue, json};

use checkout_core::{InvoiceStatus, StaticStore, StoreInfo};
use checkout_invoicing::{Checkout, Invoice};
use checkout_payment::{DispatchOutcome, HttpPayment, Payment, RecordingPayment};

use crate::args::{Cli, Command, CreateArgs};

fn main() -> anyhow::Result<()> {
    checkout_observability::init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Create(args) => create(args, cli.dry_run)?,
        Command::Confirm { token } => confirm(&token, cli.dry_run)?,
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn create(args: CreateArgs, dry_run: bool) -> anyhow::Result<JsonValue> {
    let payment = payment(dry_run, || {
        DispatchOutcome::success(json!({
            "response_code": "00",
            "response_text": "dry run",
            "token": "dry-run-token",
        }))
    })?;

    let store = StaticStore::new(StoreInfo::from(args.store));
    let mut invoice = Invoice::new(Arc::new(store));
    if let Some(description) = args.description {
        invoice.set_description(description);
    }
    if let Some(url) = args.cancel_url {
        invoice.set_cancel_url(url);
    }
    if let Some(url) = args.return_url {
        invoice.set_return_url(url);
    }
    if let Some(total) = args.total {
        invoice.set_total_amount(total);
    }

    let custom_data: Map<String, JsonValue> = args.custom_data.into_iter().collect();
    let mut checkout = Checkout::new(invoice, payment);
    let outcome = checkout
        .create(args.items, args.taxes, custom_data)
        .context("failed to build checkout invoice")?;

    Ok(json!({
        "success": outcome.success,
        "token": checkout.token(),
        "response": outcome.response,
    }))
}

fn confirm(token: &str, dry_run: bool) -> anyhow::Result<JsonValue> {
    let payment = payment(dry_run, || {
        DispatchOutcome::success(json!({"response_code": "00", "status": "pending"}))
    })?;

    // Confirm needs no ledger.
    let invoice = Invoice::new(Arc::new(StaticStore::default()));
    let mut checkout = Checkout::new(invoice, payment);
    let outcome = checkout
        .confirm(Some(token))
        .context("failed to confirm checkout invoice")?;

    Ok(confirm_report(outcome))
}

/// Summary printed by `confirm`; `terminal` tells scripts to stop polling.
fn confirm_report(outcome: DispatchOutcome) -> JsonValue {
    let status = InvoiceStatus::from_response(&outcome.response);
    json!({
        "success": outcome.success,
        "status": status,
        "terminal": status.is_some_and(InvoiceStatus::is_terminal),
        "response": outcome.response,
    })
}

fn payment(
    dry_run: bool,
    scripted: impl FnOnce() -> DispatchOutcome,
) -> anyhow::Result<Box<dyn Payment>> {
    if dry_run {
        tracing::info!("dry run: requests are answered in memory");
        let recording = RecordingPayment::new();
        recording.respond(scripted());
        return Ok(Box::new(recording));
    }

    let http = HttpPayment::from_env().context("loading checkout API configuration")?;
    tracing::debug!(config = ?http.config(), "using hosted checkout API");
    Ok(Box::new(http))
}
