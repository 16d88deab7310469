//! Command-line arguments.

use core::str::FromStr;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use checkout_core::StoreInfo;
use checkout_invoicing::{Item, Tax};

#[derive(Debug, Parser)]
#[command(name = "checkout", about = "Create and confirm hosted checkout invoices")]
pub struct Cli {
    /// Answer from an in-memory processor instead of the HTTP API.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build an invoice and submit it.
    Create(CreateArgs),
    /// Query the settlement status of an invoice token.
    Confirm {
        token: String,
    },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Line item as `name:quantity:unit_price:total_price[:description]`.
    #[arg(long = "item", value_parser = parse_item)]
    pub items: Vec<Item>,

    /// Tax as `name:amount`.
    #[arg(long = "tax", value_parser = parse_tax)]
    pub taxes: Vec<Tax>,

    /// Custom data as `key=value`; values that parse as JSON are kept typed.
    #[arg(long = "data", value_parser = parse_custom_datum)]
    pub custom_data: Vec<(String, JsonValue)>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub cancel_url: Option<String>,

    #[arg(long)]
    pub return_url: Option<String>,

    /// Explicit total; otherwise the sum of item totals.
    #[arg(long)]
    pub total: Option<Decimal>,
}

#[derive(Debug, Args)]
pub struct StoreArgs {
    #[arg(long = "store-name")]
    pub name: String,
    #[arg(long = "store-tagline")]
    pub tagline: Option<String>,
    #[arg(long = "store-address")]
    pub postal_address: Option<String>,
    #[arg(long = "store-phone")]
    pub phone: Option<String>,
    #[arg(long = "store-logo-url")]
    pub logo_url: Option<String>,
    #[arg(long = "store-website-url")]
    pub website_url: Option<String>,
}

impl From<StoreArgs> for StoreInfo {
    fn from(args: StoreArgs) -> Self {
        StoreInfo {
            name: args.name,
            tagline: args.tagline,
            postal_address: args.postal_address,
            phone: args.phone,
            logo_url: args.logo_url,
            website_url: args.website_url,
        }
    }
}

pub fn parse_item(raw: &str) -> Result<Item, String> {
    let mut parts = raw.splitn(5, ':');
    let mut next = |field: &str| {
        parts
            .next()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| format!("item {raw:?} is missing {field}"))
    };

    let name = next("name")?;
    let quantity = next("quantity")?
        .parse::<u32>()
        .map_err(|e| format!("item {raw:?} has an invalid quantity: {e}"))?;
    let unit_price = next("unit_price")?;
    let total_price = next("total_price")?;
    let item = Item::new(name, quantity, unit_price, total_price);

    Ok(match next("description") {
        Ok(description) => item.with_description(description),
        Err(_) => item,
    })
}

pub fn parse_tax(raw: &str) -> Result<Tax, String> {
    let (name, amount) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("tax {raw:?} must be name:amount"))?;
    let amount = Decimal::from_str(amount.trim())
        .map_err(|e| format!("tax {raw:?} has an invalid amount: {e}"))?;
    Ok(Tax::new(name.trim(), amount))
}

pub fn parse_custom_datum(raw: &str) -> Result<(String, JsonValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("custom data {raw:?} must be key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("custom data {raw:?} has an empty key"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| JsonValue::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn item_with_and_without_description() {
        let item = parse_item("VIP Ticket:2:35.0:70.0:Front row: seat 4").unwrap();
        assert_eq!(item.name, "VIP Ticket");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.total_price, "70.0");
        assert_eq!(item.description.as_deref(), Some("Front row: seat 4"));

        let item = parse_item("Mug:1:5:5").unwrap();
        assert_eq!(item.description, None);
    }

    #[test]
    fn incomplete_item_is_rejected() {
        assert!(parse_item("Mug:1:5").unwrap_err().contains("total_price"));
        assert!(parse_item("Mug:one:5:5").unwrap_err().contains("quantity"));
    }

    #[test]
    fn tax_name_may_contain_colons() {
        let tax = parse_tax("NHIS: levy:23.8").unwrap();
        assert_eq!(tax, Tax::new("NHIS: levy", dec!(23.8)));
        assert!(parse_tax("VAT").is_err());
        assert!(parse_tax("VAT:five").is_err());
    }

    #[test]
    fn custom_data_values_keep_json_types() {
        assert_eq!(parse_custom_datum("year=2014").unwrap(), ("year".to_string(), json!(2014)));
        assert_eq!(
            parse_custom_datum("model=65456AH23").unwrap(),
            ("model".to_string(), json!("65456AH23"))
        );
        assert!(parse_custom_datum("=x").is_err());
    }

    #[test]
    fn parses_a_create_command() {
        let cli = Cli::try_parse_from([
            "checkout",
            "--dry-run",
            "create",
            "--store-name",
            "FooBar Shop",
            "--item",
            "VIP Ticket:2:35.0:70.0",
            "--tax",
            "VAT:5",
            "--data",
            "model=65456AH23",
            "--total",
            "75",
        ])
        .unwrap();

        assert!(cli.dry_run);
        match cli.command {
            Command::Create(args) => {
                assert_eq!(args.store.name, "FooBar Shop");
                assert_eq!(args.items.len(), 1);
                assert_eq!(args.taxes[0].amount, dec!(5));
                assert_eq!(args.total, Some(dec!(75)));
            }
            other => panic!("expected create, got {other:?}"),
        }
    }
}
