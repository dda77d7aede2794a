use clap::Args;
use jiff::Timestamp;
use pitchside::{
    money::{format_amount, parse_price},
    pricing::{PricingError, expected_price, parse_instant},
};
use pitchside_app::context::AppContext;

use super::resolve_field;

#[derive(Debug, Args)]
#[group(id = "source", required = true, multiple = false, args = ["rate", "field"])]
pub(crate) struct ExpectedPriceArgs {
    /// Hourly rate, e.g. "500 THB"
    #[arg(long)]
    rate: Option<String>,

    /// Field name or id whose rate applies
    #[arg(long)]
    field: Option<String>,

    /// Start instant, e.g. 2025-06-01T13:00:00Z
    #[arg(long)]
    start: String,

    /// End instant
    #[arg(long)]
    end: String,

    /// Promotion code
    #[arg(long)]
    code: Option<String>,
}

pub(crate) async fn run(context: &AppContext, args: ExpectedPriceArgs) -> Result<(), String> {
    let rate = match (&args.rate, &args.field) {
        (Some(rate), _) => parse_price(rate).map_err(|error| error.to_string())?,
        (None, Some(field)) => resolve_field(context, field).await?.field.hourly_rate,
        (None, None) => return Err("either --rate or --field is required".to_string()),
    };

    let promotion = match args.code.as_deref().filter(|code| !code.trim().is_empty()) {
        Some(code) => Some(
            context
                .promotions
                .search_by_code(code)
                .await
                .map_err(|error| format!("failed to look up promotion: {error}"))?
                .promotion,
        ),
        None => None,
    };

    let priced = parse_instant(&args.start).and_then(|start| {
        let end = parse_instant(&args.end)?;

        expected_price(&rate, start, end, promotion.as_ref(), Timestamp::now())
    });

    match priced {
        Ok(breakdown) => {
            println!("base: {}", format_amount(&breakdown.base));
            println!("discount: {}", format_amount(&breakdown.discount));
            println!("total: {}", format_amount(&breakdown.final_price));

            Ok(())
        }
        Err(PricingError::IndeterminateDuration(reason)) => {
            println!("total: indeterminate ({reason})");

            Ok(())
        }
        Err(error) => Err(format!("failed to price booking: {error}")),
    }
}
