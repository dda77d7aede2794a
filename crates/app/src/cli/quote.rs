use clap::Args;
use jiff::{Timestamp, civil::Date};
use pitchside::{money::format_amount, slots::parse_start_hour};
use pitchside_app::{
    context::AppContext,
    domain::{
        bookings::data::{BookingQuote, QuoteRequest},
        promotions::data::LookupSource,
    },
    session::Session,
};
use tabled::builder::Builder;

use super::{output::render, resolve_field};

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Field name or id
    #[arg(long)]
    field: String,

    /// Date, e.g. 2025-06-01
    #[arg(long)]
    date: Date,

    /// Slot start hours, e.g. 13,14 or 13:00,14:00
    #[arg(long, value_delimiter = ',', required = true)]
    hours: Vec<String>,

    /// Promotion code
    #[arg(long)]
    code: Option<String>,
}

pub(crate) async fn run(
    context: &AppContext,
    session: &Session,
    args: QuoteArgs,
    book: bool,
) -> Result<(), String> {
    let field = resolve_field(context, &args.field).await?;

    let hours = args
        .hours
        .iter()
        .map(|raw| parse_start_hour(raw))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| error.to_string())?;

    let quote = context
        .bookings
        .quote(
            session,
            QuoteRequest {
                field: field.uuid,
                date: args.date,
                hours,
                promotion_code: args.code,
            },
            Timestamp::now(),
        )
        .await
        .map_err(|error| format!("failed to price booking: {error}"))?;

    print_quote(&quote);

    if !book {
        return Ok(());
    }

    let booking = context
        .bookings
        .confirm(session, quote)
        .await
        .map_err(|error| format!("failed to book: {error}"))?;

    println!("booking_uuid: {}", booking.uuid);
    println!("status: {}", booking.status);

    Ok(())
}

fn print_quote(quote: &BookingQuote) {
    let mut builder = Builder::default();

    builder.push_record(["Date", "Slot", "Rate / hour"]);

    for slot in &quote.slots {
        builder.push_record([
            slot.date().to_string(),
            slot.label(),
            format_amount(&quote.hourly_rate),
        ]);
    }

    println!("{}", quote.field_name);
    println!("{}", render(builder, 2..3));

    println!("base: {}", format_amount(&quote.price.base));

    if let Some(promotion) = &quote.promotion {
        let note = match promotion.source {
            LookupSource::Store => "",
            LookupSource::Fallback => " (offline sample, cannot be booked)",
        };

        println!(
            "promotion: {} {}{note}",
            promotion.code, promotion.display_text
        );
    }

    println!("discount: {}", format_amount(&quote.price.discount));
    println!("total: {}", format_amount(&quote.price.final_price));
}
