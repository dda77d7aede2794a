use clap::{Args, Subcommand};
use jiff::Timestamp;
use pitchside::money::format_amount;
use pitchside_app::{
    context::AppContext,
    domain::bookings::{
        data::{BookingReport, ExpectedPrice},
        records::{BookingStatus, BookingUuid},
    },
    session::Session,
};
use tabled::builder::Builder;

use super::output::render;

#[derive(Debug, Args)]
pub(crate) struct BookingsCommand {
    #[command(subcommand)]
    command: BookingsSubcommand,
}

#[derive(Debug, Subcommand)]
enum BookingsSubcommand {
    /// Every booking with its expected price.
    Report,
    /// Change a booking's status.
    Status(StatusArgs),
}

#[derive(Debug, Args)]
struct StatusArgs {
    uuid: BookingUuid,

    /// pending, confirmed or cancelled
    status: BookingStatus,
}

pub(crate) async fn run(
    context: &AppContext,
    session: &Session,
    command: BookingsCommand,
) -> Result<(), String> {
    match command.command {
        BookingsSubcommand::Report => report(context, session).await,
        BookingsSubcommand::Status(args) => {
            let booking = context
                .bookings
                .update_status(session, args.uuid, args.status)
                .await
                .map_err(|error| format!("failed to update booking: {error}"))?;

            println!("{}: {}", booking.uuid, booking.status);

            Ok(())
        }
    }
}

async fn report(context: &AppContext, session: &Session) -> Result<(), String> {
    let reports = context
        .bookings
        .reports(session, Timestamp::now())
        .await
        .map_err(|error| format!("failed to load bookings: {error}"))?;

    let mut builder = Builder::default();

    builder.push_record([
        "Booking", "Field", "Start", "End", "Status", "Payment", "Promotion", "Charged",
        "Expected",
    ]);

    for report in &reports {
        push_report(&mut builder, report);
    }

    println!("{}", render(builder, 7..9));

    Ok(())
}

fn push_report(builder: &mut Builder, report: &BookingReport) {
    let booking = &report.booking;

    let expected = match &report.expected {
        ExpectedPrice::Amount(breakdown) => format_amount(&breakdown.final_price),
        ExpectedPrice::Indeterminate(reason) => format!("indeterminate ({reason})"),
    };

    builder.push_record([
        booking.uuid.to_string(),
        report.field_name.clone().unwrap_or_else(|| booking.field.to_string()),
        booking.start_time.clone(),
        booking.end_time.clone(),
        booking.status.to_string(),
        booking.payment_status.to_string(),
        report
            .promotion_code
            .as_ref()
            .map_or_else(String::new, ToString::to_string),
        format_amount(&booking.total),
        expected,
    ]);
}
