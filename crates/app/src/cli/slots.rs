use clap::Args;
use jiff::civil::Date;
use pitchside_app::context::AppContext;
use tabled::builder::Builder;

use super::{output::render, resolve_field};

#[derive(Debug, Args)]
pub(crate) struct SlotsArgs {
    /// Field name or id
    #[arg(long)]
    field: String,

    /// Date, e.g. 2025-06-01
    #[arg(long)]
    date: Date,
}

pub(crate) async fn run(context: &AppContext, args: SlotsArgs) -> Result<(), String> {
    let field = resolve_field(context, &args.field).await?;

    let slots = context
        .bookings
        .available_slots(field.uuid, args.date)
        .await
        .map_err(|error| format!("failed to load slots: {error}"))?;

    let mut builder = Builder::default();

    builder.push_record(["Slot", "Status"]);

    for availability in &slots {
        builder.push_record([
            availability.slot.label(),
            if availability.booked { "booked" } else { "free" }.to_string(),
        ]);
    }

    println!("{} on {}", field.field.name, args.date);
    println!("{}", render(builder, 0..0));

    Ok(())
}
