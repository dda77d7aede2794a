use clap::{Args, Subcommand};
use pitchside::{
    fields::{Field, FieldStatus},
    money::{format_amount, parse_price},
};
use pitchside_app::{
    context::AppContext, domain::fields::records::FieldRecord, session::Session,
};
use tabled::builder::Builder;

use super::{output::render, resolve_field};

#[derive(Debug, Args)]
pub(crate) struct FieldsCommand {
    #[command(subcommand)]
    command: Option<FieldsSubcommand>,
}

#[derive(Debug, Subcommand)]
enum FieldsSubcommand {
    /// List the fields (the default).
    List,
    /// Add a field.
    Create(CreateArgs),
    /// Change a field's attributes.
    Update(UpdateArgs),
    /// Switch a field between available and unavailable.
    Toggle(FieldArg),
    /// Delete a field.
    Delete(FieldArg),
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[arg(long)]
    name: String,

    /// Price of one hour, e.g. "350 THB"
    #[arg(long)]
    rate: String,

    #[command(flatten)]
    attributes: AttributeArgs,

    /// Create closed for bookings
    #[arg(long)]
    unavailable: bool,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Field id or name
    field: String,

    /// New display name
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    rate: Option<String>,

    #[command(flatten)]
    attributes: AttributeArgs,
}

#[derive(Debug, Args)]
struct AttributeArgs {
    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    location: Option<String>,

    /// Format such as "7v7"
    #[arg(long)]
    size: Option<String>,

    #[arg(long)]
    surface: Option<String>,
}

impl AttributeArgs {
    fn apply(self, field: &mut Field) {
        let pairs = [
            (self.description, &mut field.description),
            (self.location, &mut field.location),
            (self.size, &mut field.size),
            (self.surface, &mut field.surface),
        ];

        for (value, target) in pairs {
            if let Some(value) = value {
                *target = value;
            }
        }
    }
}

#[derive(Debug, Args)]
struct FieldArg {
    /// Field id or name
    field: String,
}

pub(crate) async fn run(
    context: &AppContext,
    session: &Session,
    command: FieldsCommand,
) -> Result<(), String> {
    match command.command.unwrap_or(FieldsSubcommand::List) {
        FieldsSubcommand::List => list(context).await,
        FieldsSubcommand::Create(args) => create(context, session, args).await,
        FieldsSubcommand::Update(args) => update(context, session, args).await,
        FieldsSubcommand::Toggle(args) => {
            let uuid = resolve_field(context, &args.field).await?.uuid;
            let record = context
                .fields
                .toggle_status(session, uuid)
                .await
                .map_err(|error| format!("failed to toggle field: {error}"))?;

            println!("{}: {}", record.field.name, record.field.status);

            Ok(())
        }
        FieldsSubcommand::Delete(args) => {
            let record = resolve_field(context, &args.field).await?;

            context
                .fields
                .delete(session, record.uuid)
                .await
                .map_err(|error| format!("failed to delete field: {error}"))?;

            println!("deleted {} ({})", record.field.name, record.uuid);

            Ok(())
        }
    }
}

async fn list(context: &AppContext) -> Result<(), String> {
    let fields = context
        .fields
        .list()
        .await
        .map_err(|error| format!("failed to list fields: {error}"))?;

    let mut builder = Builder::default();

    builder.push_record(["Field", "Size", "Surface", "Rate / hour", "Status", "Id"]);

    for record in &fields {
        let field = &record.field;

        builder.push_record([
            field.name.clone(),
            field.size.clone(),
            field.surface.clone(),
            format_amount(&field.hourly_rate),
            field.status.to_string(),
            record.uuid.to_string(),
        ]);
    }

    println!("{}", render(builder, 3..4));

    Ok(())
}

async fn create(context: &AppContext, session: &Session, args: CreateArgs) -> Result<(), String> {
    let rate = parse_price(&args.rate).map_err(|error| error.to_string())?;
    let mut field = Field::new(args.name, rate).map_err(|error| error.to_string())?;

    args.attributes.apply(&mut field);

    if args.unavailable {
        field.status = FieldStatus::Unavailable;
    }

    let record = context
        .fields
        .create(session, field)
        .await
        .map_err(|error| format!("failed to create field: {error}"))?;

    println!("field_uuid: {}", record.uuid);
    println!("name: {}", record.field.name);

    Ok(())
}

async fn update(context: &AppContext, session: &Session, args: UpdateArgs) -> Result<(), String> {
    let FieldRecord { uuid, mut field } = resolve_field(context, &args.field).await?;

    if let Some(name) = args.name {
        field.name = name;
    }

    if let Some(rate) = args.rate.as_deref() {
        field.hourly_rate = parse_price(rate).map_err(|error| error.to_string())?;
    }

    args.attributes.apply(&mut field);

    let record = context
        .fields
        .update(session, uuid, field)
        .await
        .map_err(|error| format!("failed to update field: {error}"))?;

    println!("field_uuid: {}", record.uuid);
    println!("rate: {}", format_amount(&record.field.hourly_rate));

    Ok(())
}
