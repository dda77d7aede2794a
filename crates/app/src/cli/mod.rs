use clap::{Args, Parser, Subcommand};
use pitchside_app::{
    config::AppConfig,
    context::AppContext,
    domain::fields::records::{FieldRecord, FieldUuid},
    session::{Session, UserUuid},
};

mod bookings;
mod expected_price;
mod fields;
mod output;
mod promotions;
mod quote;
mod slots;

#[derive(Debug, Parser)]
#[command(name = "pitchside", about = "Pitchside booking prices and promotions", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(flatten)]
    session: SessionArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Who is running the command.
#[derive(Debug, Args)]
struct SessionArgs {
    /// Signed-in user id
    #[arg(long, env = "PITCHSIDE_USER", global = true)]
    user: Option<UserUuid>,

    /// Act as an administrator (requires --user)
    #[arg(long, global = true, requires = "user")]
    admin: bool,
}

impl SessionArgs {
    fn session(&self) -> Session {
        match (self.user, self.admin) {
            (Some(user), true) => Session::admin(user),
            (Some(user), false) => Session::customer(user),
            (None, _) => Session::guest(),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List and manage fields.
    Fields(fields::FieldsCommand),
    /// Show free and booked slots of a field on a date.
    Slots(slots::SlotsArgs),
    /// Price a slot selection.
    Quote(quote::QuoteArgs),
    /// Price and book a slot selection.
    Book(quote::QuoteArgs),
    /// Price a booking interval at an hourly rate.
    ExpectedPrice(expected_price::ExpectedPriceArgs),
    /// Look up and manage promotions.
    Promotions(promotions::PromotionsCommand),
    /// Review and update bookings.
    Bookings(bookings::BookingsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let context = AppContext::from_config(&self.config)
            .map_err(|error| format!("failed to start: {error}"))?;
        let session = self.session.session();

        match self.command {
            Commands::Fields(command) => fields::run(&context, &session, command).await,
            Commands::Slots(args) => slots::run(&context, args).await,
            Commands::Quote(args) => quote::run(&context, &session, args, false).await,
            Commands::Book(args) => quote::run(&context, &session, args, true).await,
            Commands::ExpectedPrice(args) => expected_price::run(&context, args).await,
            Commands::Promotions(command) => promotions::run(&context, &session, command).await,
            Commands::Bookings(command) => bookings::run(&context, &session, command).await,
        }
    }
}

/// Find a field by id or by name, ignoring case.
async fn resolve_field(context: &AppContext, raw: &str) -> Result<FieldRecord, String> {
    let fields = context
        .fields
        .list()
        .await
        .map_err(|error| format!("failed to load fields: {error}"))?;

    let uuid = raw.parse::<FieldUuid>().ok();

    fields
        .into_iter()
        .find(|record| {
            Some(record.uuid) == uuid || record.field.name.eq_ignore_ascii_case(raw.trim())
        })
        .ok_or_else(|| format!("unknown field: {raw}"))
}
