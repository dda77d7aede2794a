use clap::{Args, Subcommand};
use jiff::Timestamp;
use pitchside::{
    money::parse_price,
    promotions::{PromotionStatus, parse_bound},
};
use pitchside_app::{
    context::AppContext,
    domain::promotions::{
        data::{LookupSource, NewPromotion, PromotionDraft},
        records::{PromotionRecord, PromotionUuid},
    },
    session::Session,
};
use rust_decimal::Decimal;
use tabled::builder::Builder;

use super::output::render;

#[derive(Debug, Args)]
pub(crate) struct PromotionsCommand {
    #[command(subcommand)]
    command: PromotionsSubcommand,
}

#[derive(Debug, Subcommand)]
enum PromotionsSubcommand {
    /// List promotions; every promotion needs --admin.
    List(ListArgs),
    /// Look a promotion up by code.
    Show(ShowArgs),
    /// Create a promotion.
    Create(CreateArgs),
    /// Switch a promotion between active and inactive.
    Toggle(UuidArgs),
    /// Delete a promotion.
    Delete(UuidArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Only promotions usable right now
    #[arg(long)]
    active: bool,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Promotion code, any case
    code: String,
}

#[derive(Debug, Args)]
#[group(id = "discount", multiple = false, args = ["amount", "percentage"])]
struct CreateArgs {
    /// Promotion code
    #[arg(long)]
    code: String,

    #[arg(long)]
    description: Option<String>,

    /// Fixed discount, e.g. "200 THB"
    #[arg(long)]
    amount: Option<String>,

    /// Percentage discount, e.g. 20
    #[arg(long)]
    percentage: Option<Decimal>,

    /// First valid day or instant
    #[arg(long)]
    from: String,

    /// Last valid day or instant
    #[arg(long)]
    until: String,

    /// Create switched off
    #[arg(long)]
    inactive: bool,
}

#[derive(Debug, Args)]
struct UuidArgs {
    uuid: PromotionUuid,
}

pub(crate) async fn run(
    context: &AppContext,
    session: &Session,
    command: PromotionsCommand,
) -> Result<(), String> {
    match command.command {
        PromotionsSubcommand::List(args) => list(context, session, &args).await,
        PromotionsSubcommand::Show(args) => show(context, &args).await,
        PromotionsSubcommand::Create(args) => create(context, session, args).await,
        PromotionsSubcommand::Toggle(args) => {
            let record = context
                .promotions
                .toggle_status(session, args.uuid)
                .await
                .map_err(|error| format!("failed to toggle promotion: {error}"))?;

            println!("{}: {}", record.promotion.code(), record.promotion.status());

            Ok(())
        }
        PromotionsSubcommand::Delete(args) => {
            context
                .promotions
                .delete(session, args.uuid)
                .await
                .map_err(|error| format!("failed to delete promotion: {error}"))?;

            println!("deleted {}", args.uuid);

            Ok(())
        }
    }
}

async fn list(context: &AppContext, session: &Session, args: &ListArgs) -> Result<(), String> {
    let records = if args.active {
        context.promotions.list_active(Timestamp::now()).await
    } else {
        context.promotions.list(session).await
    }
    .map_err(|error| format!("failed to list promotions: {error}"))?;

    let mut builder = Builder::default();

    builder.push_record(["Code", "Discount", "Valid from", "Valid until", "Status", "Id"]);

    for record in &records {
        push_promotion(&mut builder, record);
    }

    println!("{}", render(builder, 0..0));

    Ok(())
}

fn push_promotion(builder: &mut Builder, record: &PromotionRecord) {
    let promotion = &record.promotion;

    builder.push_record([
        promotion.code().to_string(),
        promotion.display_text(),
        promotion.window().valid_from().to_string(),
        promotion.window().valid_until().to_string(),
        promotion.status().to_string(),
        record.uuid.to_string(),
    ]);
}

async fn show(context: &AppContext, args: &ShowArgs) -> Result<(), String> {
    let lookup = context
        .promotions
        .search_by_code(&args.code)
        .await
        .map_err(|error| format!("failed to look up promotion: {error}"))?;

    let promotion = &lookup.promotion;

    println!("code: {}", promotion.code());

    if let Some(uuid) = lookup.uuid {
        println!("uuid: {uuid}");
    }

    if let Some(description) = promotion.description() {
        println!("description: {description}");
    }

    println!("discount: {}", promotion.display_text());
    println!("valid_from: {}", promotion.window().valid_from());
    println!("valid_until: {}", promotion.window().valid_until());
    println!("status: {}", promotion.status());
    println!("usable_now: {}", promotion.is_valid(Timestamp::now()));

    if lookup.source == LookupSource::Fallback {
        println!("source: offline sample");
    }

    Ok(())
}

async fn create(context: &AppContext, session: &Session, args: CreateArgs) -> Result<(), String> {
    let discount_amount = args
        .amount
        .as_deref()
        .map(parse_price)
        .transpose()
        .map_err(|error| error.to_string())?;

    let draft = PromotionDraft {
        code: args.code,
        description: args.description,
        discount_amount,
        discount_percentage: args.percentage,
        valid_from: parse_bound(&args.from).map_err(|error| error.to_string())?,
        valid_until: parse_bound(&args.until).map_err(|error| error.to_string())?,
        status: if args.inactive {
            PromotionStatus::Inactive
        } else {
            PromotionStatus::Active
        },
    };

    let promotion = draft.build().map_err(|error| error.to_string())?;

    let record = context
        .promotions
        .create(
            session,
            NewPromotion {
                uuid: PromotionUuid::new(),
                promotion,
            },
        )
        .await
        .map_err(|error| format!("failed to create promotion: {error}"))?;

    println!("promotion_uuid: {}", record.uuid);
    println!("code: {}", record.promotion.code());

    Ok(())
}
