//! Bazaar Application CLI

use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use bazaar_app::{
    config,
    context::AppContext,
    domain::{
        users::models::UserUuid,
        vendor_requests::{
            VendorRequestsService,
            data::NewVendorRequest,
            models::{Decision, VendorDocument, VendorProfile, VendorRequestUuid},
        },
    },
};

#[derive(Debug, Parser)]
#[command(name = "bazaar-app", about = "Bazaar CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    VendorRequest(VendorRequestCommand),
}

#[derive(Debug, Args)]
struct VendorRequestCommand {
    #[command(subcommand)]
    command: VendorRequestSubcommand,
}

#[derive(Debug, Subcommand)]
enum VendorRequestSubcommand {
    /// File a vendor application for a user
    Submit(SubmitArgs),
    /// Show the moderation queue
    List(ListArgs),
    /// Approve a pending application
    Approve(DecisionArgs),
    /// Reject a pending application
    Reject(DecisionArgs),
}

#[derive(Debug, Args)]
struct SubmitArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Applying user's UUID
    #[arg(long)]
    user: Uuid,

    #[arg(long)]
    store_name: String,

    #[arg(long)]
    store_description: String,

    #[arg(long)]
    business_type: String,

    #[arg(long)]
    registration_number: String,

    #[arg(long)]
    tax_id: String,

    /// Supporting document as kind=url; repeatable
    #[arg(long = "document")]
    documents: Vec<String>,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[derive(Debug, Args)]
struct DecisionArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Vendor request UUID
    #[arg(long)]
    request: Uuid,

    /// Moderator's user UUID
    #[arg(long)]
    actor: Uuid,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::VendorRequest(VendorRequestCommand { command }) => match command {
            VendorRequestSubcommand::Submit(args) => submit(args).await,
            VendorRequestSubcommand::List(args) => list(args).await,
            VendorRequestSubcommand::Approve(args) => transition(args, Decision::Approve).await,
            VendorRequestSubcommand::Reject(args) => transition(args, Decision::Reject).await,
        },
    }
}

async fn context(database_url: &str) -> Result<AppContext, String> {
    let pricing = config::pricing_policy_from_env()
        .map_err(|error| format!("invalid pricing configuration: {error}"))?;

    AppContext::from_database_url(database_url, pricing)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}

async fn submit(args: SubmitArgs) -> Result<(), String> {
    let ctx = context(&args.database_url).await?;

    let documents = args
        .documents
        .iter()
        .map(|raw| parse_document(raw))
        .collect::<Result<Vec<_>, String>>()?;

    let request = ctx
        .vendor_requests
        .submit(NewVendorRequest {
            uuid: VendorRequestUuid::new(),
            user_uuid: UserUuid::from_uuid(args.user),
            profile: VendorProfile {
                store_name: args.store_name,
                store_description: args.store_description,
                business_type: args.business_type,
                registration_number: args.registration_number,
                tax_id: args.tax_id,
            },
            documents,
        })
        .await
        .map_err(|error| format!("failed to submit vendor request: {error}"))?;

    println!("request_uuid: {}", request.uuid);
    println!("status: {}", request.status.as_str());

    Ok(())
}

async fn list(args: ListArgs) -> Result<(), String> {
    let ctx = context(&args.database_url).await?;

    let pending = ctx
        .vendor_requests
        .list_pending()
        .await
        .map_err(|error| format!("failed to list vendor requests: {error}"))?;

    if pending.is_empty() {
        println!("no pending vendor requests");
        return Ok(());
    }

    for request in pending {
        println!(
            "{}  {}  {}",
            request.uuid, request.user_uuid, request.profile.store_name
        );
    }

    Ok(())
}

async fn transition(args: DecisionArgs, decision: Decision) -> Result<(), String> {
    let ctx = context(&args.database_url).await?;

    let processed = ctx
        .vendor_requests
        .transition(
            VendorRequestUuid::from_uuid(args.request),
            decision,
            UserUuid::from_uuid(args.actor),
        )
        .await
        .map_err(|error| format!("failed to process vendor request: {error}"))?;

    println!("request_uuid: {}", processed.uuid);
    println!("status: {}", processed.status.as_str());

    Ok(())
}

fn parse_document(raw: &str) -> Result<VendorDocument, String> {
    raw.split_once('=')
        .map(|(kind, url)| VendorDocument {
            kind: kind.to_string(),
            url: url.to_string(),
        })
        .ok_or_else(|| format!("invalid document '{raw}', expected kind=url"))
}
