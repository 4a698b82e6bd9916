use clap::{Parser, Subcommand};

use lyris_client::config::{get_configuration, get_environment};
use lyris_client::domain::{
    Demographics, NewRecord, Pagination, RecordState, RecordUpdate, SubscriberEmail,
};
use lyris_client::telemetry::{get_subscriber, init_subscriber};
use lyris_client::LyrisError;

type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "lyris")]
#[command(about = "Add, update and query mailing list records")]
#[command(version = "0.1.0")]
struct Cli {
    /// Mailing list id, defaults to application.default_list_id
    #[arg(long, global = true)]
    list_id: Option<u32>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the record of one subscriber
    Query { email: String },
    /// List the records of a mailing list
    QueryAll {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Add a subscriber to a mailing list
    Add {
        email: String,
        /// Demographic value as ID=VALUE, repeat an id for multiple values
        #[arg(long = "demographic", value_parser = parse_demographic)]
        demographics: Vec<(u32, String)>,
        #[arg(long)]
        proof: bool,
        /// Send the list's welcome message
        #[arg(long)]
        trigger: bool,
        #[arg(long)]
        state: Option<RecordState>,
    },
    /// Update the record of a subscriber
    Update {
        email: String,
        #[arg(long)]
        new_email: Option<String>,
        #[arg(long)]
        state: Option<RecordState>,
        #[arg(long = "demographic", value_parser = parse_demographic)]
        demographics: Vec<(u32, String)>,
    },
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let config = get_configuration()?;

    // Records go to stdout, logs to stderr
    let subscriber = get_subscriber(String::from("lyris"), config.get_log_level(), std::io::stderr);
    init_subscriber(subscriber)?;

    tracing::info!("Application environment = {:?}", get_environment()?);

    let lyris_client = config.get_lyris_client()?;
    let list_id = cli
        .list_id
        .or(config.get_default_list_id())
        .ok_or("A mailing list id is required: pass --list-id or set application.default_list_id")?;

    match cli.command {
        Commands::Query { email } => {
            let record = lyris_client
                .query_record(&parse_email(email)?, list_id)
                .await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::QueryAll { page, per_page } => {
            let records = lyris_client
                .query_records(list_id, Pagination { page, per_page })
                .await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Add {
            email,
            demographics,
            proof,
            trigger,
            state,
        } => {
            let mut new_record = NewRecord::new(parse_email(email)?, list_id)
                .with_demographics(collect_demographics(demographics))
                .with_proof(proof)
                .with_trigger(trigger);
            if let Some(state) = state {
                new_record = new_record.with_state(state);
            }

            let record = lyris_client.add_record(new_record).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Update {
            email,
            new_email,
            state,
            demographics,
        } => {
            let mut update = RecordUpdate::new(parse_email(email)?, list_id)
                .with_demographics(collect_demographics(demographics));
            if let Some(new_email) = new_email {
                update = update.with_new_email(parse_email(new_email)?);
            }
            if let Some(state) = state {
                update = update.with_state(state);
            }

            let record = lyris_client.update_record(update).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

fn parse_email(email: String) -> Result<SubscriberEmail, LyrisError> {
    SubscriberEmail::parse(email).map_err(LyrisError::InvalidEmail)
}

fn parse_demographic(value: &str) -> Result<(u32, String), String> {
    let (id, value) = value
        .split_once('=')
        .ok_or_else(|| format!("{} is not in the ID=VALUE form", value))?;
    let id = id
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("{} is not a valid demographic id", id))?;

    Ok((id, value.to_string()))
}

fn collect_demographics(values: Vec<(u32, String)>) -> Demographics {
    let mut demographics = Demographics::new();
    for (id, value) in values {
        demographics.append(id, value);
    }
    demographics
}
