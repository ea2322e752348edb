mod ingest;
mod insights;
mod score;
mod services;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use partneros_core::{FeedbackTag, InsightStatus};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "partneros")]
#[command(about = "PartnerOS signal scoring command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Fetch partner feeds and turn new items into scored insights
    Ingest {
        /// Only ingest partners owned by this user
        #[arg(long)]
        user: Option<Uuid>,
        /// Backfill window: skip items published more than this many days ago
        #[arg(long)]
        days: Option<u32>,
        /// Maximum number of partners to process (defaults to config)
        #[arg(long)]
        limit: Option<usize>,
        /// Preview which partners would be ingested without fetching feeds
        #[arg(long)]
        dry_run: bool,
    },
    /// Score a single item against an objectives file without touching the database
    Score {
        /// Objectives YAML file
        #[arg(long)]
        objectives: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        /// File containing the item body
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// RFC 3339 publication timestamp
        #[arg(long)]
        published_at: Option<DateTime<Utc>>,
    },
    /// Record feedback on an insight
    Feedback {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        insight: Uuid,
        /// One of `thumbs_up`, `thumbs_down`, `na`
        #[arg(long)]
        tag: FeedbackTag,
    },
    /// Move insights forward in the approval workflow
    Approve {
        #[arg(long)]
        user: Uuid,
        /// One of `ready_to_send`, `approved`, `sent`
        #[arg(long, default_value = "approved")]
        status: InsightStatus,
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
    /// Show a user's top-ranked insights
    Digest {
        #[arg(long)]
        user: Uuid,
        #[arg(long, default_value_t = partneros_insights::DEFAULT_DIGEST_LIMIT)]
        limit: usize,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Apply pending migrations
    Migrate,
    /// Check database connectivity
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = partneros_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("partneros: no command given; see --help");
        return Ok(());
    };

    match command {
        Commands::Score {
            objectives,
            title,
            url,
            content_file,
            published_at,
        } => {
            score::run_score(
                &config,
                &objectives,
                title,
                url,
                content_file.as_deref(),
                published_at,
            )
            .await?;
        }
        Commands::Db { command } => {
            let pool = partneros_db::connect_pool_from_config(&config).await?;
            match command {
                DbCommands::Migrate => {
                    let applied = partneros_db::run_migrations(&pool).await?;
                    println!("applied {applied} migrations");
                }
                DbCommands::Ping => {
                    partneros_db::ping(&pool).await?;
                    println!("database is reachable");
                }
            }
        }
        Commands::Ingest {
            user,
            days,
            limit,
            dry_run,
        } => {
            let pool = partneros_db::connect_pool_from_config(&config).await?;
            ingest::run_ingest(&pool, &config, user, days, limit, dry_run).await?;
        }
        Commands::Feedback { user, insight, tag } => {
            let pool = partneros_db::connect_pool_from_config(&config).await?;
            insights::run_feedback(&pool, user, insight, tag).await?;
        }
        Commands::Approve { user, status, ids } => {
            let pool = partneros_db::connect_pool_from_config(&config).await?;
            insights::run_approve(&pool, user, status, &ids).await?;
        }
        Commands::Digest { user, limit, json } => {
            let pool = partneros_db::connect_pool_from_config(&config).await?;
            insights::run_digest(&pool, user, limit, json).await?;
        }
    }

    Ok(())
}
