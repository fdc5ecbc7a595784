//! Command-line client for unlock progress and chat history.

use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;
use tourguide::TourGuide;
use tourguide::config::{LayeredConfigOptions, TourGuideConfig};
use tourguide::core::{ChatSession, SessionSummary};

/// Command-line options for the tour guide client.
#[derive(Parser)]
#[command(name = "tourguide", version)]
struct Cli {
    /// Extra tourguide.json5 applied on top of the user and cwd layers
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show unlock progress across the campus catalogue
    Progress {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a building as unlocked
    Unlock { building: String },
    /// Forget all unlock progress
    Reset,
    /// Inspect or remove past chats
    Sessions {
        #[command(subcommand)]
        command: SessionsCommand,
    },
    /// Send a message to the tour guide
    Chat {
        /// Continue an existing session instead of starting a new one
        #[arg(long)]
        session: Option<String>,
        /// Building the conversation is about; unlocks it as a scan would
        #[arg(long)]
        building: Option<String>,
        /// Photo the conversation starts from
        #[arg(long)]
        image: Option<String>,
        text: String,
    },
}

#[derive(Subcommand)]
enum SessionsCommand {
    /// List past chats, most recent first
    List,
    /// Print every message of a chat
    Show { id: String },
    /// Delete one chat
    Delete { id: String },
    /// Delete every chat
    Clear,
}

const DEFAULT_BUILDING: &str = "campus";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let mut options = LayeredConfigOptions::new(&cwd);
    if let Some(path) = cli.config {
        options = options.with_runtime_path(path);
    }
    let layered = TourGuideConfig::load_layered_with_options(options)
        .context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());

    let guide = TourGuide::open(layered.config)
        .await
        .context("failed to open storage")?;

    match cli.command {
        Command::Progress { json } => print_progress(&guide, json)?,
        Command::Unlock { building } => {
            if guide.progress().unlock_building(&building).await {
                println!("Unlocked {building}");
            } else if guide.progress().is_unlocked(&building) {
                println!("{building} is already unlocked");
            } else {
                bail!("could not unlock {building}");
            }
        }
        Command::Reset => {
            guide
                .progress()
                .clear_storage()
                .await
                .context("failed to reset progress")?;
            println!("Progress reset");
        }
        Command::Sessions { command } => run_sessions(&guide, command).await?,
        Command::Chat {
            session,
            building,
            image,
            text,
        } => {
            if let Some(building) = building.as_deref() {
                guide.progress().unlock_building(building).await;
            }
            let subject = building.as_deref().unwrap_or(DEFAULT_BUILDING);
            let mut conversation = match session {
                Some(id) => guide
                    .resume_conversation(&id, subject, image)
                    .await
                    .with_context(|| format!("failed to load session {id}"))?,
                None => guide.start_conversation(subject, image).await,
            };
            info!("chatting (session_id={})", conversation.session().id);
            let reply = conversation
                .send(&text)
                .await
                .context("tour guide did not reply")?;
            match reply {
                Some(message) => println!("{}", message.text),
                None => bail!("message is empty"),
            }
            println!("(session {})", conversation.session().id);
        }
    }
    Ok(())
}

fn print_progress(guide: &TourGuide, json: bool) -> anyhow::Result<()> {
    let summary = guide.progress_summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!(
        "Unlocked {} of {} buildings ({:.0}%)",
        summary.unlocked, summary.total, summary.percentage
    );
    for building in &guide.config().campus.buildings {
        let mark = if guide.progress().is_unlocked(building) {
            "x"
        } else {
            " "
        };
        println!("  [{mark}] {building}");
    }
    Ok(())
}

async fn run_sessions(guide: &TourGuide, command: SessionsCommand) -> anyhow::Result<()> {
    match command {
        SessionsCommand::List => {
            let summaries = guide
                .session_summaries()
                .await
                .context("failed to list sessions")?;
            if summaries.is_empty() {
                println!("No past chats");
            }
            let now = Utc::now();
            for summary in &summaries {
                print_summary(summary, now);
            }
        }
        SessionsCommand::Show { id } => {
            let Some(session) = guide
                .progress()
                .get_chat_session(&id)
                .await
                .with_context(|| format!("failed to load session {id}"))?
            else {
                bail!("no session named {id}");
            };
            print_session(&session);
        }
        SessionsCommand::Delete { id } => {
            guide
                .progress()
                .delete_chat_session(&id)
                .await
                .with_context(|| format!("failed to delete session {id}"))?;
            println!("Deleted {id}");
        }
        SessionsCommand::Clear => {
            guide
                .progress()
                .clear_all_chat_sessions()
                .await
                .context("failed to clear sessions")?;
            println!("All chats deleted");
        }
    }
    Ok(())
}

fn print_summary(summary: &SessionSummary, now: chrono::DateTime<Utc>) {
    println!(
        "{}  {} ({}, {})",
        summary.id,
        summary.title,
        summary.count_label(),
        summary.updated_label(now)
    );
    println!("    {}", summary.preview);
}

fn print_session(session: &ChatSession) {
    if let Some(uri) = &session.image_uri {
        println!("image: {uri}");
    }
    for message in &session.messages {
        let speaker = if message.is_user { "you" } else { "guide" };
        println!(
            "[{}] {speaker}: {}",
            message.timestamp.format("%H:%M"),
            message.text
        );
    }
}
