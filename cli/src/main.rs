//! CLI entrypoint for planning-poker
//!
//! Thin transport: each subcommand maps 1:1 onto one exposed operation of
//! the estimation core, plus `init` to lay down the session fixtures.

mod render;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use poker_application::{GameError, GameUseCase};
use poker_domain::{
    Backlog, BacklogItem, Card, PlayMode, Player, PlayerId, Roster, SecondaryRule, SessionConfig,
    SessionId,
};
use poker_infrastructure::{ConfigLoader, JsonFileStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "planning-poker", version)]
#[command(about = "Collaborative story estimation with unanimity-first consensus")]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Explicit config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Set up a session: configuration, roster and backlog
    Init {
        #[arg(long)]
        sid: String,
        /// Project name shown on the board
        #[arg(long)]
        project: Option<String>,
        /// Secondary rule: average | median | absolute_majority | relative_majority
        #[arg(long, default_value = "median")]
        rule: String,
        /// Play mode: remote | local
        #[arg(long, default_value = "remote")]
        mode: String,
        /// Player as "id:name" or just a name (repeatable)
        #[arg(long = "player", required = true)]
        players: Vec<String>,
        /// Backlog item as "title" or "title:description" (repeatable)
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
    /// Cast (or correct) a vote for the current round
    Vote {
        #[arg(long)]
        sid: String,
        #[arg(long)]
        player: String,
        /// A deck card: 0 1 2 3 5 8 13 20 40 100 or ☕/coffee
        #[arg(long)]
        card: String,
    },
    /// Reveal the round's votes to the whole table
    Reveal {
        #[arg(long)]
        sid: String,
    },
    /// Score the revealed round: advance on consensus, re-vote otherwise
    Next {
        #[arg(long)]
        sid: String,
    },
    /// Start a coffee break (votes in flight are kept)
    Coffee {
        #[arg(long)]
        sid: String,
        /// Break length; defaults to the configured pause_minutes
        #[arg(long)]
        minutes: Option<i64>,
    },
    /// Show the session board (safe to poll)
    State {
        #[arg(long)]
        sid: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let file_config = ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow!("could not load configuration: {e}"))?;

    let store = Arc::new(
        JsonFileStore::new(&file_config.data_dir)
            .map_err(|e| anyhow!("could not open session store: {e}"))?,
    );
    let game = GameUseCase::new(Arc::clone(&store), Arc::clone(&store));

    match cli.command {
        Command::Init {
            sid,
            project,
            rule,
            mode,
            players,
            items,
        } => {
            let sid = parse_sid(&sid)?;
            let rule: SecondaryRule = rule.parse().map_err(|e: String| anyhow!(e))?;
            let mode: PlayMode = mode.parse().map_err(|e: String| anyhow!(e))?;

            let mut config = SessionConfig::new(rule).with_play_mode(mode);
            if let Some(project) = project {
                config = config.with_project_name(project);
            }

            let roster = Roster::new(players.iter().map(|p| parse_player(p)).collect());
            let backlog = Backlog::new(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| parse_item(i, item))
                    .collect(),
            );

            store.write_config(&sid, &config).await?;
            store.write_roster(&sid, &roster).await?;
            store.write_backlog(&sid, &backlog).await?;

            info!(session = %sid, players = roster.len(), items = backlog.len(), "session created");
            println!(
                "Session {sid} ready: {} players, {} items, rule {}",
                roster.len(),
                backlog.len(),
                config.secondary_rule
            );
        }

        Command::Vote { sid, player, card } => {
            let sid = parse_sid(&sid)?;
            let card: Card = card.parse()?;
            let state = game
                .submit_vote(&sid, PlayerId::new(player), card)
                .await
                .map_err(report)?;
            println!("Vote recorded: {card}");
            print_board(&store, &sid, &state).await?;
        }

        Command::Reveal { sid } => {
            let sid = parse_sid(&sid)?;
            let state = game.reveal(&sid).await.map_err(report)?;
            print_board(&store, &sid, &state).await?;
        }

        Command::Next { sid } => {
            let sid = parse_sid(&sid)?;
            let result = game.advance(&sid).await.map_err(report)?;
            println!("{}", result.message);
            print_board(&store, &sid, &result.state).await?;
        }

        Command::Coffee { sid, minutes } => {
            let sid = parse_sid(&sid)?;
            let minutes = minutes.unwrap_or(file_config.pause_minutes);
            let brk = game.coffee_break(&sid, minutes).await.map_err(report)?;
            match brk.end {
                Some(end) => println!("Coffee break until {}", end.format("%H:%M:%S")),
                None => println!("Coffee break started"),
            }
        }

        Command::State { sid } => {
            let sid = parse_sid(&sid)?;
            let state = game.state(&sid).await.map_err(report)?;
            print_board(&store, &sid, &state).await?;
        }
    }

    Ok(())
}

fn parse_sid(raw: &str) -> Result<SessionId> {
    SessionId::parse(raw).context("session ids are 6-40 chars of [A-Za-z0-9_-]")
}

/// "id:name" or a bare name doubling as its own id.
fn parse_player(raw: &str) -> Player {
    match raw.split_once(':') {
        Some((id, name)) => Player::new(id.trim(), name.trim()),
        None => Player::new(raw.trim(), raw.trim()),
    }
}

/// "title" or "title:description"; ids are positional.
fn parse_item(index: usize, raw: &str) -> BacklogItem {
    let id = format!("i{}", index + 1);
    match raw.split_once(':') {
        Some((title, description)) => {
            BacklogItem::new(id, title.trim()).with_description(description.trim())
        }
        None => BacklogItem::new(id, raw.trim()),
    }
}

/// Keep the machine-readable kind visible next to the message.
fn report(err: GameError) -> anyhow::Error {
    anyhow!("[{}] {err}", err.code())
}

async fn print_board(
    store: &JsonFileStore,
    sid: &SessionId,
    state: &poker_domain::GameState,
) -> Result<()> {
    use poker_application::SessionDirectory;

    let config = store.config(sid).await?;
    let roster = store.roster(sid).await?;
    let backlog = store.backlog(sid).await?;
    print!("{}", render::board(&config, &roster, &backlog, state));
    Ok(())
}
