//! Thankwall CLI
//!
//! Command-line front-end for the community thank-you board:
//! - Show the feed
//! - Post a note
//! - Like a note
//! - Browse interactively with infinite scroll
//! - Generate a config file

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use thankwall::board::{
    Board, BoardView, LikeOutcome, LocationChoice, SubmissionForm, SubmitOutcome,
};
use thankwall::config::{generate_default_config, Config};
use thankwall::feed::{Debouncer, ScrollPosition, StoreMode};
use thankwall::note::{is_sample_id, Filter};
use thankwall::prefs::{FileKeyValueStore, PreferenceStore};
use thankwall::store::{DocumentStore, FirestoreStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "thankwall")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Community board for sharing thank-you notes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the feed
    Feed {
        /// Category filter: all, help, "lost and found", kindness
        #[arg(short, long, default_value = "all")]
        filter: Filter,
        /// Viewport width in pixels (default from config)
        #[arg(short, long)]
        width: Option<u32>,
        /// Print cards as JSON
        #[arg(long)]
        json: bool,
    },

    /// Post a thank-you note
    Post {
        /// The message
        message: String,
        /// Your name (default: Anonymous)
        #[arg(short, long)]
        name: Option<String>,
        /// One of the listed locations
        #[arg(short, long, conflicts_with = "other_location")]
        location: Option<String>,
        /// Free-text location
        #[arg(long)]
        other_location: Option<String>,
    },

    /// Like a note on the first page of the feed
    Like {
        /// Note id
        id: String,
    },

    /// Browse the feed interactively
    Browse {
        #[arg(short, long, default_value = "all")]
        filter: Filter,
    },

    /// Turn the remote store override on or off
    Remote {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_tracing(&config);

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let prefs = PreferenceStore::new(
        Arc::new(FileKeyValueStore::open(&config.preferences.path)),
        config.preferences.max_liked,
    );

    if let Commands::Remote { enabled } = &cli.command {
        prefs
            .set_use_remote_override(*enabled)
            .context("saving remote store override")?;
        println!(
            "Remote store override {}",
            if *enabled { "enabled" } else { "disabled" }
        );
        return Ok(());
    }

    let mode = StoreMode::resolve(&config.store, &prefs);
    let store = build_store(&config, mode);
    let mut board = Board::new(&config, store, prefs, mode);

    match cli.command {
        Commands::Feed {
            filter,
            width,
            json,
        } => {
            if let Some(width) = width {
                board.set_viewport_width(width);
            }
            board.select_filter(filter).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&board.view().cards)?);
            } else {
                print_view(board.view());
            }
        }

        Commands::Post {
            message,
            name,
            location,
            other_location,
        } => {
            let location = match (location, other_location) {
                (_, Some(custom)) => LocationChoice::Other(custom),
                (Some(preset), None) => LocationChoice::Preset(preset),
                (None, None) => LocationChoice::Unset,
            };

            board.open_dialog();
            *board.form_mut() = SubmissionForm {
                message,
                name: name.unwrap_or_default(),
                location,
            };

            match board.submit().await? {
                SubmitOutcome::Simulated => {
                    println!("Local mode: submission simulated, nothing was stored.")
                }
                SubmitOutcome::Posted(note) => {
                    println!("Posted {} [{}]", note.id, note.category)
                }
                SubmitOutcome::Preview { note, alert } => {
                    eprintln!("{}", alert);
                    println!("Preview only (not saved): [{}] {}", note.category, note.message);
                    std::process::exit(1);
                }
            }
        }

        Commands::Like { id } => {
            board.load_feed().await;

            match board.like(&id).await {
                LikeOutcome::Liked => println!("Liked {}", id),
                LikeOutcome::LikedLocally => {
                    let kind = if is_sample_id(&id) { "sample" } else { "preview" };
                    println!("Liked {} ({} note, recorded locally)", id, kind);
                }
                LikeOutcome::AlreadyLiked => println!("You already liked {}", id),
                LikeOutcome::Failed(e) => {
                    eprintln!("Could not like {}: {}", id, e);
                    std::process::exit(1);
                }
                LikeOutcome::UnknownNote => {
                    eprintln!("No note {} on the first page of the feed", id);
                    std::process::exit(1);
                }
            }
        }

        Commands::Browse { filter } => {
            browse(board, filter, config.feed.debounce()).await?;
        }

        Commands::Remote { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("thankwall={}", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_store(config: &Config, mode: StoreMode) -> Option<Arc<dyn DocumentStore>> {
    if mode == StoreMode::Local {
        return None;
    }

    match FirestoreStore::new(config.store.firestore()) {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            tracing::warn!(error = %e, "Document store not configured");
            None
        }
    }
}

const BROWSE_HELP: &str = "Commands: more | filter <all|help|lost and found|kindness> | like <id> | post <message> | width <px> | dismiss | help | quit";

async fn browse(board: Board, filter: Filter, debounce: std::time::Duration) -> anyhow::Result<()> {
    let board = Arc::new(Mutex::new(board));
    let mut scroll = Debouncer::new(debounce);
    let mut resize = Debouncer::new(debounce);

    {
        let mut board = board.lock().await;
        board.select_filter(filter).await;
        print_view(board.view());
    }
    println!("{}", BROWSE_HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => println!("{}", BROWSE_HELP),
            "more" => {
                let board = Arc::clone(&board);
                scroll.trigger(async move {
                    let mut board = board.lock().await;
                    let appended = board.on_scroll(ScrollPosition::at_bottom(0)).await;
                    if appended == 0 {
                        println!("No more notes.");
                    } else {
                        print_view(board.view());
                    }
                });
            }
            "width" => match arg.parse::<u32>() {
                Ok(width) => {
                    let board = Arc::clone(&board);
                    resize.trigger(async move {
                        let mut board = board.lock().await;
                        if board.set_viewport_width(width) {
                            board.load_feed().await;
                            print_view(board.view());
                        }
                    });
                }
                Err(_) => println!("Width must be a number of pixels"),
            },
            "filter" => match arg.parse::<Filter>() {
                Ok(filter) => {
                    let mut board = board.lock().await;
                    board.select_filter(filter).await;
                    print_view(board.view());
                }
                Err(e) => println!("{}", e),
            },
            "like" => {
                let mut board = board.lock().await;
                match board.like(arg).await {
                    LikeOutcome::Failed(e) => println!("Could not like {}: {}", arg, e),
                    LikeOutcome::UnknownNote => println!("No note {} on the board", arg),
                    LikeOutcome::AlreadyLiked => println!("Already liked"),
                    LikeOutcome::Liked | LikeOutcome::LikedLocally => print_view(board.view()),
                }
            }
            "post" => {
                let mut board = board.lock().await;
                board.open_dialog();
                board.form_mut().message = arg.to_string();
                match board.submit().await {
                    Ok(_) => print_view(board.view()),
                    Err(e) => {
                        board.close_dialog();
                        println!("{}", e);
                    }
                }
            }
            "dismiss" => board.lock().await.dismiss_notice(),
            other => println!("Unknown command '{}'. {}", other, BROWSE_HELP),
        }
    }

    Ok(())
}

fn print_view(view: &BoardView) {
    if let Some(banner) = &view.banner {
        println!("{}", banner);
        println!();
    }

    if let Some(notice) = view.active_notice(std::time::Instant::now()) {
        println!(">> {}", notice.text);
        println!();
    }

    if let Some(message) = &view.feed_message {
        println!("{}", message);
        return;
    }

    for card in &view.cards {
        let badge = if card.featured { " ★" } else { "" };
        println!("[{}] {}{}", card.category, card.id, badge);
        println!("  \"{}\"", card.message);

        let mut meta = vec![card.name.clone()];
        if let Some(location) = &card.location {
            meta.push(location.clone());
        }
        meta.push(card.age.clone());
        let liked = if card.is_likeable() { "" } else { " (liked)" };
        println!("  {} | ♥ {}{}", meta.join(" · "), card.likes, liked);
        println!();
    }
}
