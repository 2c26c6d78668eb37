//! sigil-cli — Command-line interface to the Sigil practice tracker.
//!
//! Records rituals and sessions, manages the talisman wallet and grid
//! charge, and queries power ratings, profile, and leaderboard. Also embeds
//! the reference progression server for local development.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use sigil_client::{ClientConfig, PracticeClient};
use sigil_core::constants::{DEFAULT_RITUAL_XP, HEATMAP_DEFAULT_DAYS, LEADERBOARD_SIZE};
use sigil_core::level;
use sigil_core::power;
use sigil_core::types::{Element, TalismanDraft};
use sigil_sync::server::InMemoryProgressionServer;

/// Sigil practice tracker CLI.
#[derive(Parser)]
#[command(name = "sigil-cli")]
#[command(version, about = "Practice, progress, empower.")]
struct Cli {
    /// Data directory for local state (default: platform data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Remote progression endpoint, e.g. http://127.0.0.1:9944.
    #[arg(long, global = true)]
    remote: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a completed ritual.
    Ritual(RitualArgs),
    /// Record a meditation session.
    Session(SessionArgs),
    /// Talisman wallet subcommands.
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },
    /// Grid charge subcommands.
    Grid {
        #[command(subcommand)]
        action: GridAction,
    },
    /// Compute a power rating from sub-scores.
    Power(PowerArgs),
    /// Show the remote profile.
    Profile,
    /// Set the display name on the remote profile.
    Name { name: String },
    /// Show the leaderboard.
    Leaderboard {
        /// Maximum entries to show.
        #[arg(short, long, default_value_t = LEADERBOARD_SIZE)]
        limit: usize,
    },
    /// Show the consistency heatmap.
    Heatmap {
        /// Window length in days, ending today.
        #[arg(short, long, default_value_t = HEATMAP_DEFAULT_DAYS)]
        days: u32,
    },
    /// Run the reference progression server (local development).
    Serve {
        /// Bind address.
        #[arg(long, default_value = "127.0.0.1:9944")]
        bind: String,
    },
}

#[derive(Args)]
struct RitualArgs {
    /// Elements the ritual is tagged with (comma-separated:
    /// fire, air, water, earth, spirit).
    #[arg(short, long, value_delimiter = ',', required = true)]
    elements: Vec<String>,

    /// Experience to grant.
    #[arg(short, long, default_value_t = DEFAULT_RITUAL_XP)]
    xp: u64,
}

#[derive(Args)]
struct SessionArgs {
    /// Session length in minutes.
    minutes: u64,
}

#[derive(Subcommand)]
enum WalletAction {
    /// Save a new talisman.
    Save(TalismanArgs),
    /// List saved talismans.
    List,
    /// Remove a talisman by id.
    Remove { id: String },
    /// Toggle the active talisman.
    Activate { id: String },
    /// Consecrate a new master talisman (becomes active).
    Master(TalismanArgs),
    /// Complete the onboarding seal.
    Seal,
}

#[derive(Args)]
struct TalismanArgs {
    /// Talisman name.
    name: String,

    /// Component glyphs (comma-separated).
    #[arg(short, long, value_delimiter = ',')]
    symbols: Vec<String>,

    /// Keywords (comma-separated).
    #[arg(short, long, value_delimiter = ',')]
    keywords: Vec<String>,

    /// Intention statement.
    #[arg(short, long)]
    intention: Option<String>,

    /// Dignity score at creation.
    #[arg(short, long)]
    dignity: Option<i32>,
}

#[derive(Subcommand)]
enum GridAction {
    /// Show the current charge and pledge.
    Status,
    /// Add charge.
    Charge { amount: i64 },
    /// Set the charge to maximum.
    Max,
    /// Pledge to an event.
    Pledge { event: String },
    /// Clear the pledge.
    Unpledge,
}

#[derive(Args)]
struct PowerArgs {
    /// Transit sub-score (0-100).
    transit: u8,
    /// Dignity sub-score (0-100).
    dignity: u8,
    /// Rune modifier sub-score (0-100).
    rune: u8,
    /// Apply the stasis buff.
    #[arg(long)]
    buff: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level.clone())),
        )
        .init();

    let mut config = ClientConfig {
        remote_url: cli.remote.clone(),
        log_level: cli.log_level.clone(),
        ..ClientConfig::default()
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    match cli.command {
        Commands::Serve { bind } => return serve(&bind).await,
        command => {
            let mut client =
                PracticeClient::from_config(&config).context("failed to open client")?;
            run(command, &mut client).await
        }
    }
}

async fn run(
    command: Commands,
    client: &mut PracticeClient<sigil_core::storage::FileStore>,
) -> Result<()> {
    match command {
        Commands::Ritual(args) => {
            let elements = parse_elements(&args.elements)?;
            let outcome = client.record_ritual(&elements, args.xp).await?;
            println!(
                "Ritual recorded: +{} XP -> {} XP, rank {} ({})",
                args.xp,
                outcome.cumulative_experience,
                outcome.rank,
                level::title_for_rank(outcome.rank)
            );
            if outcome.leveled_up {
                println!("Level up! You are now {}.", level::title_for_rank(outcome.rank));
            }
        }

        Commands::Session(args) => {
            let outcome = client.record_session(args.minutes).await?;
            println!(
                "Session recorded: {} min -> {} XP, rank {} ({})",
                args.minutes,
                outcome.cumulative_experience,
                outcome.rank,
                level::title_for_rank(outcome.rank)
            );
        }

        Commands::Wallet { action } => run_wallet(action, client).await?,

        Commands::Grid { action } => run_grid(action, client),

        Commands::Power(args) => {
            let score = power::compute(args.transit, args.dignity, args.rune, args.buff);
            let tier = power::classify(score);
            println!("Power rating: {score} — {} ({})", tier.label(), tier.color_token());
        }

        Commands::Profile => match client.refresh_profile().await {
            Some(profile) => {
                println!("Name:   {}", profile.display_name);
                println!(
                    "XP:     {} (rank {} — {})",
                    profile.cumulative_experience,
                    profile.rank,
                    level::title_for_rank(profile.rank)
                );
                println!("Streak: {} days", profile.streak);
                println!(
                    "Active: {}",
                    profile.active_talisman_id.as_deref().unwrap_or("none")
                );
            }
            None => println!("Remote profile unavailable."),
        },

        Commands::Name { name } => {
            client.set_display_name(&name).await;
            println!("Display name set to {name}.");
        }

        Commands::Leaderboard { limit } => {
            let entries = client.leaderboard(limit).await;
            if entries.is_empty() {
                println!("Leaderboard unavailable or empty.");
            }
            for entry in entries {
                println!(
                    "{:>3}. {:<24} {:>7} XP  ({})",
                    entry.rank,
                    entry.display_name,
                    entry.cumulative_experience,
                    level::title_for_rank(entry.rank_tier)
                );
            }
        }

        Commands::Heatmap { days } => {
            let window = client.heatmap(days)?;
            let max = window.iter().map(|d| d.value).max().unwrap_or(0);
            let glyphs: String = window
                .iter()
                .map(|d| activity_glyph(d.value, max))
                .collect();
            println!("{} days ending {}:", days, window.last().map(|d| d.date.to_string()).unwrap_or_default());
            println!("{glyphs}");
        }

        Commands::Serve { .. } => unreachable!("handled before client setup"),
    }

    Ok(())
}

async fn run_wallet(
    action: WalletAction,
    client: &mut PracticeClient<sigil_core::storage::FileStore>,
) -> Result<()> {
    match action {
        WalletAction::Save(args) => {
            let id = client.save_talisman(draft_from(args));
            println!("Talisman saved: {id}");
        }
        WalletAction::List => {
            if client.wallet().talismans().is_empty() {
                println!("Wallet is empty.");
            }
            for talisman in client.wallet().talismans() {
                let mut markers = String::new();
                if talisman.is_master {
                    markers.push_str(" [master]");
                }
                if client.wallet().active_talisman_id() == Some(talisman.id.as_str()) {
                    markers.push_str(" [active]");
                }
                println!(
                    "{}  {}{}  ({})",
                    talisman.id,
                    talisman.name,
                    markers,
                    talisman.component_symbols.join("")
                );
            }
        }
        WalletAction::Remove { id } => {
            client.remove_talisman(&id).await?;
            println!("Removed {id}.");
        }
        WalletAction::Activate { id } => {
            client.toggle_active_talisman(&id).await?;
            match client.wallet().active_talisman_id() {
                Some(active) => println!("Active talisman: {active}"),
                None => println!("Active talisman cleared."),
            }
        }
        WalletAction::Master(args) => {
            let id = client.set_master_talisman(draft_from(args)).await;
            println!("Master talisman consecrated and activated: {id}");
        }
        WalletAction::Seal => {
            client.complete_seal();
            println!("Onboarding seal completed.");
        }
    }
    Ok(())
}

fn run_grid(
    action: GridAction,
    client: &mut PracticeClient<sigil_core::storage::FileStore>,
) {
    match action {
        GridAction::Status => {
            println!("Grid charge: {}/100", client.grid_charge());
            match client.pledged_event() {
                Some(event) => println!("Pledged to: {event}"),
                None => println!("No pledge."),
            }
        }
        GridAction::Charge { amount } => {
            client.charge_grid(amount);
            println!("Grid charge: {}/100", client.grid_charge());
        }
        GridAction::Max => {
            client.set_grid_max();
            println!("Grid charged to maximum.");
        }
        GridAction::Pledge { event } => {
            client.pledge(&event);
            println!("Pledged to {event}.");
        }
        GridAction::Unpledge => {
            client.unpledge();
            println!("Pledge cleared.");
        }
    }
}

async fn serve(bind: &str) -> Result<()> {
    let server = InMemoryProgressionServer::new();
    let (addr, handle) = server
        .serve(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(%addr, "progression server started");
    println!("Progression server listening on http://{addr}");
    tokio::signal::ctrl_c().await?;
    handle.stop().ok();
    handle.stopped().await;
    Ok(())
}

/// Parse element names, rejecting unknowns with the full valid list.
fn parse_elements(names: &[String]) -> Result<Vec<Element>> {
    let mut elements = Vec::with_capacity(names.len());
    for name in names {
        let element = name
            .parse::<Element>()
            .map_err(|e| anyhow::anyhow!("{e} (expected one of fire, air, water, earth, spirit)"))?;
        elements.push(element);
    }
    if elements.is_empty() {
        bail!("at least one element is required");
    }
    Ok(elements)
}

fn draft_from(args: TalismanArgs) -> TalismanDraft {
    TalismanDraft {
        name: args.name,
        component_symbols: args.symbols,
        keywords: args.keywords,
        intention: args.intention,
        dignity_score_at_creation: args.dignity,
    }
}

/// Map a day's activity onto a density glyph relative to the window maximum.
fn activity_glyph(value: u64, max: u64) -> char {
    if value == 0 || max == 0 {
        return '·';
    }
    match (value * 4).div_ceil(max) {
        1 => '░',
        2 => '▒',
        3 => '▓',
        _ => '█',
    }
}
