// Rotodraft entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (log to file, not terminal)
// 3. Load config (copying defaults on first run)
// 4. Dispatch the subcommand

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use rotodraft_app::config::{self, Config};
use rotodraft_app::{driver, saves};

#[derive(Debug, Parser)]
#[command(name = "rotodraft", version)]
#[command(about = "Rotisserie baseball draft simulator with keeper management")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a simulated draft, prompting for your team's picks
    Simulate {
        /// Saved keeper config to apply before the draft
        #[arg(long)]
        keepers: Option<PathBuf>,

        /// RNG seed (overrides simulation.seed)
        #[arg(long)]
        seed: Option<u64>,

        /// Take the best available player on your turns instead of prompting
        #[arg(long)]
        auto: bool,
    },

    /// Manage saved keeper configs
    #[command(subcommand)]
    Keepers(KeepersCommand),
}

#[derive(Debug, Subcommand)]
enum KeepersCommand {
    /// Save a keeper config built from a CSV with team,player_id,cost columns
    Save {
        name: String,

        #[arg(long)]
        from: PathBuf,
    },

    /// List saved keeper configs, newest first
    List,

    /// Print the keepers in a saved config
    Show { file: PathBuf },

    /// Delete a saved config
    Delete { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing()?;
    info!("Rotodraft starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, user team '{}'",
        config.league.name,
        config.league.teams.len(),
        config.league.user_team
    );

    match args.command {
        Command::Simulate { keepers, seed, auto } => simulate(&config, keepers, seed, auto),
        Command::Keepers(cmd) => manage_keepers(&config, cmd),
    }
}

fn simulate(
    config: &Config,
    keepers_file: Option<PathBuf>,
    seed: Option<u64>,
    auto: bool,
) -> anyhow::Result<()> {
    let keepers = match keepers_file {
        Some(file) => {
            let path = resolve_save(&file, &config.saves_dir());
            Some(saves::load_keeper_config(&path)?)
        }
        None => None,
    };

    let seed = seed
        .or(config.simulation.seed)
        .unwrap_or_else(rand::random::<u64>);
    let base_dir = std::env::current_dir()?;
    let mut sim = driver::build_simulator(config, &base_dir, keepers.as_ref(), seed)?;
    println!(
        "{}: {} picks, you are '{}' (seed {seed})",
        config.league.name,
        sim.order().len(),
        sim.user_team()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    driver::run_draft(&mut sim, io::stdin().lock(), &mut out, auto)?;

    writeln!(out)?;
    driver::write_standings(
        &sim.standings(),
        &sim.engine().settings().categories,
        &mut out,
    )?;
    Ok(())
}

fn manage_keepers(config: &Config, cmd: KeepersCommand) -> anyhow::Result<()> {
    let saves_dir = config.saves_dir();
    match cmd {
        KeepersCommand::Save { name, from } => {
            let keeper_config = saves::read_keeper_csv(&from, &name, config.league.teams.clone())?;
            let path = saves::save_keeper_config(&saves_dir, &keeper_config)?;
            println!(
                "Saved '{}' ({} keepers) to {}",
                keeper_config.name,
                keeper_config.keeper_count(),
                path.display()
            );
        }
        KeepersCommand::List => {
            let saved = saves::list_saved_configs(&saves_dir)?;
            if saved.is_empty() {
                println!("No saved keeper configs in {}", saves_dir.display());
            }
            for info in saved {
                println!(
                    "{:<30} {:<30} {}",
                    info.name,
                    info.filename,
                    info.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        KeepersCommand::Show { file } => {
            let keeper_config = saves::load_keeper_config(&resolve_save(&file, &saves_dir))?;
            println!(
                "{} (created {})",
                keeper_config.name,
                keeper_config.created_at.format("%Y-%m-%d %H:%M")
            );
            for (team, entries) in &keeper_config.keepers {
                println!("{team}: {} keepers", entries.len());
                for entry in entries {
                    println!("  {:<12} ${:.1}", entry.player_id, entry.cost);
                }
            }
        }
        KeepersCommand::Delete { file } => {
            let path = resolve_save(&file, &saves_dir);
            if !saves::delete_keeper_config(&path) {
                bail!("no saved config at {}", path.display());
            }
            println!("Deleted {}", path.display());
        }
    }
    Ok(())
}

/// Paths that don't exist as given are looked up in the saves directory.
fn resolve_save(file: &Path, saves_dir: &Path) -> PathBuf {
    if file.exists() {
        file.to_path_buf()
    } else {
        saves_dir.join(file)
    }
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("rotodraft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rotodraft=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
