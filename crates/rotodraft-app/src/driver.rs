// Terminal draft session: builds the simulator from config and runs it,
// prompting for the human team's picks.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use rotodraft_baseball::order::{read_draft_order, snake_order};
use rotodraft_baseball::projections::load_pools;
use rotodraft_baseball::standings::ALL_CATEGORIES;
use rotodraft_baseball::{
    CategoryConfig, DraftEngine, DraftSimulator, KeeperConfig, PoolEntry, SimulationStatus,
    StandingsRow,
};

use crate::config::Config;

/// Rows shown when prompting for a pick.
const PROMPT_ROWS: usize = 10;

/// Load pools, apply keepers and construct the simulator.
///
/// `base_dir` resolves relative data paths. The draft order comes from
/// `data_paths.draft_order` when set, otherwise a snake order over the
/// league's teams.
pub fn build_simulator(
    config: &Config,
    base_dir: &Path,
    keepers: Option<&KeeperConfig>,
    seed: u64,
) -> Result<DraftSimulator> {
    let (batters, pitchers) = load_pools(
        &base_dir.join(&config.data_paths.batters),
        &base_dir.join(&config.data_paths.pitchers),
    )
    .context("failed to load player pools")?;

    let settings = config.engine_settings()?;
    let mut engine = DraftEngine::with_settings(batters, pitchers, &config.league.teams, settings)
        .context("failed to create draft engine")?;

    if let Some(keepers) = keepers {
        let summary = engine
            .import_keeper_config(keepers)
            .context("failed to apply keepers")?;
        info!(
            "Applied {} keepers from '{}' ({} skipped)",
            summary.applied,
            keepers.name,
            summary.skipped.len()
        );
    }

    let order = match &config.data_paths.draft_order {
        Some(path) => read_draft_order(&base_dir.join(path)).context("failed to load draft order")?,
        None => snake_order(&engine.team_names(), config.simulation.rounds),
    };

    DraftSimulator::new(&engine, order, &config.league.user_team, seed)
        .context("failed to create simulator")
}

/// Available player with the highest dollar value, batters winning ties.
pub fn best_available(engine: &DraftEngine) -> Option<&PoolEntry> {
    let mut best: Option<&PoolEntry> = None;
    for entry in engine.available_players() {
        if best.map_or(true, |b| entry.player().dollars > b.player().dollars) {
            best = Some(entry);
        }
    }
    best
}

/// Drive the simulation to completion.
///
/// On the human team's turn a player id is read from `input`. An empty line
/// takes the best available player, `q` or end of input stops the draft
/// early. With `auto` set the human team always takes the best available
/// player without prompting.
pub fn run_draft<R: BufRead, W: Write>(
    sim: &mut DraftSimulator,
    mut input: R,
    out: &mut W,
    auto: bool,
) -> Result<()> {
    loop {
        let picks = match sim.simulate_until_user_or_complete() {
            Ok(picks) => picks,
            Err(halted) => {
                for pick in &halted.picks {
                    writeln!(out, "{pick}")?;
                }
                return Err(halted.error).context("simulation stopped");
            }
        };
        for pick in &picks {
            writeln!(out, "{pick}")?;
        }
        if sim.status() == SimulationStatus::Completed {
            writeln!(out, "Draft complete: {} picks.", sim.pick_log().len())?;
            return Ok(());
        }

        let Some(player_id) = next_user_choice(sim, &mut input, out, auto)? else {
            writeln!(out, "Draft stopped after {} picks.", sim.pick_log().len())?;
            return Ok(());
        };
        let Some(player_type) = sim
            .engine()
            .find_player(&player_id)
            .map(|e| e.player().player_type)
        else {
            writeln!(out, "Unknown player id `{player_id}`.")?;
            continue;
        };

        match sim.make_user_pick(&player_id, player_type) {
            Ok(pick) => writeln!(out, "{pick}")?,
            Err(e) if auto => return Err(e).context("automatic pick failed"),
            Err(e) => writeln!(out, "Pick rejected: {e}")?,
        }
    }
}

/// `Ok(None)` means the user asked to stop.
fn next_user_choice<R: BufRead, W: Write>(
    sim: &DraftSimulator,
    input: &mut R,
    out: &mut W,
    auto: bool,
) -> Result<Option<String>> {
    let best_id = best_available(sim.engine()).map(|e| e.player().player_id.clone());
    if auto {
        return Ok(best_id);
    }

    if let Some(pick) = sim.current_pick() {
        writeln!(
            out,
            "\nPick #{} ({}, leaning {}). Top available:",
            pick.pick_number, pick.team, pick.tendency
        )?;
    }
    print_available(sim.engine(), out)?;
    write!(out, "Player id (enter = best available, q = quit): ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    match line.trim() {
        "q" | "quit" => Ok(None),
        "" => Ok(best_id),
        id => Ok(Some(id.to_string())),
    }
}

fn print_available<W: Write>(engine: &DraftEngine, out: &mut W) -> Result<()> {
    let mut available: Vec<&PoolEntry> = engine.available_players().collect();
    available.sort_by(|a, b| b.player().dollars.total_cmp(&a.player().dollars));
    for entry in available.into_iter().take(PROMPT_ROWS) {
        let p = entry.player();
        writeln!(
            out,
            "  {:<10} {:<24} {:<8} ${:>5.1}",
            p.player_id,
            p.name,
            p.position_display(),
            p.dollars
        )?;
    }
    Ok(())
}

/// Category totals table, one row per team.
pub fn write_standings<W: Write>(
    rows: &[StandingsRow],
    categories: &CategoryConfig,
    out: &mut W,
) -> Result<()> {
    write!(out, "{:<20}", "Team")?;
    for cat in ALL_CATEGORIES {
        write!(out, " {:>7}", cat.label(categories))?;
    }
    writeln!(out)?;

    for row in rows {
        write!(out, "{:<20}", row.team)?;
        for cat in ALL_CATEGORIES {
            let value = row.totals.get(cat);
            if cat.is_rate() {
                write!(out, " {value:>7.3}")?;
            } else {
                write!(out, " {value:>7.0}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}
