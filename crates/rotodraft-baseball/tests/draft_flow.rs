// Integration tests for the draft engine and simulator.
//
// These drive the public API end to end: building an engine from player
// pools, keepers, picks and undo, keeper config export/import, and full
// simulated drafts with a human team in the order.

use std::collections::BTreeMap;

use rotodraft_baseball::order::snake_order;
use rotodraft_baseball::*;

// ===========================================================================
// Test helpers
// ===========================================================================

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// 60 batters across every position and 40 pitchers, with descending value.
fn league_pools() -> (Vec<Player>, Vec<Player>) {
    let positions = ["C", "1B", "2B", "3B", "SS", "OF", "OF", "2B/SS", "1B/OF", "C/1B"];
    let batters = (0..60)
        .map(|i| {
            let f = i as f64;
            Player::new(
                format!("bat{i:02}"),
                format!("Batter {i}"),
                positions[i % positions.len()],
                "NYY",
                45.0 - f * 0.7,
                PlayerType::Batter,
            )
            .with_stat("AB", 600.0 - f * 4.0)
            .with_stat("R", 100.0 - f)
            .with_stat("HR", 35.0 - f * 0.4)
            .with_stat("RBI", 100.0 - f)
            .with_stat("SB", (i % 7) as f64 * 4.0)
            .with_stat("OBP", 0.380 - f * 0.001)
        })
        .collect();
    let pitchers = (0..40)
        .map(|i| {
            let f = i as f64;
            let pos = match i % 4 {
                0 | 1 => "SP",
                2 => "RP",
                _ => "SP/RP",
            };
            Player::new(
                format!("arm{i:02}"),
                format!("Pitcher {i}"),
                pos,
                "BOS",
                35.0 - f * 0.8,
                PlayerType::Pitcher,
            )
            .with_stat("IP", if pos == "RP" { 65.0 } else { 180.0 - f })
            .with_stat("ERA", 2.8 + f * 0.04)
            .with_stat("WHIP", 1.0 + f * 0.01)
            .with_stat("SO", 200.0 - f * 3.0)
            .with_stat("SV", if pos == "RP" { 30.0 } else { 0.0 })
            .with_stat("QS", if pos == "RP" { 0.0 } else { 18.0 - f * 0.3 })
        })
        .collect();
    (batters, pitchers)
}

fn league_engine() -> DraftEngine {
    let (batters, pitchers) = league_pools();
    DraftEngine::new(batters, pitchers, &names(&["Alpha", "Bravo", "Me"])).unwrap()
}

/// Highest-value available player.
fn best_available(engine: &DraftEngine) -> (String, PlayerType) {
    let best = engine
        .available_players()
        .max_by(|a, b| a.player().dollars.total_cmp(&b.player().dollars))
        .unwrap();
    (best.player().player_id.clone(), best.player().player_type)
}

/// Run a whole draft, picking the best available player on the human turns.
fn run_full_draft(engine: &DraftEngine, order: Vec<DraftOrderEntry>, seed: u64) -> DraftSimulator {
    let mut sim = DraftSimulator::new(engine, order, "Me", seed).unwrap();
    loop {
        sim.simulate_until_user_or_complete().unwrap();
        if sim.status() == SimulationStatus::Completed {
            return sim;
        }
        let (id, player_type) = best_available(sim.engine());
        sim.make_user_pick(&id, player_type).unwrap();
    }
}

fn outcomes(sim: &DraftSimulator) -> Vec<(String, String)> {
    sim.pick_log()
        .iter()
        .map(|e| (e.player_id.clone(), e.team.clone()))
        .collect()
}

// ===========================================================================
// Engine
// ===========================================================================

#[test]
fn pick_and_undo_round_trip() {
    let mut engine = league_engine();
    engine.process_pick("bat00", "Alpha", PlayerType::Batter).unwrap();
    engine.process_pick("arm00", "Alpha", PlayerType::Pitcher).unwrap();
    let before = engine.snapshot();

    let slot = engine.process_pick("bat09", "Alpha", PlayerType::Batter).unwrap();
    assert_eq!(slot, Some(Slot::FirstBase));
    engine.undo_pick("bat09").unwrap();

    assert_eq!(engine.team("Alpha"), before.team("Alpha"));
    assert_eq!(engine.status_of("bat09"), Some(PlayerStatus::Available));
    assert_eq!(
        engine.slot_summary("Alpha").unwrap(),
        before.slot_summary("Alpha").unwrap()
    );
}

#[test]
fn fill_counts_never_exceed_capacity() {
    let engine = league_engine();
    let rounds = 30;
    let sim = run_full_draft(&engine, snake_order(&engine.team_names(), rounds), 11);
    assert_eq!(sim.pick_log().len(), 3 * rounds as usize);
    let settings = sim.engine().settings();
    for team in sim.engine().teams() {
        for usage in team.slot_summary(&settings.slots) {
            assert!(usage.filled <= usage.capacity, "{} {}", team.name(), usage.slot);
        }
    }
    for entry in sim.engine().batters().iter().chain(sim.engine().pitchers().iter()) {
        assert_eq!(entry.is_available(), entry.drafted_by().is_none());
    }
}

#[test]
fn standings_do_not_depend_on_pick_order() {
    let batters = vec![
        Player::new("x", "Batter X", "OF", "NYY", 3.0, PlayerType::Batter).with_stat("HR", 0.1),
        Player::new("y", "Batter Y", "OF", "NYY", 2.0, PlayerType::Batter).with_stat("HR", 0.2),
        Player::new("z", "Batter Z", "OF", "NYY", 1.0, PlayerType::Batter).with_stat("HR", 0.3),
    ];
    let blank = DraftEngine::new(batters, vec![], &names(&["Alpha", "Me"])).unwrap();

    let mut forward = blank.snapshot();
    for id in ["x", "y", "z"] {
        forward.process_pick(id, "Alpha", PlayerType::Batter).unwrap();
    }
    let mut backward = blank.snapshot();
    for id in ["z", "y", "x"] {
        backward.process_pick(id, "Alpha", PlayerType::Batter).unwrap();
    }

    assert_eq!(forward.get_standings(), backward.get_standings());
    assert_eq!(
        forward.get_standings()[0].totals.hr,
        backward.get_standings()[0].totals.hr
    );
}

#[test]
fn keeper_config_survives_json_and_reimport() {
    let mut engine = league_engine();
    engine.process_keeper("bat05", "Alpha", 3.0, PlayerType::Batter).unwrap();
    engine.process_keeper("arm02", "Me", 11.0, PlayerType::Pitcher).unwrap();
    engine.process_pick("bat01", "Bravo", PlayerType::Batter).unwrap();

    let json = engine.export_keeper_config("spring").to_json().unwrap();
    let config = KeeperConfig::from_json(&json).unwrap();
    assert_eq!(config.keeper_count(), 2);

    let mut fresh = league_engine();
    let summary = fresh.import_keeper_config(&config).unwrap();
    assert_eq!(summary.applied, 2);
    assert_eq!(fresh.status_of("bat05"), Some(PlayerStatus::Keeper));
    assert_eq!(fresh.status_of("bat01"), Some(PlayerStatus::Available));
    let me = fresh.team_roster("Me").unwrap();
    assert_eq!(me.pitchers[0].player.dollars, 11.0);
}

#[test]
fn import_with_new_team_names_releases_dropped_teams() {
    let mut engine = league_engine();
    engine.process_pick("bat03", "Bravo", PlayerType::Batter).unwrap();

    let mut config = KeeperConfig::new("renamed", names(&["Alpha", "Charlie", "Me"]));
    config.keepers.insert(
        "Charlie".into(),
        vec![KeeperEntry {
            player_id: "bat03".into(),
            cost: 9.0,
        }],
    );
    let summary = engine.import_keeper_config(&config).unwrap();

    assert_eq!(summary.applied, 1);
    assert_eq!(engine.team_names(), names(&["Alpha", "Charlie", "Me"]));
    let entry = engine.find_player("bat03").unwrap();
    assert_eq!(entry.status(), PlayerStatus::Keeper);
    assert_eq!(entry.drafted_by(), Some("Charlie"));
}

// ===========================================================================
// Simulator
// ===========================================================================

#[test]
fn three_pick_draft_is_deterministic() {
    let engine = league_engine();
    let order = vec![
        DraftOrderEntry::new(1, "Alpha", Tendency::Hitting),
        DraftOrderEntry::new(2, "Me", Tendency::Pitching),
        DraftOrderEntry::new(3, "Bravo", Tendency::Pitching),
    ];

    let run = || {
        let mut sim = DraftSimulator::new(&engine, order.clone(), "Me", 2024).unwrap();
        sim.simulate_until_user_or_complete().unwrap();
        let (id, player_type) = best_available(sim.engine());
        sim.make_user_pick(&id, player_type).unwrap();
        sim.simulate_until_user_or_complete().unwrap();
        assert_eq!(sim.status(), SimulationStatus::Completed);
        outcomes(&sim)
    };

    let first = run();
    assert_eq!(first.len(), 3);
    let teams: Vec<_> = first.iter().map(|(_, team)| team.as_str()).collect();
    assert_eq!(teams, vec!["Alpha", "Me", "Bravo"]);
    for _ in 0..3 {
        assert_eq!(run(), first);
    }
}

#[test]
fn full_drafts_with_same_seed_match() {
    let engine = league_engine();
    let order = snake_order(&engine.team_names(), 12);
    let a = run_full_draft(&engine, order.clone(), 99);
    let b = run_full_draft(&engine.snapshot(), order, 99);
    assert_eq!(outcomes(&a), outcomes(&b));
    assert_eq!(a.standings(), b.standings());
}

#[test]
fn open_flex_slot_lets_ineligible_star_through() {
    // Alpha already has its only 1B. Util is open, so the $50 first baseman
    // stays in the candidate pool alongside the $1 catcher.
    let mut caps = BTreeMap::new();
    caps.insert(Slot::Catcher, 1);
    caps.insert(Slot::FirstBase, 1);
    caps.insert(Slot::Utility, 1);
    let settings = EngineSettings {
        slots: SlotConfig::new(caps),
        categories: CategoryConfig::default(),
    };
    let batters = vec![
        Player::new("filler", "Old First Baseman", "1B", "KC", 5.0, PlayerType::Batter),
        Player::new("star", "Star First Baseman", "1B", "LAD", 50.0, PlayerType::Batter),
        Player::new("cheap", "Backup Catcher", "C", "MIA", 1.0, PlayerType::Batter),
    ];
    let mut engine =
        DraftEngine::with_settings(batters, vec![], &names(&["Alpha", "Me"]), settings).unwrap();
    engine.process_pick("filler", "Alpha", PlayerType::Batter).unwrap();
    let order = vec![
        DraftOrderEntry::new(1, "Alpha", Tendency::Hitting),
        DraftOrderEntry::new(2, "Me", Tendency::Hitting),
    ];

    let star_picked = (0..10u64).any(|seed| {
        let mut sim = DraftSimulator::new(&engine, order.clone(), "Me", seed).unwrap();
        let pick = sim.simulate_next_pick().unwrap().unwrap();
        pick.player_id == "star"
    });
    assert!(star_picked);

    // Once Util is full too, only the open catcher slot counts.
    let mut filled = DraftEngine::with_settings(
        vec![
            Player::new("filler", "Old First Baseman", "1B", "KC", 5.0, PlayerType::Batter),
            Player::new("util", "Designated Hitter", "1B", "TOR", 4.0, PlayerType::Batter),
            Player::new("star", "Star First Baseman", "1B", "LAD", 50.0, PlayerType::Batter),
            Player::new("cheap", "Backup Catcher", "C", "MIA", 1.0, PlayerType::Batter),
        ],
        vec![],
        &names(&["Alpha", "Me"]),
        engine.settings().clone(),
    )
    .unwrap();
    filled.process_pick("filler", "Alpha", PlayerType::Batter).unwrap();
    filled.process_pick("util", "Alpha", PlayerType::Batter).unwrap();
    assert!(!filled.team("Alpha").unwrap().has_open_flex_slot(&filled.settings().slots));

    for seed in 0..5u64 {
        let mut sim = DraftSimulator::new(&filled, order.clone(), "Me", seed).unwrap();
        let pick = sim.simulate_next_pick().unwrap().unwrap();
        assert_eq!(pick.player_id, "cheap");
    }

    // Every exclusive slot full with Util still open: the star can be taken
    // and lands in Util.
    let mut exclusive_full = DraftEngine::with_settings(
        vec![
            Player::new("filler", "Old First Baseman", "1B", "KC", 5.0, PlayerType::Batter),
            Player::new("oldc", "Old Catcher", "C", "SEA", 3.0, PlayerType::Batter),
            Player::new("star", "Star First Baseman", "1B", "LAD", 50.0, PlayerType::Batter),
            Player::new("cheap", "Backup Catcher", "C", "MIA", 1.0, PlayerType::Batter),
        ],
        vec![],
        &names(&["Alpha", "Me"]),
        engine.settings().clone(),
    )
    .unwrap();
    exclusive_full.process_pick("filler", "Alpha", PlayerType::Batter).unwrap();
    exclusive_full.process_pick("oldc", "Alpha", PlayerType::Batter).unwrap();
    let alpha = exclusive_full.team("Alpha").unwrap();
    assert!(alpha.open_exclusive_slots(&exclusive_full.settings().slots).is_empty());
    assert!(alpha.has_open_flex_slot(&exclusive_full.settings().slots));

    let star_in_util = (0..10u64).any(|seed| {
        let mut sim = DraftSimulator::new(&exclusive_full, order.clone(), "Me", seed).unwrap();
        let pick = sim.simulate_next_pick().unwrap().unwrap();
        pick.player_id == "star"
            && sim.engine().team("Alpha").unwrap().entry("star").unwrap().slot
                == Some(Slot::Utility)
    });
    assert!(star_in_util);
}

#[test]
fn positional_filter_fails_open() {
    // No flex slots and no player fits the one open exclusive slot (SS):
    // the AI still gets to pick someone.
    let mut caps = BTreeMap::new();
    caps.insert(Slot::FirstBase, 1);
    caps.insert(Slot::ShortStop, 1);
    let settings = EngineSettings {
        slots: SlotConfig::new(caps),
        categories: CategoryConfig::default(),
    };
    let batters = vec![
        Player::new("a", "First A", "1B", "KC", 5.0, PlayerType::Batter),
        Player::new("b", "First B", "1B", "KC", 6.0, PlayerType::Batter),
    ];
    let mut engine =
        DraftEngine::with_settings(batters, vec![], &names(&["Alpha", "Me"]), settings).unwrap();
    engine.process_pick("a", "Alpha", PlayerType::Batter).unwrap();

    let order = vec![
        DraftOrderEntry::new(1, "Alpha", Tendency::Hitting),
        DraftOrderEntry::new(2, "Me", Tendency::Hitting),
    ];
    let mut sim = DraftSimulator::new(&engine, order, "Me", 5).unwrap();
    let pick = sim.simulate_next_pick().unwrap().unwrap();
    assert_eq!(pick.player_id, "b");
    // Overflow pick is rostered without a slot.
    let alpha = sim.engine().team("Alpha").unwrap();
    assert_eq!(alpha.entry("b").unwrap().slot, None);
}

#[test]
fn standings_follow_simulated_rosters() {
    let engine = league_engine();
    let sim = run_full_draft(&engine, snake_order(&engine.team_names(), 8), 4);
    let standings = sim.standings();
    assert_eq!(standings.len(), 3);
    for row in &standings {
        let roster = sim.team_roster(&row.team).unwrap();
        let expected = standings::aggregate(
            roster
                .batters
                .iter()
                .chain(roster.pitchers.iter())
                .map(|e| &e.player),
            &CategoryConfig::default(),
        );
        assert_eq!(row.totals, expected);
    }
}
