// Integration tests for the terminal draft session: config on disk, CSV
// pools, keepers and scripted user input.

use std::fs;
use std::path::{Path, PathBuf};

use rotodraft_app::config::load_config_from;
use rotodraft_app::driver::{best_available, build_simulator, run_draft, write_standings};
use rotodraft_baseball::{KeeperConfig, KeeperEntry, PickSource, PlayerStatus, SimulationStatus};

// ===========================================================================
// Test helpers
// ===========================================================================

const LEAGUE: &str = r#"
[league]
name = "Session League"
teams = ["Alpha", "Bravo", "Me"]
user_team = "Me"

[league.roster]
C = 1
1B = 1
2B = 1
3B = 1
SS = 1
OF = 3
Util = 1
SP = 3
RP = 2
P = 2
BN = 6
"#;

/// Lay out config/ and data/ under a fresh temp dir.
fn setup(test_name: &str, draft_extra: &str) -> PathBuf {
    let base = std::env::temp_dir().join(format!("rotodraft_session_{test_name}"));
    let _ = fs::remove_dir_all(&base);
    fs::create_dir_all(base.join("config")).unwrap();
    fs::create_dir_all(base.join("data")).unwrap();

    fs::write(base.join("config/league.toml"), LEAGUE).unwrap();
    let draft = format!(
        "[simulation]\nrounds = 4\n\n[data_paths]\nbatters = \"data/batters.csv\"\n\
         pitchers = \"data/pitchers.csv\"\n{draft_extra}"
    );
    fs::write(base.join("config/draft.toml"), draft).unwrap();

    let positions = ["C", "1B", "2B", "3B", "SS", "OF", "OF", "2B/SS"];
    let mut batters = String::from("PlayerId,Name,POS,Team,Dollars,AB,R,HR,RBI,SB,OBP\n");
    for i in 0..20 {
        batters.push_str(&format!(
            "b{i:02},Batter {i},{},NYY,{:.1},{},{},{},{},{},{:.3}\n",
            positions[i % positions.len()],
            40.0 - i as f64,
            550 - i * 5,
            90 - i,
            30 - i / 2,
            85 - i,
            i % 5 * 3,
            0.370 - i as f64 * 0.002
        ));
    }
    fs::write(base.join("data/batters.csv"), batters).unwrap();

    let mut pitchers = String::from("PlayerId,Name,POS,Team,Dollars,IP,ERA,WHIP,SO,SV,QS\n");
    for i in 0..12 {
        let pos = if i % 3 == 2 { "RP" } else { "SP" };
        pitchers.push_str(&format!(
            "p{i:02},Pitcher {i},{pos},BOS,{:.1},{},{:.2},{:.2},{},{},{}\n",
            30.0 - i as f64,
            if pos == "RP" { 65 } else { 170 - i },
            3.0 + i as f64 * 0.05,
            1.05 + i as f64 * 0.01,
            190 - i * 4,
            if pos == "RP" { 28 } else { 0 },
            if pos == "RP" { 0 } else { 16 - i }
        ));
    }
    fs::write(base.join("data/pitchers.csv"), pitchers).unwrap();

    base
}

fn cleanup(base: &Path) {
    let _ = fs::remove_dir_all(base);
}

// ===========================================================================
// Session tests
// ===========================================================================

#[test]
fn auto_draft_runs_to_completion() {
    let base = setup("auto", "");
    let config = load_config_from(&base).unwrap();
    let mut sim = build_simulator(&config, &base, None, 11).unwrap();
    assert_eq!(sim.order().len(), 12);

    let mut out = Vec::new();
    run_draft(&mut sim, "".as_bytes(), &mut out, true).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(sim.status(), SimulationStatus::Completed);
    assert!(text.contains("Draft complete: 12 picks."));

    let user_picks: Vec<_> = sim
        .pick_log()
        .iter()
        .filter(|p| p.source == PickSource::User)
        .collect();
    assert_eq!(user_picks.len(), 4);
    assert!(user_picks.iter().all(|p| p.team == "Me"));

    let mut ids: Vec<&str> = sim.pick_log().iter().map(|p| p.player_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 12);

    cleanup(&base);
}

#[test]
fn same_seed_gives_same_session() {
    let base = setup("seeded", "");
    let config = load_config_from(&base).unwrap();

    let run = || {
        let mut sim = build_simulator(&config, &base, None, 99).unwrap();
        run_draft(&mut sim, "".as_bytes(), &mut Vec::<u8>::new(), true).unwrap();
        sim.pick_log()
            .iter()
            .map(|p| p.player_id.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());

    cleanup(&base);
}

#[test]
fn scripted_input_picks_rejects_and_quits() {
    let base = setup("scripted", "");
    let config = load_config_from(&base).unwrap();
    let mut sim = build_simulator(&config, &base, None, 5).unwrap();

    // Me picks third and fourth in a three-team snake.
    let input = "\nnobody\nq\n";
    let mut out = Vec::new();
    run_draft(&mut sim, input.as_bytes(), &mut out, false).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Pick #3 (Me, leaning hitting)"));
    assert!(text.contains("Unknown player id `nobody`."));
    assert!(text.contains("Draft stopped after 3 picks."));

    let log = sim.pick_log();
    assert_eq!(log.len(), 3);
    assert_eq!(log[2].source, PickSource::User);
    assert_eq!(log[2].rationale, "User selection");
    assert_eq!(sim.status(), SimulationStatus::Paused);

    cleanup(&base);
}

#[test]
fn taken_player_is_rejected_and_prompt_repeats() {
    let base = setup("taken", "");
    let config = load_config_from(&base).unwrap();
    let mut sim = build_simulator(&config, &base, None, 5).unwrap();
    sim.simulate_until_user_or_complete().unwrap();
    let taken = sim.pick_log()[0].player_id.clone();

    let input = format!("{taken}\n");
    let mut out = Vec::new();
    run_draft(&mut sim, input.as_bytes(), &mut out, false).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Pick rejected:"));
    assert!(text.contains("Draft stopped after 2 picks."));

    cleanup(&base);
}

#[test]
fn keepers_are_applied_before_the_draft() {
    let base = setup("keepers", "");
    let config = load_config_from(&base).unwrap();

    let mut keepers = KeeperConfig::new("k", config.league.teams.clone());
    keepers.keepers.get_mut("Me").unwrap().push(KeeperEntry {
        player_id: "b00".into(),
        cost: 5.0,
    });
    keepers.keepers.get_mut("Alpha").unwrap().push(KeeperEntry {
        player_id: "zz99".into(),
        cost: 1.0,
    });

    let sim = build_simulator(&config, &base, Some(&keepers), 1).unwrap();
    let engine = sim.engine();
    assert_eq!(engine.status_of("b00"), Some(PlayerStatus::Keeper));
    assert_ne!(
        best_available(engine).map(|e| e.player().player_id.as_str()),
        Some("b00")
    );
    assert!(sim.pick_log().is_empty());

    cleanup(&base);
}

#[test]
fn draft_order_file_replaces_snake_order() {
    let base = setup("order_file", "draft_order = \"data/order.csv\"\n");
    fs::write(
        base.join("data/order.csv"),
        "team,pick_number,tendency\nMe,1,pitching\nAlpha,2,hitting\nBravo,3,hitting\n",
    )
    .unwrap();
    let config = load_config_from(&base).unwrap();
    let mut sim = build_simulator(&config, &base, None, 3).unwrap();
    assert_eq!(sim.order().len(), 3);
    assert!(sim.is_user_turn());

    run_draft(&mut sim, "".as_bytes(), &mut Vec::<u8>::new(), true).unwrap();
    assert_eq!(sim.status(), SimulationStatus::Completed);
    assert_eq!(sim.pick_log()[0].team, "Me");

    cleanup(&base);
}

#[test]
fn missing_pool_file_is_an_error() {
    let base = setup("missing_pool", "");
    fs::remove_file(base.join("data/pitchers.csv")).unwrap();
    let config = load_config_from(&base).unwrap();

    let err = build_simulator(&config, &base, None, 1).unwrap_err();
    assert!(format!("{err:#}").contains("failed to load player pools"));

    cleanup(&base);
}

#[test]
fn picks_before_a_failed_ai_pick_are_still_printed() {
    let base = setup("halted", "draft_order = \"data/order.csv\"\n");
    fs::write(
        base.join("data/batters.csv"),
        "PlayerId,Name,POS,Team,Dollars,AB,R\nb00,Lone Bat,OF,NYY,10,500,80\n",
    )
    .unwrap();
    fs::write(
        base.join("data/pitchers.csv"),
        "PlayerId,Name,POS,Team,Dollars,IP,SO\np00,Lone Arm,SP,BOS,9,150,140\n",
    )
    .unwrap();
    fs::write(
        base.join("data/order.csv"),
        "team,pick_number,tendency\nAlpha,1,hitting\nBravo,2,pitching\nAlpha,3,hitting\nMe,4,hitting\n",
    )
    .unwrap();
    let config = load_config_from(&base).unwrap();
    let mut sim = build_simulator(&config, &base, None, 7).unwrap();

    let mut out = Vec::new();
    let err = run_draft(&mut sim, "".as_bytes(), &mut out, true).unwrap_err();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Lone Bat"));
    assert!(text.contains("Lone Arm"));
    assert!(format!("{err:#}").contains("simulation stopped"));
    assert_eq!(sim.pick_log().len(), 2);

    cleanup(&base);
}

#[test]
fn standings_table_lists_every_team() {
    let base = setup("standings", "");
    let config = load_config_from(&base).unwrap();
    let mut sim = build_simulator(&config, &base, None, 8).unwrap();
    run_draft(&mut sim, "".as_bytes(), &mut Vec::<u8>::new(), true).unwrap();

    let mut out = Vec::new();
    write_standings(&sim.standings(), &sim.engine().settings().categories, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();

    let header = lines.next().unwrap();
    for label in ["R", "HR", "OBP", "K", "QS", "ERA", "WHIP"] {
        assert!(header.contains(label), "missing {label} in {header}");
    }
    for team in ["Alpha", "Bravo", "Me"] {
        assert!(text.lines().any(|l| l.starts_with(team)));
    }

    cleanup(&base);
}
