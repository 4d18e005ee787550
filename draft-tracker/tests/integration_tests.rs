// Integration tests for the draft tracker.
//
// These tests exercise the full system end-to-end using the library crate's
// public API: CSV import, the draft store behind the app orchestrator,
// action-log persistence and crash recovery, and the command channel.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use draft_tracker::app::{self, AppState};
use draft_tracker::config::{self, Config, DataPaths, LeagueConfig};
use draft_tracker::db::Database;
use draft_tracker::draft::action::Action;
use draft_tracker::draft::pick::{Player, Position};
use draft_tracker::draft::roster::default_roster_config;
use draft_tracker::draft::state::{
    transition, DraftError, DraftOrder, DraftSettings, DraftState, DraftStatus,
};
use draft_tracker::players;
use draft_tracker::protocol::{UiUpdate, UserCommand};

use tokio::sync::mpsc;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the package root, which is the cwd
/// for `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn fixture_players() -> Vec<Player> {
    players::load_players(&Path::new(FIXTURES).join("players.csv")).expect("fixture CSV loads")
}

fn league(num_teams: usize, order: DraftOrder, roster: HashMap<String, usize>) -> Config {
    let max_rounds = roster.values().sum::<usize>() as u32;
    Config {
        league: LeagueConfig {
            name: "Integration League".into(),
            num_teams,
            draft_order: order,
            max_rounds,
            roster,
        },
        db_path: ":memory:".into(),
        data_paths: DataPaths {
            players: format!("{}/players.csv", FIXTURES),
        },
    }
}

fn four_team_app() -> AppState {
    let db = Database::open(":memory:").expect("in-memory db");
    let mut state = AppState::new(
        league(4, DraftOrder::Snake, default_roster_config()),
        db,
        "integration".into(),
    );
    state.load_players(fixture_players()).expect("pool accepted");
    state
}

/// A unique, empty scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ffdraft_it_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// ===========================================================================
// Player pool
// ===========================================================================

#[test]
fn fixture_pool_loads_in_rank_order() {
    let pool = fixture_players();
    assert_eq!(pool.len(), 12);
    assert_eq!(pool[0].name, "Christian McCaffrey");
    assert_eq!(pool[8].position, Position::Defense);
    assert!(pool.windows(2).all(|w| w[0].rank < w[1].rank));
}

/// The shipped rankings carry enough players at every position for the
/// default 10-team league to draft through to completion.
#[test]
fn shipped_rankings_fill_default_league() {
    let pool = players::load_players(Path::new("data/players.csv")).expect("data/players.csv loads");
    let mut draft = DraftState::new(10, DraftSettings::default());
    assert!(pool.len() >= draft.total_picks());
    draft = transition(&draft, Action::SetPlayers { players: pool }).unwrap();

    while draft.status != DraftStatus::Complete {
        let roster = &draft.active().roster;
        let starts = |p: &&Player| {
            roster
                .open_slot_for(p.position)
                .is_some_and(|i| roster.slots[i].position != Position::Bench)
        };
        let choice = draft
            .undrafted_players()
            .find(starts)
            .or_else(|| draft.undrafted_players().find(|p| roster.open_slot_for(p.position).is_some()))
            .map(Player::id)
            .expect("someone is left to draft");
        draft = transition(&draft, Action::PickPlayer { player: choice }).unwrap();
    }

    assert!(draft.teams.iter().all(|t| t.roster.starters_complete()));
    assert!(draft.invariant_violations().is_empty());
}

#[test]
fn shipped_rankings_load_cleanly() {
    let pool = players::load_players(Path::new("data/players.csv")).expect("data/players.csv loads");
    assert!(pool.len() >= 50);
    for pos in [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Defense,
        Position::Kicker,
    ] {
        assert!(
            pool.iter().any(|p| p.position == pos),
            "no {} in shipped rankings",
            pos
        );
    }
}

// ===========================================================================
// Config
// ===========================================================================

#[test]
fn defaults_copy_and_load() {
    let dir = scratch_dir("config");
    std::fs::create_dir_all(dir.join("defaults")).unwrap();
    std::fs::copy("defaults/league.toml", dir.join("defaults/league.toml")).unwrap();

    let copied = config::ensure_config_files(&dir).unwrap();
    assert_eq!(copied.len(), 1);

    let cfg = config::load_config_from(&dir).unwrap();
    assert_eq!(cfg.league.num_teams, 10);
    assert_eq!(cfg.league.draft_order, DraftOrder::Snake);
    assert_eq!(cfg.draft_settings().roster_config, default_roster_config());

    // A second run leaves the user's copy alone
    assert!(config::ensure_config_files(&dir).unwrap().is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

// ===========================================================================
// Draft flow
// ===========================================================================

#[test]
fn snake_first_two_rounds() {
    let mut app = four_team_app();
    let order = [
        "Christian McCaffrey",
        "CeeDee Lamb",
        "Tyreek Hill",
        "Bijan Robinson",
        "Josh Allen",
        "Travis Kelce",
        "Justin Jefferson",
        "Breece Hall",
    ];
    for name in order {
        app.apply(Action::pick(name)).unwrap();
    }

    let s = app.snapshot();
    assert_eq!(s.pick_count(), 8);
    assert_eq!(s.round, 3);
    assert_eq!(s.active_team, 0);
    // Round two runs 3, 2, 1, 0
    assert_eq!(s.owner_of(&"Bijan Robinson".into()), Some(3));
    assert_eq!(s.owner_of(&"Josh Allen".into()), Some(3));
    assert_eq!(s.owner_of(&"Breece Hall".into()), Some(0));
    assert_eq!(s.undrafted.len(), 4);
    assert!(s.invariant_violations().is_empty());
}

#[test]
fn linear_order_restarts_each_round() {
    let db = Database::open(":memory:").unwrap();
    let mut app = AppState::new(
        league(3, DraftOrder::Linear, default_roster_config()),
        db,
        "linear".into(),
    );
    app.load_players(fixture_players()).unwrap();
    for name in ["Christian McCaffrey", "CeeDee Lamb", "Tyreek Hill", "Bijan Robinson"] {
        app.apply(Action::pick(name)).unwrap();
    }
    let s = app.snapshot();
    assert_eq!(s.owner_of(&"Bijan Robinson".into()), Some(0));
    assert_eq!(s.active_team, 1);
}

#[test]
fn flex_then_bench_overflow() {
    let mut app = four_team_app();
    // Team 1 takes every running back
    for name in ["Christian McCaffrey", "Bijan Robinson", "Breece Hall"] {
        app.apply(Action::SetActiveTeam { active_team: 0 }).unwrap();
        app.apply(Action::pick(name)).unwrap();
    }
    let s = app.snapshot();
    let team = &s.teams[0].roster;
    let slot = |name: &str| team.slot_of(&name.into()).map(|i| team.slots[i].position);
    assert_eq!(slot("Christian McCaffrey"), Some(Position::RunningBack));
    assert_eq!(slot("Bijan Robinson"), Some(Position::RunningBack));
    assert_eq!(slot("Breece Hall"), Some(Position::Flex));

    // Two QBs: the second goes to the bench
    for name in ["Josh Allen", "Jalen Hurts"] {
        app.apply(Action::SetActiveTeam { active_team: 0 }).unwrap();
        app.apply(Action::pick(name)).unwrap();
    }
    let s = app.snapshot();
    let team = &s.teams[0].roster;
    let idx = team.slot_of(&"Jalen Hurts".into()).unwrap();
    assert_eq!(team.slots[idx].position, Position::Bench);
}

#[test]
fn undo_is_exact_inverse() {
    let mut app = four_team_app();
    app.apply(Action::pick("Christian McCaffrey")).unwrap();
    let before = app.snapshot();

    app.apply(Action::select(Some("Josh Allen"))).unwrap();
    app.apply(Action::pick("Josh Allen")).unwrap();
    app.apply(Action::UndoPickPlayer).unwrap();

    let after = app.snapshot();
    assert_eq!(after.teams, before.teams);
    assert_eq!(after.undrafted, before.undrafted);
    assert_eq!(after.active_team, before.active_team);
    assert_eq!(after.round, before.round);
    assert_eq!(after.pick_in_round, before.pick_in_round);
    // Undo restores the selection that was active when the pick was made
    assert_eq!(after.selected_player.as_ref().map(|p| p.as_str()), Some("Josh Allen"));
}

#[test]
fn rejected_actions_leave_state_untouched() {
    let mut app = four_team_app();
    app.apply(Action::pick("Josh Allen")).unwrap();
    let before = app.snapshot();

    let cases = [
        (Action::pick("Josh Allen"), "not available"),
        (Action::pick("Nobody"), "not available"),
        (Action::SetTrackedTeam { tracked_team: 9 }, "out of range"),
        (Action::SetNumberOfTeams { number_of_teams: 6 }, "after 1 picks"),
        (Action::remove("Josh Allen"), "rostered"),
    ];
    for (action, fragment) in cases {
        let err = app.apply(action).unwrap_err();
        assert!(err.to_string().contains(fragment), "{} lacks {:?}", err, fragment);
        assert_eq!(*app.snapshot(), *before);
    }
    assert_eq!(app.db.action_count("integration").unwrap(), 2);
}

#[test]
fn small_league_runs_to_completion() {
    let roster: HashMap<String, usize> = [("QB".to_string(), 1), ("TE".to_string(), 1)]
        .into_iter()
        .collect();
    let db = Database::open(":memory:").unwrap();
    let mut app = AppState::new(league(2, DraftOrder::Snake, roster), db, "tiny".into());
    app.load_players(fixture_players()).unwrap();

    app.apply(Action::pick("Josh Allen")).unwrap();
    // No RB slot, no FLEX, no bench
    let err = app.apply(Action::pick("Christian McCaffrey")).unwrap_err();
    assert!(matches!(err, DraftError::NoEligibleSlot { team: 1, .. }));

    app.apply(Action::pick("Jalen Hurts")).unwrap();
    app.apply(Action::pick("Travis Kelce")).unwrap();
    assert_eq!(app.snapshot().status, DraftStatus::InProgress);
    app.apply(Action::pick("Mark Andrews")).unwrap();

    let s = app.snapshot();
    assert_eq!(s.status, DraftStatus::Complete);
    assert_eq!(s.owner_of(&"Travis Kelce".into()), Some(1));
    assert_eq!(s.owner_of(&"Mark Andrews".into()), Some(0));
    assert_eq!(app.apply(Action::pick("Breece Hall")).unwrap_err(), DraftError::DraftComplete);
    assert_eq!(app.apply(Action::IncrementDraft).unwrap_err(), DraftError::DraftComplete);

    // Undoing the final pick reopens the draft
    app.apply(Action::UndoPickPlayer).unwrap();
    assert_eq!(app.snapshot().status, DraftStatus::InProgress);
    assert_eq!(app.snapshot().active_team, 0);
}

// ===========================================================================
// Persistence and recovery
// ===========================================================================

#[test]
fn file_backed_recovery_across_sessions() {
    let dir = scratch_dir("recovery");
    let db_path = dir.join("draft.db");
    let cfg = league(4, DraftOrder::Snake, default_roster_config());

    let live = {
        let db = Database::open(db_path.to_str().unwrap()).unwrap();
        let draft_id = Database::generate_draft_id();
        db.set_draft_id(&draft_id).unwrap();
        let mut app = AppState::new(cfg.clone(), db, draft_id);
        app.load_players(fixture_players()).unwrap();
        for action in [
            Action::pick("Christian McCaffrey"),
            Action::pick("CeeDee Lamb"),
            Action::SetTrackedTeam { tracked_team: 2 },
            Action::remove("Mark Andrews"),
            Action::pick("Tyreek Hill"),
            Action::UndoPickPlayer,
        ] {
            app.apply(action).unwrap();
        }
        app.snapshot()
    };

    // New process: reopen the file and pick up the stored draft id
    let db = Database::open(db_path.to_str().unwrap()).unwrap();
    let draft_id = db.get_draft_id().unwrap().expect("draft id persisted");
    let mut restored = AppState::new(cfg, db, draft_id);
    assert!(app::recover_from_db(&mut restored).unwrap());

    let s = restored.snapshot();
    assert_eq!(s.teams, live.teams);
    assert_eq!(s.undrafted, live.undrafted);
    assert_eq!(s.tracked_team, 2);
    assert_eq!(s.active_team, live.active_team);
    assert!(s.player(&"Mark Andrews".into()).is_none());
    assert!(restored.notice.is_some());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn fresh_draft_id_starts_empty() {
    let db = Database::open(":memory:").unwrap();
    db.append_action("old_draft", &Action::pick("Josh Allen")).unwrap();
    let mut app = AppState::new(
        league(4, DraftOrder::Snake, default_roster_config()),
        db,
        Database::generate_draft_id(),
    );
    assert!(!app::recover_from_db(&mut app).unwrap());
    assert!(app.snapshot().players.is_empty());
}

// ===========================================================================
// Command channel
// ===========================================================================

#[tokio::test]
async fn command_channel_round_trip() {
    let app_state = four_team_app();
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (ui_tx, mut ui_rx) = mpsc::channel(16);
    let handle = tokio::spawn(app::run(cmd_rx, ui_tx, app_state));

    let Some(UiUpdate::Snapshot(initial)) = ui_rx.recv().await else {
        panic!("expected initial snapshot");
    };
    assert_eq!(initial.players.len(), 12);

    for cmd in [
        UserCommand::Dispatch(Action::select(Some("Josh Allen"))),
        UserCommand::Dispatch(Action::pick("Josh Allen")),
        UserCommand::Dispatch(Action::SetTrackedTeam { tracked_team: 1 }),
    ] {
        cmd_tx.send(cmd).await.unwrap();
    }

    let mut last = None;
    for _ in 0..3 {
        match ui_rx.recv().await {
            Some(UiUpdate::Snapshot(s)) => last = Some(s),
            other => panic!("expected snapshot, got {:?}", other),
        }
    }
    let last = last.unwrap();
    assert_eq!(last.owner_of(&"Josh Allen".into()), Some(0));
    assert_eq!(last.tracked_team, 1);
    assert!(last.selected_player.is_none());

    cmd_tx
        .send(UserCommand::Dispatch(Action::SetNumberOfTeams { number_of_teams: 0 }))
        .await
        .unwrap();
    match ui_rx.recv().await {
        Some(UiUpdate::Rejected(msg)) => assert!(msg.starts_with("SET_NUMBER_OF_TEAMS")),
        other => panic!("expected rejection, got {:?}", other),
    }

    cmd_tx.send(UserCommand::Quit).await.unwrap();
    handle.await.unwrap().unwrap();
}
