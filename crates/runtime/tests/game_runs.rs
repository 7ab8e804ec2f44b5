//! End-to-end runs through the engine loop: configuration in, scripted
//! agents, results and session artifacts out.

use parlour_content::ConfigLoader;
use parlour_core::{
    AssignmentRule, AssignmentTarget, GameConfig, GameMeta, PhaseConfig, PhaseKind, PlayerBounds,
    PlayerId, RoundProgression, RoundsConfig, StateFieldConfig, Tracking, Winner,
};
use parlour_runtime::recorder::JsonlLog;
use parlour_runtime::{
    EngineBuilder, EngineError, EngineEvent, FileRecorder, LogRecord, MockAgent, SessionRecorder,
};
use serde_json::json;

const DILEMMA_TOML: &str = r#"
[game]
name = "prisoners_dilemma"
description = "Iterated prisoner's dilemma between two agents."

[players]
min = 2
max = 2

[[phases]]
id = "decision"
type = "simultaneous_action"
handler = "dilemma_decision"
next_phase = "scoring"

[[phases]]
id = "scoring"
type = "automatic"
handler = "dilemma_scoring"
next_phase = "round_check"

[phases.params.payoff]
cooperate_cooperate = [3, 3]
defect_cooperate = [5, 0]
cooperate_defect = [0, 5]
defect_defect = [1, 1]

[[phases]]
id = "round_check"
type = "automatic"
handler = "round_progression"
next_phase_condition = "rounds_remaining"
next_phase_success = "decision"
next_phase_failure = "game_end"

[rounds]
count = 5

[win_condition]
type = "highest_score"
score_field = "score"

[[state.player_state]]
name = "score"
initial = 0

[[state.shared_state]]
name = "current_round"
initial = 1

[[state.history_state]]
name = "decision_history"
initial = []
tracking = "decision"
"#;

fn dilemma_agent() -> MockAgent {
    MockAgent::new()
        .with_sequence(
            "decision",
            "player_1",
            ["cooperate", "cooperate", "cooperate", "defect", "defect"].map(|c| json!(c)),
        )
        .with_sequence(
            "decision",
            "player_2",
            ["cooperate", "cooperate", "defect", "defect", "defect"].map(|c| json!(c)),
        )
}

#[test]
fn five_round_dilemma_produces_expected_scores_and_winner() {
    let config = ConfigLoader::load_str(DILEMMA_TOML).unwrap();
    let report = EngineBuilder::new(config)
        .agent(dilemma_agent())
        .build()
        .unwrap()
        .run()
        .unwrap();

    // CC, CC, CD, DD, DD -> 3+3+0+1+1 vs 3+3+5+1+1
    let score = |id: &str| {
        report
            .results
            .players
            .iter()
            .find(|p| p.id.as_str() == id)
            .and_then(|p| p.state.get("score"))
            .and_then(serde_json::Value::as_i64)
            .unwrap()
    };
    assert_eq!(score("player_1"), 8);
    assert_eq!(score("player_2"), 13);
    assert_eq!(
        report.results.winner,
        Some(Winner::Player {
            id: PlayerId::new("player_2")
        })
    );
    assert_eq!(report.results.history_summary["decision_history"], 5);
    assert_eq!(report.results.rounds_played, 5);
}

#[test]
fn dilemma_session_directory_holds_the_full_record() {
    let base = tempfile::TempDir::new().unwrap();
    let config = ConfigLoader::load_str(DILEMMA_TOML).unwrap();
    let recorder = FileRecorder::create(base.path(), &config.game.name).unwrap();
    let dir = recorder.dir().to_path_buf();
    let session_id = recorder.session_id().to_string();

    let report = EngineBuilder::new(config.clone())
        .agent(dilemma_agent())
        .recorder(recorder)
        .build()
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(report.session_id, session_id);

    // Configuration copy is byte-stable against a reserialize.
    let stored: GameConfig =
        serde_json::from_str(&std::fs::read_to_string(dir.join("config.json")).unwrap()).unwrap();
    assert_eq!(stored, config);

    let records = JsonlLog::<LogRecord>::read_all(&dir.join("game_log.jsonl")).unwrap();
    assert!(records.iter().all(|r| match r {
        LogRecord::Snapshot { session_id: s, .. } | LogRecord::Event { session_id: s, .. } =>
            s == &session_id,
    }));

    // One initial snapshot plus one per completed phase (3 phases x 5 rounds).
    let snapshots: Vec<_> = records
        .iter()
        .filter_map(|r| match r {
            LogRecord::Snapshot { snapshot, .. } => Some(snapshot),
            LogRecord::Event { .. } => None,
        })
        .collect();
    assert_eq!(snapshots.len(), 16);
    assert_eq!(snapshots[0].phase, "initial");
    assert_eq!(snapshots[1].phase, "decision");

    // Chat log captured every agent interaction: 2 players x 5 rounds.
    let chat =
        JsonlLog::<parlour_runtime::ChatEntry>::read_all(&dir.join("chat_log.jsonl")).unwrap();
    assert_eq!(chat.len(), 10);
    assert!(chat.iter().all(|c| c.phase_id == "decision"));

    let results = std::fs::read_to_string(dir.join("results.json")).unwrap();
    assert!(results.contains("player_2"));
}

#[test]
fn chat_entries_survive_a_phase_that_aborts_mid_collection() {
    let base = tempfile::TempDir::new().unwrap();
    let config = ConfigLoader::load_str(DILEMMA_TOML).unwrap();
    let recorder = FileRecorder::create(base.path(), &config.game.name).unwrap();
    let dir = recorder.dir().to_path_buf();

    // Only player_1 is scripted; player_2's turn fails the run.
    let err = EngineBuilder::new(config)
        .agent(MockAgent::new().with_response("decision", "player_1", 1, json!("cooperate")))
        .recorder(recorder)
        .build()
        .unwrap()
        .run()
        .unwrap_err();
    assert!(matches!(err, EngineError::Agent { .. }));

    let chat =
        JsonlLog::<parlour_runtime::ChatEntry>::read_all(&dir.join("chat_log.jsonl")).unwrap();
    assert_eq!(chat.len(), 1);
    assert_eq!(chat[0].player_id, PlayerId::new("player_1"));
    assert_eq!(chat[0].action, json!("cooperate"));
}

fn single_prompter_config(assignments: Vec<AssignmentRule>) -> GameConfig {
    let mut config = GameConfig {
        game: GameMeta {
            name: "prompt_game".to_string(),
            description: String::new(),
        },
        players: PlayerBounds { min: 3, max: 3 },
        phases: vec![
            PhaseConfig::new("prompt", PhaseKind::SinglePlayerAction)
                .with_eligible_role("prompter"),
        ],
        state: Default::default(),
        rounds: Default::default(),
        setup: Default::default(),
        win_condition: Default::default(),
        agents: Default::default(),
        engine: Default::default(),
    };
    config
        .state
        .shared_state
        .push(StateFieldConfig::new("current_round", json!(1)));
    config.setup.assignments = assignments;
    config
}

#[test]
fn single_player_phase_routes_to_the_sole_role_holder() {
    let base = tempfile::TempDir::new().unwrap();
    let config = single_prompter_config(vec![AssignmentRule {
        role: "prompter".to_string(),
        target: AssignmentTarget::Player("player_2".to_string()),
    }]);
    let recorder = FileRecorder::create(base.path(), &config.game.name).unwrap();
    let dir = recorder.dir().to_path_buf();

    EngineBuilder::new(config)
        .agent(MockAgent::new().with_response("prompt", "player_2", 1, json!("name an animal")))
        .recorder(recorder)
        .build()
        .unwrap()
        .run()
        .unwrap();

    let records = JsonlLog::<LogRecord>::read_all(&dir.join("game_log.jsonl")).unwrap();
    let actors: Vec<String> = records
        .iter()
        .filter_map(|r| match r {
            LogRecord::Event {
                event: EngineEvent::PlayerActionStart { player_id, .. },
                ..
            } => Some(player_id.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(actors, vec!["player_2"]);

    let responses = records
        .iter()
        .rev()
        .find_map(|r| match r {
            LogRecord::Snapshot { snapshot, .. } => snapshot.shared.get("prompt_responses"),
            LogRecord::Event { .. } => None,
        })
        .unwrap();
    assert_eq!(responses, &json!({"player_2": "name an animal"}));
}

#[test]
fn single_player_phase_without_exactly_one_holder_is_fatal() {
    // Nobody holds the role.
    let err = EngineBuilder::new(single_prompter_config(Vec::new()))
        .agent(MockAgent::new())
        .build()
        .unwrap()
        .run()
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::NoEligiblePlayer { found: 0, .. }
    ));

    // Everybody does.
    let err = EngineBuilder::new(single_prompter_config(vec![AssignmentRule {
        role: "prompter".to_string(),
        target: AssignmentTarget::AllPlayers,
    }]))
    .agent(MockAgent::new())
    .build()
    .unwrap()
    .run()
    .unwrap_err();
    assert!(matches!(
        err,
        EngineError::NoEligiblePlayer { found: 3, .. }
    ));
}

#[test]
fn sequential_phase_snapshots_each_action_and_tracks_progress() {
    let base = tempfile::TempDir::new().unwrap();
    let mut bid = PhaseConfig::new("bid", PhaseKind::SequentialAction);
    bid.snapshot_per_action = true;
    let mut config = GameConfig {
        game: GameMeta {
            name: "auction".to_string(),
            description: String::new(),
        },
        players: PlayerBounds { min: 3, max: 3 },
        phases: vec![bid],
        state: Default::default(),
        rounds: Default::default(),
        setup: Default::default(),
        win_condition: Default::default(),
        agents: Default::default(),
        engine: Default::default(),
    };
    config
        .state
        .shared_state
        .push(StateFieldConfig::new("current_round", json!(1)));

    let recorder = FileRecorder::create(base.path(), &config.game.name).unwrap();
    let dir = recorder.dir().to_path_buf();
    EngineBuilder::new(config)
        .agent(
            MockAgent::new()
                .with_response("bid", "player_1", 1, json!(10))
                .with_response("bid", "player_2", 1, json!(20))
                .with_response("bid", "player_3", 1, json!(15)),
        )
        .recorder(recorder)
        .build()
        .unwrap()
        .run()
        .unwrap();

    let records = JsonlLog::<LogRecord>::read_all(&dir.join("game_log.jsonl")).unwrap();
    let snapshots: Vec<_> = records
        .iter()
        .filter_map(|r| match r {
            LogRecord::Snapshot { snapshot, .. } => Some(snapshot),
            LogRecord::Event { .. } => None,
        })
        .collect();
    // Initial, one per player action, one for the completed phase.
    assert_eq!(snapshots.len(), 5);

    // Mid-phase snapshots expose partial responses and seat progress.
    let after_second = snapshots[2];
    assert_eq!(after_second.shared.get("current_player_index"), Some(&json!(2)));
    assert_eq!(
        after_second.shared.get("bid_responses"),
        Some(&json!({"player_1": 10, "player_2": 20}))
    );

    // Phase end resets the seat cursor and keeps the full response map.
    let last = snapshots[4];
    assert_eq!(last.shared.get("current_player_index"), Some(&json!(0)));
    assert_eq!(
        last.shared.get("bid_responses"),
        Some(&json!({"player_1": 10, "player_2": 20, "player_3": 15}))
    );
}

fn vote_until_last_config() -> GameConfig {
    let mut config = GameConfig {
        game: GameMeta {
            name: "vote_out".to_string(),
            description: String::new(),
        },
        players: PlayerBounds { min: 4, max: 4 },
        phases: vec![
            PhaseConfig::new("vote", PhaseKind::SimultaneousAction)
                .with_handler("elimination_vote")
                .with_param("tiebreaker", json!("first"))
                .with_next_phase("round_check"),
            PhaseConfig::new("round_check", PhaseKind::Automatic)
                .with_handler("round_progression")
                .with_condition("players_remaining", "vote", "game_end"),
        ],
        state: Default::default(),
        rounds: RoundsConfig {
            count: 1,
            progression: RoundProgression::UntilWinCondition,
        },
        setup: Default::default(),
        win_condition: Default::default(),
        agents: Default::default(),
        engine: Default::default(),
    };
    config
        .state
        .shared_state
        .push(StateFieldConfig::new("current_round", json!(1)));
    config
        .state
        .history_state
        .push(StateFieldConfig::new("elimination_record", json!([])));
    config.state.history_state.push(
        StateFieldConfig::new("vote_history", json!([]))
            .tracking(Tracking::One("vote".to_string())),
    );
    config
}

#[test]
fn elimination_votes_run_down_to_a_last_player_standing() {
    let agent = MockAgent::new()
        // Round 1: player_3 is voted out 3-1.
        .with_response("vote", "player_1", 1, json!("player_3"))
        .with_response("vote", "player_2", 1, json!("player_3"))
        .with_response("vote", "player_3", 1, json!("player_1"))
        .with_response("vote", "player_4", 1, json!("player_3"))
        // Round 2: player_4 goes 2-1.
        .with_response("vote", "player_1", 2, json!("player_4"))
        .with_response("vote", "player_2", 2, json!("player_4"))
        .with_response("vote", "player_4", 2, json!("player_1"))
        // Round 3: 1-1 tie, seating-order tie-break removes player_1.
        .with_response("vote", "player_1", 3, json!("player_2"))
        .with_response("vote", "player_2", 3, json!("player_1"));

    let report = EngineBuilder::new(vote_until_last_config())
        .agent(agent)
        .seed(42)
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(
        report.results.winner,
        Some(Winner::Player {
            id: PlayerId::new("player_2")
        })
    );
    assert_eq!(report.results.history_summary["elimination_record"], 3);
    assert_eq!(report.results.history_summary["vote_history"], 3);
    assert_eq!(report.results.rounds_played, 3);
    // All four players remain in the results document, eliminated included.
    assert_eq!(report.results.players.len(), 4);
}
