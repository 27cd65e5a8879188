//! End-to-end resolution of engine JSON through the public API.

use liftoff::prompt::PromptKind;
use liftoff::{
    Answer, Choice, DecodeError, Decision, ResolveContext, ResolveError, Resolution,
    ResolverConfig, ScriptedPrompter, Snapshot, resolve,
};
use serde_json::json;

const PERFORM_MANEUVER: usize = 4;

/// One juno rocket (4t) carrying two probes: total mass 3. Leaving for low
/// earth orbit is a fixed D1 profile; the moon has a variable D2 profile.
fn launch_pad() -> Snapshot {
    Snapshot::from_json_str(
        &json!({
            "year": 1960,
            "component_definitions": [
                {"id": "juno", "mass": 1, "cost": 1, "type": "rocket", "thrust": 4},
                {"id": "probe", "mass": 1, "type": "probe"},
                {"id": "moon_sample", "type": "sample", "location": "moon"}
            ],
            "advancement_definitions": [{"id": "juno_rockets"}],
            "locations": [
                {
                    "id": "earth",
                    "maneuvers": [
                        {"destination": "leo", "profiles": [{"difficulty": 1}]},
                        {"destination": "moon", "profiles": [{"difficulty": 2, "duration": 1}]}
                    ]
                },
                {"id": "leo"},
                {
                    "id": "moon",
                    "explorable": true,
                    "revealed": true,
                    "hazard": {
                        "flavor": "grey dust",
                        "effects": [{"type": "valuable_sample", "value": 8}]
                    }
                }
            ],
            "agencies": [{
                "id": "nasa",
                "funds": 0,
                "components": [
                    {"id": "r1", "definition": "juno"},
                    {"id": "p1", "definition": "probe"},
                    {"id": "p2", "definition": "probe"},
                    {"id": "x1", "definition": "moon_sample"}
                ],
                "spacecraft": [
                    {"id": "s1", "location": "earth", "component_ids": ["r1", "p1", "p2"]}
                ]
            }]
        })
        .to_string(),
    )
    .unwrap()
}

fn take_action() -> Decision {
    Decision::from_json_str(r#"{"type": "take_action", "agency_id": "nasa", "first_of_turn": true}"#)
        .unwrap()
}

fn run(
    snapshot: &Snapshot,
    decision: &Decision,
    answers: Vec<Answer>,
) -> (Result<Resolution, ResolveError>, ScriptedPrompter) {
    let config = ResolverConfig::builtin().unwrap();
    let ctx = ResolveContext::new(snapshot, &config);
    let mut prompter = ScriptedPrompter::new(answers);
    let resolution = resolve(ctx, decision, &mut prompter);
    (resolution, prompter)
}

fn choice_json(resolution: Resolution) -> serde_json::Value {
    match resolution {
        Resolution::Choice(choice) => serde_json::to_value(choice).unwrap(),
        Resolution::Exit => panic!("expected a choice, got an exit"),
    }
}

fn messages(prompter: &ScriptedPrompter) -> Vec<&str> {
    prompter
        .shown()
        .iter()
        .map(|shown| shown.message.as_str())
        .collect()
}

#[test]
fn test_single_rocket_lifts_mass_three_to_orbit() {
    let snapshot = launch_pad();
    let (resolution, prompter) = run(
        &snapshot,
        &take_action(),
        vec![
            Answer::Pick(PERFORM_MANEUVER),
            Answer::Pick(0),
            Answer::Pick(0),
            Answer::PickMany(vec![0]),
        ],
    );
    assert_eq!(
        choice_json(resolution.unwrap()),
        json!({
            "type": "take_action",
            "action": "perform_maneuver",
            "spacecraft_id": "s1",
            "maneuver_id": "earth_to_leo",
            "profile_index": 0,
            "duration_modifier": 0,
            "rocket_ids": ["r1"]
        })
    );
    assert_eq!(
        prompter.shown()[3].status.as_deref(),
        Some("select rockets; selected 4 thrust of 3 required")
    );
}

#[test]
fn test_fixed_profile_has_no_duration_step() {
    let snapshot = launch_pad();
    let (resolution, prompter) = run(
        &snapshot,
        &take_action(),
        vec![
            Answer::Pick(PERFORM_MANEUVER),
            Answer::Pick(0),
            Answer::Pick(0),
            Answer::PickMany(vec![0]),
        ],
    );
    assert!(resolution.is_ok());
    assert!(
        prompter
            .shown()
            .iter()
            .all(|shown| shown.kind != PromptKind::Number)
    );
}

#[test]
fn test_zero_rockets_forces_a_retry() {
    let snapshot = launch_pad();
    let (resolution, prompter) = run(
        &snapshot,
        &take_action(),
        vec![
            Answer::Pick(PERFORM_MANEUVER),
            Answer::Pick(0),
            Answer::Pick(0),
            Answer::PickMany(vec![]),
            Answer::PickMany(vec![0]),
        ],
    );
    assert_eq!(choice_json(resolution.unwrap())["rocket_ids"], json!(["r1"]));
    assert_eq!(prompter.notices(), ["insufficient thrust generated"]);
    assert_eq!(
        messages(&prompter),
        vec![
            "take an action",
            "select spacecraft",
            "select maneuver",
            "select rockets",
            "select rockets",
        ]
    );
}

#[test]
fn test_backtracking_rederives_the_profile_step() {
    let snapshot = launch_pad();
    // Pick the moon, back out of the duration step, then settle for orbit.
    let (resolution, prompter) = run(
        &snapshot,
        &take_action(),
        vec![
            Answer::Pick(PERFORM_MANEUVER),
            Answer::Pick(0),
            Answer::Pick(1),
            Answer::Cancel,
            Answer::Pick(0),
            Answer::PickMany(vec![0]),
        ],
    );
    assert_eq!(
        choice_json(resolution.unwrap())["maneuver_id"],
        json!("earth_to_leo")
    );
    assert_eq!(
        messages(&prompter),
        vec![
            "take an action",
            "select spacecraft",
            "select maneuver",
            "select duration modifier",
            "select maneuver",
            "select rockets",
        ]
    );
}

#[test]
fn test_leaving_the_menu_asks_before_exiting() {
    let snapshot = launch_pad();
    let (resolution, prompter) = run(
        &snapshot,
        &take_action(),
        vec![Answer::Cancel, Answer::Confirm(true)],
    );
    assert_eq!(resolution.unwrap(), Resolution::Exit);
    assert_eq!(
        messages(&prompter),
        vec!["take an action", "really exit? your progress will be lost"]
    );

    let (resolution, _) = run(
        &snapshot,
        &take_action(),
        vec![Answer::Cancel, Answer::Default, Answer::Pick(13)],
    );
    assert_eq!(
        choice_json(resolution.unwrap()),
        json!({"type": "take_action", "action": "end_turn", "pass": true})
    );
}

#[test]
fn test_unexpected_decisions_are_rejected() {
    let snapshot = launch_pad();
    let cooperate = Decision::from_json_str(r#"{"type": "cooperate"}"#).unwrap();
    let (resolution, prompter) = run(&snapshot, &cooperate, vec![]);
    assert!(matches!(
        resolution,
        Err(ResolveError::UnexpectedDecision(kind)) if kind == "cooperate"
    ));
    assert!(prompter.shown().is_empty());

    assert!(matches!(
        Decision::from_json_str(r#"{"type": "trade_components", "agency_id": "nasa"}"#),
        Err(DecodeError::UnknownKind(kind)) if kind == "trade_components"
    ));
}

#[test]
fn test_reveal_location_asks_again_when_dismissed() {
    let snapshot = launch_pad();
    let decision = Decision::from_json_str(
        r#"{"type": "reveal_location", "agency_id": "nasa", "location_id": "moon",
            "location_hazard": {"flavor": "grey dust",
                                "effects": [{"type": "valuable_sample", "value": 8}]}}"#,
    )
    .unwrap();
    let (resolution, prompter) = run(&snapshot, &decision, vec![Answer::Cancel, Answer::Default]);
    assert_eq!(
        resolution.unwrap(),
        Resolution::Choice(Choice::RevealLocation { reveal: true })
    );
    assert_eq!(prompter.shown().len(), 2);
    assert_eq!(
        prompter.shown()[0].message,
        "grey dust.\nvaluable_sample ($8)\nreveal moon?"
    );
}

#[test]
fn test_valuable_sample_cannot_be_dismissed() {
    let snapshot = launch_pad();
    let decision = Decision::from_json_str(
        r#"{"type": "turn_in_valuable_sample", "agency_id": "nasa", "sample_id": "x1"}"#,
    )
    .unwrap();
    let (resolution, prompter) = run(&snapshot, &decision, vec![Answer::Cancel]);
    assert!(matches!(
        resolution,
        Err(ResolveError::DecisionAborted { kind: "turn_in_valuable_sample" })
    ));
    assert_eq!(prompter.shown()[0].message, "turn in moon_sample for $8");
}
