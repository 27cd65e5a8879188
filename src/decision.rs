//! Decisions raised by the engine and the choices that answer them.
//!
//! A [`Decision`] names what the engine is waiting for and carries the context
//! needed to ask it (which agency, which spacecraft, which maneuver is in
//! progress). Resolving it yields a [`Choice`] of the matching shape, or a
//! request to exit.

use crate::ids::{
    AdvancementId, AgencyId, ComponentId, DefinitionId, LocationId, ManeuverId, SpacecraftId,
};
use crate::prompt::PromptError;
use crate::snapshot::{LocationHazard, LookupError, Outcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Decisions
// ============================================================================

/// A pending decision, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Decision {
    /// The agency's main action menu.
    TakeAction {
        agency_id: AgencyId,
        /// Ending the turn on its first action counts as passing.
        #[serde(default)]
        first_of_turn: bool,
    },
    /// Pay to discard the outcome card just drawn for an advancement.
    DiscardOutcome {
        agency_id: AgencyId,
        advancement_id: AdvancementId,
        outcome: Outcome,
    },
    /// A maneuver was interrupted (by a failed rocket or a hazard) and may be
    /// continued with the remaining propulsion.
    ContinueManeuver {
        agency_id: AgencyId,
        spacecraft_id: SpacecraftId,
        maneuver_id: ManeuverId,
        profile_index: usize,
        #[serde(default)]
        duration_modifier: i32,
        /// Rockets the operator originally picked.
        #[serde(default)]
        rocket_ids: Vec<ComponentId>,
        /// Rockets already fired; they cannot fire again.
        #[serde(default)]
        spent_rocket_ids: Vec<ComponentId>,
        /// Thrust already delivered before the interruption.
        #[serde(default)]
        generated_thrust: u32,
    },
    /// Reveal the hazard of the location a spacecraft just arrived at.
    RevealLocation {
        agency_id: AgencyId,
        location_id: LocationId,
        location_hazard: LocationHazard,
    },
    /// Attempt an optional landing.
    EncounterLanding { agency_id: AgencyId },
    /// Pick a component to take damage.
    DamageComponent {
        agency_id: AgencyId,
        spacecraft_id: SpacecraftId,
        /// Set when damage can land on either of two docked spacecraft.
        #[serde(default)]
        second_spacecraft_id: Option<SpacecraftId>,
    },
    /// Seat the astronauts of a spacecraft in its capsules.
    AssignAstronauts {
        agency_id: AgencyId,
        spacecraft_id: SpacecraftId,
    },
    /// Joint decisions between agencies.
    Cooperate,
    /// Choose which astronauts the life support keeps alive.
    LifeSupport {
        agency_id: AgencyId,
        spacecraft_id: SpacecraftId,
        capacity: usize,
    },
    TurnInValuableSample {
        agency_id: AgencyId,
        sample_id: ComponentId,
    },
    TurnInAlienSample {
        agency_id: AgencyId,
        sample_id: ComponentId,
    },
    /// The game is over.
    None,
}

impl Decision {
    /// The wire name of the decision kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Decision::TakeAction { .. } => "take_action",
            Decision::DiscardOutcome { .. } => "discard_outcome",
            Decision::ContinueManeuver { .. } => "continue_maneuver",
            Decision::RevealLocation { .. } => "reveal_location",
            Decision::EncounterLanding { .. } => "encounter_landing",
            Decision::DamageComponent { .. } => "damage_component",
            Decision::AssignAstronauts { .. } => "assign_astronauts",
            Decision::Cooperate => "cooperate",
            Decision::LifeSupport { .. } => "life_support",
            Decision::TurnInValuableSample { .. } => "turn_in_valuable_sample",
            Decision::TurnInAlienSample { .. } => "turn_in_alien_sample",
            Decision::None => "none",
        }
    }

    /// Parse a decision from JSON.
    ///
    /// Unknown kinds are reported as [`DecodeError::UnknownKind`] rather than a
    /// parse failure, so the caller can answer them with
    /// [`ResolveError::UnexpectedDecision`].
    pub fn from_json_str(json: &str) -> Result<Self, DecodeError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        serde_json::from_value(value).map_err(|source| match kind {
            Some(kind) if !KNOWN_KINDS.contains(&kind.as_str()) => DecodeError::UnknownKind(kind),
            _ => DecodeError::Json(source),
        })
    }
}

const KNOWN_KINDS: &[&str] = &[
    "take_action",
    "discard_outcome",
    "continue_maneuver",
    "reveal_location",
    "encounter_landing",
    "damage_component",
    "assign_astronauts",
    "cooperate",
    "life_support",
    "turn_in_valuable_sample",
    "turn_in_alien_sample",
    "none",
];

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed decision: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown decision kind: {0}")]
    UnknownKind(String),
}

// ============================================================================
// Choices
// ============================================================================

/// The answer to a decision, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Choice {
    TakeAction(ActionChoice),
    DiscardOutcome {
        discard: bool,
    },
    ContinueManeuver {
        proceed: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_modifier: Option<i32>,
        #[serde(default)]
        rocket_ids: Vec<ComponentId>,
    },
    RevealLocation {
        reveal: bool,
    },
    EncounterLanding {
        encounter: bool,
    },
    DamageComponent {
        /// `None` when nothing aboard can take the damage.
        component_id: Option<ComponentId>,
    },
    AssignAstronauts {
        /// Capsule id to the astronauts seated in it.
        capsule_assignments: BTreeMap<ComponentId, Vec<ComponentId>>,
    },
    LifeSupport {
        astronaut_ids: Vec<ComponentId>,
    },
    TurnInValuableSample {
        turn_in: bool,
    },
    TurnInAlienSample {
        turn_in: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        advancement_id: Option<AdvancementId>,
    },
}

/// A take-action choice, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionChoice {
    ResearchAdvancement {
        advancement_id: AdvancementId,
    },
    BuyComponent {
        component_definition_id: DefinitionId,
    },
    AssembleSpacecraft {
        component_ids: Vec<ComponentId>,
    },
    DisassembleSpacecraft {
        spacecraft_id: SpacecraftId,
    },
    PerformManeuver {
        spacecraft_id: SpacecraftId,
        maneuver_id: ManeuverId,
        profile_index: usize,
        duration_modifier: i32,
        rocket_ids: Vec<ComponentId>,
    },
    DockSpacecraft {
        first_spacecraft_id: SpacecraftId,
        second_spacecraft_id: SpacecraftId,
    },
    SeparateSpacecraft {
        spacecraft_id: SpacecraftId,
        first_component_ids: Vec<ComponentId>,
        second_component_ids: Vec<ComponentId>,
    },
    SurveyLocation {
        spacecraft_id: SpacecraftId,
        location_id: LocationId,
        component_id: ComponentId,
    },
    CollectSample {
        spacecraft_id: SpacecraftId,
    },
    CollectSupplies {
        spacecraft_id: SpacecraftId,
    },
    RepairComponents {
        spacecraft_id: SpacecraftId,
    },
    HealAstronauts {
        spacecraft_id: SpacecraftId,
    },
    DiscardExplorer {
        spacecraft_id: SpacecraftId,
    },
    EndTurn {
        pass: bool,
    },
}

/// What resolving a decision produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Choice(Choice),
    /// The operator asked to quit from the action menu.
    Exit,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    NotFound(#[from] LookupError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    /// The operator backed out of a decision that has to be answered.
    #[error("{kind} decision was abandoned")]
    DecisionAborted { kind: &'static str },
    #[error("cannot resolve a {0} decision")]
    UnexpectedDecision(String),
    /// A step ran before the step it depends on had committed a value.
    #[error("{chain} chain has no committed {missing}")]
    IncompleteChain {
        chain: &'static str,
        missing: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_action_choice_is_flat_on_the_wire() {
        let choice = Choice::TakeAction(ActionChoice::EndTurn { pass: true });
        let json = serde_json::to_value(&choice).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "take_action", "action": "end_turn", "pass": true})
        );
        let back: Choice = serde_json::from_value(json).unwrap();
        assert_eq!(back, choice);
    }

    #[test]
    fn test_continue_maneuver_decision_defaults() {
        let decision = Decision::from_json_str(
            r#"{"type": "continue_maneuver", "agency_id": "nasa", "spacecraft_id": "s1",
                "maneuver_id": "earth_to_leo", "profile_index": 0}"#,
        )
        .unwrap();
        match decision {
            Decision::ContinueManeuver {
                duration_modifier,
                rocket_ids,
                generated_thrust,
                ..
            } => {
                assert_eq!(duration_modifier, 0);
                assert!(rocket_ids.is_empty());
                assert_eq!(generated_thrust, 0);
            }
            other => panic!("unexpected decision {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_is_distinguished_from_malformed_json() {
        assert!(matches!(
            Decision::from_json_str(r#"{"type": "launch_party"}"#),
            Err(DecodeError::UnknownKind(kind)) if kind == "launch_party"
        ));
        assert!(matches!(
            Decision::from_json_str(r#"{"type": "take_action"}"#),
            Err(DecodeError::Json(_))
        ));
        assert_eq!(
            Decision::from_json_str(r#"{"type": "cooperate"}"#)
                .unwrap()
                .kind(),
            "cooperate"
        );
    }
}
