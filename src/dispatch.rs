//! Routes a decision to the resolver for its kind.

use crate::actions::ActionKind;
use crate::config::ResolveContext;
use crate::decision::{ActionChoice, Choice, Decision, Resolution, ResolveError};
use crate::decisions::{self, ManeuverInProgress};
use crate::ids::AgencyId;
use crate::prompt::{Choices, Prompter, Selection, select_value};
use tracing::{debug, info};

const EXIT_PROMPT: &str = "really exit? your progress will be lost";

/// Resolve `decision` into a choice, or an exit request from the action menu.
pub fn resolve(
    ctx: ResolveContext<'_>,
    decision: &Decision,
    prompter: &mut dyn Prompter,
) -> Result<Resolution, ResolveError> {
    info!(kind = decision.kind(), "resolving decision");
    let choice = match decision {
        Decision::TakeAction {
            agency_id,
            first_of_turn,
        } => return take_action(ctx, agency_id, *first_of_turn, prompter),
        Decision::DiscardOutcome {
            agency_id,
            advancement_id,
            outcome,
        } => decisions::discard_outcome(ctx, agency_id, advancement_id, *outcome, prompter)?,
        Decision::ContinueManeuver {
            agency_id: _,
            spacecraft_id,
            maneuver_id,
            profile_index,
            duration_modifier,
            rocket_ids,
            spent_rocket_ids,
            generated_thrust,
        } => {
            let maneuver = ManeuverInProgress {
                spacecraft_id,
                maneuver_id,
                profile_index: *profile_index,
                duration_modifier: *duration_modifier,
                rocket_ids,
                spent_rocket_ids,
                generated_thrust: *generated_thrust,
            };
            decisions::continue_maneuver(ctx, maneuver, prompter)?
        }
        Decision::RevealLocation {
            location_id,
            location_hazard,
            ..
        } => decisions::reveal_location(ctx, location_id, location_hazard, prompter)?,
        Decision::EncounterLanding { agency_id } => {
            decisions::encounter_landing(ctx, agency_id, prompter)?
        }
        Decision::DamageComponent {
            spacecraft_id,
            second_spacecraft_id,
            ..
        } => decisions::damage_component(
            ctx,
            spacecraft_id,
            second_spacecraft_id.as_ref(),
            prompter,
        )?,
        Decision::AssignAstronauts { spacecraft_id, .. } => {
            decisions::assign_astronauts(ctx, spacecraft_id, prompter)?
        }
        Decision::LifeSupport {
            spacecraft_id,
            capacity,
            ..
        } => decisions::life_support(ctx, spacecraft_id, *capacity, prompter)?,
        Decision::TurnInValuableSample { sample_id, .. } => {
            decisions::turn_in_valuable_sample(ctx, sample_id, prompter)?
        }
        Decision::TurnInAlienSample {
            agency_id,
            sample_id,
        } => decisions::turn_in_alien_sample(ctx, agency_id, sample_id, prompter)?,
        Decision::Cooperate | Decision::None => {
            return Err(ResolveError::UnexpectedDecision(decision.kind().to_string()));
        }
    };
    info!(?choice, "decision resolved");
    Ok(Resolution::Choice(choice))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuEntry {
    Action(ActionKind),
    EndTurn,
}

/// The action menu. Backing out of a sub-action returns here; backing out of
/// the menu itself offers to exit.
fn take_action(
    ctx: ResolveContext<'_>,
    agency: &AgencyId,
    first_of_turn: bool,
    prompter: &mut dyn Prompter,
) -> Result<Resolution, ResolveError> {
    loop {
        let mut menu = Choices::new();
        for kind in ActionKind::ALL {
            menu.push(kind.label(), MenuEntry::Action(kind), !kind.is_available(ctx, agency)?);
        }
        menu.push("end turn", MenuEntry::EndTurn, false);

        match select_value(prompter, "take an action", &menu)? {
            Selection::Chosen(MenuEntry::EndTurn) => {
                let choice = Choice::TakeAction(ActionChoice::EndTurn {
                    pass: first_of_turn,
                });
                info!(?choice, "decision resolved");
                return Ok(Resolution::Choice(choice));
            }
            Selection::Chosen(MenuEntry::Action(kind)) => {
                if let Some(action) = kind.resolve(ctx, agency, prompter)? {
                    let choice = Choice::TakeAction(action);
                    info!(?choice, "decision resolved");
                    return Ok(Resolution::Choice(choice));
                }
                debug!(action = kind.label(), "action abandoned; back to the menu");
            }
            Selection::Cancelled => {
                if prompter.confirm(EXIT_PROMPT, false)?.chosen() == Some(true) {
                    info!("operator exited from the action menu");
                    return Ok(Resolution::Exit);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::ids::AdvancementId;
    use crate::prompt::{Answer, ScriptedPrompter};
    use crate::snapshot::Snapshot;
    use crate::tests::fixtures::SnapshotBuilder;

    fn world() -> Snapshot {
        SnapshotBuilder::new()
            .location("earth")
            .advancement_definition("juno_rockets")
            .agency("nasa", 10)
            .build()
    }

    fn take_action_decision(first_of_turn: bool) -> Decision {
        Decision::TakeAction {
            agency_id: AgencyId::new("nasa"),
            first_of_turn,
        }
    }

    #[test]
    fn test_menu_disables_unavailable_actions() {
        let snapshot = world();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let mut prompter = ScriptedPrompter::new([Answer::Pick(13)]);
        assert_eq!(
            resolve(ctx, &take_action_decision(true), &mut prompter).unwrap(),
            Resolution::Choice(Choice::TakeAction(ActionChoice::EndTurn { pass: true }))
        );
        let menu = &prompter.shown()[0].options;
        assert_eq!(menu.len(), 14);
        assert!(!menu[0].disabled);
        assert!(menu[1..13].iter().all(|option| option.disabled));
        assert_eq!(menu[13].label, "end turn");
    }

    #[test]
    fn test_backing_out_of_an_action_reoffers_the_menu() {
        let snapshot = world();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let mut prompter = ScriptedPrompter::new([
            Answer::Pick(0),
            Answer::Cancel,
            Answer::Pick(0),
            Answer::Pick(0),
        ]);
        assert_eq!(
            resolve(ctx, &take_action_decision(false), &mut prompter).unwrap(),
            Resolution::Choice(Choice::TakeAction(ActionChoice::ResearchAdvancement {
                advancement_id: AdvancementId::new("juno_rockets"),
            }))
        );
        let messages: Vec<&str> = prompter.shown().iter().map(|s| s.message.as_str()).collect();
        assert_eq!(messages[0], "take an action");
        assert_eq!(messages[2], "take an action");
    }

    #[test]
    fn test_exit_needs_confirmation() {
        let snapshot = world();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let mut prompter = ScriptedPrompter::new([
            Answer::Cancel,
            Answer::Default,
            Answer::Cancel,
            Answer::Confirm(true),
        ]);
        assert_eq!(
            resolve(ctx, &take_action_decision(false), &mut prompter).unwrap(),
            Resolution::Exit
        );
        assert_eq!(prompter.shown()[1].message, EXIT_PROMPT);
        assert_eq!(prompter.shown()[2].message, "take an action");
    }

    #[test]
    fn test_cooperate_and_none_are_unexpected() {
        let snapshot = world();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let mut prompter = ScriptedPrompter::new([]);
        for decision in [Decision::Cooperate, Decision::None] {
            assert!(matches!(
                resolve(ctx, &decision, &mut prompter),
                Err(ResolveError::UnexpectedDecision(_))
            ));
        }
    }
}
