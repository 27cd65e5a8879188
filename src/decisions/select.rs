//! Decisions answered by picking one option.

use super::{CancelPolicy, settle};
use crate::actions::SelectOne;
use crate::config::ResolveContext;
use crate::decision::{Choice, ResolveError};
use crate::format::{ComponentDetail, component_label, outcome_label};
use crate::ids::{AdvancementId, AgencyId, ComponentId, SpacecraftId};
use crate::prompt::{Choices, Prompter};
use crate::snapshot::Outcome;

/// Pay to discard an outcome card, or return it to the advancement.
pub fn discard_outcome(
    ctx: ResolveContext<'_>,
    agency_id: &AgencyId,
    advancement_id: &AdvancementId,
    outcome: Outcome,
    prompter: &mut dyn Prompter,
) -> Result<Choice, ResolveError> {
    let funds = ctx.snapshot.agency(agency_id)?.funds;
    let fee = ctx.config.discard_fee(outcome);

    let mut choices = Choices::new();
    choices.push("discard", true, funds < fee);
    choices.push("return to advancement", false, false);
    let message = format!(
        "decide what to do with {} from {}",
        outcome_label(outcome),
        advancement_id
    );

    let discard = settle("discard_outcome", CancelPolicy::Retry, prompter, |prompter| {
        SelectOne::new("discard_outcome", message.as_str(), choices.clone()).run(prompter)
    })?;
    Ok(Choice::DiscardOutcome { discard })
}

/// Pick the component that takes damage, from one spacecraft or two docked
/// ones. When nothing aboard can still be damaged, no component is chosen.
pub fn damage_component(
    ctx: ResolveContext<'_>,
    spacecraft_id: &SpacecraftId,
    second_spacecraft_id: Option<&SpacecraftId>,
    prompter: &mut dyn Prompter,
) -> Result<Choice, ResolveError> {
    let snapshot = ctx.snapshot;
    let mut choices = Choices::new();
    for spacecraft in std::iter::once(spacecraft_id).chain(second_spacecraft_id) {
        for id in &snapshot.spacecraft(spacecraft)?.component_ids {
            let component = snapshot.component(id)?;
            if !snapshot.definition(&component.definition)?.kind.is_damageable() {
                continue;
            }
            choices.push(
                component_label(snapshot, id, ComponentDetail::NONE)?,
                id.clone(),
                component.damaged,
            );
        }
    }

    if choices.all_disabled() {
        return Ok(Choice::DamageComponent { component_id: None });
    }

    let component_id = settle("damage_component", CancelPolicy::Retry, prompter, |prompter| {
        SelectOne::new("damage_component", "select a component to damage", choices.clone())
            .run(prompter)
    })?;
    Ok(Choice::DamageComponent {
        component_id: Some(component_id),
    })
}

/// Trade an alien sample for an advancement. Held advancements are offered
/// only while they still have outcome cards to remove.
pub fn turn_in_alien_sample(
    ctx: ResolveContext<'_>,
    agency_id: &AgencyId,
    sample_id: &ComponentId,
    prompter: &mut dyn Prompter,
) -> Result<Choice, ResolveError> {
    let snapshot = ctx.snapshot;
    let agency = snapshot.agency(agency_id)?;
    let mut choices = Choices::new();
    for definition in &snapshot.advancement_definitions {
        match agency.held_advancement(&definition.id) {
            Some(held) if held.outcomes.is_empty() => continue,
            Some(held) => choices.push(
                format!("{} ({} outcomes)", definition.id, held.outcomes.len()),
                Some(definition.id.clone()),
                false,
            ),
            None => choices.push(definition.id.as_str(), Some(definition.id.clone()), false),
        }
    }
    let message = format!(
        "turn in {} for an advancement? (cancel to decline)",
        component_label(snapshot, sample_id, ComponentDetail::THRUST)?
    );

    let advancement_id = settle(
        "turn_in_alien_sample",
        CancelPolicy::Decline(None),
        prompter,
        |prompter| SelectOne::new("turn_in_alien_sample", message.as_str(), choices.clone()).run(prompter),
    )?;
    Ok(Choice::TurnInAlienSample {
        turn_in: advancement_id.is_some(),
        advancement_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::prompt::{Answer, ScriptedPrompter};
    use crate::snapshot::{ComponentKind, Snapshot};
    use crate::tests::fixtures::SnapshotBuilder;

    #[test]
    fn test_discard_needs_the_fee() {
        let snapshot = SnapshotBuilder::new().agency("nasa", 7).build();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let nasa = AgencyId::new("nasa");
        let juno = AdvancementId::new("juno_rockets");

        // A success costs 10 to discard; only returning it is possible.
        let mut prompter = ScriptedPrompter::new([Answer::Cancel, Answer::Pick(1)]);
        assert_eq!(
            discard_outcome(ctx, &nasa, &juno, Outcome::Success, &mut prompter).unwrap(),
            Choice::DiscardOutcome { discard: false }
        );
        assert!(prompter.shown()[0].options[0].disabled);
        assert_eq!(
            prompter.shown()[0].message,
            "decide what to do with success from juno_rockets"
        );

        // A failure costs 5.
        let mut prompter = ScriptedPrompter::new([Answer::Pick(0)]);
        assert_eq!(
            discard_outcome(ctx, &nasa, &juno, Outcome::MajorFailure, &mut prompter).unwrap(),
            Choice::DiscardOutcome { discard: true }
        );
    }

    fn docked() -> Snapshot {
        SnapshotBuilder::new()
            .location("leo")
            .rocket_definition("juno", 4, 1)
            .supplies_definition("supplies")
            .probe_definition("probe", 1)
            .agency("nasa", 0)
            .component("nasa", "r1", "juno")
            .component("nasa", "s1", "supplies")
            .component("nasa", "p1", "probe")
            .spacecraft("nasa", "first", "leo", &["r1", "s1"])
            .spacecraft("nasa", "second", "leo", &["p1"])
            .build()
    }

    #[test]
    fn test_damage_spans_both_spacecraft_and_skips_supplies() {
        let snapshot = docked();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let second = SpacecraftId::new("second");
        let mut prompter = ScriptedPrompter::new([Answer::Pick(1)]);
        assert_eq!(
            damage_component(ctx, &SpacecraftId::new("first"), Some(&second), &mut prompter)
                .unwrap(),
            Choice::DamageComponent {
                component_id: Some(ComponentId::new("p1"))
            }
        );
        assert_eq!(prompter.shown()[0].options.len(), 2);
    }

    #[test]
    fn test_nothing_left_to_damage() {
        let mut snapshot = docked();
        SnapshotBuilder::damage(&mut snapshot, "r1");
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let mut prompter = ScriptedPrompter::new([]);
        assert_eq!(
            damage_component(ctx, &SpacecraftId::new("first"), None, &mut prompter).unwrap(),
            Choice::DamageComponent { component_id: None }
        );
        assert!(prompter.shown().is_empty());
    }

    #[test]
    fn test_alien_sample_offers_unfinished_advancements() {
        let snapshot = SnapshotBuilder::new()
            .location("mars")
            .advancement_definition("juno_rockets")
            .advancement_definition("landing")
            .advancement_definition("surveying")
            .definition(
                "alien_sample",
                1,
                ComponentKind::Sample {
                    location: "mars".into(),
                },
            )
            .agency("nasa", 0)
            .advancement("nasa", "juno_rockets", &[])
            .advancement("nasa", "landing", &[Outcome::Success, Outcome::MinorFailure])
            .component("nasa", "x1", "alien_sample")
            .build();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let nasa = AgencyId::new("nasa");
        let sample = ComponentId::new("x1");

        let mut prompter = ScriptedPrompter::new([Answer::Pick(0)]);
        assert_eq!(
            turn_in_alien_sample(ctx, &nasa, &sample, &mut prompter).unwrap(),
            Choice::TurnInAlienSample {
                turn_in: true,
                advancement_id: Some(AdvancementId::new("landing")),
            }
        );
        let labels: Vec<&str> = prompter.shown()[0]
            .options
            .iter()
            .map(|option| option.label.as_str())
            .collect();
        assert_eq!(labels, vec!["landing (2 outcomes)", "surveying"]);

        let mut prompter = ScriptedPrompter::new([Answer::Cancel]);
        assert_eq!(
            turn_in_alien_sample(ctx, &nasa, &sample, &mut prompter).unwrap(),
            Choice::TurnInAlienSample {
                turn_in: false,
                advancement_id: None,
            }
        );
    }
}
