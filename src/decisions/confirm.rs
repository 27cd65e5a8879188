//! Decisions answered with a single yes or no.

use super::{CancelPolicy, settle};
use crate::config::ResolveContext;
use crate::decision::{Choice, ResolveError};
use crate::format::{ComponentDetail, component_label, hazard_label};
use crate::ids::{AgencyId, ComponentId, LocationId};
use crate::prompt::Prompter;
use crate::snapshot::{ComponentKind, HazardEffect, LocationHazard};

/// Reveal the hazard card of the location a spacecraft arrived at.
pub fn reveal_location(
    ctx: ResolveContext<'_>,
    location_id: &LocationId,
    hazard: &LocationHazard,
    prompter: &mut dyn Prompter,
) -> Result<Choice, ResolveError> {
    let location = ctx.snapshot.location(location_id)?;
    let mut message = format!("{}\nreveal {}?", hazard_label(hazard), location_id);
    if location.explorable && location.astronaut_only {
        message.push_str(" all astronauts on board will be killed.");
    }
    let reveal = settle("reveal_location", CancelPolicy::Retry, prompter, |prompter| {
        Ok(prompter.confirm(&message, true)?.chosen())
    })?;
    Ok(Choice::RevealLocation { reveal })
}

/// Attempt an optional landing. Without the landing advancement the
/// spacecraft is lost, so the default follows whether it is researched.
pub fn encounter_landing(
    ctx: ResolveContext<'_>,
    agency_id: &AgencyId,
    prompter: &mut dyn Prompter,
) -> Result<Choice, ResolveError> {
    let has_landing = ctx
        .snapshot
        .agency(agency_id)?
        .has_advancement(&ctx.config.landing_advancement);
    let mut message = "encounter landing hazard?".to_string();
    if !has_landing {
        message.push_str(" advancement not researched. spacecraft will be destroyed.");
    }
    let encounter = settle("encounter_landing", CancelPolicy::Retry, prompter, |prompter| {
        Ok(prompter.confirm(&message, has_landing)?.chosen())
    })?;
    Ok(Choice::EncounterLanding { encounter })
}

/// Turn in a valuable sample for the value printed on its origin's hazard.
pub fn turn_in_valuable_sample(
    ctx: ResolveContext<'_>,
    sample_id: &ComponentId,
    prompter: &mut dyn Prompter,
) -> Result<Choice, ResolveError> {
    let snapshot = ctx.snapshot;
    let mut value = 0;
    if let ComponentKind::Sample { location } = &snapshot.definition_of(sample_id)?.kind
        && let Some(hazard) = &snapshot.location(location)?.hazard
    {
        value = hazard
            .effects
            .iter()
            .find_map(|effect| match effect {
                HazardEffect::ValuableSample { value } => Some(*value),
                _ => None,
            })
            .unwrap_or(0);
    }

    let message = format!(
        "turn in {} for ${}",
        component_label(snapshot, sample_id, ComponentDetail::THRUST)?,
        value
    );
    let turn_in = settle("turn_in_valuable_sample", CancelPolicy::Abort, prompter, |prompter| {
        Ok(prompter.confirm(&message, true)?.chosen())
    })?;
    Ok(Choice::TurnInValuableSample { turn_in })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::prompt::{Answer, ScriptedPrompter};
    use crate::snapshot::Snapshot;
    use crate::tests::fixtures::SnapshotBuilder;

    fn mars_hazard() -> LocationHazard {
        LocationHazard {
            flavor: "rust-coloured plains".to_string(),
            effects: vec![HazardEffect::ValuableSample { value: 7 }],
        }
    }

    fn mars_world() -> Snapshot {
        SnapshotBuilder::new()
            .explorable_location("mars", mars_hazard())
            .advancement_definition("landing")
            .definition(
                "mars_sample",
                1,
                ComponentKind::Sample {
                    location: "mars".into(),
                },
            )
            .agency("nasa", 0)
            .component("nasa", "x1", "mars_sample")
            .build()
    }

    #[test]
    fn test_reveal_warns_about_astronaut_only_locations() {
        let mut snapshot = mars_world();
        snapshot.locations[0].astronaut_only = true;
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let mut prompter = ScriptedPrompter::new([Answer::Cancel, Answer::Default]);
        let choice =
            reveal_location(ctx, &LocationId::new("mars"), &mars_hazard(), &mut prompter).unwrap();
        assert_eq!(choice, Choice::RevealLocation { reveal: true });
        assert_eq!(
            prompter.shown()[1].message,
            "rust-coloured plains.\nvaluable_sample ($7)\nreveal mars? all astronauts on board will be killed."
        );
    }

    #[test]
    fn test_landing_default_follows_advancement() {
        let snapshot = mars_world();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let nasa = AgencyId::new("nasa");

        let mut prompter = ScriptedPrompter::new([Answer::Default]);
        assert_eq!(
            encounter_landing(ctx, &nasa, &mut prompter).unwrap(),
            Choice::EncounterLanding { encounter: false }
        );
        assert_eq!(
            prompter.shown()[0].message,
            "encounter landing hazard? advancement not researched. spacecraft will be destroyed."
        );

        let mut researched = mars_world();
        researched.agencies[0].advancements.push(crate::snapshot::HeldAdvancement {
            id: "landing".into(),
            outcomes: Vec::new(),
        });
        let ctx = ResolveContext::new(&researched, &config);
        let mut prompter = ScriptedPrompter::new([Answer::Default]);
        assert_eq!(
            encounter_landing(ctx, &nasa, &mut prompter).unwrap(),
            Choice::EncounterLanding { encounter: true }
        );
    }

    #[test]
    fn test_valuable_sample_value_comes_from_origin() {
        let snapshot = mars_world();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let sample = ComponentId::new("x1");

        let mut prompter = ScriptedPrompter::new([Answer::Confirm(true)]);
        assert_eq!(
            turn_in_valuable_sample(ctx, &sample, &mut prompter).unwrap(),
            Choice::TurnInValuableSample { turn_in: true }
        );
        assert_eq!(prompter.shown()[0].message, "turn in mars_sample for $7");

        let mut prompter = ScriptedPrompter::new([Answer::Cancel]);
        assert!(matches!(
            turn_in_valuable_sample(ctx, &sample, &mut prompter),
            Err(ResolveError::DecisionAborted {
                kind: "turn_in_valuable_sample"
            })
        ));
    }
}
