//! Survey a location adjacent to a spacecraft with a probe or capsule.

use super::{Action, Candidate, choices_of};
use crate::chain::{ChainDriver, Committed, StepChain, StepOutcome, Validation};
use crate::config::ResolveContext;
use crate::decision::{ActionChoice, ResolveError};
use crate::format::{ComponentDetail, component_label, spacecraft_label};
use crate::ids::{AgencyId, ComponentId, LocationId, SpacecraftId};
use crate::prompt::{Choices, Prompter, Selection, select_value};
use crate::rules::{has_working_probe_or_capsule, surveyable_locations};
use crate::snapshot::{ComponentKind, Expansion, LookupError};

pub struct SurveyLocation;

impl Action for SurveyLocation {
    type Option = SpacecraftId;

    /// Idle spacecraft next to at least one explorable location. Only those
    /// carrying a working probe or capsule are enabled. Empty until surveying
    /// is researched.
    fn listing(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
    ) -> Result<Vec<Candidate<SpacecraftId>>, LookupError> {
        let snapshot = ctx.snapshot;
        let agency = snapshot.agency(agency)?;
        if !agency.has_advancement(&ctx.config.surveying_advancement) {
            return Ok(Vec::new());
        }

        let mut listing = Vec::new();
        for spacecraft in agency.spacecraft.iter().filter(|s| s.is_idle()) {
            let mut explorable_nearby = false;
            for id in surveyable_locations(snapshot, &spacecraft.location)? {
                if snapshot.location(&id)?.explorable {
                    explorable_nearby = true;
                    break;
                }
            }
            if explorable_nearby {
                listing.push(Candidate::new(
                    spacecraft.id.clone(),
                    spacecraft_label(snapshot, &spacecraft.id, false, true)?,
                    has_working_probe_or_capsule(snapshot, &spacecraft.id)?,
                ));
            }
        }
        Ok(listing)
    }

    fn resolve(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<ActionChoice>, ResolveError> {
        ChainDriver::new(SurveyChain { ctx, agency }).run(prompter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyStep {
    Spacecraft,
    Surveyor,
    Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurveyValue {
    Spacecraft(SpacecraftId),
    Surveyor(ComponentId),
    Location(LocationId),
}

struct SurveyChain<'a> {
    ctx: ResolveContext<'a>,
    agency: &'a AgencyId,
}

impl SurveyChain<'_> {
    fn missing(&self, missing: &'static str) -> ResolveError {
        ResolveError::IncompleteChain {
            chain: self.name(),
            missing,
        }
    }

    fn spacecraft<'c>(
        &self,
        committed: &'c Committed<SurveyStep, SurveyValue>,
    ) -> Result<&'c SpacecraftId, ResolveError> {
        match committed.get(SurveyStep::Spacecraft) {
            Some(SurveyValue::Spacecraft(id)) => Ok(id),
            _ => Err(self.missing("spacecraft")),
        }
    }

    /// Undamaged probes and capsules aboard. With the outer planets
    /// expansion each one surveys at most once a turn.
    fn surveyors(&self, spacecraft: &SpacecraftId) -> Result<Choices<ComponentId>, LookupError> {
        let snapshot = self.ctx.snapshot;
        let once_per_turn = snapshot.has_expansion(Expansion::OuterPlanets);
        let mut choices = Choices::new();
        for id in &snapshot.spacecraft(spacecraft)?.component_ids {
            let component = snapshot.component(id)?;
            if component.damaged {
                continue;
            }
            let kind = &snapshot.definition(&component.definition)?.kind;
            if !matches!(kind, ComponentKind::Probe | ComponentKind::Capsule { .. }) {
                continue;
            }
            choices.push(
                component_label(snapshot, id, ComponentDetail::NONE)?,
                id.clone(),
                once_per_turn && component.surveyed_this_turn,
            );
        }
        Ok(choices)
    }

    fn locations(&self, spacecraft: &SpacecraftId) -> Result<Choices<LocationId>, LookupError> {
        let snapshot = self.ctx.snapshot;
        let origin = &snapshot.spacecraft(spacecraft)?.location;
        let mut choices = Choices::new();
        for id in surveyable_locations(snapshot, origin)? {
            let location = snapshot.location(&id)?;
            let label = if location.explorable && location.revealed {
                format!("{} (revealed)", id)
            } else {
                id.to_string()
            };
            choices.push(label, id, false);
        }
        Ok(choices)
    }
}

impl StepChain for SurveyChain<'_> {
    type Step = SurveyStep;
    type Value = SurveyValue;
    type Output = ActionChoice;

    fn name(&self) -> &'static str {
        "survey_location"
    }

    fn first_step(&self) -> SurveyStep {
        SurveyStep::Spacecraft
    }

    fn next_step(
        &self,
        current: SurveyStep,
        _committed: &Committed<SurveyStep, SurveyValue>,
    ) -> Result<Option<SurveyStep>, ResolveError> {
        Ok(match current {
            SurveyStep::Spacecraft => Some(SurveyStep::Surveyor),
            SurveyStep::Surveyor => Some(SurveyStep::Location),
            SurveyStep::Location => None,
        })
    }

    fn run_step(
        &self,
        step: SurveyStep,
        committed: &Committed<SurveyStep, SurveyValue>,
        prompter: &mut dyn Prompter,
    ) -> Result<StepOutcome<SurveyValue>, ResolveError> {
        let selection = match step {
            SurveyStep::Spacecraft => {
                let choices = choices_of(SurveyLocation::listing(self.ctx, self.agency)?);
                select_value(prompter, "select a spacecraft", &choices)?.map(SurveyValue::Spacecraft)
            }
            SurveyStep::Surveyor => {
                let choices = self.surveyors(self.spacecraft(committed)?)?;
                select_value(prompter, "select a probe or capsule", &choices)?
                    .map(SurveyValue::Surveyor)
            }
            SurveyStep::Location => {
                let choices = self.locations(self.spacecraft(committed)?)?;
                select_value(prompter, "select a location", &choices)?.map(SurveyValue::Location)
            }
        };
        Ok(match selection {
            Selection::Chosen(value) => StepOutcome::Advance(value),
            Selection::Cancelled => StepOutcome::Cancel,
        })
    }

    fn validate(
        &self,
        committed: &Committed<SurveyStep, SurveyValue>,
    ) -> Result<Validation<SurveyStep, ActionChoice>, ResolveError> {
        let spacecraft_id = self.spacecraft(committed)?.clone();
        let Some(SurveyValue::Surveyor(component_id)) = committed.get(SurveyStep::Surveyor) else {
            return Err(self.missing("probe or capsule"));
        };
        let Some(SurveyValue::Location(location_id)) = committed.get(SurveyStep::Location) else {
            return Err(self.missing("location"));
        };
        Ok(Validation::Accept(ActionChoice::SurveyLocation {
            spacecraft_id,
            location_id: location_id.clone(),
            component_id: component_id.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::prompt::{Answer, ScriptedPrompter};
    use crate::snapshot::{HazardEffect, LocationHazard, Snapshot};
    use crate::tests::fixtures::SnapshotBuilder;

    fn survey_world() -> Snapshot {
        SnapshotBuilder::new()
            .location("earth")
            .location("leo")
            .explorable_location(
                "moon",
                LocationHazard {
                    flavor: "grey dust".to_string(),
                    effects: vec![HazardEffect::Nothing],
                },
            )
            .maneuver("leo", "earth", 0, None)
            .maneuver("leo", "moon", 2, Some(1))
            .advancement_definition("surveying")
            .probe_definition("probe", 1)
            .rocket_definition("juno", 4, 1)
            .agency("nasa", 0)
            .advancement("nasa", "surveying", &[])
            .component("nasa", "p1", "probe")
            .component("nasa", "p2", "probe")
            .component("nasa", "r1", "juno")
            .spacecraft("nasa", "scout", "leo", &["r1", "p1", "p2"])
            .build()
    }

    #[test]
    fn test_survey_walks_spacecraft_probe_location() {
        let mut snapshot = survey_world();
        snapshot.locations[2].revealed = true;
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let mut prompter =
            ScriptedPrompter::new([Answer::Pick(0), Answer::Pick(1), Answer::Pick(1)]);
        let choice = SurveyLocation::resolve(ctx, &AgencyId::new("nasa"), &mut prompter).unwrap();
        assert_eq!(
            choice,
            Some(ActionChoice::SurveyLocation {
                spacecraft_id: SpacecraftId::new("scout"),
                location_id: LocationId::new("moon"),
                component_id: ComponentId::new("p2"),
            })
        );
        let labels: Vec<&str> = prompter.shown()[2]
            .options
            .iter()
            .map(|option| option.label.as_str())
            .collect();
        assert_eq!(labels, vec!["earth", "moon (revealed)"]);
    }

    #[test]
    fn test_outer_planets_limits_one_survey_per_turn() {
        let mut snapshot = survey_world();
        snapshot.expansions.push(Expansion::OuterPlanets);
        snapshot.agencies[0].components[0].surveyed_this_turn = true;
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let mut prompter = ScriptedPrompter::new([Answer::Pick(0), Answer::Pick(0)]);
        assert!(SurveyLocation::resolve(ctx, &AgencyId::new("nasa"), &mut prompter).is_err());
        assert!(prompter.shown()[1].options[0].disabled);
        assert!(!prompter.shown()[1].options[1].disabled);
    }

    #[test]
    fn test_broken_probes_disable_the_spacecraft() {
        let mut snapshot = survey_world();
        SnapshotBuilder::damage(&mut snapshot, "p1");
        SnapshotBuilder::damage(&mut snapshot, "p2");
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let listing = SurveyLocation::listing(ctx, &AgencyId::new("nasa")).unwrap();
        assert_eq!(listing.len(), 1);
        assert!(!listing[0].enabled);
    }
}
