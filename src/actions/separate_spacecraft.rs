//! Split some components off a spacecraft into a new one.

use super::{Action, Candidate, choices_of};
use crate::chain::{ChainDriver, Committed, StepChain, StepOutcome, Validation};
use crate::config::ResolveContext;
use crate::decision::{ActionChoice, ResolveError};
use crate::format::{ComponentDetail, component_label, spacecraft_label};
use crate::ids::{AgencyId, ComponentId, SpacecraftId};
use crate::prompt::{Choices, Prompter, SelectBounds, Selection, select_value, select_values};
use crate::rules::sort_component_ids;
use crate::snapshot::LookupError;

pub struct SeparateSpacecraft;

impl Action for SeparateSpacecraft {
    type Option = SpacecraftId;

    /// Every spacecraft; idle ones with at least two components can split.
    /// Empty until rendezvous is researched.
    fn listing(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
    ) -> Result<Vec<Candidate<SpacecraftId>>, LookupError> {
        let agency = ctx.snapshot.agency(agency)?;
        if !agency.has_advancement(&ctx.config.rendezvous_advancement) {
            return Ok(Vec::new());
        }
        let mut listing = Vec::new();
        for spacecraft in &agency.spacecraft {
            listing.push(Candidate::new(
                spacecraft.id.clone(),
                spacecraft_label(ctx.snapshot, &spacecraft.id, true, true)?,
                spacecraft.is_idle() && spacecraft.component_ids.len() >= 2,
            ));
        }
        Ok(listing)
    }

    fn resolve(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<ActionChoice>, ResolveError> {
        ChainDriver::new(SeparateChain { ctx, agency }).run(prompter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparateStep {
    Spacecraft,
    Components,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeparateValue {
    Spacecraft(SpacecraftId),
    Components(Vec<ComponentId>),
}

struct SeparateChain<'a> {
    ctx: ResolveContext<'a>,
    agency: &'a AgencyId,
}

impl SeparateChain<'_> {
    fn spacecraft<'c>(
        &self,
        committed: &'c Committed<SeparateStep, SeparateValue>,
    ) -> Result<&'c SpacecraftId, ResolveError> {
        match committed.get(SeparateStep::Spacecraft) {
            Some(SeparateValue::Spacecraft(id)) => Ok(id),
            _ => Err(ResolveError::IncompleteChain {
                chain: self.name(),
                missing: "spacecraft",
            }),
        }
    }
}

impl StepChain for SeparateChain<'_> {
    type Step = SeparateStep;
    type Value = SeparateValue;
    type Output = ActionChoice;

    fn name(&self) -> &'static str {
        "separate_spacecraft"
    }

    fn first_step(&self) -> SeparateStep {
        SeparateStep::Spacecraft
    }

    fn next_step(
        &self,
        current: SeparateStep,
        _committed: &Committed<SeparateStep, SeparateValue>,
    ) -> Result<Option<SeparateStep>, ResolveError> {
        Ok(match current {
            SeparateStep::Spacecraft => Some(SeparateStep::Components),
            SeparateStep::Components => None,
        })
    }

    fn run_step(
        &self,
        step: SeparateStep,
        committed: &Committed<SeparateStep, SeparateValue>,
        prompter: &mut dyn Prompter,
    ) -> Result<StepOutcome<SeparateValue>, ResolveError> {
        let snapshot = self.ctx.snapshot;
        let selection = match step {
            SeparateStep::Spacecraft => {
                let choices = choices_of(SeparateSpacecraft::listing(self.ctx, self.agency)?);
                select_value(prompter, "select spacecraft", &choices)?.map(SeparateValue::Spacecraft)
            }
            SeparateStep::Components => {
                let spacecraft = snapshot.spacecraft(self.spacecraft(committed)?)?;
                let mut choices = Choices::new();
                for id in sort_component_ids(snapshot, &spacecraft.component_ids)? {
                    choices.push(component_label(snapshot, &id, ComponentDetail::NONE)?, id, false);
                }
                // Both halves keep at least one component.
                let bounds = SelectBounds::new(1, choices.len().saturating_sub(1));
                select_values(prompter, "select components to separate", &choices, bounds, None)?
                    .map(SeparateValue::Components)
            }
        };
        Ok(match selection {
            Selection::Chosen(value) => StepOutcome::Advance(value),
            Selection::Cancelled => StepOutcome::Cancel,
        })
    }

    fn validate(
        &self,
        committed: &Committed<SeparateStep, SeparateValue>,
    ) -> Result<Validation<SeparateStep, ActionChoice>, ResolveError> {
        let spacecraft_id = self.spacecraft(committed)?;
        let Some(SeparateValue::Components(second)) = committed.get(SeparateStep::Components) else {
            return Err(ResolveError::IncompleteChain {
                chain: self.name(),
                missing: "components",
            });
        };
        let first = self
            .ctx
            .snapshot
            .spacecraft(spacecraft_id)?
            .component_ids
            .iter()
            .filter(|id| !second.contains(id))
            .cloned()
            .collect();
        Ok(Validation::Accept(ActionChoice::SeparateSpacecraft {
            spacecraft_id: spacecraft_id.clone(),
            first_component_ids: first,
            second_component_ids: second.clone(),
        }))
    }
}
