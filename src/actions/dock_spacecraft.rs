//! Dock two idle spacecraft sharing a location into one.

use super::{Action, Candidate, choices_of};
use crate::chain::{ChainDriver, Committed, StepChain, StepOutcome, Validation};
use crate::config::ResolveContext;
use crate::decision::{ActionChoice, ResolveError};
use crate::format::spacecraft_label;
use crate::ids::{AgencyId, SpacecraftId};
use crate::prompt::{Prompter, Selection, select_value};
use crate::rules::idle_spacecraft;
use crate::snapshot::LookupError;

pub struct DockSpacecraft;

impl Action for DockSpacecraft {
    type Option = SpacecraftId;

    /// Idle spacecraft with an idle partner at the same location, where
    /// rendezvous is possible. Empty until rendezvous is researched.
    fn listing(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
    ) -> Result<Vec<Candidate<SpacecraftId>>, LookupError> {
        let snapshot = ctx.snapshot;
        let agency = snapshot.agency(agency)?;
        if !agency.has_advancement(&ctx.config.rendezvous_advancement) {
            return Ok(Vec::new());
        }

        let idle: Vec<_> = idle_spacecraft(snapshot, &agency.id)?.collect();
        let mut listing = Vec::new();
        for spacecraft in &idle {
            if snapshot.location(&spacecraft.location)?.no_rendezvous_or_repair {
                continue;
            }
            let has_partner = idle
                .iter()
                .any(|other| other.id != spacecraft.id && other.location == spacecraft.location);
            if has_partner {
                listing.push(Candidate::new(
                    spacecraft.id.clone(),
                    spacecraft_label(snapshot, &spacecraft.id, true, false)?,
                    true,
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
        ChainDriver::new(DockChain { ctx, agency }).run(prompter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockStep {
    First,
    Second,
}

struct DockChain<'a> {
    ctx: ResolveContext<'a>,
    agency: &'a AgencyId,
}

impl DockChain<'_> {
    fn committed_spacecraft<'c>(
        &self,
        committed: &'c Committed<DockStep, SpacecraftId>,
        step: DockStep,
    ) -> Result<&'c SpacecraftId, ResolveError> {
        committed.get(step).ok_or(ResolveError::IncompleteChain {
            chain: self.name(),
            missing: match step {
                DockStep::First => "first spacecraft",
                DockStep::Second => "second spacecraft",
            },
        })
    }

    /// Idle spacecraft at the first one's location, other than itself.
    fn partners(&self, first: &SpacecraftId) -> Result<Vec<Candidate<SpacecraftId>>, LookupError> {
        let snapshot = self.ctx.snapshot;
        let first = snapshot.spacecraft(first)?;
        let mut listing = Vec::new();
        for spacecraft in &snapshot.agency(self.agency)?.spacecraft {
            if spacecraft.id == first.id || !spacecraft.is_idle() || spacecraft.location != first.location {
                continue;
            }
            listing.push(Candidate::new(
                spacecraft.id.clone(),
                spacecraft_label(snapshot, &spacecraft.id, true, false)?,
                true,
            ));
        }
        Ok(listing)
    }
}

impl StepChain for DockChain<'_> {
    type Step = DockStep;
    type Value = SpacecraftId;
    type Output = ActionChoice;

    fn name(&self) -> &'static str {
        "dock_spacecraft"
    }

    fn first_step(&self) -> DockStep {
        DockStep::First
    }

    fn next_step(
        &self,
        current: DockStep,
        _committed: &Committed<DockStep, SpacecraftId>,
    ) -> Result<Option<DockStep>, ResolveError> {
        Ok(match current {
            DockStep::First => Some(DockStep::Second),
            DockStep::Second => None,
        })
    }

    fn run_step(
        &self,
        step: DockStep,
        committed: &Committed<DockStep, SpacecraftId>,
        prompter: &mut dyn Prompter,
    ) -> Result<StepOutcome<SpacecraftId>, ResolveError> {
        let (message, listing) = match step {
            DockStep::First => (
                "select the first spacecraft",
                DockSpacecraft::listing(self.ctx, self.agency)?,
            ),
            DockStep::Second => (
                "select the second spacecraft",
                self.partners(self.committed_spacecraft(committed, DockStep::First)?)?,
            ),
        };
        Ok(match select_value(prompter, message, &choices_of(listing))? {
            Selection::Chosen(id) => StepOutcome::Advance(id),
            Selection::Cancelled => StepOutcome::Cancel,
        })
    }

    fn validate(
        &self,
        committed: &Committed<DockStep, SpacecraftId>,
    ) -> Result<Validation<DockStep, ActionChoice>, ResolveError> {
        Ok(Validation::Accept(ActionChoice::DockSpacecraft {
            first_spacecraft_id: self.committed_spacecraft(committed, DockStep::First)?.clone(),
            second_spacecraft_id: self.committed_spacecraft(committed, DockStep::Second)?.clone(),
        }))
    }
}
