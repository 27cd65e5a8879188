//! Fly a spacecraft along one profile of a maneuver.
//!
//! Steps: spacecraft, profile, duration modifier (variable-duration profiles
//! only), propulsion. The committed rockets must deliver at least
//! `difficulty * mass` thrust or the propulsion step is asked again.

use super::propulsion::{Flight, INSUFFICIENT_THRUST, duration_step, propulsion_step};
use super::{Action, Candidate, choices_of};
use crate::chain::{ChainDriver, Committed, StepChain, StepOutcome, Validation};
use crate::config::ResolveContext;
use crate::decision::{ActionChoice, ResolveError};
use crate::format::{profile_label, spacecraft_label};
use crate::ids::{AgencyId, ComponentId, ManeuverId, SpacecraftId};
use crate::prompt::{Choices, Prompter, Selection, select_value};
use crate::rules::is_profile_open;
use crate::snapshot::LookupError;

pub struct PerformManeuver;

impl Action for PerformManeuver {
    type Option = SpacecraftId;

    /// Every spacecraft of the agency; only idle ones can start a maneuver.
    fn listing(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
    ) -> Result<Vec<Candidate<SpacecraftId>>, LookupError> {
        let mut listing = Vec::new();
        for spacecraft in &ctx.snapshot.agency(agency)?.spacecraft {
            listing.push(Candidate::new(
                spacecraft.id.clone(),
                spacecraft_label(ctx.snapshot, &spacecraft.id, true, true)?,
                spacecraft.is_idle(),
            ));
        }
        Ok(listing)
    }

    fn resolve(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<ActionChoice>, ResolveError> {
        ChainDriver::new(PerformManeuverChain { ctx, agency }).run(prompter)
    }
}

// ============================================================================
// Chain
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManeuverStep {
    Spacecraft,
    Profile,
    Duration,
    Propulsion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManeuverValue {
    Spacecraft(SpacecraftId),
    Profile(ManeuverId, usize),
    Modifier(i32),
    Rockets(Vec<ComponentId>),
}

struct PerformManeuverChain<'a> {
    ctx: ResolveContext<'a>,
    agency: &'a AgencyId,
}

type ManeuverCommitted = Committed<ManeuverStep, ManeuverValue>;

impl PerformManeuverChain<'_> {
    fn missing(&self, missing: &'static str) -> ResolveError {
        ResolveError::IncompleteChain {
            chain: self.name(),
            missing,
        }
    }

    fn spacecraft<'c>(&self, committed: &'c ManeuverCommitted) -> Result<&'c SpacecraftId, ResolveError> {
        match committed.get(ManeuverStep::Spacecraft) {
            Some(ManeuverValue::Spacecraft(id)) => Ok(id),
            _ => Err(self.missing("spacecraft")),
        }
    }

    fn profile<'c>(
        &self,
        committed: &'c ManeuverCommitted,
    ) -> Result<(&'c ManeuverId, usize), ResolveError> {
        match committed.get(ManeuverStep::Profile) {
            Some(ManeuverValue::Profile(id, index)) => Ok((id, *index)),
            _ => Err(self.missing("profile")),
        }
    }

    /// The committed modifier; profiles without a duration step fly unmodified.
    fn modifier(committed: &ManeuverCommitted) -> i32 {
        match committed.get(ManeuverStep::Duration) {
            Some(ManeuverValue::Modifier(modifier)) => *modifier,
            _ => 0,
        }
    }

    fn rockets<'c>(&self, committed: &'c ManeuverCommitted) -> Result<&'c [ComponentId], ResolveError> {
        match committed.get(ManeuverStep::Propulsion) {
            Some(ManeuverValue::Rockets(rockets)) => Ok(rockets),
            _ => Err(self.missing("propulsion")),
        }
    }

    /// Every profile of every maneuver leaving the spacecraft's location.
    /// Profiles whose slingshot window is closed are disabled.
    fn profile_choices(&self, spacecraft: &SpacecraftId) -> Result<Choices<(ManeuverId, usize)>, ResolveError> {
        let snapshot = self.ctx.snapshot;
        let location = snapshot.location(&snapshot.spacecraft(spacecraft)?.location)?;
        let mut choices = Choices::new();
        for maneuver in &location.maneuvers {
            let id = ManeuverId::between(&location.id, &maneuver.destination);
            for (index, profile) in maneuver.profiles.iter().enumerate() {
                choices.push(
                    profile_label(snapshot, &id, index)?,
                    (id.clone(), index),
                    !is_profile_open(snapshot, profile)?,
                );
            }
        }
        Ok(choices)
    }
}

impl StepChain for PerformManeuverChain<'_> {
    type Step = ManeuverStep;
    type Value = ManeuverValue;
    type Output = ActionChoice;

    fn name(&self) -> &'static str {
        "perform_maneuver"
    }

    fn first_step(&self) -> ManeuverStep {
        ManeuverStep::Spacecraft
    }

    fn next_step(
        &self,
        current: ManeuverStep,
        committed: &ManeuverCommitted,
    ) -> Result<Option<ManeuverStep>, ResolveError> {
        Ok(match current {
            ManeuverStep::Spacecraft => Some(ManeuverStep::Profile),
            ManeuverStep::Profile => {
                let (id, index) = self.profile(committed)?;
                if self.ctx.snapshot.profile(id, index)?.duration.is_some() {
                    Some(ManeuverStep::Duration)
                } else {
                    Some(ManeuverStep::Propulsion)
                }
            }
            ManeuverStep::Duration => Some(ManeuverStep::Propulsion),
            ManeuverStep::Propulsion => None,
        })
    }

    fn run_step(
        &self,
        step: ManeuverStep,
        committed: &ManeuverCommitted,
        prompter: &mut dyn Prompter,
    ) -> Result<StepOutcome<ManeuverValue>, ResolveError> {
        let snapshot = self.ctx.snapshot;
        match step {
            ManeuverStep::Spacecraft => {
                let choices = choices_of(PerformManeuver::listing(self.ctx, self.agency)?);
                Ok(match select_value(prompter, "select spacecraft", &choices)? {
                    Selection::Chosen(id) => StepOutcome::Advance(ManeuverValue::Spacecraft(id)),
                    Selection::Cancelled => StepOutcome::Cancel,
                })
            }
            ManeuverStep::Profile => {
                let choices = self.profile_choices(self.spacecraft(committed)?)?;
                Ok(match select_value(prompter, "select maneuver", &choices)? {
                    Selection::Chosen((id, index)) => {
                        StepOutcome::Advance(ManeuverValue::Profile(id, index))
                    }
                    Selection::Cancelled => StepOutcome::Cancel,
                })
            }
            ManeuverStep::Duration => {
                let (id, index) = self.profile(committed)?;
                let profile = snapshot.profile(id, index)?;
                let outcome = duration_step(prompter, profile, 0)?;
                Ok(map_outcome(outcome, ManeuverValue::Modifier))
            }
            ManeuverStep::Propulsion => {
                let (id, index) = self.profile(committed)?;
                let flight = Flight {
                    spacecraft: self.spacecraft(committed)?,
                    profile: snapshot.profile(id, index)?,
                    modifier: Self::modifier(committed),
                    prior_thrust: 0,
                };
                let outcome = propulsion_step(snapshot, flight, &[], &[], prompter)?;
                Ok(map_outcome(outcome, ManeuverValue::Rockets))
            }
        }
    }

    fn validate(
        &self,
        committed: &ManeuverCommitted,
    ) -> Result<Validation<ManeuverStep, ActionChoice>, ResolveError> {
        let snapshot = self.ctx.snapshot;
        let spacecraft_id = self.spacecraft(committed)?;
        let (maneuver_id, profile_index) = self.profile(committed)?;
        let duration_modifier = Self::modifier(committed);
        let rockets = self.rockets(committed)?;

        let flight = Flight {
            spacecraft: spacecraft_id,
            profile: snapshot.profile(maneuver_id, profile_index)?,
            modifier: duration_modifier,
            prior_thrust: 0,
        };
        if !flight.is_sufficient(snapshot, rockets)? {
            return Ok(Validation::Retry {
                step: ManeuverStep::Propulsion,
                message: INSUFFICIENT_THRUST.to_string(),
            });
        }

        Ok(Validation::Accept(ActionChoice::PerformManeuver {
            spacecraft_id: spacecraft_id.clone(),
            maneuver_id: maneuver_id.clone(),
            profile_index,
            duration_modifier,
            rocket_ids: rockets.to_vec(),
        }))
    }
}

fn map_outcome<T, V>(outcome: StepOutcome<T>, wrap: impl FnOnce(T) -> V) -> StepOutcome<V> {
    match outcome {
        StepOutcome::Advance(value) => StepOutcome::Advance(wrap(value)),
        StepOutcome::Retry => StepOutcome::Retry,
        StepOutcome::Cancel => StepOutcome::Cancel,
    }
}
