//! Continue a maneuver interrupted by a failed rocket or a hazard.
//!
//! Steps: proceed, duration modifier (variable-duration profiles only),
//! propulsion. Rockets already fired are not offered again; the rockets the
//! operator originally picked start out selected, and thrust delivered before
//! the interruption counts toward the requirement.

use super::{CancelPolicy, settle};
use crate::actions::propulsion::{Flight, INSUFFICIENT_THRUST, duration_step, propulsion_step};
use crate::chain::{ChainDriver, Committed, StepChain, StepOutcome, Validation};
use crate::config::ResolveContext;
use crate::decision::{Choice, ResolveError};
use crate::ids::{ComponentId, ManeuverId, SpacecraftId};
use crate::prompt::{Prompter, Selection};
use crate::snapshot::ManeuverProfile;

/// The interrupted maneuver, as described by the decision.
#[derive(Debug, Clone, Copy)]
pub struct ManeuverInProgress<'a> {
    pub spacecraft_id: &'a SpacecraftId,
    pub maneuver_id: &'a ManeuverId,
    pub profile_index: usize,
    pub duration_modifier: i32,
    pub rocket_ids: &'a [ComponentId],
    pub spent_rocket_ids: &'a [ComponentId],
    pub generated_thrust: u32,
}

pub fn continue_maneuver(
    ctx: ResolveContext<'_>,
    maneuver: ManeuverInProgress<'_>,
    prompter: &mut dyn Prompter,
) -> Result<Choice, ResolveError> {
    let profile = ctx
        .snapshot
        .profile(maneuver.maneuver_id, maneuver.profile_index)?;
    settle("continue_maneuver", CancelPolicy::Retry, prompter, |prompter| {
        ChainDriver::new(ContinueChain {
            ctx,
            maneuver,
            profile,
        })
        .run(prompter)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueStep {
    Proceed,
    Duration,
    Propulsion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContinueValue {
    Proceed(bool),
    Modifier(i32),
    Rockets(Vec<ComponentId>),
}

struct ContinueChain<'a> {
    ctx: ResolveContext<'a>,
    maneuver: ManeuverInProgress<'a>,
    profile: &'a ManeuverProfile,
}

type ContinueCommitted = Committed<ContinueStep, ContinueValue>;

impl ContinueChain<'_> {
    fn proceeds(committed: &ContinueCommitted) -> bool {
        matches!(
            committed.get(ContinueStep::Proceed),
            Some(ContinueValue::Proceed(true))
        )
    }

    /// The modifier to fly with: the one entered, or the decision's own when
    /// the profile has no duration to modify.
    fn modifier(&self, committed: &ContinueCommitted) -> i32 {
        match committed.get(ContinueStep::Duration) {
            Some(ContinueValue::Modifier(modifier)) => *modifier,
            _ => self.maneuver.duration_modifier,
        }
    }

    fn flight(&self, committed: &ContinueCommitted) -> Flight<'_> {
        Flight {
            spacecraft: self.maneuver.spacecraft_id,
            profile: self.profile,
            modifier: self.modifier(committed),
            prior_thrust: self.maneuver.generated_thrust,
        }
    }
}

impl StepChain for ContinueChain<'_> {
    type Step = ContinueStep;
    type Value = ContinueValue;
    type Output = Choice;

    fn name(&self) -> &'static str {
        "continue_maneuver"
    }

    fn first_step(&self) -> ContinueStep {
        ContinueStep::Proceed
    }

    fn next_step(
        &self,
        current: ContinueStep,
        committed: &ContinueCommitted,
    ) -> Result<Option<ContinueStep>, ResolveError> {
        Ok(match current {
            ContinueStep::Proceed if !Self::proceeds(committed) => None,
            ContinueStep::Proceed if self.profile.duration.is_some() => Some(ContinueStep::Duration),
            ContinueStep::Proceed | ContinueStep::Duration => Some(ContinueStep::Propulsion),
            ContinueStep::Propulsion => None,
        })
    }

    fn run_step(
        &self,
        step: ContinueStep,
        committed: &ContinueCommitted,
        prompter: &mut dyn Prompter,
    ) -> Result<StepOutcome<ContinueValue>, ResolveError> {
        let outcome = match step {
            ContinueStep::Proceed => match prompter.confirm("proceed with maneuver?", true)? {
                Selection::Chosen(proceed) => StepOutcome::Advance(ContinueValue::Proceed(proceed)),
                Selection::Cancelled => StepOutcome::Cancel,
            },
            ContinueStep::Duration => {
                match duration_step(prompter, self.profile, self.maneuver.duration_modifier)? {
                    StepOutcome::Advance(modifier) => {
                        StepOutcome::Advance(ContinueValue::Modifier(modifier))
                    }
                    StepOutcome::Retry => StepOutcome::Retry,
                    StepOutcome::Cancel => StepOutcome::Cancel,
                }
            }
            ContinueStep::Propulsion => {
                let flight = self.flight(committed);
                match propulsion_step(
                    self.ctx.snapshot,
                    flight,
                    self.maneuver.spent_rocket_ids,
                    self.maneuver.rocket_ids,
                    prompter,
                )? {
                    StepOutcome::Advance(rockets) => StepOutcome::Advance(ContinueValue::Rockets(rockets)),
                    StepOutcome::Retry => StepOutcome::Retry,
                    StepOutcome::Cancel => StepOutcome::Cancel,
                }
            }
        };
        Ok(outcome)
    }

    fn validate(
        &self,
        committed: &ContinueCommitted,
    ) -> Result<Validation<ContinueStep, Choice>, ResolveError> {
        if !Self::proceeds(committed) {
            return Ok(Validation::Accept(Choice::ContinueManeuver {
                proceed: false,
                duration_modifier: None,
                rocket_ids: Vec::new(),
            }));
        }
        let Some(ContinueValue::Rockets(rockets)) = committed.get(ContinueStep::Propulsion) else {
            return Err(ResolveError::IncompleteChain {
                chain: self.name(),
                missing: "propulsion",
            });
        };
        if !self.flight(committed).is_sufficient(self.ctx.snapshot, rockets)? {
            return Ok(Validation::Retry {
                step: ContinueStep::Propulsion,
                message: INSUFFICIENT_THRUST.to_string(),
            });
        }
        Ok(Validation::Accept(Choice::ContinueManeuver {
            proceed: true,
            duration_modifier: Some(self.modifier(committed)),
            rocket_ids: rockets.clone(),
        }))
    }
}
