//! Duration and propulsion steps shared by the chains that fly a maneuver.

use crate::chain::StepOutcome;
use crate::decision::ResolveError;
use crate::format::{ComponentDetail, component_label};
use crate::ids::{ComponentId, SpacecraftId};
use crate::prompt::{Choices, NumberStatus, Prompter, SelectBounds, Selection, select_values};
use crate::rules::{profile_timing, propulsion_ids, required_thrust, spacecraft_mass, total_thrust};
use crate::snapshot::{LookupError, ManeuverProfile, Snapshot};
use std::collections::BTreeMap;

pub(crate) const INSUFFICIENT_THRUST: &str = "insufficient thrust generated";

/// A maneuver about to be flown, as far as thrust is concerned.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Flight<'a> {
    pub spacecraft: &'a SpacecraftId,
    pub profile: &'a ManeuverProfile,
    pub modifier: i32,
    /// Thrust already delivered earlier in the same maneuver.
    pub prior_thrust: u32,
}

impl Flight<'_> {
    pub(crate) fn required_thrust(&self, snapshot: &Snapshot) -> Result<u32, LookupError> {
        let timing = profile_timing(self.profile, self.modifier);
        Ok(required_thrust(
            timing.difficulty,
            spacecraft_mass(snapshot, self.spacecraft)?,
        ))
    }

    /// Thrust delivered by firing `rockets`, on top of the prior thrust.
    pub(crate) fn generated_thrust(
        &self,
        snapshot: &Snapshot,
        rockets: &[ComponentId],
    ) -> Result<u32, LookupError> {
        let timing = profile_timing(self.profile, self.modifier);
        Ok(total_thrust(snapshot, rockets, timing.duration)?.saturating_add(self.prior_thrust))
    }

    pub(crate) fn is_sufficient(
        &self,
        snapshot: &Snapshot,
        rockets: &[ComponentId],
    ) -> Result<bool, LookupError> {
        Ok(self.generated_thrust(snapshot, rockets)? >= self.required_thrust(snapshot)?)
    }
}

/// Ask for a duration modifier, showing the resulting duration and
/// difficulty as the value changes.
pub(crate) fn duration_step(
    prompter: &mut dyn Prompter,
    profile: &ManeuverProfile,
    default: i32,
) -> Result<StepOutcome<i32>, ResolveError> {
    let status: NumberStatus<'_> = &|modifier| {
        let timing = profile_timing(profile, modifier);
        format!(
            "select duration modifier (Y{} D{})",
            timing.duration, timing.difficulty
        )
    };
    Ok(
        match prompter.enter_number("select duration modifier", default, Some(status))? {
            Selection::Chosen(modifier) => StepOutcome::Advance(modifier),
            Selection::Cancelled => StepOutcome::Cancel,
        },
    )
}

/// Ask which rockets and ion thrusters to fire.
///
/// Components in `excluded` are not offered; those in `preselected` start out
/// picked. Damaged propulsion is shown but cannot be picked. With nothing to
/// offer, the step commits an empty set if the prior thrust already suffices
/// and otherwise goes back.
pub(crate) fn propulsion_step(
    snapshot: &Snapshot,
    flight: Flight<'_>,
    excluded: &[ComponentId],
    preselected: &[ComponentId],
    prompter: &mut dyn Prompter,
) -> Result<StepOutcome<Vec<ComponentId>>, ResolveError> {
    let timing = profile_timing(flight.profile, flight.modifier);
    let required = flight.required_thrust(snapshot)?;

    let mut choices = Choices::new();
    let mut thrust_of = BTreeMap::new();
    for id in propulsion_ids(snapshot, flight.spacecraft)? {
        if excluded.contains(&id) {
            continue;
        }
        let label = component_label(snapshot, &id, ComponentDetail::THRUST)?;
        let damaged = snapshot.component(&id)?.damaged;
        thrust_of.insert(
            id.clone(),
            total_thrust(snapshot, std::slice::from_ref(&id), timing.duration)?,
        );
        if preselected.contains(&id) {
            choices.push_selected(label, id, damaged);
        } else {
            choices.push(label, id, damaged);
        }
    }

    if choices.is_empty() {
        if flight.prior_thrust >= required {
            return Ok(StepOutcome::Advance(Vec::new()));
        }
        prompter.notify(INSUFFICIENT_THRUST)?;
        return Ok(StepOutcome::Cancel);
    }

    let status: &dyn Fn(&[ComponentId]) -> String = &|picked| {
        let generated = picked
            .iter()
            .filter_map(|id| thrust_of.get(id))
            .fold(flight.prior_thrust, |sum, thrust| sum.saturating_add(*thrust));
        format!(
            "select rockets; selected {} thrust of {} required",
            generated, required
        )
    };
    let bounds = SelectBounds::new(0, choices.len());
    Ok(
        match select_values(prompter, "select rockets", &choices, bounds, Some(status))? {
            Selection::Chosen(rockets) => StepOutcome::Advance(rockets),
            Selection::Cancelled => StepOutcome::Cancel,
        },
    )
}
