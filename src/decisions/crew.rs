//! Decisions about the astronauts aboard a spacecraft.

use super::{CancelPolicy, settle};
use crate::chain::{ChainDriver, Committed, StepChain, StepOutcome, Validation};
use crate::config::ResolveContext;
use crate::decision::{Choice, ResolveError};
use crate::format::{ComponentDetail, component_label};
use crate::ids::{ComponentId, SpacecraftId};
use crate::prompt::{Choices, Prompter, SelectBounds, Selection, select_value, select_values};
use crate::rules::astronaut_ids;
use crate::snapshot::{ComponentKind, LookupError, Snapshot};
use std::collections::BTreeMap;
use tracing::warn;

const CAPACITY_EXCEEDED: &str = "capsule capacity exceeded by astronauts";

// ============================================================================
// Assign Astronauts
// ============================================================================

/// Seat every astronaut of the spacecraft in one of its capsules.
///
/// Asks once per astronaut; backing out of an astronaut's prompt re-asks the
/// previous one. A spacecraft without astronauts needs no prompt.
pub fn assign_astronauts(
    ctx: ResolveContext<'_>,
    spacecraft_id: &SpacecraftId,
    prompter: &mut dyn Prompter,
) -> Result<Choice, ResolveError> {
    let snapshot = ctx.snapshot;
    let astronauts = astronaut_ids(snapshot, spacecraft_id)?;
    if astronauts.is_empty() {
        return Ok(Choice::AssignAstronauts {
            capsule_assignments: BTreeMap::new(),
        });
    }

    let capsules = capsules_of(snapshot, spacecraft_id)?;
    let seats: usize = capsules
        .iter()
        .filter(|capsule| !capsule.damaged)
        .map(|capsule| capsule.capacity)
        .sum();
    if seats < astronauts.len() {
        warn!(
            spacecraft = %spacecraft_id,
            seats,
            astronauts = astronauts.len(),
            "not enough working seats to assign every astronaut"
        );
        return Err(ResolveError::DecisionAborted {
            kind: "assign_astronauts",
        });
    }

    let capsule_assignments = settle("assign_astronauts", CancelPolicy::Retry, prompter, |prompter| {
        ChainDriver::new(AssignChain {
            snapshot,
            astronauts: &astronauts,
            capsules: &capsules,
        })
        .run(prompter)
    })?;
    Ok(Choice::AssignAstronauts {
        capsule_assignments,
    })
}

#[derive(Debug, Clone)]
struct Capsule {
    id: ComponentId,
    capacity: usize,
    damaged: bool,
}

fn capsules_of(snapshot: &Snapshot, spacecraft: &SpacecraftId) -> Result<Vec<Capsule>, LookupError> {
    let mut capsules = Vec::new();
    for id in &snapshot.spacecraft(spacecraft)?.component_ids {
        let component = snapshot.component(id)?;
        if let ComponentKind::Capsule { capacity, .. } = snapshot.definition(&component.definition)?.kind {
            capsules.push(Capsule {
                id: id.clone(),
                capacity,
                damaged: component.damaged,
            });
        }
    }
    Ok(capsules)
}

/// Step `i` seats the `i`th astronaut.
struct AssignChain<'a> {
    snapshot: &'a Snapshot,
    astronauts: &'a [ComponentId],
    capsules: &'a [Capsule],
}

impl AssignChain<'_> {
    fn occupancy(committed: &Committed<usize, ComponentId>) -> BTreeMap<&ComponentId, usize> {
        let mut seated = BTreeMap::new();
        for capsule in committed.values() {
            *seated.entry(capsule).or_insert(0) += 1;
        }
        seated
    }
}

impl StepChain for AssignChain<'_> {
    type Step = usize;
    type Value = ComponentId;
    type Output = BTreeMap<ComponentId, Vec<ComponentId>>;

    fn name(&self) -> &'static str {
        "assign_astronauts"
    }

    fn first_step(&self) -> usize {
        0
    }

    fn next_step(
        &self,
        current: usize,
        _committed: &Committed<usize, ComponentId>,
    ) -> Result<Option<usize>, ResolveError> {
        Ok(Some(current + 1).filter(|next| *next < self.astronauts.len()))
    }

    fn run_step(
        &self,
        step: usize,
        committed: &Committed<usize, ComponentId>,
        prompter: &mut dyn Prompter,
    ) -> Result<StepOutcome<ComponentId>, ResolveError> {
        let astronaut = self.astronauts.get(step).ok_or(ResolveError::IncompleteChain {
            chain: self.name(),
            missing: "astronaut",
        })?;
        let seated = Self::occupancy(committed);
        let mut choices = Choices::new();
        for capsule in self.capsules {
            let full = seated.get(&capsule.id).copied().unwrap_or(0) >= capsule.capacity;
            choices.push(
                component_label(self.snapshot, &capsule.id, ComponentDetail::CAPSULE)?,
                capsule.id.clone(),
                capsule.damaged || full,
            );
        }
        let message = format!(
            "choose a capsule for {}",
            component_label(self.snapshot, astronaut, ComponentDetail::NONE)?
        );
        Ok(match select_value(prompter, &message, &choices)? {
            Selection::Chosen(capsule) => StepOutcome::Advance(capsule),
            Selection::Cancelled => StepOutcome::Cancel,
        })
    }

    fn validate(
        &self,
        committed: &Committed<usize, ComponentId>,
    ) -> Result<Validation<usize, Self::Output>, ResolveError> {
        let seated = Self::occupancy(committed);
        let overfull = self.capsules.iter().any(|capsule| {
            seated.get(&capsule.id).copied().unwrap_or(0) > capsule.capacity
        });
        if overfull {
            return Ok(Validation::Retry {
                step: 0,
                message: CAPACITY_EXCEEDED.to_string(),
            });
        }

        let mut assignments: BTreeMap<ComponentId, Vec<ComponentId>> = BTreeMap::new();
        for (step, capsule) in committed.steps().zip(committed.values()) {
            if let Some(astronaut) = self.astronauts.get(step) {
                assignments
                    .entry(capsule.clone())
                    .or_default()
                    .push(astronaut.clone());
            }
        }
        Ok(Validation::Accept(assignments))
    }
}

// ============================================================================
// Life Support
// ============================================================================

/// Choose which astronauts the life support keeps alive: exactly as many as
/// it has capacity for, or everyone if there are fewer.
pub fn life_support(
    ctx: ResolveContext<'_>,
    spacecraft_id: &SpacecraftId,
    capacity: usize,
    prompter: &mut dyn Prompter,
) -> Result<Choice, ResolveError> {
    let snapshot = ctx.snapshot;
    let astronauts = astronaut_ids(snapshot, spacecraft_id)?;
    let count = capacity.min(astronauts.len());
    if count == 0 {
        return Ok(Choice::LifeSupport {
            astronaut_ids: Vec::new(),
        });
    }

    let mut choices = Choices::new();
    for id in astronauts {
        choices.push(component_label(snapshot, &id, ComponentDetail::NONE)?, id, false);
    }
    let astronaut_ids = settle("life_support", CancelPolicy::Abort, prompter, |prompter| {
        Ok(select_values(
            prompter,
            "select astronauts to receive life support",
            &choices,
            SelectBounds::exactly(count),
            None,
        )?
        .chosen())
    })?;
    Ok(Choice::LifeSupport { astronaut_ids })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::prompt::{Answer, ScriptedPrompter};
    use crate::tests::fixtures::SnapshotBuilder;

    /// Two one-seat capsules and two astronauts.
    fn crewed() -> Snapshot {
        SnapshotBuilder::new()
            .location("leo")
            .astronaut_definition("astronaut", None)
            .capsule_definition("vostok", 1, 2)
            .agency("nasa", 0)
            .component("nasa", "c1", "vostok")
            .component("nasa", "c2", "vostok")
            .component("nasa", "a1", "astronaut")
            .component("nasa", "a2", "astronaut")
            .spacecraft("nasa", "ship", "leo", &["c1", "a1", "c2", "a2"])
            .build()
    }

    #[test]
    fn test_full_capsules_are_disabled_for_later_astronauts() {
        let snapshot = crewed();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let mut prompter = ScriptedPrompter::new([Answer::Pick(0), Answer::Pick(1)]);
        let choice = assign_astronauts(ctx, &SpacecraftId::new("ship"), &mut prompter).unwrap();

        let mut expected = BTreeMap::new();
        expected.insert(ComponentId::new("c1"), vec![ComponentId::new("a1")]);
        expected.insert(ComponentId::new("c2"), vec![ComponentId::new("a2")]);
        assert_eq!(
            choice,
            Choice::AssignAstronauts {
                capsule_assignments: expected
            }
        );

        let second = &prompter.shown()[1];
        assert_eq!(second.message, "choose a capsule for astronaut");
        assert_eq!(second.options[0].label, "vostok (1s)");
        assert!(second.options[0].disabled);
        assert!(!second.options[1].disabled);
    }

    #[test]
    fn test_cancel_reseats_previous_astronaut() {
        let snapshot = crewed();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let mut prompter = ScriptedPrompter::new([
            Answer::Pick(0),
            Answer::Cancel,
            Answer::Pick(1),
            Answer::Pick(0),
        ]);
        let Choice::AssignAstronauts {
            capsule_assignments,
        } = assign_astronauts(ctx, &SpacecraftId::new("ship"), &mut prompter).unwrap()
        else {
            panic!("expected an assignment");
        };
        assert_eq!(
            capsule_assignments[&ComponentId::new("c2")],
            vec![ComponentId::new("a1")]
        );
        assert_eq!(
            capsule_assignments[&ComponentId::new("c1")],
            vec![ComponentId::new("a2")]
        );
    }

    #[test]
    fn test_no_astronauts_needs_no_prompt() {
        let snapshot = SnapshotBuilder::new()
            .location("leo")
            .capsule_definition("vostok", 1, 2)
            .agency("nasa", 0)
            .component("nasa", "c1", "vostok")
            .spacecraft("nasa", "ship", "leo", &["c1"])
            .build();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let mut prompter = ScriptedPrompter::new([]);
        assert_eq!(
            assign_astronauts(ctx, &SpacecraftId::new("ship"), &mut prompter).unwrap(),
            Choice::AssignAstronauts {
                capsule_assignments: BTreeMap::new()
            }
        );
    }

    #[test]
    fn test_too_few_working_seats_aborts() {
        let mut snapshot = crewed();
        SnapshotBuilder::damage(&mut snapshot, "c2");
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let mut prompter = ScriptedPrompter::new([]);
        assert!(matches!(
            assign_astronauts(ctx, &SpacecraftId::new("ship"), &mut prompter),
            Err(ResolveError::DecisionAborted { .. })
        ));
    }

    #[test]
    fn test_life_support_picks_exactly_capacity() {
        let snapshot = crewed();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let ship = SpacecraftId::new("ship");

        let mut prompter = ScriptedPrompter::new([Answer::PickMany(vec![1])]);
        assert_eq!(
            life_support(ctx, &ship, 1, &mut prompter).unwrap(),
            Choice::LifeSupport {
                astronaut_ids: vec![ComponentId::new("a2")]
            }
        );

        let mut prompter = ScriptedPrompter::new([Answer::PickMany(vec![0])]);
        assert!(life_support(ctx, &ship, 5, &mut prompter).is_err());

        let mut prompter = ScriptedPrompter::new([Answer::Cancel]);
        assert!(matches!(
            life_support(ctx, &ship, 1, &mut prompter),
            Err(ResolveError::DecisionAborted {
                kind: "life_support"
            })
        ));
    }
}
