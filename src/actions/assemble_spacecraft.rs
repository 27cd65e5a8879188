//! Assemble loose components into a new spacecraft.

use super::{Action, Candidate, choices_of};
use crate::chain::{ChainDriver, Committed, StepChain, StepOutcome, Validation};
use crate::config::ResolveContext;
use crate::decision::{ActionChoice, ResolveError};
use crate::format::{ComponentDetail, component_label};
use crate::ids::{AgencyId, ComponentId};
use crate::prompt::{Prompter, SelectBounds, Selection, select_values};
use crate::rules::{is_component_on_spacecraft, sort_component_ids};
use crate::snapshot::{ComponentKind, LookupError, Snapshot};
use std::collections::BTreeMap;

const CAPACITY_EXCEEDED: &str = "capsule capacity exceeded by astronauts";

pub struct AssembleSpacecraft;

impl Action for AssembleSpacecraft {
    type Option = ComponentId;

    /// Components not aboard any spacecraft, sorted by definition.
    fn listing(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
    ) -> Result<Vec<Candidate<ComponentId>>, LookupError> {
        let snapshot = ctx.snapshot;
        let agency = snapshot.agency(agency)?;
        let owned: Vec<ComponentId> = agency.components.iter().map(|c| c.id.clone()).collect();
        let mut listing = Vec::new();
        for id in sort_component_ids(snapshot, &owned)? {
            if is_component_on_spacecraft(agency, &id) {
                continue;
            }
            let label = component_label(snapshot, &id, ComponentDetail::NONE)?;
            listing.push(Candidate::new(id, label, true));
        }
        Ok(listing)
    }

    fn resolve(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<ActionChoice>, ResolveError> {
        ChainDriver::new(AssembleChain { ctx, agency }).run(prompter)
    }
}

/// Astronauts picked and the seats their capsules offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Crew {
    astronauts: usize,
    capacity: usize,
}

impl Crew {
    fn tally(snapshot: &Snapshot, components: &[ComponentId]) -> Result<Self, LookupError> {
        let mut crew = Crew::default();
        for id in components {
            match snapshot.definition_of(id)?.kind {
                ComponentKind::Astronaut { .. } => crew.astronauts += 1,
                ComponentKind::Capsule { capacity, .. } => crew.capacity += capacity,
                _ => {}
            }
        }
        Ok(crew)
    }
}

struct AssembleChain<'a> {
    ctx: ResolveContext<'a>,
    agency: &'a AgencyId,
}

impl StepChain for AssembleChain<'_> {
    type Step = ();
    type Value = Vec<ComponentId>;
    type Output = ActionChoice;

    fn name(&self) -> &'static str {
        "assemble_spacecraft"
    }

    fn first_step(&self) {}

    fn next_step(
        &self,
        _current: (),
        _committed: &Committed<(), Vec<ComponentId>>,
    ) -> Result<Option<()>, ResolveError> {
        Ok(None)
    }

    fn run_step(
        &self,
        _step: (),
        _committed: &Committed<(), Vec<ComponentId>>,
        prompter: &mut dyn Prompter,
    ) -> Result<StepOutcome<Vec<ComponentId>>, ResolveError> {
        let snapshot = self.ctx.snapshot;
        let choices = choices_of(AssembleSpacecraft::listing(self.ctx, self.agency)?);

        // Per-component contribution, so the status line needs no lookups.
        let mut contribution = BTreeMap::new();
        for id in choices.values() {
            contribution.insert(id.clone(), Crew::tally(snapshot, std::slice::from_ref(id))?);
        }
        let status: &dyn Fn(&[ComponentId]) -> String = &|picked| {
            let crew = picked
                .iter()
                .filter_map(|id| contribution.get(id))
                .fold(Crew::default(), |sum, part| Crew {
                    astronauts: sum.astronauts + part.astronauts,
                    capacity: sum.capacity + part.capacity,
                });
            if crew == Crew::default() {
                "select components".to_string()
            } else {
                format!(
                    "select components; selected {} astronauts and capsules with {} total capacity",
                    crew.astronauts, crew.capacity
                )
            }
        };

        let bounds = SelectBounds::at_least(1);
        Ok(
            match select_values(prompter, "select components", &choices, bounds, Some(status))? {
                Selection::Chosen(components) => StepOutcome::Advance(components),
                Selection::Cancelled => StepOutcome::Cancel,
            },
        )
    }

    fn validate(
        &self,
        committed: &Committed<(), Vec<ComponentId>>,
    ) -> Result<Validation<(), ActionChoice>, ResolveError> {
        let Some(components) = committed.get(()) else {
            return Err(ResolveError::IncompleteChain {
                chain: self.name(),
                missing: "components",
            });
        };
        let crew = Crew::tally(self.ctx.snapshot, components)?;
        if crew.astronauts > crew.capacity {
            return Ok(Validation::Retry {
                step: (),
                message: CAPACITY_EXCEEDED.to_string(),
            });
        }
        Ok(Validation::Accept(ActionChoice::AssembleSpacecraft {
            component_ids: components.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::prompt::{Answer, ScriptedPrompter};
    use crate::tests::fixtures::SnapshotBuilder;

    fn hangar() -> Snapshot {
        SnapshotBuilder::new()
            .location("earth")
            .astronaut_definition("astronaut", None)
            .capsule_definition("vostok", 1, 2)
            .rocket_definition("juno", 4, 1)
            .agency("nasa", 0)
            .component("nasa", "r1", "juno")
            .component("nasa", "a1", "astronaut")
            .component("nasa", "a2", "astronaut")
            .component("nasa", "c1", "vostok")
            .component("nasa", "r2", "juno")
            .spacecraft("nasa", "s1", "earth", &["r2"])
            .build()
    }

    #[test]
    fn test_loose_components_are_listed_sorted() {
        let snapshot = hangar();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        assert_eq!(
            AssembleSpacecraft::options(ctx, &AgencyId::new("nasa")).unwrap(),
            vec![
                ComponentId::new("a1"),
                ComponentId::new("a2"),
                ComponentId::new("r1"),
                ComponentId::new("c1"),
            ]
        );
    }

    #[test]
    fn test_overcrowded_capsule_is_rejected() {
        let snapshot = hangar();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let mut prompter = ScriptedPrompter::new([
            Answer::PickMany(vec![0, 1, 3]),
            Answer::PickMany(vec![0, 3]),
        ]);
        let choice = AssembleSpacecraft::resolve(ctx, &AgencyId::new("nasa"), &mut prompter).unwrap();
        assert_eq!(
            choice,
            Some(ActionChoice::AssembleSpacecraft {
                component_ids: vec![ComponentId::new("a1"), ComponentId::new("c1")],
            })
        );
        assert_eq!(prompter.notices(), [CAPACITY_EXCEEDED.to_string()]);
        assert_eq!(
            prompter.shown()[0].status.as_deref(),
            Some("select components; selected 2 astronauts and capsules with 1 total capacity")
        );
    }

    #[test]
    fn test_empty_pick_is_not_allowed() {
        let snapshot = hangar();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let mut prompter = ScriptedPrompter::new([Answer::PickMany(vec![])]);
        assert!(AssembleSpacecraft::resolve(ctx, &AgencyId::new("nasa"), &mut prompter).is_err());
    }
}
