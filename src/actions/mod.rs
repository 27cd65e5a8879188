//! Take-action sub-actions.
//!
//! Every action kind has the same three-part surface, provided by the
//! [`Action`] trait:
//!
//! - `listing`: every structurally present candidate, with an `enabled` flag.
//!   Disabled candidates are still shown to the operator.
//! - `options`: the enabled subset, in listing order.
//! - `is_available`: whether `options` is non-empty. The action menu disables
//!   an action exactly when this is false.
//!
//! `options` and `is_available` are provided methods; action kinds only
//! implement `listing` and `resolve`, so the menu can never disagree with
//! what the action actually offers.

use crate::chain::{ChainDriver, Committed, StepChain, StepOutcome, Validation};
use crate::config::ResolveContext;
use crate::decision::{ActionChoice, ResolveError};
use crate::ids::AgencyId;
use crate::prompt::{Choices, Prompter, Selection, select_value};
use crate::snapshot::LookupError;
use std::fmt::Debug;

pub mod assemble_spacecraft;
pub mod buy_component;
pub mod collect_sample;
pub mod collect_supplies;
pub mod disassemble_spacecraft;
pub mod discard_explorer;
pub mod dock_spacecraft;
pub mod heal_astronauts;
pub mod perform_maneuver;
pub(crate) mod propulsion;
pub mod repair_components;
pub mod research_advancement;
pub mod separate_spacecraft;
pub mod survey_location;

pub use assemble_spacecraft::AssembleSpacecraft;
pub use buy_component::BuyComponent;
pub use collect_sample::CollectSample;
pub use collect_supplies::CollectSupplies;
pub use disassemble_spacecraft::DisassembleSpacecraft;
pub use discard_explorer::DiscardExplorer;
pub use dock_spacecraft::DockSpacecraft;
pub use heal_astronauts::HealAstronauts;
pub use perform_maneuver::PerformManeuver;
pub use repair_components::RepairComponents;
pub use research_advancement::ResearchAdvancement;
pub use separate_spacecraft::SeparateSpacecraft;
pub use survey_location::SurveyLocation;

// ============================================================================
// Candidates
// ============================================================================

/// A structurally present option and whether it can be picked right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<T> {
    pub value: T,
    pub label: String,
    pub enabled: bool,
}

impl<T> Candidate<T> {
    pub fn new(value: T, label: impl Into<String>, enabled: bool) -> Self {
        Self {
            value,
            label: label.into(),
            enabled,
        }
    }
}

/// Turn a listing into prompt choices, keeping disabled candidates visible.
pub fn choices_of<T: Clone>(listing: Vec<Candidate<T>>) -> Choices<T> {
    let mut choices = Choices::new();
    for candidate in listing {
        choices.push(candidate.label, candidate.value, !candidate.enabled);
    }
    choices
}

// ============================================================================
// Action Trait
// ============================================================================

/// One take-action sub-action.
pub trait Action {
    /// What the operator picks from the listing.
    type Option: Clone + Debug;

    fn listing(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
    ) -> Result<Vec<Candidate<Self::Option>>, LookupError>;

    fn options(ctx: ResolveContext<'_>, agency: &AgencyId) -> Result<Vec<Self::Option>, LookupError> {
        Ok(Self::listing(ctx, agency)?
            .into_iter()
            .filter(|candidate| candidate.enabled)
            .map(|candidate| candidate.value)
            .collect())
    }

    fn is_available(ctx: ResolveContext<'_>, agency: &AgencyId) -> Result<bool, LookupError> {
        Ok(!Self::options(ctx, agency)?.is_empty())
    }

    /// Walk the operator through the action. `None` means they backed out.
    fn resolve(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<ActionChoice>, ResolveError>;
}

/// The sub-actions of the take-action menu, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ResearchAdvancement,
    BuyComponent,
    AssembleSpacecraft,
    DisassembleSpacecraft,
    PerformManeuver,
    DockSpacecraft,
    SeparateSpacecraft,
    SurveyLocation,
    CollectSample,
    CollectSupplies,
    RepairComponents,
    HealAstronauts,
    DiscardExplorer,
}

impl ActionKind {
    pub const ALL: [ActionKind; 13] = [
        ActionKind::ResearchAdvancement,
        ActionKind::BuyComponent,
        ActionKind::AssembleSpacecraft,
        ActionKind::DisassembleSpacecraft,
        ActionKind::PerformManeuver,
        ActionKind::DockSpacecraft,
        ActionKind::SeparateSpacecraft,
        ActionKind::SurveyLocation,
        ActionKind::CollectSample,
        ActionKind::CollectSupplies,
        ActionKind::RepairComponents,
        ActionKind::HealAstronauts,
        ActionKind::DiscardExplorer,
    ];

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::ResearchAdvancement => "research advancement",
            ActionKind::BuyComponent => "buy component",
            ActionKind::AssembleSpacecraft => "assemble spacecraft",
            ActionKind::DisassembleSpacecraft => "disassemble spacecraft",
            ActionKind::PerformManeuver => "perform maneuver",
            ActionKind::DockSpacecraft => "dock spacecraft",
            ActionKind::SeparateSpacecraft => "separate spacecraft",
            ActionKind::SurveyLocation => "survey location",
            ActionKind::CollectSample => "collect sample",
            ActionKind::CollectSupplies => "collect supplies",
            ActionKind::RepairComponents => "repair components",
            ActionKind::HealAstronauts => "heal astronauts",
            ActionKind::DiscardExplorer => "discard explorer",
        }
    }

    pub fn is_available(self, ctx: ResolveContext<'_>, agency: &AgencyId) -> Result<bool, LookupError> {
        match self {
            ActionKind::ResearchAdvancement => ResearchAdvancement::is_available(ctx, agency),
            ActionKind::BuyComponent => BuyComponent::is_available(ctx, agency),
            ActionKind::AssembleSpacecraft => AssembleSpacecraft::is_available(ctx, agency),
            ActionKind::DisassembleSpacecraft => DisassembleSpacecraft::is_available(ctx, agency),
            ActionKind::PerformManeuver => PerformManeuver::is_available(ctx, agency),
            ActionKind::DockSpacecraft => DockSpacecraft::is_available(ctx, agency),
            ActionKind::SeparateSpacecraft => SeparateSpacecraft::is_available(ctx, agency),
            ActionKind::SurveyLocation => SurveyLocation::is_available(ctx, agency),
            ActionKind::CollectSample => CollectSample::is_available(ctx, agency),
            ActionKind::CollectSupplies => CollectSupplies::is_available(ctx, agency),
            ActionKind::RepairComponents => RepairComponents::is_available(ctx, agency),
            ActionKind::HealAstronauts => HealAstronauts::is_available(ctx, agency),
            ActionKind::DiscardExplorer => DiscardExplorer::is_available(ctx, agency),
        }
    }

    pub fn resolve(
        self,
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<ActionChoice>, ResolveError> {
        match self {
            ActionKind::ResearchAdvancement => ResearchAdvancement::resolve(ctx, agency, prompter),
            ActionKind::BuyComponent => BuyComponent::resolve(ctx, agency, prompter),
            ActionKind::AssembleSpacecraft => AssembleSpacecraft::resolve(ctx, agency, prompter),
            ActionKind::DisassembleSpacecraft => {
                DisassembleSpacecraft::resolve(ctx, agency, prompter)
            }
            ActionKind::PerformManeuver => PerformManeuver::resolve(ctx, agency, prompter),
            ActionKind::DockSpacecraft => DockSpacecraft::resolve(ctx, agency, prompter),
            ActionKind::SeparateSpacecraft => SeparateSpacecraft::resolve(ctx, agency, prompter),
            ActionKind::SurveyLocation => SurveyLocation::resolve(ctx, agency, prompter),
            ActionKind::CollectSample => CollectSample::resolve(ctx, agency, prompter),
            ActionKind::CollectSupplies => CollectSupplies::resolve(ctx, agency, prompter),
            ActionKind::RepairComponents => RepairComponents::resolve(ctx, agency, prompter),
            ActionKind::HealAstronauts => HealAstronauts::resolve(ctx, agency, prompter),
            ActionKind::DiscardExplorer => DiscardExplorer::resolve(ctx, agency, prompter),
        }
    }
}

// ============================================================================
// Single-Step Chains
// ============================================================================

/// A chain with one select step and no validator.
pub struct SelectOne<T> {
    name: &'static str,
    message: String,
    choices: Choices<T>,
}

impl<T: Clone + Debug> SelectOne<T> {
    pub fn new(name: &'static str, message: impl Into<String>, choices: Choices<T>) -> Self {
        Self {
            name,
            message: message.into(),
            choices,
        }
    }

    /// Run the chain to completion.
    pub fn run(self, prompter: &mut dyn Prompter) -> Result<Option<T>, ResolveError> {
        ChainDriver::new(self).run(prompter)
    }
}

impl<T: Clone + Debug> StepChain for SelectOne<T> {
    type Step = ();
    type Value = T;
    type Output = T;

    fn name(&self) -> &'static str {
        self.name
    }

    fn first_step(&self) {}

    fn next_step(&self, _current: (), _committed: &Committed<(), T>) -> Result<Option<()>, ResolveError> {
        Ok(None)
    }

    fn run_step(
        &self,
        _step: (),
        _committed: &Committed<(), T>,
        prompter: &mut dyn Prompter,
    ) -> Result<StepOutcome<T>, ResolveError> {
        Ok(match select_value(prompter, &self.message, &self.choices)? {
            Selection::Chosen(value) => StepOutcome::Advance(value),
            Selection::Cancelled => StepOutcome::Cancel,
        })
    }

    fn validate(&self, committed: &Committed<(), T>) -> Result<Validation<(), T>, ResolveError> {
        committed
            .values()
            .last()
            .cloned()
            .map(Validation::Accept)
            .ok_or(ResolveError::IncompleteChain {
                chain: self.name,
                missing: "selection",
            })
    }
}

/// Prompt once over a listing; used by the single-step actions.
pub(crate) fn select_from_listing<T: Clone + Debug>(
    name: &'static str,
    message: impl Into<String>,
    listing: Vec<Candidate<T>>,
    prompter: &mut dyn Prompter,
) -> Result<Option<T>, ResolveError> {
    SelectOne::new(name, message, choices_of(listing)).run(prompter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::prompt::{Answer, ScriptedPrompter};
    use crate::snapshot::Snapshot;
    use crate::tests::fixtures::SnapshotBuilder;

    fn busy_world() -> Snapshot {
        SnapshotBuilder::new()
            .location("earth")
            .location("leo")
            .maneuver("earth", "leo", 3, None)
            .rocket_definition("juno", 4, 1)
            .priced(1, None)
            .probe_definition("pioneer", 1)
            .priced(4, Some("surveying"))
            .advancement_definition("rendezvous")
            .advancement_definition("surveying")
            .agency("nasa", 12)
            .advancement("nasa", "rendezvous", &[])
            .component("nasa", "r1", "juno")
            .component("nasa", "r2", "juno")
            .component("nasa", "p1", "pioneer")
            .component("nasa", "loose", "juno")
            .spacecraft("nasa", "s1", "earth", &["r1", "p1"])
            .spacecraft("nasa", "s2", "earth", &["r2"])
            .build()
    }

    #[test]
    fn test_availability_matches_options_for_every_action() {
        let snapshot = busy_world();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let agency = AgencyId::new("nasa");

        for kind in ActionKind::ALL {
            let available = kind.is_available(ctx, &agency).unwrap();
            let has_options = match kind {
                ActionKind::ResearchAdvancement => {
                    !ResearchAdvancement::options(ctx, &agency).unwrap().is_empty()
                }
                ActionKind::BuyComponent => !BuyComponent::options(ctx, &agency).unwrap().is_empty(),
                ActionKind::AssembleSpacecraft => {
                    !AssembleSpacecraft::options(ctx, &agency).unwrap().is_empty()
                }
                ActionKind::DisassembleSpacecraft => {
                    !DisassembleSpacecraft::options(ctx, &agency).unwrap().is_empty()
                }
                ActionKind::PerformManeuver => {
                    !PerformManeuver::options(ctx, &agency).unwrap().is_empty()
                }
                ActionKind::DockSpacecraft => {
                    !DockSpacecraft::options(ctx, &agency).unwrap().is_empty()
                }
                ActionKind::SeparateSpacecraft => {
                    !SeparateSpacecraft::options(ctx, &agency).unwrap().is_empty()
                }
                ActionKind::SurveyLocation => {
                    !SurveyLocation::options(ctx, &agency).unwrap().is_empty()
                }
                ActionKind::CollectSample => !CollectSample::options(ctx, &agency).unwrap().is_empty(),
                ActionKind::CollectSupplies => {
                    !CollectSupplies::options(ctx, &agency).unwrap().is_empty()
                }
                ActionKind::RepairComponents => {
                    !RepairComponents::options(ctx, &agency).unwrap().is_empty()
                }
                ActionKind::HealAstronauts => {
                    !HealAstronauts::options(ctx, &agency).unwrap().is_empty()
                }
                ActionKind::DiscardExplorer => {
                    !DiscardExplorer::options(ctx, &agency).unwrap().is_empty()
                }
            };
            assert_eq!(available, has_options, "{}", kind.label());
        }
    }

    #[test]
    fn test_busy_world_availability() {
        let snapshot = busy_world();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let agency = AgencyId::new("nasa");
        let available: Vec<&str> = ActionKind::ALL
            .into_iter()
            .filter(|kind| kind.is_available(ctx, &agency).unwrap())
            .map(ActionKind::label)
            .collect();
        assert_eq!(
            available,
            vec![
                "research advancement",
                "buy component",
                "assemble spacecraft",
                "disassemble spacecraft",
                "perform maneuver",
                "dock spacecraft",
                "separate spacecraft",
            ]
        );
    }

    #[test]
    fn test_options_are_idempotent() {
        let snapshot = busy_world();
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        let agency = AgencyId::new("nasa");
        assert_eq!(
            BuyComponent::listing(ctx, &agency).unwrap(),
            BuyComponent::listing(ctx, &agency).unwrap()
        );
        assert_eq!(
            PerformManeuver::options(ctx, &agency).unwrap(),
            PerformManeuver::options(ctx, &agency).unwrap()
        );
        assert_eq!(
            DockSpacecraft::options(ctx, &agency).unwrap(),
            DockSpacecraft::options(ctx, &agency).unwrap()
        );
    }

    #[test]
    fn test_select_one_chain_cancel_is_no_choice() {
        let listing = vec![
            Candidate::new(1u32, "one", true),
            Candidate::new(2u32, "two", false),
        ];
        let mut prompter = ScriptedPrompter::new([Answer::Cancel]);
        assert_eq!(
            select_from_listing("numbers", "pick", listing.clone(), &mut prompter).unwrap(),
            None
        );

        let mut prompter = ScriptedPrompter::new([Answer::Pick(0)]);
        assert_eq!(
            select_from_listing("numbers", "pick", listing, &mut prompter).unwrap(),
            Some(1)
        );
        assert!(prompter.shown()[0].options[1].disabled);
    }
}
