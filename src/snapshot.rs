//! Immutable simulation snapshot supplied by the rules engine.
//!
//! The snapshot is everything the resolver knows about the world at the
//! moment a decision is raised. Nothing in this crate mutates it; every fact a
//! prompt needs is looked up or derived from it on demand.

use crate::ids::{
    AdvancementId, AgencyId, ComponentId, DefinitionId, LocationId, ManeuverId, MissionId,
    SpacecraftId, WindowId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Lookup Errors
// ============================================================================

/// An id that the snapshot cannot resolve.
///
/// The engine only ever hands out ids that exist in the snapshot it sent, so
/// any of these means the engine and resolver disagree about the world.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("agency not found: {0}")]
    Agency(AgencyId),
    #[error("spacecraft not found: {0}")]
    Spacecraft(SpacecraftId),
    #[error("component not found: {0}")]
    Component(ComponentId),
    #[error("component definition not found: {0}")]
    Definition(DefinitionId),
    #[error("location not found: {0}")]
    Location(LocationId),
    #[error("maneuver not found: {0}")]
    Maneuver(ManeuverId),
    #[error("maneuver {maneuver} has no profile {index}")]
    Profile { maneuver: ManeuverId, index: usize },
    #[error("maneuver window not defined: {0}")]
    Window(WindowId),
}

// ============================================================================
// Snapshot
// ============================================================================

/// Expansions that change resolver behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expansion {
    Mercury,
    OuterPlanets,
}

/// The complete, read-only simulation state at decision time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Current game year.
    pub year: u32,
    /// Enabled expansions.
    pub expansions: Vec<Expansion>,
    /// Agencies in seating order.
    pub agencies: Vec<Agency>,
    /// Component definitions in catalogue order.
    pub component_definitions: Vec<ComponentDefinition>,
    /// Advancement definitions in catalogue order.
    pub advancement_definitions: Vec<AdvancementDefinition>,
    /// Locations of the maneuver graph.
    pub locations: Vec<Location>,
    /// Missions in play.
    pub missions: Vec<Mission>,
    /// Recurring maneuver windows by name.
    pub maneuver_windows: BTreeMap<WindowId, ManeuverWindow>,
}

/// An operator-controlled faction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Agency {
    pub id: AgencyId,
    /// Funds on hand, in millions.
    pub funds: u32,
    /// Every component the agency owns, attached or not.
    pub components: Vec<Component>,
    pub spacecraft: Vec<Spacecraft>,
    pub advancements: Vec<HeldAdvancement>,
}

/// A component instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Component {
    pub id: ComponentId,
    pub definition: DefinitionId,
    /// Damaged components (or incapacitated astronauts) cannot be used.
    pub damaged: bool,
    /// Set once a probe or capsule has surveyed this turn.
    pub surveyed_this_turn: bool,
}

/// A spacecraft: components travelling together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacecraft {
    pub id: SpacecraftId,
    pub location: LocationId,
    pub component_ids: Vec<ComponentId>,
    /// Years remaining on the current maneuver; zero when idle.
    pub years: u32,
    /// The maneuver in progress while `years > 0`.
    pub maneuver: Option<ManeuverId>,
}

impl Spacecraft {
    /// Whether the spacecraft is free to take new actions.
    pub fn is_idle(&self) -> bool {
        self.years == 0
    }
}

// ============================================================================
// Definitions
// ============================================================================

/// Static data shared by all instances of a component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDefinition {
    pub id: DefinitionId,
    #[serde(default)]
    pub mass: u32,
    /// Purchase price; definitions without one cannot be bought.
    #[serde(default)]
    pub cost: Option<u32>,
    /// Advancement required before this component can be bought.
    #[serde(default)]
    pub advancement: Option<AdvancementId>,
    #[serde(flatten)]
    pub kind: ComponentKind,
}

/// Astronaut specialties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Pilot,
    Mechanic,
    Doctor,
}

/// What a component is and the kind-specific data it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentKind {
    /// Fires once, delivering its full thrust regardless of duration.
    Rocket { thrust: u32 },
    /// Delivers thrust every year the maneuver lasts.
    IonThruster { thrust_per_year: u32 },
    Astronaut {
        #[serde(default)]
        specialty: Option<Specialty>,
    },
    Capsule {
        capacity: usize,
        #[serde(default)]
        heat_shields: bool,
        #[serde(default)]
        radiation_protection: u32,
    },
    Probe,
    Explorer,
    Supplies,
    /// A sample collected from `location`.
    Sample { location: LocationId },
}

impl ComponentKind {
    pub fn is_propulsion(&self) -> bool {
        matches!(
            self,
            ComponentKind::Rocket { .. } | ComponentKind::IonThruster { .. }
        )
    }

    pub fn is_astronaut(&self) -> bool {
        matches!(self, ComponentKind::Astronaut { .. })
    }

    /// Whether the component can be chosen to take damage.
    ///
    /// Supplies and samples are consumed or turned in, never damaged.
    pub fn is_damageable(&self) -> bool {
        !matches!(self, ComponentKind::Supplies | ComponentKind::Sample { .. })
    }
}

/// Static data for an advancement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancementDefinition {
    pub id: AdvancementId,
}

/// Result printed on an advancement outcome card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    MinorFailure,
    MajorFailure,
}

/// An advancement an agency has researched, with its remaining outcome cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeldAdvancement {
    pub id: AdvancementId,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

// ============================================================================
// Locations and Maneuvers
// ============================================================================

/// A node of the maneuver graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub id: LocationId,
    /// Explorable locations hide a hazard card until revealed.
    pub explorable: bool,
    pub revealed: bool,
    /// Revealing this location kills every astronaut aboard.
    pub astronaut_only: bool,
    /// Docking, separating and repairing are impossible here.
    pub no_rendezvous_or_repair: bool,
    pub hazard: Option<LocationHazard>,
    pub maneuvers: Vec<Maneuver>,
}

/// A location hazard card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationHazard {
    pub flavor: String,
    pub effects: Vec<HazardEffect>,
}

/// One effect printed on a location hazard card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HazardEffect {
    /// Astronauts fall sick on a d8 roll at or below `severity`.
    Sickness { severity: u32 },
    /// Astronauts are irradiated on a d8 roll at or below `severity`.
    Radiation { severity: u32 },
    /// Supplies can be collected here.
    Supplies,
    /// A sample worth `value` can be collected here.
    ValuableSample { value: u32 },
    /// A sample of alien origin can be collected here.
    AlienSample,
    /// Signs of life; a sample can be collected here.
    Life,
    Nothing,
}

impl HazardEffect {
    /// Whether this effect leaves something to collect as a sample.
    pub fn yields_sample(&self) -> bool {
        matches!(
            self,
            HazardEffect::ValuableSample { .. } | HazardEffect::AlienSample | HazardEffect::Life
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            HazardEffect::Sickness { .. } => "sickness",
            HazardEffect::Radiation { .. } => "radiation",
            HazardEffect::Supplies => "supplies",
            HazardEffect::ValuableSample { .. } => "valuable_sample",
            HazardEffect::AlienSample => "alien_sample",
            HazardEffect::Life => "life",
            HazardEffect::Nothing => "nothing",
        }
    }
}

/// An outgoing edge of the maneuver graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maneuver {
    pub destination: LocationId,
    pub profiles: Vec<ManeuverProfile>,
}

/// One route variant of a maneuver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManeuverProfile {
    /// Thrust required per unit of mass; `None` when no thrust can complete it.
    pub difficulty: Option<u32>,
    /// Years the maneuver takes; present only for variable-duration profiles.
    pub duration: Option<u32>,
    pub hazards: ManeuverHazards,
    /// A recurring window this profile depends on.
    pub slingshot: Option<WindowId>,
}

/// Hazards encountered while flying a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManeuverHazards {
    pub radiation: Option<u32>,
    pub re_entry: bool,
    pub landing: Option<LandingHazard>,
    pub location: Option<LocationId>,
}

/// A landing hazard; optional landings may be skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingHazard {
    pub optional: bool,
}

/// A window that opens every `interval` years starting at `first_year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManeuverWindow {
    pub first_year: u32,
    pub interval: u32,
}

/// Mission kinds the resolver cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    /// Retire an explorer at the mission's location.
    DiscardExplorer,
    #[serde(other)]
    Other,
}

/// A mission card in play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    #[serde(rename = "type")]
    pub kind: MissionKind,
    #[serde(default)]
    pub location: Option<LocationId>,
}

// ============================================================================
// Lookups
// ============================================================================

impl Snapshot {
    /// Parse a snapshot from the engine's JSON encoding.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn agency(&self, id: &AgencyId) -> Result<&Agency, LookupError> {
        self.agencies
            .iter()
            .find(|agency| &agency.id == id)
            .ok_or_else(|| LookupError::Agency(id.clone()))
    }

    pub fn spacecraft(&self, id: &SpacecraftId) -> Result<&Spacecraft, LookupError> {
        self.agencies
            .iter()
            .flat_map(|agency| agency.spacecraft.iter())
            .find(|spacecraft| &spacecraft.id == id)
            .ok_or_else(|| LookupError::Spacecraft(id.clone()))
    }

    pub fn component(&self, id: &ComponentId) -> Result<&Component, LookupError> {
        self.agencies
            .iter()
            .flat_map(|agency| agency.components.iter())
            .find(|component| &component.id == id)
            .ok_or_else(|| LookupError::Component(id.clone()))
    }

    pub fn definition(&self, id: &DefinitionId) -> Result<&ComponentDefinition, LookupError> {
        self.component_definitions
            .iter()
            .find(|definition| &definition.id == id)
            .ok_or_else(|| LookupError::Definition(id.clone()))
    }

    /// The definition behind a component instance.
    pub fn definition_of(&self, id: &ComponentId) -> Result<&ComponentDefinition, LookupError> {
        let component = self.component(id)?;
        self.definition(&component.definition)
    }

    pub fn location(&self, id: &LocationId) -> Result<&Location, LookupError> {
        self.locations
            .iter()
            .find(|location| &location.id == id)
            .ok_or_else(|| LookupError::Location(id.clone()))
    }

    pub fn maneuver(&self, id: &ManeuverId) -> Result<&Maneuver, LookupError> {
        let not_found = || LookupError::Maneuver(id.clone());
        let (origin, destination) = id.endpoints().ok_or_else(not_found)?;
        let origin = self.location(&origin).map_err(|_| not_found())?;
        origin
            .maneuvers
            .iter()
            .find(|maneuver| maneuver.destination == destination)
            .ok_or_else(not_found)
    }

    pub fn profile(&self, id: &ManeuverId, index: usize) -> Result<&ManeuverProfile, LookupError> {
        self.maneuver(id)?
            .profiles
            .get(index)
            .ok_or_else(|| LookupError::Profile {
                maneuver: id.clone(),
                index,
            })
    }

    pub fn window(&self, id: &WindowId) -> Result<&ManeuverWindow, LookupError> {
        self.maneuver_windows
            .get(id)
            .ok_or_else(|| LookupError::Window(id.clone()))
    }

    pub fn has_expansion(&self, expansion: Expansion) -> bool {
        self.expansions.contains(&expansion)
    }
}

impl Agency {
    /// Whether the agency has researched `advancement`.
    pub fn has_advancement(&self, advancement: &AdvancementId) -> bool {
        self.advancements.iter().any(|held| &held.id == advancement)
    }

    pub fn held_advancement(&self, advancement: &AdvancementId) -> Option<&HeldAdvancement> {
        self.advancements.iter().find(|held| &held.id == advancement)
    }
}
