//! Operator-facing labels for snapshot entities.
//!
//! These are the strings shown in prompt options and rendered log lines. The
//! notation is the one printed on the cards: `4t` for rocket thrust, `5t/y`
//! for ion thrust per year, `2s` for capsule seats, `r` for heat shields,
//! `1p` for radiation protection.

use crate::ids::{ComponentId, DefinitionId, ManeuverId, SpacecraftId};
use crate::rules::spacecraft::{sort_component_ids, spacecraft_of_component};
use crate::snapshot::{
    ComponentDefinition, ComponentKind, HazardEffect, LocationHazard, LookupError, Outcome,
    Snapshot,
};

/// Which details to append to a component label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentDetail {
    /// The spacecraft carrying the component and where it is.
    pub spacecraft: bool,
    /// Thrust of rockets and ion thrusters.
    pub thrust: bool,
    /// Seats and protection of capsules.
    pub capsule: bool,
}

impl ComponentDetail {
    pub const NONE: Self = Self {
        spacecraft: false,
        thrust: false,
        capsule: false,
    };
    pub const THRUST: Self = Self {
        spacecraft: false,
        thrust: true,
        capsule: false,
    };
    pub const CAPSULE: Self = Self {
        spacecraft: false,
        thrust: false,
        capsule: true,
    };
    pub const ALL: Self = Self {
        spacecraft: true,
        thrust: true,
        capsule: true,
    };
}

fn definition_addendum(definition: &ComponentDefinition, detail: ComponentDetail, out: &mut Vec<String>) {
    if detail.thrust {
        match definition.kind {
            ComponentKind::Rocket { thrust } => out.push(format!("{}t", thrust)),
            ComponentKind::IonThruster { thrust_per_year } => {
                out.push(format!("{}t/y", thrust_per_year))
            }
            _ => {}
        }
    }
    if detail.capsule
        && let ComponentKind::Capsule {
            capacity,
            heat_shields,
            radiation_protection,
        } = definition.kind
    {
        out.push(format!("{}s", capacity));
        if heat_shields {
            out.push("r".to_string());
        }
        if radiation_protection > 0 {
            out.push(format!("{}p", radiation_protection));
        }
    }
}

fn with_addendum(base: &str, addendum: &[String]) -> String {
    if addendum.is_empty() {
        base.to_string()
    } else {
        format!("{} ({})", base, addendum.join("; "))
    }
}

/// `juno (damaged; on spacecraft s1, in leo; 4t)`
pub fn component_label(
    snapshot: &Snapshot,
    id: &ComponentId,
    detail: ComponentDetail,
) -> Result<String, LookupError> {
    let component = snapshot.component(id)?;
    let definition = snapshot.definition(&component.definition)?;

    let mut addendum = Vec::new();
    if component.damaged {
        addendum.push("damaged".to_string());
    }
    if detail.spacecraft
        && let Some(spacecraft) = spacecraft_of_component(snapshot, id)
    {
        addendum.push(format!(
            "on spacecraft {}, in {}",
            spacecraft.id, spacecraft.location
        ));
    }
    definition_addendum(definition, detail, &mut addendum);

    Ok(with_addendum(component.definition.as_str(), &addendum))
}

/// `juno (4t)`
pub fn definition_label(
    snapshot: &Snapshot,
    id: &DefinitionId,
    detail: ComponentDetail,
) -> Result<String, LookupError> {
    let definition = snapshot.definition(id)?;
    let mut addendum = Vec::new();
    definition_addendum(definition, detail, &mut addendum);
    Ok(with_addendum(definition.id.as_str(), &addendum))
}

/// `s1 on earth, 2y left on earth_to_mars; juno, vostok`
pub fn spacecraft_label(
    snapshot: &Snapshot,
    id: &SpacecraftId,
    with_components: bool,
    with_maneuver: bool,
) -> Result<String, LookupError> {
    let spacecraft = snapshot.spacecraft(id)?;
    let mut label = format!("{} on {}", spacecraft.id, spacecraft.location);
    if spacecraft.years > 0 {
        label.push_str(&format!(", {}y", spacecraft.years));
        if with_maneuver && let Some(maneuver) = &spacecraft.maneuver {
            label.push_str(&format!(" left on {}", maneuver));
        }
    }
    if with_components {
        let mut parts = Vec::new();
        for component in sort_component_ids(snapshot, &spacecraft.component_ids)? {
            parts.push(component_label(snapshot, &component, ComponentDetail::NONE)?);
        }
        label.push_str("; ");
        label.push_str(&parts.join(", "));
    }
    Ok(label)
}

/// `from earth to moon, D3 Y2 R N [L] H(moon)`
///
/// `D!` marks a profile without a printed difficulty.
pub fn profile_label(snapshot: &Snapshot, id: &ManeuverId, index: usize) -> Result<String, LookupError> {
    let (origin, destination) = id
        .endpoints()
        .ok_or_else(|| LookupError::Maneuver(id.clone()))?;
    let profile = snapshot.profile(id, index)?;

    let mut label = format!("from {} to {}, D", origin, destination);
    match profile.difficulty {
        Some(difficulty) => label.push_str(&difficulty.to_string()),
        None => label.push('!'),
    }
    if let Some(duration) = profile.duration {
        label.push_str(&format!(" Y{}", duration));
    }
    let hazards = &profile.hazards;
    if hazards.radiation.is_some_and(|severity| severity > 0) {
        label.push_str(" R");
    }
    if hazards.re_entry {
        label.push_str(" N");
    }
    if let Some(landing) = hazards.landing {
        label.push_str(if landing.optional { " [L]" } else { " L" });
    }
    if let Some(location) = &hazards.location {
        label.push_str(&format!(" H({})", location));
    }
    Ok(label)
}

/// One line per effect after the flavor text.
pub fn hazard_label(hazard: &LocationHazard) -> String {
    let mut label = format!("{}.", hazard.flavor);
    for effect in &hazard.effects {
        label.push('\n');
        label.push_str(effect.name());
        match effect {
            HazardEffect::ValuableSample { value } => label.push_str(&format!(" (${})", value)),
            HazardEffect::Sickness { severity } | HazardEffect::Radiation { severity } => {
                label.push_str(&format!(" (d8 <= {})", severity))
            }
            _ => {}
        }
    }
    label
}

pub fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Success => "success",
        Outcome::MinorFailure => "minor failure",
        Outcome::MajorFailure => "major failure",
    }
}
