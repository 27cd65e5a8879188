//! What a spacecraft carries and what it weighs.

use crate::ids::{AgencyId, ComponentId, SpacecraftId};
use crate::snapshot::{Agency, ComponentKind, LookupError, Snapshot, Spacecraft, Specialty};

/// Total mass of a spacecraft: the sum of its components' definition masses.
pub fn spacecraft_mass(snapshot: &Snapshot, spacecraft: &SpacecraftId) -> Result<u32, LookupError> {
    let spacecraft = snapshot.spacecraft(spacecraft)?;
    let mut mass: u32 = 0;
    for id in &spacecraft.component_ids {
        mass = mass.saturating_add(snapshot.definition_of(id)?.mass);
    }
    Ok(mass)
}

/// Whether any spacecraft of the agency holds the component.
pub fn is_component_on_spacecraft(agency: &Agency, component: &ComponentId) -> bool {
    agency
        .spacecraft
        .iter()
        .any(|spacecraft| spacecraft.component_ids.contains(component))
}

/// The spacecraft holding `component`, if any.
pub fn spacecraft_of_component<'a>(
    snapshot: &'a Snapshot,
    component: &ComponentId,
) -> Option<&'a Spacecraft> {
    snapshot
        .agencies
        .iter()
        .flat_map(|agency| agency.spacecraft.iter())
        .find(|spacecraft| spacecraft.component_ids.contains(component))
}

/// Whether the spacecraft carries an undamaged astronaut with `specialty`.
pub fn has_healthy_specialist(
    snapshot: &Snapshot,
    spacecraft: &SpacecraftId,
    specialty: Specialty,
) -> Result<bool, LookupError> {
    let spacecraft = snapshot.spacecraft(spacecraft)?;
    for id in &spacecraft.component_ids {
        let component = snapshot.component(id)?;
        if component.damaged {
            continue;
        }
        if let ComponentKind::Astronaut {
            specialty: Some(held),
        } = snapshot.definition(&component.definition)?.kind
            && held == specialty
        {
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn has_supplies(snapshot: &Snapshot, spacecraft: &SpacecraftId) -> Result<bool, LookupError> {
    any_component(snapshot, spacecraft, |kind, _| {
        matches!(kind, ComponentKind::Supplies)
    })
}

/// Whether the spacecraft carries an undamaged probe or capsule.
pub fn has_working_probe_or_capsule(
    snapshot: &Snapshot,
    spacecraft: &SpacecraftId,
) -> Result<bool, LookupError> {
    any_component(snapshot, spacecraft, |kind, damaged| {
        !damaged && matches!(kind, ComponentKind::Probe | ComponentKind::Capsule { .. })
    })
}

fn any_component(
    snapshot: &Snapshot,
    spacecraft: &SpacecraftId,
    predicate: impl Fn(&ComponentKind, bool) -> bool,
) -> Result<bool, LookupError> {
    let spacecraft = snapshot.spacecraft(spacecraft)?;
    for id in &spacecraft.component_ids {
        let component = snapshot.component(id)?;
        let definition = snapshot.definition(&component.definition)?;
        if predicate(&definition.kind, component.damaged) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Astronauts aboard the spacecraft, in boarding order.
pub fn astronaut_ids(
    snapshot: &Snapshot,
    spacecraft: &SpacecraftId,
) -> Result<Vec<ComponentId>, LookupError> {
    filter_components(snapshot, spacecraft, ComponentKind::is_astronaut)
}

/// Rockets and ion thrusters aboard the spacecraft, in boarding order.
pub fn propulsion_ids(
    snapshot: &Snapshot,
    spacecraft: &SpacecraftId,
) -> Result<Vec<ComponentId>, LookupError> {
    filter_components(snapshot, spacecraft, ComponentKind::is_propulsion)
}

fn filter_components(
    snapshot: &Snapshot,
    spacecraft: &SpacecraftId,
    keep: impl Fn(&ComponentKind) -> bool,
) -> Result<Vec<ComponentId>, LookupError> {
    let spacecraft = snapshot.spacecraft(spacecraft)?;
    let mut ids = Vec::new();
    for id in &spacecraft.component_ids {
        if keep(&snapshot.definition_of(id)?.kind) {
            ids.push(id.clone());
        }
    }
    Ok(ids)
}

/// Sort component ids by definition id, keeping boarding order within a
/// definition.
pub fn sort_component_ids(
    snapshot: &Snapshot,
    ids: &[ComponentId],
) -> Result<Vec<ComponentId>, LookupError> {
    let mut keyed = Vec::with_capacity(ids.len());
    for id in ids {
        keyed.push((snapshot.component(id)?.definition.clone(), id.clone()));
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, id)| id).collect())
}

/// Idle spacecraft owned by `agency`, in ownership order.
pub fn idle_spacecraft<'a>(
    snapshot: &'a Snapshot,
    agency: &AgencyId,
) -> Result<impl Iterator<Item = &'a Spacecraft>, LookupError> {
    Ok(snapshot
        .agency(agency)?
        .spacecraft
        .iter()
        .filter(|spacecraft| spacecraft.is_idle()))
}
