//! Facts about locations reachable from the maneuver graph.

use crate::ids::LocationId;
use crate::snapshot::{HazardEffect, LookupError, Snapshot};

/// Locations that can be surveyed from `origin`: the distinct destinations of
/// its outgoing maneuvers, in graph order.
pub fn surveyable_locations(
    snapshot: &Snapshot,
    origin: &LocationId,
) -> Result<Vec<LocationId>, LookupError> {
    let origin = snapshot.location(origin)?;
    let mut destinations: Vec<LocationId> = Vec::new();
    for maneuver in &origin.maneuvers {
        if !destinations.contains(&maneuver.destination) {
            destinations.push(maneuver.destination.clone());
        }
    }
    Ok(destinations)
}

/// Whether a sample can be collected at `location`.
///
/// Only revealed, explorable locations whose hazard leaves something behind
/// have one.
pub fn location_has_sample(snapshot: &Snapshot, location: &LocationId) -> Result<bool, LookupError> {
    let location = snapshot.location(location)?;
    if !location.explorable || !location.revealed {
        return Ok(false);
    }
    Ok(location
        .hazard
        .as_ref()
        .is_some_and(|hazard| hazard.effects.iter().any(HazardEffect::yields_sample)))
}

/// Whether supplies can be collected at `location`.
pub fn location_has_supplies(
    snapshot: &Snapshot,
    location: &LocationId,
) -> Result<bool, LookupError> {
    let location = snapshot.location(location)?;
    if !location.explorable {
        return Ok(false);
    }
    Ok(location.hazard.as_ref().is_some_and(|hazard| {
        hazard
            .effects
            .iter()
            .any(|effect| matches!(effect, HazardEffect::Supplies))
    }))
}
