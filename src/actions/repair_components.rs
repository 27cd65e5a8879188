//! Repair damaged components with a mechanic and supplies.

use super::{Action, Candidate, select_from_listing};
use crate::config::ResolveContext;
use crate::decision::{ActionChoice, ResolveError};
use crate::format::spacecraft_label;
use crate::ids::{AgencyId, SpacecraftId};
use crate::prompt::Prompter;
use crate::rules::{has_healthy_specialist, has_supplies};
use crate::snapshot::LookupError;

pub struct RepairComponents;

impl Action for RepairComponents {
    type Option = SpacecraftId;

    /// Spacecraft with a healthy mechanic, supplies, and a damaged component
    /// that is not an astronaut.
    fn listing(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
    ) -> Result<Vec<Candidate<SpacecraftId>>, LookupError> {
        let snapshot = ctx.snapshot;
        let agency = snapshot.agency(agency)?;
        let mut listing = Vec::new();
        for spacecraft in &agency.spacecraft {
            if !has_healthy_specialist(snapshot, &spacecraft.id, ctx.config.repair_specialty)? {
                continue;
            }
            if !has_supplies(snapshot, &spacecraft.id)? {
                continue;
            }
            let mut needs_repair = false;
            for id in &spacecraft.component_ids {
                let component = snapshot.component(id)?;
                if component.damaged && !snapshot.definition(&component.definition)?.kind.is_astronaut() {
                    needs_repair = true;
                    break;
                }
            }
            if needs_repair {
                listing.push(Candidate::new(
                    spacecraft.id.clone(),
                    spacecraft_label(snapshot, &spacecraft.id, true, false)?,
                    true,
                ));
            }
        }
        Ok(listing)
    }

    fn resolve(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<ActionChoice>, ResolveError> {
        let picked = select_from_listing(
            "repair_components",
            "select spacecraft to repair components",
            Self::listing(ctx, agency)?,
            prompter,
        )?;
        Ok(picked.map(|spacecraft_id| ActionChoice::RepairComponents { spacecraft_id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::snapshot::{Snapshot, Specialty};
    use crate::tests::fixtures::SnapshotBuilder;

    fn workshop() -> Snapshot {
        SnapshotBuilder::new()
            .location("leo")
            .rocket_definition("juno", 4, 1)
            .astronaut_definition("mechanic", Some(Specialty::Mechanic))
            .supplies_definition("supplies")
            .agency("nasa", 0)
            .component("nasa", "r1", "juno")
            .component("nasa", "a1", "mechanic")
            .component("nasa", "s1", "supplies")
            .spacecraft("nasa", "ship", "leo", &["r1", "a1", "s1"])
            .build()
    }

    #[test]
    fn test_repair_needs_damaged_hardware() {
        let mut snapshot = workshop();
        let config = ResolverConfig::default();
        let agency = AgencyId::new("nasa");
        assert!(!RepairComponents::is_available(ResolveContext::new(&snapshot, &config), &agency).unwrap());

        SnapshotBuilder::damage(&mut snapshot, "r1");
        assert!(RepairComponents::is_available(ResolveContext::new(&snapshot, &config), &agency).unwrap());
    }

    #[test]
    fn test_injured_mechanic_cannot_repair() {
        let mut snapshot = workshop();
        SnapshotBuilder::damage(&mut snapshot, "r1");
        SnapshotBuilder::damage(&mut snapshot, "a1");
        let config = ResolverConfig::default();
        let ctx = ResolveContext::new(&snapshot, &config);
        assert!(RepairComponents::listing(ctx, &AgencyId::new("nasa")).unwrap().is_empty());
    }
}
