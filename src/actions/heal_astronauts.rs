//! Heal incapacitated astronauts with a doctor.

use super::{Action, Candidate, select_from_listing};
use crate::config::ResolveContext;
use crate::decision::{ActionChoice, ResolveError};
use crate::format::spacecraft_label;
use crate::ids::{AgencyId, SpacecraftId};
use crate::prompt::Prompter;
use crate::rules::has_healthy_specialist;
use crate::snapshot::LookupError;

pub struct HealAstronauts;

impl Action for HealAstronauts {
    type Option = SpacecraftId;

    /// Spacecraft with a healthy doctor and an incapacitated astronaut.
    fn listing(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
    ) -> Result<Vec<Candidate<SpacecraftId>>, LookupError> {
        let snapshot = ctx.snapshot;
        let agency = snapshot.agency(agency)?;
        let mut listing = Vec::new();
        for spacecraft in &agency.spacecraft {
            if !has_healthy_specialist(snapshot, &spacecraft.id, ctx.config.healing_specialty)? {
                continue;
            }
            let mut incapacitated = false;
            for id in &spacecraft.component_ids {
                let component = snapshot.component(id)?;
                if component.damaged && snapshot.definition(&component.definition)?.kind.is_astronaut() {
                    incapacitated = true;
                    break;
                }
            }
            if incapacitated {
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
            "heal_astronauts",
            "select spacecraft to heal astronauts",
            Self::listing(ctx, agency)?,
            prompter,
        )?;
        Ok(picked.map(|spacecraft_id| ActionChoice::HealAstronauts { spacecraft_id }))
    }
}
