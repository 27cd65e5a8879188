//! Collect supplies at the spacecraft's location.

use super::{Action, Candidate, select_from_listing};
use crate::config::ResolveContext;
use crate::decision::{ActionChoice, ResolveError};
use crate::format::spacecraft_label;
use crate::ids::{AgencyId, SpacecraftId};
use crate::prompt::Prompter;
use crate::rules::location_has_supplies;
use crate::snapshot::LookupError;

pub struct CollectSupplies;

impl Action for CollectSupplies {
    type Option = SpacecraftId;

    fn listing(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
    ) -> Result<Vec<Candidate<SpacecraftId>>, LookupError> {
        let agency = ctx.snapshot.agency(agency)?;
        let mut listing = Vec::new();
        for spacecraft in &agency.spacecraft {
            if location_has_supplies(ctx.snapshot, &spacecraft.location)? {
                listing.push(Candidate::new(
                    spacecraft.id.clone(),
                    spacecraft_label(ctx.snapshot, &spacecraft.id, true, false)?,
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
            "collect_supplies",
            "select spacecraft to collect supplies",
            Self::listing(ctx, agency)?,
            prompter,
        )?;
        Ok(picked.map(|spacecraft_id| ActionChoice::CollectSupplies { spacecraft_id }))
    }
}
