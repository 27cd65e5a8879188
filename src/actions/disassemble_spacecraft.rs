//! Break a spacecraft at the home location back into loose components.

use super::{Action, Candidate, select_from_listing};
use crate::config::ResolveContext;
use crate::decision::{ActionChoice, ResolveError};
use crate::format::spacecraft_label;
use crate::ids::{AgencyId, SpacecraftId};
use crate::prompt::Prompter;
use crate::snapshot::LookupError;

pub struct DisassembleSpacecraft;

impl Action for DisassembleSpacecraft {
    type Option = SpacecraftId;

    fn listing(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
    ) -> Result<Vec<Candidate<SpacecraftId>>, LookupError> {
        let agency = ctx.snapshot.agency(agency)?;
        let mut listing = Vec::new();
        for spacecraft in &agency.spacecraft {
            listing.push(Candidate::new(
                spacecraft.id.clone(),
                spacecraft_label(ctx.snapshot, &spacecraft.id, true, false)?,
                spacecraft.location == ctx.config.home_location,
            ));
        }
        Ok(listing)
    }

    fn resolve(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<ActionChoice>, ResolveError> {
        let picked = select_from_listing(
            "disassemble_spacecraft",
            "select spacecraft",
            Self::listing(ctx, agency)?,
            prompter,
        )?;
        Ok(picked.map(|spacecraft_id| ActionChoice::DisassembleSpacecraft { spacecraft_id }))
    }
}
