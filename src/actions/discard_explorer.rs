//! Retire an explorer at a location with a matching mission.

use super::{Action, Candidate, select_from_listing};
use crate::config::ResolveContext;
use crate::decision::{ActionChoice, ResolveError};
use crate::format::spacecraft_label;
use crate::ids::{AgencyId, SpacecraftId};
use crate::prompt::Prompter;
use crate::snapshot::{ComponentKind, LookupError, MissionKind};

pub struct DiscardExplorer;

impl Action for DiscardExplorer {
    type Option = SpacecraftId;

    /// Idle spacecraft made of a lone explorer, sitting where a
    /// discard-explorer mission is.
    fn listing(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
    ) -> Result<Vec<Candidate<SpacecraftId>>, LookupError> {
        let snapshot = ctx.snapshot;
        let agency = snapshot.agency(agency)?;
        let mut listing = Vec::new();
        for spacecraft in &agency.spacecraft {
            if !spacecraft.is_idle() {
                continue;
            }
            let [only] = spacecraft.component_ids.as_slice() else {
                continue;
            };
            if snapshot.definition_of(only)?.kind != ComponentKind::Explorer {
                continue;
            }
            let has_mission = snapshot.missions.iter().any(|mission| {
                mission.kind == MissionKind::DiscardExplorer
                    && mission.location.as_ref() == Some(&spacecraft.location)
            });
            if has_mission {
                listing.push(Candidate::new(
                    spacecraft.id.clone(),
                    spacecraft_label(snapshot, &spacecraft.id, false, true)?,
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
            "discard_explorer",
            "select a spacecraft",
            Self::listing(ctx, agency)?,
            prompter,
        )?;
        Ok(picked.map(|spacecraft_id| ActionChoice::DiscardExplorer { spacecraft_id }))
    }
}
