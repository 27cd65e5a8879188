//! Research a new advancement.

use super::{Action, Candidate, select_from_listing};
use crate::config::ResolveContext;
use crate::decision::{ActionChoice, ResolveError};
use crate::ids::{AdvancementId, AgencyId};
use crate::prompt::Prompter;
use crate::snapshot::LookupError;

pub struct ResearchAdvancement;

impl Action for ResearchAdvancement {
    type Option = AdvancementId;

    /// Every advancement in catalogue order; enabled when not yet held and
    /// the agency can pay for it.
    fn listing(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
    ) -> Result<Vec<Candidate<AdvancementId>>, LookupError> {
        let agency = ctx.snapshot.agency(agency)?;
        let affordable = agency.funds >= ctx.config.research_cost;
        Ok(ctx
            .snapshot
            .advancement_definitions
            .iter()
            .map(|definition| {
                Candidate::new(
                    definition.id.clone(),
                    definition.id.as_str(),
                    affordable && !agency.has_advancement(&definition.id),
                )
            })
            .collect())
    }

    fn resolve(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<ActionChoice>, ResolveError> {
        let funds = ctx.snapshot.agency(agency)?.funds;
        let message = format!("select an advancement to research. you have ${}", funds);
        let picked = select_from_listing(
            "research_advancement",
            message,
            Self::listing(ctx, agency)?,
            prompter,
        )?;
        Ok(picked.map(|advancement_id| ActionChoice::ResearchAdvancement { advancement_id }))
    }
}
