//! Buy a component from the catalogue.

use super::{Action, Candidate, select_from_listing};
use crate::config::ResolveContext;
use crate::decision::{ActionChoice, ResolveError};
use crate::format::{ComponentDetail, definition_label};
use crate::ids::{AgencyId, DefinitionId};
use crate::prompt::Prompter;
use crate::snapshot::LookupError;

pub struct BuyComponent;

impl Action for BuyComponent {
    type Option = DefinitionId;

    /// Every priced definition; enabled when affordable and its gating
    /// advancement, if any, is held.
    fn listing(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
    ) -> Result<Vec<Candidate<DefinitionId>>, LookupError> {
        let agency = ctx.snapshot.agency(agency)?;
        let detail = ComponentDetail {
            thrust: true,
            capsule: true,
            ..ComponentDetail::NONE
        };

        let mut listing = Vec::new();
        for definition in &ctx.snapshot.component_definitions {
            let Some(cost) = definition.cost else {
                continue;
            };
            let unlocked = definition
                .advancement
                .as_ref()
                .is_none_or(|advancement| agency.has_advancement(advancement));
            let label = format!(
                "{}, ${}",
                definition_label(ctx.snapshot, &definition.id, detail)?,
                cost
            );
            listing.push(Candidate::new(
                definition.id.clone(),
                label,
                cost <= agency.funds && unlocked,
            ));
        }
        Ok(listing)
    }

    fn resolve(
        ctx: ResolveContext<'_>,
        agency: &AgencyId,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<ActionChoice>, ResolveError> {
        let funds = ctx.snapshot.agency(agency)?.funds;
        let message = format!("select a component to buy. you have ${}", funds);
        let picked = select_from_listing("buy_component", message, Self::listing(ctx, agency)?, prompter)?;
        Ok(picked.map(|component_definition_id| ActionChoice::BuyComponent {
            component_definition_id,
        }))
    }
}
