//! Resolvers for the decisions the engine raises outside the action menu.
//!
//! Every decision kind is answered by one resolver function taking a
//! [`ResolveContext`](crate::config::ResolveContext), the decision's
//! arguments and a [`Prompter`]. Resolvers with dependent prompts run a
//! [`StepChain`](crate::chain::StepChain); the rest ask a single question.
//!
//! ## Cancellation
//!
//! Unlike the action menu, these decisions must be answered before the game
//! can continue. What backing out of one means is fixed per kind by a
//! [`CancelPolicy`]:
//!
//! | kind                       | policy    |
//! |----------------------------|-----------|
//! | `continue_maneuver`        | retry     |
//! | `discard_outcome`          | retry     |
//! | `reveal_location`          | retry     |
//! | `encounter_landing`        | retry     |
//! | `damage_component`         | retry     |
//! | `assign_astronauts`        | retry     |
//! | `turn_in_alien_sample`     | decline   |
//! | `life_support`             | abort     |
//! | `turn_in_valuable_sample`  | abort     |

use crate::decision::ResolveError;
use crate::prompt::Prompter;
use tracing::debug;

pub mod confirm;
pub mod continue_maneuver;
pub mod crew;
pub mod select;

pub use confirm::{encounter_landing, reveal_location, turn_in_valuable_sample};
pub use continue_maneuver::{ManeuverInProgress, continue_maneuver};
pub use crew::{assign_astronauts, life_support};
pub use select::{damage_component, discard_outcome, turn_in_alien_sample};

/// What backing out of a decision's first prompt means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelPolicy<T> {
    /// Ask again from the first prompt.
    Retry,
    /// Backing out answers the decision with this value.
    Decline(T),
    /// The decision cannot be left unanswered; fail with
    /// [`ResolveError::DecisionAborted`].
    Abort,
}

/// Run `attempt` until it produces an answer, applying `policy` whenever the
/// operator backs out of it.
pub(crate) fn settle<T>(
    kind: &'static str,
    policy: CancelPolicy<T>,
    prompter: &mut dyn Prompter,
    mut attempt: impl FnMut(&mut dyn Prompter) -> Result<Option<T>, ResolveError>,
) -> Result<T, ResolveError> {
    loop {
        if let Some(answer) = attempt(&mut *prompter)? {
            return Ok(answer);
        }
        match policy {
            CancelPolicy::Retry => debug!(kind, "decision cancelled; asking again"),
            CancelPolicy::Decline(answer) => {
                debug!(kind, "decision declined");
                return Ok(answer);
            }
            CancelPolicy::Abort => return Err(ResolveError::DecisionAborted { kind }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{Answer, ScriptedPrompter};

    fn ask(prompter: &mut dyn Prompter) -> Result<Option<bool>, ResolveError> {
        Ok(prompter.confirm("go?", true)?.chosen())
    }

    #[test]
    fn test_retry_asks_until_answered() {
        let mut prompter =
            ScriptedPrompter::new([Answer::Cancel, Answer::Cancel, Answer::Confirm(false)]);
        assert!(!settle("test", CancelPolicy::Retry, &mut prompter, ask).unwrap());
        assert_eq!(prompter.shown().len(), 3);
    }

    #[test]
    fn test_decline_and_abort() {
        let mut prompter = ScriptedPrompter::new([Answer::Cancel, Answer::Cancel]);
        assert!(!settle("test", CancelPolicy::Decline(false), &mut prompter, ask).unwrap());
        assert!(matches!(
            settle("test", CancelPolicy::Abort, &mut prompter, ask),
            Err(ResolveError::DecisionAborted { kind: "test" })
        ));
    }
}
