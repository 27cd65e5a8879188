//! Step chains and the driver that walks them.
//!
//! A multi-step decision is a [`StepChain`]: an ordered set of named steps,
//! each presenting one prompt and committing one value. The [`ChainDriver`]
//! runs the chain with an explicit stack of committed `(step, value)` pairs:
//!
//! - [`StepOutcome::Advance`] pushes the value and moves on to the next
//!   applicable step (steps may be skipped based on what is committed).
//! - [`StepOutcome::Retry`] re-presents the same step.
//! - [`StepOutcome::Cancel`] pops the previous step's value and re-runs that
//!   step from scratch. Cancelling the first step ends the chain with no
//!   choice.
//!
//! Once the last step commits, [`StepChain::validate`] checks the assembled
//! values. A rejection notifies the operator and rewinds the stack to the
//! step that has to be answered again.

use crate::decision::ResolveError;
use crate::prompt::Prompter;
use std::fmt::Debug;
use tracing::{debug, warn};

/// What a step asks the driver to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome<V> {
    /// Commit the value and move on.
    Advance(V),
    /// Present the same step again.
    Retry,
    /// Go back to the previous step.
    Cancel,
}

/// Result of checking a fully committed chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<S, O> {
    Accept(O),
    /// Tell the operator `message` and re-run `step`, discarding its value and
    /// everything committed after it.
    Retry { step: S, message: String },
}

/// The stack of values committed so far, in step order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<S, V> {
    entries: Vec<(S, V)>,
}

impl<S, V> Default for Committed<S, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S: Copy + Eq, V> Committed<S, V> {
    /// The value committed by `step`, if it has run.
    pub fn get(&self, step: S) -> Option<&V> {
        self.entries
            .iter()
            .find(|(committed, _)| *committed == step)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn steps(&self) -> impl Iterator<Item = S> + '_ {
        self.entries.iter().map(|(step, _)| *step)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    fn push(&mut self, step: S, value: V) {
        self.entries.push((step, value));
    }

    fn pop(&mut self) -> Option<(S, V)> {
        self.entries.pop()
    }

    /// Drop `step` and everything committed after it.
    fn rewind_to(&mut self, step: S) {
        if let Some(position) = self.entries.iter().position(|(s, _)| *s == step) {
            self.entries.truncate(position);
        }
    }
}

/// A decision resolved through a sequence of dependent prompts.
pub trait StepChain {
    type Step: Copy + Eq + Debug;
    type Value: Clone + Debug;
    type Output: Debug;

    /// Name used in logs.
    fn name(&self) -> &'static str;

    fn first_step(&self) -> Self::Step;

    /// The step after `current`, or `None` when the chain is complete.
    fn next_step(
        &self,
        current: Self::Step,
        committed: &Committed<Self::Step, Self::Value>,
    ) -> Result<Option<Self::Step>, ResolveError>;

    /// Present `step`. Options are derived afresh on every entry.
    fn run_step(
        &self,
        step: Self::Step,
        committed: &Committed<Self::Step, Self::Value>,
        prompter: &mut dyn Prompter,
    ) -> Result<StepOutcome<Self::Value>, ResolveError>;

    fn validate(
        &self,
        committed: &Committed<Self::Step, Self::Value>,
    ) -> Result<Validation<Self::Step, Self::Output>, ResolveError>;
}

/// Whether a driven chain has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress<O> {
    Pending,
    /// `None` when the operator cancelled out of the first step.
    Done(Option<O>),
}

/// Runs a [`StepChain`], one step at a time or to completion.
pub struct ChainDriver<C: StepChain> {
    chain: C,
    committed: Committed<C::Step, C::Value>,
    current: C::Step,
}

impl<C: StepChain> ChainDriver<C> {
    pub fn new(chain: C) -> Self {
        let current = chain.first_step();
        Self {
            chain,
            committed: Committed::default(),
            current,
        }
    }

    /// The step the next call to [`ChainDriver::step`] will present.
    pub fn current_step(&self) -> C::Step {
        self.current
    }

    pub fn committed(&self) -> &Committed<C::Step, C::Value> {
        &self.committed
    }

    /// Present the current step once and apply its outcome.
    pub fn step(&mut self, prompter: &mut dyn Prompter) -> Result<Progress<C::Output>, ResolveError> {
        let name = self.chain.name();
        let step = self.current;
        match self.chain.run_step(step, &self.committed, prompter)? {
            StepOutcome::Advance(value) => {
                debug!(chain = name, ?step, ?value, "step committed");
                self.committed.push(step, value);
                if let Some(next) = self.chain.next_step(step, &self.committed)? {
                    self.current = next;
                    return Ok(Progress::Pending);
                }
                match self.chain.validate(&self.committed)? {
                    Validation::Accept(output) => {
                        debug!(chain = name, ?output, "chain complete");
                        Ok(Progress::Done(Some(output)))
                    }
                    Validation::Retry { step, message } => {
                        warn!(chain = name, ?step, %message, "validation rejected choice");
                        prompter.notify(&message)?;
                        self.committed.rewind_to(step);
                        self.current = step;
                        Ok(Progress::Pending)
                    }
                }
            }
            StepOutcome::Retry => {
                debug!(chain = name, ?step, "step retried");
                Ok(Progress::Pending)
            }
            StepOutcome::Cancel => match self.committed.pop() {
                Some((previous, discarded)) => {
                    debug!(chain = name, ?step, ?previous, ?discarded, "step cancelled");
                    self.current = previous;
                    Ok(Progress::Pending)
                }
                None => {
                    debug!(chain = name, ?step, "chain cancelled");
                    Ok(Progress::Done(None))
                }
            },
        }
    }

    /// Drive the chain until it produces an output or is cancelled.
    pub fn run(mut self, prompter: &mut dyn Prompter) -> Result<Option<C::Output>, ResolveError> {
        loop {
            if let Progress::Done(output) = self.step(prompter)? {
                return Ok(output);
            }
        }
    }
}
