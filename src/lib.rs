//! Liftoff - decision resolver for Leaving Earth
//!
//! The engine stops whenever an agency has something to decide and hands over
//! a read-only [`Snapshot`] together with the pending [`Decision`]. This crate
//! walks the operator through the legal options for that decision, one prompt
//! at a time, and produces the [`Choice`] the engine continues with.
//!
//! - [`rules`] answers legality questions about a snapshot.
//! - [`actions`] builds the take-action sub-actions on top of [`chain`], the
//!   backtracking step driver.
//! - [`decisions`] resolves every other decision kind.
//! - [`dispatch::resolve`] picks the resolver for a decision.
//! - [`prompt`] is the operator interface, with a terminal and a scripted
//!   implementation.

pub mod actions;
pub mod chain;
pub mod config;
pub mod decision;
pub mod decisions;
pub mod dispatch;
pub mod format;
pub mod history;
pub mod ids;
pub mod input;
pub mod load;
pub mod prompt;
pub mod rules;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use actions::{Action, ActionKind, Candidate};
pub use config::{ConfigError, ResolveContext, ResolverConfig};
pub use decision::{ActionChoice, Choice, DecodeError, Decision, Resolution, ResolveError};
pub use dispatch::resolve;
pub use history::{DirectoryHistory, HistoryCache, HistoryError, HistorySource, LogEntry, render_entry};
pub use input::InputManager;
pub use load::{LoadError, load_json};
pub use prompt::{
    Answer, CliPrompter, PromptError, PromptOption, Prompter, ScriptedPrompter, SelectBounds,
    Selection,
};
pub use snapshot::{LookupError, Snapshot};
