//! Resolver configuration.
//!
//! The numbers and ids the legality rules depend on (research price, which
//! advancement unlocks docking, where spacecraft can be disassembled) live
//! here rather than in the rules themselves, so a house-ruled game can ship a
//! different table.

use crate::ids::{AdvancementId, LocationId};
use crate::snapshot::{Outcome, Snapshot, Specialty};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const BUILTIN_RESOLVER_CONFIG: &str = include_str!("data/resolver_config.json");

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Funds required to research an advancement.
    pub research_cost: u32,
    /// Fee for discarding a success outcome card.
    pub discard_success_fee: u32,
    /// Fee for discarding a failure outcome card.
    pub discard_failure_fee: u32,
    /// Where spacecraft can be disassembled.
    pub home_location: LocationId,
    /// Advancement gating docking and separating.
    pub rendezvous_advancement: AdvancementId,
    /// Advancement gating the survey action.
    pub surveying_advancement: AdvancementId,
    /// Advancement that makes landing hazards survivable.
    pub landing_advancement: AdvancementId,
    /// Specialty an astronaut needs to repair components.
    pub repair_specialty: Specialty,
    /// Specialty an astronaut needs to heal other astronauts.
    pub healing_specialty: Specialty,
    /// Byte budget for cached historical snapshots used by the log renderer.
    pub history_cache_bytes: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            research_cost: 10,
            discard_success_fee: 10,
            discard_failure_fee: 5,
            home_location: LocationId::new("earth"),
            rendezvous_advancement: AdvancementId::new("rendezvous"),
            surveying_advancement: AdvancementId::new("surveying"),
            landing_advancement: AdvancementId::new("landing"),
            repair_specialty: Specialty::Mechanic,
            healing_specialty: Specialty::Doctor,
            history_cache_bytes: 5 * 1024 * 1024,
        }
    }
}

impl ResolverConfig {
    pub fn builtin() -> Result<Self, ConfigError> {
        Ok(Self::from_json_str(BUILTIN_RESOLVER_CONFIG)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ResolverConfig::from_json_str(&contents)?;
        Ok(config)
    }

    /// The fee for discarding an outcome card of the given kind.
    pub fn discard_fee(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Success => self.discard_success_fee,
            Outcome::MinorFailure | Outcome::MajorFailure => self.discard_failure_fee,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse resolver config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read resolver config from {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Everything a legality rule or step reads: the snapshot and the rule table.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub snapshot: &'a Snapshot,
    pub config: &'a ResolverConfig,
}

impl<'a> ResolveContext<'a> {
    pub fn new(snapshot: &'a Snapshot, config: &'a ResolverConfig) -> Self {
        Self { snapshot, config }
    }
}
