//! Rendering game log entries against the snapshot they were written in.
//!
//! A log entry is a list of string parts interleaved with typed context items
//! (`["component", "r1"]`, `["maneuver", "earth_to_leo", 0]`, ...). Context is
//! rendered with the labels of [`crate::format`], evaluated against the
//! historical snapshot named by the entry's history id rather than the current
//! one, since the component or spacecraft may no longer exist.
//!
//! Historical snapshots come from a [`HistorySource`] and are memoized in a
//! [`HistoryCache`] bounded by the serialized size of what it holds.

use crate::format::{ComponentDetail, component_label, outcome_label, spacecraft_label};
use crate::ids::{AdvancementId, AgencyId, ComponentId, LocationId, ManeuverId, MissionId, SpacecraftId};
use crate::load::{LoadError, load_json};
use crate::snapshot::{LookupError, Outcome, Snapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::PathBuf;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("invalid history object id {0:?}")]
    UnknownHistoryId(String),
    #[error("log entry for {history_id} has no context for part {index}")]
    MissingContext { history_id: String, index: usize },
    #[error(transparent)]
    NotFound(#[from] LookupError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to measure snapshot: {0}")]
    Measure(#[from] serde_json::Error),
}

// ============================================================================
// Log Entries
// ============================================================================

/// One line of the game log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub string_parts: Vec<String>,
    #[serde(default)]
    pub context: Vec<LogContext>,
    pub history_id: String,
}

/// A typed value spliced between two string parts.
///
/// On the wire each item is an array headed by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", into = "Vec<Value>")]
pub enum LogContext {
    Number(serde_json::Number),
    String(String),
    Agency(AgencyId),
    Spacecraft(SpacecraftId),
    Component(ComponentId),
    Location(LocationId),
    Outcome(Outcome),
    Advancement(AdvancementId),
    Maneuver(ManeuverId, usize),
    Mission(MissionId),
    /// A kind this renderer does not know; printed as `kind, value`.
    Other { kind: String, value: Value },
}

fn string_item(kind: &str, value: &Value) -> Result<String, String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("{} context needs a string, found {}", kind, value))
}

impl TryFrom<Vec<Value>> for LogContext {
    type Error = String;

    fn try_from(items: Vec<Value>) -> Result<Self, Self::Error> {
        let mut items = items.into_iter();
        let kind = match items.next() {
            Some(Value::String(kind)) => kind,
            other => return Err(format!("log context must start with its kind, found {:?}", other)),
        };
        let value = items.next().unwrap_or(Value::Null);
        Ok(match kind.as_str() {
            "number" => match value {
                Value::Number(number) => LogContext::Number(number),
                other => return Err(format!("number context needs a number, found {}", other)),
            },
            "string" => LogContext::String(string_item(&kind, &value)?),
            "agency" => LogContext::Agency(AgencyId::new(string_item(&kind, &value)?)),
            "spacecraft" => LogContext::Spacecraft(SpacecraftId::new(string_item(&kind, &value)?)),
            "component" => LogContext::Component(ComponentId::new(string_item(&kind, &value)?)),
            "location" => LogContext::Location(LocationId::new(string_item(&kind, &value)?)),
            "outcome" => LogContext::Outcome(
                serde_json::from_value(value).map_err(|err| format!("bad outcome context: {}", err))?,
            ),
            "advancement" => LogContext::Advancement(AdvancementId::new(string_item(&kind, &value)?)),
            "maneuver" => {
                let id = ManeuverId::new(string_item(&kind, &value)?);
                let index = items
                    .next()
                    .and_then(|index| index.as_u64())
                    .ok_or_else(|| "maneuver context needs a profile index".to_string())?;
                LogContext::Maneuver(id, index as usize)
            }
            "mission" => LogContext::Mission(MissionId::new(string_item(&kind, &value)?)),
            _ => LogContext::Other { kind, value },
        })
    }
}

impl From<LogContext> for Vec<Value> {
    fn from(context: LogContext) -> Self {
        let tagged = |kind: &str, value: Value| vec![Value::from(kind), value];
        match context {
            LogContext::Number(number) => tagged("number", Value::Number(number)),
            LogContext::String(text) => tagged("string", Value::from(text)),
            LogContext::Agency(id) => tagged("agency", Value::from(id.0)),
            LogContext::Spacecraft(id) => tagged("spacecraft", Value::from(id.0)),
            LogContext::Component(id) => tagged("component", Value::from(id.0)),
            LogContext::Location(id) => tagged("location", Value::from(id.0)),
            LogContext::Outcome(outcome) => tagged(
                "outcome",
                serde_json::to_value(outcome).unwrap_or(Value::Null),
            ),
            LogContext::Advancement(id) => tagged("advancement", Value::from(id.0)),
            LogContext::Maneuver(id, index) => {
                vec![Value::from("maneuver"), Value::from(id.0), Value::from(index)]
            }
            LogContext::Mission(id) => tagged("mission", Value::from(id.0)),
            LogContext::Other { kind, value } => vec![Value::from(kind), value],
        }
    }
}

fn render_context(snapshot: &Snapshot, context: &LogContext) -> Result<String, LookupError> {
    Ok(match context {
        LogContext::Number(number) => number.to_string(),
        LogContext::String(text) => text.clone(),
        LogContext::Agency(id) => format!("agency {}", id),
        LogContext::Spacecraft(id) => spacecraft_label(snapshot, id, true, true)?,
        LogContext::Component(id) => component_label(snapshot, id, ComponentDetail::ALL)?,
        LogContext::Location(id) => id.to_string(),
        LogContext::Outcome(outcome) => outcome_label(*outcome).to_string(),
        LogContext::Advancement(id) => id.to_string(),
        LogContext::Maneuver(id, index) => format!("{}/{}", id, index),
        LogContext::Mission(id) => id.to_string(),
        LogContext::Other { kind, value } => match value.as_str() {
            Some(text) => format!("{}, {}", kind, text),
            None => format!("{}, {}", kind, value),
        },
    })
}

/// Render `entry` as one line, looking up its snapshot through `cache`.
pub fn render_entry(
    cache: &mut HistoryCache,
    source: &dyn HistorySource,
    entry: &LogEntry,
) -> Result<String, HistoryError> {
    let snapshot = cache.fetch(&entry.history_id, source)?;
    let mut parts = entry.string_parts.iter();
    let mut output = parts.next().cloned().unwrap_or_default();
    for (index, part) in parts.enumerate() {
        let context = entry
            .context
            .get(index)
            .ok_or_else(|| HistoryError::MissingContext {
                history_id: entry.history_id.clone(),
                index,
            })?;
        output.push_str(&render_context(&snapshot, context)?);
        output.push_str(part);
    }
    Ok(output)
}

// ============================================================================
// History Sources
// ============================================================================

/// Where historical snapshots come from.
pub trait HistorySource {
    /// The snapshot recorded under `history_id`, if there is one.
    fn snapshot_at(&self, history_id: &str) -> Result<Option<Snapshot>, HistoryError>;
}

impl HistorySource for BTreeMap<String, Snapshot> {
    fn snapshot_at(&self, history_id: &str) -> Result<Option<Snapshot>, HistoryError> {
        Ok(self.get(history_id).cloned())
    }
}

/// Snapshots stored as `<dir>/<history_id>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryHistory {
    dir: PathBuf,
}

impl DirectoryHistory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl HistorySource for DirectoryHistory {
    fn snapshot_at(&self, history_id: &str) -> Result<Option<Snapshot>, HistoryError> {
        if history_id.is_empty()
            || history_id.contains(['/', '\\'])
            || history_id.starts_with('.')
        {
            return Err(HistoryError::UnknownHistoryId(history_id.to_string()));
        }
        let path = self.dir.join(format!("{}.json", history_id));
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(load_json(&path)?))
    }
}

// ============================================================================
// Cache
// ============================================================================

struct CachedSnapshot {
    snapshot: Rc<Snapshot>,
    bytes: usize,
}

/// Least-recently-used snapshot cache with a byte budget.
///
/// An entry weighs as much as its JSON serialization. A snapshot heavier than
/// the whole budget is returned but never stored.
pub struct HistoryCache {
    max_bytes: usize,
    used_bytes: usize,
    entries: HashMap<String, CachedSnapshot>,
    /// Least recently used first.
    recency: VecDeque<String>,
}

impl HistoryCache {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            entries: HashMap::new(),
            recency: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn contains(&self, history_id: &str) -> bool {
        self.entries.contains_key(history_id)
    }

    /// A cached snapshot, marked as most recently used.
    pub fn get(&mut self, history_id: &str) -> Option<Rc<Snapshot>> {
        let snapshot = Rc::clone(&self.entries.get(history_id)?.snapshot);
        self.touch(history_id);
        Some(snapshot)
    }

    /// Store a snapshot, evicting the least recently used ones to make room.
    pub fn insert(&mut self, history_id: &str, snapshot: Snapshot) -> Result<Rc<Snapshot>, HistoryError> {
        let bytes = serde_json::to_vec(&snapshot)?.len();
        let snapshot = Rc::new(snapshot);
        self.remove(history_id);
        if bytes > self.max_bytes {
            debug!(history_id, bytes, "snapshot exceeds the history cache budget");
            return Ok(snapshot);
        }
        while self.used_bytes + bytes > self.max_bytes {
            let Some(oldest) = self.recency.pop_front() else {
                break;
            };
            if let Some(evicted) = self.entries.remove(&oldest) {
                self.used_bytes -= evicted.bytes;
                debug!(history_id = %oldest, bytes = evicted.bytes, "evicted snapshot");
            }
        }
        self.entries.insert(
            history_id.to_string(),
            CachedSnapshot {
                snapshot: Rc::clone(&snapshot),
                bytes,
            },
        );
        self.recency.push_back(history_id.to_string());
        self.used_bytes += bytes;
        Ok(snapshot)
    }

    /// The cached snapshot for `history_id`, loading it from `source` on a miss.
    pub fn fetch(
        &mut self,
        history_id: &str,
        source: &dyn HistorySource,
    ) -> Result<Rc<Snapshot>, HistoryError> {
        if let Some(snapshot) = self.get(history_id) {
            return Ok(snapshot);
        }
        let snapshot = source
            .snapshot_at(history_id)?
            .ok_or_else(|| HistoryError::UnknownHistoryId(history_id.to_string()))?;
        self.insert(history_id, snapshot)
    }

    fn touch(&mut self, history_id: &str) {
        if let Some(position) = self.recency.iter().position(|id| id == history_id)
            && let Some(id) = self.recency.remove(position)
        {
            self.recency.push_back(id);
        }
    }

    fn remove(&mut self, history_id: &str) {
        if let Some(previous) = self.entries.remove(history_id) {
            self.used_bytes -= previous.bytes;
            self.recency.retain(|id| id != history_id);
        }
    }
}
