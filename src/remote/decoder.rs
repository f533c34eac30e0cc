//! Action decoder
//!
//! Turns a raw inbound payload into a [`CanonicalAction`]. The active
//! [`TopicMode`] picks one of two decode functions sharing the same output:
//!
//! ```text
//! DirectBridge: {"action": "arrow_left_click"}          ──┐
//!                                                         ├─► RawAction ─► CanonicalAction
//! Host:         {"svalue1": "10", "LevelNames": "a|b"}  ──┘
//!                    (level ─► LevelNameTable ─► name)
//! ```
//!
//! The only state kept here is the [`LevelNameTable`], built lazily from the
//! first host message that carries a level name list.

use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

use super::action::{canonical_from_name, CanonicalAction, RawAction, TopicMode};
use super::error::DecodeError;

const ACTION_FIELD: &str = "action";
const LEVEL_FIELD: &str = "svalue1";
const LEVEL_NAMES_FIELD: &str = "LevelNames";
const LEVEL_STEP: i64 = 10;

/// Level (multiples of 10) to action name, as announced by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelNameTable {
    source: String,
    names: HashMap<i64, String>,
}

impl LevelNameTable {
    /// Builds the table from a pipe-delimited name list; entry `i` gets level `i * 10`
    pub fn from_level_names(level_names: &str) -> Self {
        let names = level_names
            .split('|')
            .enumerate()
            .map(|(index, name)| (index as i64 * LEVEL_STEP, name.trim().to_string()))
            .collect();

        Self {
            source: level_names.to_string(),
            names,
        }
    }

    pub fn lookup(&self, level: i64) -> Option<&str> {
        self.names.get(&level).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// Decodes inbound remote payloads for one fixed [`TopicMode`]
#[derive(Debug, Clone)]
pub struct ActionDecoder {
    mode: TopicMode,
    level_names: Option<LevelNameTable>,
}

impl ActionDecoder {
    pub fn new(mode: TopicMode) -> Self {
        debug!("Creating action decoder for {} encoding", mode);
        Self {
            mode,
            level_names: None,
        }
    }

    pub fn mode(&self) -> TopicMode {
        self.mode
    }

    pub fn level_names(&self) -> Option<&LevelNameTable> {
        self.level_names.as_ref()
    }

    /// Decodes one payload.
    ///
    /// Unknown bridge actions are not errors; they come back as
    /// [`CanonicalAction::Unrecognized`]. Host messages whose level cannot be
    /// resolved are [`DecodeError`]s.
    pub fn decode(&mut self, payload: &str) -> Result<CanonicalAction, DecodeError> {
        let message: Value =
            serde_json::from_str(payload).map_err(|e| DecodeError::Malformed(e.to_string()))?;
        if !message.is_object() {
            return Err(DecodeError::Malformed(format!(
                "expected a JSON object, got {}",
                payload
            )));
        }

        match self.mode {
            TopicMode::DirectBridge => Ok(decode_bridge(&message)),
            TopicMode::Host => decode_host(&mut self.level_names, &message),
        }
    }
}

fn decode_bridge(message: &Value) -> CanonicalAction {
    let Some(name) = message.get(ACTION_FIELD).and_then(Value::as_str) else {
        debug!("Bridge message without an `{}` field", ACTION_FIELD);
        return CanonicalAction::Unrecognized;
    };

    match RawAction::parse(name) {
        Some(raw) => {
            trace!("Bridge action {} decoded as {:?}", name, raw);
            raw.canonical()
        }
        None => {
            debug!("Unknown bridge action: {}", name);
            CanonicalAction::Unrecognized
        }
    }
}

fn decode_host(
    table: &mut Option<LevelNameTable>,
    message: &Value,
) -> Result<CanonicalAction, DecodeError> {
    if let Some(level_names) = message.get(LEVEL_NAMES_FIELD).and_then(Value::as_str) {
        refresh_table(table, level_names);
    }

    let table = table.as_ref().ok_or(DecodeError::TableNotBuilt)?;
    let raw_level = message
        .get(LEVEL_FIELD)
        .ok_or(DecodeError::MissingField(LEVEL_FIELD))?;
    let level = parse_level(raw_level)?;

    let name = table
        .lookup(level)
        .ok_or(DecodeError::UnknownLevel(level))?;
    trace!("Host level {} resolved to {}", level, name);

    Ok(canonical_from_name(name))
}

// Last write wins when the host announces a different list.
fn refresh_table(table: &mut Option<LevelNameTable>, level_names: &str) {
    if table
        .as_ref()
        .is_some_and(|existing| existing.source() == level_names)
    {
        return;
    }

    let built = LevelNameTable::from_level_names(level_names);
    if table.is_some() {
        warn!(
            "Host announced a different level name list, rebuilding: {}",
            level_names
        );
    } else {
        debug!("Built level name table with {} entries", built.len());
    }
    *table = Some(built);
}

/// Reads `svalue1` and snaps it to the nearest multiple of 10
fn parse_level(value: &Value) -> Result<i64, DecodeError> {
    let parsed = match value {
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Number(number) => number.as_f64(),
        _ => None,
    };

    // Float to int casts saturate, so anything too large fails the multiply.
    parsed
        .filter(|level| level.is_finite())
        .and_then(|level| ((level / LEVEL_STEP as f64).round() as i64).checked_mul(LEVEL_STEP))
        .ok_or_else(|| DecodeError::InvalidField {
            field: LEVEL_FIELD,
            value: value.to_string(),
        })
}
