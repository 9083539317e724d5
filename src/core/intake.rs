use crate::models::{Objective, Subject};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use validator::Validate;

/// Which collection an entity came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Subject,
    Objective,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Subject => f.write_str("subject"),
            EntityKind::Objective => f.write_str("objective"),
        }
    }
}

/// An input entity that was skipped
///
/// `entity_id` falls back to `#<position>` when the raw entity has no readable id.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("malformed {entity_kind} {entity_id}: {reason}")]
pub struct MalformedEntity {
    pub entity_kind: EntityKind,
    pub entity_id: String,
    pub reason: String,
}

/// Entities that can be decoded from raw input
pub trait Entity: DeserializeOwned + Validate {
    const KIND: EntityKind;

    fn id(&self) -> &str;
}

impl Entity for Subject {
    const KIND: EntityKind = EntityKind::Subject;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Objective {
    const KIND: EntityKind = EntityKind::Objective;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Accepted entities plus the ones that were skipped
#[derive(Debug, Clone)]
pub struct Intake<T> {
    pub accepted: Vec<T>,
    pub skipped: Vec<MalformedEntity>,
}

/// Decode and validate a single raw entity
pub fn parse_entity<T: Entity>(raw: Value, position: usize) -> Result<T, MalformedEntity> {
    let entity_id = raw
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", position));

    let malformed = |reason: String| MalformedEntity {
        entity_kind: T::KIND,
        entity_id: entity_id.clone(),
        reason,
    };

    let entity: T = serde_json::from_value(raw).map_err(|e| malformed(e.to_string()))?;
    entity.validate().map_err(|e| malformed(e.to_string()))?;

    Ok(entity)
}

/// Decode every raw entity independently
///
/// A bad entity, or a repeated identifier, is skipped and reported; the rest
/// of the collection is still accepted.
pub fn parse_entities<T: Entity>(raw: Vec<Value>) -> Intake<T> {
    let mut accepted: Vec<T> = Vec::with_capacity(raw.len());
    let mut skipped = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (position, value) in raw.into_iter().enumerate() {
        match parse_entity::<T>(value, position) {
            Ok(entity) if !seen.insert(entity.id().to_string()) => {
                skipped.push(MalformedEntity {
                    entity_kind: T::KIND,
                    entity_id: entity.id().to_string(),
                    reason: "duplicate identifier".to_string(),
                });
            }
            Ok(entity) => accepted.push(entity),
            Err(malformed) => skipped.push(malformed),
        }
    }

    for entity in &skipped {
        tracing::warn!("Skipping {}", entity);
    }

    Intake { accepted, skipped }
}

pub fn parse_subjects(raw: Vec<Value>) -> Intake<Subject> {
    parse_entities(raw)
}

pub fn parse_objectives(raw: Vec<Value>) -> Intake<Objective> {
    parse_entities(raw)
}
