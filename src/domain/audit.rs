use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Structured payload captured before or after an action.
pub type AuditData = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditId(String);

impl AuditId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AuditId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for AuditId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for AuditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of entity an audit entry refers to.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Payment,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Payment => "payment",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Created,
    Updated,
    Deleted,
    Processed,
    Completed,
    Failed,
    Cancelled,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Created => "created",
            ActionType::Updated => "updated",
            ActionType::Deleted => "deleted",
            ActionType::Processed => "processed",
            ActionType::Completed => "completed",
            ActionType::Failed => "failed",
            ActionType::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed action against one tracked entity.
///
/// Identity, subject, action, actor and timestamp are fixed at construction.
/// Payloads and metadata can still be filled in through the setters until the
/// entry is handed to a store.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AuditEntry {
    id: AuditId,
    entity_type: EntityType,
    entity_id: String,
    action: ActionType,
    old_data: AuditData,
    new_data: AuditData,
    user_id: String,
    timestamp: DateTime<Utc>,
    metadata: BTreeMap<String, String>,
}

impl AuditEntry {
    pub fn new(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        action: ActionType,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            id: AuditId::new(),
            entity_type,
            entity_id: entity_id.into(),
            action,
            old_data: AuditData::new(),
            new_data: AuditData::new(),
            user_id: user_id.into(),
            timestamp: Utc::now(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &AuditId {
        &self.id
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn action(&self) -> ActionType {
        self.action
    }

    pub fn old_data(&self) -> &AuditData {
        &self.old_data
    }

    pub fn new_data(&self) -> &AuditData {
        &self.new_data
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Replaces the "before" payload with the serialized form of `data`.
    ///
    /// `data` must serialize to a record (a JSON object). On error the
    /// previous payload is kept.
    pub fn set_old_data<T: Serialize + ?Sized>(&mut self, data: &T) -> Result<()> {
        self.old_data = to_record(data)?;
        Ok(())
    }

    /// Replaces the "after" payload. Same rules as [`AuditEntry::set_old_data`].
    pub fn set_new_data<T: Serialize + ?Sized>(&mut self, data: &T) -> Result<()> {
        self.new_data = to_record(data)?;
        Ok(())
    }

    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }
}

fn to_record<T: Serialize + ?Sized>(data: &T) -> Result<AuditData> {
    let value = serde_json::to_value(data).map_err(|e| {
        PaymentError::ValidationError(format!("audit payload is not serializable: {e}"))
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(PaymentError::ValidationError(format!(
            "audit payload must be a record, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "record",
    }
}

/// Query over audit entries. Every present predicate must hold; absent ones
/// match anything. Timestamp bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub action: Option<ActionType>,
    pub user_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl AuditFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn with_action(mut self, action: ActionType) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_from(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.entity_type.is_none_or(|t| entry.entity_type() == t)
            && self
                .entity_id
                .as_deref()
                .is_none_or(|id| entry.entity_id() == id)
            && self.action.is_none_or(|a| entry.action() == a)
            && self
                .user_id
                .as_deref()
                .is_none_or(|u| entry.user_id() == u)
            && self.from.is_none_or(|from| entry.timestamp() >= from)
            && self.to.is_none_or(|to| entry.timestamp() <= to)
    }
}
