//! Business alert primitives.
//!
//! Alerts are advisory: the generator scans (see `ops::alerts`) keep at most
//! one unresolved alert per `(kind, entity_type, entity_id)` triple and owner.
//! A partial unique index on the table backs that invariant against
//! concurrent scans.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowStock,
    OverdueInvoice,
}

impl AlertKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LowStock => "low_stock",
            Self::OverdueInvoice => "overdue_invoice",
        }
    }
}

impl TryFrom<&str> for AlertKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "low_stock" => Ok(Self::LowStock),
            "overdue_invoice" => Ok(Self::OverdueInvoice),
            other => Err(EngineError::Validation(format!(
                "invalid alert kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Severity for a stock level against its alert threshold.
    pub(crate) fn for_stock(stock: i64, threshold: i64) -> Self {
        if stock == 0 {
            Self::Critical
        } else if stock * 2 <= threshold {
            Self::High
        } else {
            Self::Medium
        }
    }

    /// Severity for an invoice by how many days it is past due.
    pub(crate) fn for_days_overdue(days: i64) -> Self {
        if days > 30 {
            Self::Critical
        } else if days > 7 {
            Self::High
        } else {
            Self::Medium
        }
    }
}

impl TryFrom<&str> for AlertSeverity {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(EngineError::Validation(format!(
                "invalid alert severity: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub is_read: bool,
    pub is_resolved: bool,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Alert {
    pub(crate) fn new(
        owner_id: String,
        kind: AlertKind,
        severity: AlertSeverity,
        title: String,
        message: String,
        entity_type: Option<String>,
        entity_id: Option<String>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            severity,
            title,
            message,
            entity_type,
            entity_id,
            metadata,
            is_read: false,
            is_resolved: false,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub severity: String,
    pub title: String,
    pub message: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub metadata: Option<Json>,
    pub is_read: bool,
    pub is_resolved: bool,
    pub owner_id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Alert> for ActiveModel {
    fn from(alert: &Alert) -> Self {
        Self {
            id: ActiveValue::Set(alert.id.to_string()),
            kind: ActiveValue::Set(alert.kind.as_str().to_string()),
            severity: ActiveValue::Set(alert.severity.as_str().to_string()),
            title: ActiveValue::Set(alert.title.clone()),
            message: ActiveValue::Set(alert.message.clone()),
            entity_type: ActiveValue::Set(alert.entity_type.clone()),
            entity_id: ActiveValue::Set(alert.entity_id.clone()),
            metadata: ActiveValue::Set(alert.metadata.clone()),
            is_read: ActiveValue::Set(alert.is_read),
            is_resolved: ActiveValue::Set(alert.is_resolved),
            owner_id: ActiveValue::Set(alert.owner_id.clone()),
            created_at: ActiveValue::Set(alert.created_at),
            updated_at: ActiveValue::Set(alert.updated_at),
        }
    }
}

impl TryFrom<Model> for Alert {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_id(&model.id, "alert not exists")?,
            kind: AlertKind::try_from(model.kind.as_str())?,
            severity: AlertSeverity::try_from(model.severity.as_str())?,
            title: model.title,
            message: model.message,
            entity_type: model.entity_type,
            entity_id: model.entity_id,
            metadata: model.metadata,
            is_read: model.is_read,
            is_resolved: model.is_resolved,
            owner_id: model.owner_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
