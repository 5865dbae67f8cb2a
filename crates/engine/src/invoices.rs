//! Invoices table (minimal entity).
//!
//! Only what the overdue-invoice alert scan needs: due date, paid/unpaid
//! status and a reference for the alert message.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Amount, EngineError, util};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}

impl TryFrom<&str> for InvoiceStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::Validation(format!(
                "invalid invoice status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub reference: String,
    pub client_name: String,
    pub total: Amount,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub(crate) fn new(
        owner_id: String,
        client_name: String,
        total: Amount,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reference: util::new_reference("INV"),
            client_name,
            total,
            due_date,
            status: InvoiceStatus::Unpaid,
            owner_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub reference: String,
    pub client_name: String,
    pub total_minor: i64,
    pub due_date: Date,
    pub status: String,
    pub owner_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Invoice> for ActiveModel {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: ActiveValue::Set(invoice.id.to_string()),
            reference: ActiveValue::Set(invoice.reference.clone()),
            client_name: ActiveValue::Set(invoice.client_name.clone()),
            total_minor: ActiveValue::Set(invoice.total.minor()),
            due_date: ActiveValue::Set(invoice.due_date),
            status: ActiveValue::Set(invoice.status.as_str().to_string()),
            owner_id: ActiveValue::Set(invoice.owner_id.clone()),
            created_at: ActiveValue::Set(invoice.created_at),
        }
    }
}

impl TryFrom<Model> for Invoice {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_id(&model.id, "invoice not exists")?,
            reference: model.reference,
            client_name: model.client_name,
            total: Amount::new(model.total_minor),
            due_date: model.due_date,
            status: InvoiceStatus::try_from(model.status.as_str())?,
            owner_id: model.owner_id,
            created_at: model.created_at,
        })
    }
}
