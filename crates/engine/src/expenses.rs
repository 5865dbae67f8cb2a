//! Expense primitives and the approval state machine.
//!
//! The lifecycle is `pending -> approved | rejected`, plus the reversal edge
//! `approved -> rejected`. Nothing ever goes back to `pending`. The
//! transition table lives in [`ExpenseStatus::apply`] and is the single
//! authority the engine consults; route handlers never branch on raw status
//! strings.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Amount, EngineError, ResultEngine, util};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
}

/// Events the approval workflow reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpenseEvent {
    Approve,
    Reject,
}

impl ExpenseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// The transition table: `{from, event} -> to`.
    ///
    /// Any pair not listed is an [`EngineError::InvalidTransition`]; in
    /// particular approving twice fails here instead of debiting twice.
    pub fn apply(self, event: ExpenseEvent) -> ResultEngine<ExpenseStatus> {
        match (self, event) {
            (Self::Pending, ExpenseEvent::Approve) => Ok(Self::Approved),
            (Self::Pending | Self::Approved, ExpenseEvent::Reject) => Ok(Self::Rejected),
            (from, event) => Err(EngineError::InvalidTransition(format!(
                "cannot {} an expense in status {}",
                match event {
                    ExpenseEvent::Approve => "approve",
                    ExpenseEvent::Reject => "reject",
                },
                from.as_str()
            ))),
        }
    }
}

impl TryFrom<&str> for ExpenseStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(EngineError::Validation(format!(
                "invalid expense status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub reference: String,
    pub description: String,
    pub amount: Amount,
    pub expense_date: NaiveDate,
    pub payment_method: Option<String>,
    pub category_id: Option<String>,
    pub fund_id: Option<Uuid>,
    pub status: ExpenseStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub(crate) fn new(
        owner_id: String,
        description: String,
        amount: Amount,
        expense_date: NaiveDate,
        payment_method: Option<String>,
        category_id: Option<String>,
        fund_id: Option<Uuid>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::Validation(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            reference: util::new_reference("EXP"),
            description,
            amount,
            expense_date,
            payment_method,
            category_id,
            fund_id,
            status: ExpenseStatus::Pending,
            approved_by: None,
            approved_at: None,
            owner_id,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub reference: String,
    pub description: String,
    pub amount_minor: i64,
    pub expense_date: Date,
    pub payment_method: Option<String>,
    pub category_id: Option<String>,
    pub fund_id: Option<String>,
    pub status: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTimeUtc>,
    pub owner_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::funds::Entity",
        from = "Column::FundId",
        to = "super::funds::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Funds,
}

impl Related<super::funds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Funds.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            reference: ActiveValue::Set(expense.reference.clone()),
            description: ActiveValue::Set(expense.description.clone()),
            amount_minor: ActiveValue::Set(expense.amount.minor()),
            expense_date: ActiveValue::Set(expense.expense_date),
            payment_method: ActiveValue::Set(expense.payment_method.clone()),
            category_id: ActiveValue::Set(expense.category_id.clone()),
            fund_id: ActiveValue::Set(expense.fund_id.map(|id| id.to_string())),
            status: ActiveValue::Set(expense.status.as_str().to_string()),
            approved_by: ActiveValue::Set(expense.approved_by.clone()),
            approved_at: ActiveValue::Set(expense.approved_at),
            owner_id: ActiveValue::Set(expense.owner_id.clone()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_id(&model.id, "expense not exists")?,
            reference: model.reference,
            description: model.description,
            amount: Amount::new(model.amount_minor),
            expense_date: model.expense_date,
            payment_method: model.payment_method,
            category_id: model.category_id,
            fund_id: model
                .fund_id
                .as_deref()
                .map(|s| util::parse_id(s, "fund not exists"))
                .transpose()?,
            status: ExpenseStatus::try_from(model.status.as_str())?,
            approved_by: model.approved_by,
            approved_at: model.approved_at,
            owner_id: model.owner_id,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_be_approved_or_rejected() {
        assert_eq!(
            ExpenseStatus::Pending.apply(ExpenseEvent::Approve).unwrap(),
            ExpenseStatus::Approved
        );
        assert_eq!(
            ExpenseStatus::Pending.apply(ExpenseEvent::Reject).unwrap(),
            ExpenseStatus::Rejected
        );
    }

    #[test]
    fn approved_can_only_be_rejected() {
        assert_eq!(
            ExpenseStatus::Approved.apply(ExpenseEvent::Reject).unwrap(),
            ExpenseStatus::Rejected
        );
        assert!(matches!(
            ExpenseStatus::Approved.apply(ExpenseEvent::Approve),
            Err(EngineError::InvalidTransition(_))
        ));
    }

    #[test]
    fn rejected_is_terminal() {
        assert!(matches!(
            ExpenseStatus::Rejected.apply(ExpenseEvent::Approve),
            Err(EngineError::InvalidTransition(_))
        ));
        assert!(matches!(
            ExpenseStatus::Rejected.apply(ExpenseEvent::Reject),
            Err(EngineError::InvalidTransition(_))
        ));
    }
}
