//! Imprest fund primitives.
//!
//! A fund is a pre-allocated cash pool assigned to an account holder. Its
//! `balance` is a cached projection of `initial_amount` plus the signed sum of
//! all ledger transactions; it is only ever written in the same atomic step
//! that appends a transaction row (see `ops::transactions`).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Amount, EngineError, ResultEngine, util};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundStatus {
    Active,
    Depleted,
    Closed,
}

impl FundStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Depleted => "depleted",
            Self::Closed => "closed",
        }
    }

    /// Status derived from a balance, for funds that are not closed.
    pub(crate) fn for_balance(balance: Amount) -> Self {
        if balance.is_zero() {
            Self::Depleted
        } else {
            Self::Active
        }
    }
}

impl TryFrom<&str> for FundStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "depleted" => Ok(Self::Depleted),
            "closed" => Ok(Self::Closed),
            other => Err(EngineError::Validation(format!(
                "invalid fund status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fund {
    pub id: Uuid,
    pub reference: String,
    pub owner_id: String,
    pub account_holder: String,
    pub purpose: Option<String>,
    pub initial_amount: Amount,
    pub balance: Amount,
    pub status: FundStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fund {
    /// Creates a fund with `balance = initial_amount`. This is the only place
    /// the balance is set directly.
    pub(crate) fn new(
        owner_id: String,
        account_holder: String,
        initial_amount: Amount,
        purpose: Option<String>,
    ) -> ResultEngine<Self> {
        if initial_amount.minor() < 0 {
            return Err(EngineError::Validation(
                "initial amount must not be negative".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            reference: util::new_reference("IMF"),
            owner_id,
            account_holder,
            purpose,
            initial_amount,
            balance: initial_amount,
            status: FundStatus::for_balance(initial_amount),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "funds")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub reference: String,
    pub owner_id: String,
    pub account_holder: String,
    pub purpose: Option<String>,
    pub initial_amount_minor: i64,
    pub current_balance_minor: i64,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Fund> for ActiveModel {
    fn from(fund: &Fund) -> Self {
        Self {
            id: ActiveValue::Set(fund.id.to_string()),
            reference: ActiveValue::Set(fund.reference.clone()),
            owner_id: ActiveValue::Set(fund.owner_id.clone()),
            account_holder: ActiveValue::Set(fund.account_holder.clone()),
            purpose: ActiveValue::Set(fund.purpose.clone()),
            initial_amount_minor: ActiveValue::Set(fund.initial_amount.minor()),
            current_balance_minor: ActiveValue::Set(fund.balance.minor()),
            status: ActiveValue::Set(fund.status.as_str().to_string()),
            created_at: ActiveValue::Set(fund.created_at),
            updated_at: ActiveValue::Set(fund.updated_at),
        }
    }
}

impl TryFrom<Model> for Fund {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_id(&model.id, "fund not exists")?,
            reference: model.reference,
            owner_id: model.owner_id,
            account_holder: model.account_holder,
            purpose: model.purpose,
            initial_amount: Amount::new(model.initial_amount_minor),
            balance: Amount::new(model.current_balance_minor),
            status: FundStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fund_starts_with_initial_balance() {
        let fund = Fund::new(
            "alice".to_string(),
            "Rossi".to_string(),
            Amount::new(100_000),
            None,
        )
        .unwrap();

        assert_eq!(fund.balance, fund.initial_amount);
        assert_eq!(fund.status, FundStatus::Active);
        assert!(fund.reference.starts_with("IMF-"));
    }

    #[test]
    fn zero_initial_amount_is_depleted() {
        let fund = Fund::new("alice".to_string(), "Rossi".to_string(), Amount::ZERO, None).unwrap();
        assert_eq!(fund.status, FundStatus::Depleted);
    }

    #[test]
    fn negative_initial_amount_is_rejected() {
        let err = Fund::new(
            "alice".to_string(),
            "Rossi".to_string(),
            Amount::new(-1),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
