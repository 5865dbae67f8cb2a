//! Ledger transaction primitives.
//!
//! A `FundTransaction` is an immutable, append-only record of a
//! balance-affecting event against a fund. Rows are never updated or
//! reordered; `balance_after` snapshots the fund balance at commit time so
//! history can be reconstructed without replaying the whole ledger.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Amount, EngineError, ResultEngine, util};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Expense,
    Refund,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Expense => "expense",
            Self::Refund => "refund",
        }
    }

    /// Credits increase the fund balance, debits decrease it.
    pub fn is_credit(self) -> bool {
        matches!(self, Self::Deposit | Self::Refund)
    }

    /// The fund balance calculator: computes the balance after applying a
    /// transaction of this kind. Pure, no I/O.
    ///
    /// A debit that would drive the balance below zero fails with
    /// [`EngineError::InsufficientFunds`] before any write happens; this is
    /// the single rule protecting the non-negativity invariant.
    pub fn apply(self, balance: Amount, amount: Amount) -> ResultEngine<Amount> {
        if !amount.is_positive() {
            return Err(EngineError::Validation(
                "amount must be > 0".to_string(),
            ));
        }
        if self.is_credit() {
            balance
                .checked_add(amount)
                .ok_or_else(|| EngineError::Validation("amount too large".to_string()))
        } else if amount > balance {
            Err(EngineError::InsufficientFunds {
                required: amount,
                available: balance,
            })
        } else {
            // Cannot underflow: amount <= balance and both are non-negative.
            Ok(balance - amount)
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            "expense" => Ok(Self::Expense),
            "refund" => Ok(Self::Refund),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundTransaction {
    pub id: Uuid,
    pub reference: String,
    pub fund_id: Uuid,
    /// Position in the fund's ledger, starting at 1. Assigned by the
    /// recorder; the tiebreaker for entries committed in the same instant.
    pub seq: i64,
    pub kind: TransactionKind,
    pub amount: Amount,
    pub description: Option<String>,
    pub balance_after: Amount,
    pub expense_id: Option<Uuid>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl FundTransaction {
    pub(crate) fn new(
        fund_id: Uuid,
        seq: i64,
        kind: TransactionKind,
        amount: Amount,
        description: Option<String>,
        balance_after: Amount,
        expense_id: Option<Uuid>,
        owner_id: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reference: util::new_reference("TRX"),
            fund_id,
            seq,
            kind,
            amount,
            description,
            balance_after,
            expense_id,
            owner_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fund_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub reference: String,
    pub fund_id: String,
    pub seq: i64,
    pub kind: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub balance_after_minor: i64,
    pub expense_id: Option<String>,
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
        on_delete = "Cascade"
    )]
    Funds,
}

impl Related<super::funds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Funds.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&FundTransaction> for ActiveModel {
    fn from(tx: &FundTransaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            reference: ActiveValue::Set(tx.reference.clone()),
            fund_id: ActiveValue::Set(tx.fund_id.to_string()),
            seq: ActiveValue::Set(tx.seq),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.minor()),
            description: ActiveValue::Set(tx.description.clone()),
            balance_after_minor: ActiveValue::Set(tx.balance_after.minor()),
            expense_id: ActiveValue::Set(tx.expense_id.map(|id| id.to_string())),
            owner_id: ActiveValue::Set(tx.owner_id.clone()),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for FundTransaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_id(&model.id, "transaction not exists")?,
            reference: model.reference,
            fund_id: util::parse_id(&model.fund_id, "fund not exists")?,
            seq: model.seq,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount: Amount::new(model.amount_minor),
            description: model.description,
            balance_after: Amount::new(model.balance_after_minor),
            expense_id: model
                .expense_id
                .as_deref()
                .map(|s| util::parse_id(s, "expense not exists"))
                .transpose()?,
            owner_id: model.owner_id,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credits_add_debits_subtract() {
        let balance = Amount::new(1000);
        assert_eq!(
            TransactionKind::Deposit
                .apply(balance, Amount::new(250))
                .unwrap(),
            Amount::new(1250)
        );
        assert_eq!(
            TransactionKind::Refund
                .apply(balance, Amount::new(250))
                .unwrap(),
            Amount::new(1250)
        );
        assert_eq!(
            TransactionKind::Withdrawal
                .apply(balance, Amount::new(250))
                .unwrap(),
            Amount::new(750)
        );
        assert_eq!(
            TransactionKind::Expense
                .apply(balance, Amount::new(1000))
                .unwrap(),
            Amount::ZERO
        );
    }

    #[test]
    fn overdraw_fails_with_insufficient_funds() {
        let err = TransactionKind::Expense
            .apply(Amount::new(100), Amount::new(101))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientFunds {
                required: Amount::new(101),
                available: Amount::new(100),
            }
        );
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        for kind in [
            TransactionKind::Deposit,
            TransactionKind::Withdrawal,
            TransactionKind::Expense,
            TransactionKind::Refund,
        ] {
            assert!(kind.apply(Amount::new(100), Amount::ZERO).is_err());
            assert!(kind.apply(Amount::new(100), Amount::new(-5)).is_err());
        }
    }

    #[test]
    fn overflow_is_caught() {
        let err = TransactionKind::Deposit
            .apply(Amount::new(i64::MAX), Amount::new(1))
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
