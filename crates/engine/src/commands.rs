//! Command structs for engine write operations.
//!
//! These types group parameters for the fund/ledger/expense writes, keeping
//! call sites readable and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Amount, TransactionKind};

/// Create an imprest fund.
#[derive(Clone, Debug)]
pub struct CreateFundCmd {
    pub user_id: String,
    pub account_holder: String,
    pub initial_amount: Amount,
    pub purpose: Option<String>,
}

impl CreateFundCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        account_holder: impl Into<String>,
        initial_amount: Amount,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            account_holder: account_holder.into(),
            initial_amount,
            purpose: None,
        }
    }

    #[must_use]
    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }
}

/// Record a ledger transaction against a fund.
#[derive(Clone, Debug)]
pub struct RecordTransactionCmd {
    pub fund_id: Uuid,
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount: Amount,
    pub description: Option<String>,
    pub expense_id: Option<Uuid>,
}

impl RecordTransactionCmd {
    #[must_use]
    pub fn new(
        fund_id: Uuid,
        user_id: impl Into<String>,
        kind: TransactionKind,
        amount: Amount,
    ) -> Self {
        Self {
            fund_id,
            user_id: user_id.into(),
            kind,
            amount,
            description: None,
            expense_id: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn expense_id(mut self, expense_id: Uuid) -> Self {
        self.expense_id = Some(expense_id);
        self
    }
}

/// Create an expense (always starts `pending`).
#[derive(Clone, Debug)]
pub struct CreateExpenseCmd {
    pub user_id: String,
    pub description: String,
    pub amount: Amount,
    pub expense_date: NaiveDate,
    pub payment_method: Option<String>,
    pub category_id: Option<String>,
    pub fund_id: Option<Uuid>,
}

impl CreateExpenseCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
        expense_date: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            description: description.into(),
            amount,
            expense_date,
            payment_method: None,
            category_id: None,
            fund_id: None,
        }
    }

    #[must_use]
    pub fn payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = Some(payment_method.into());
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    #[must_use]
    pub fn fund_id(mut self, fund_id: Uuid) -> Self {
        self.fund_id = Some(fund_id);
        self
    }
}
