//! Expense operations and the approval workflow.
//!
//! `approve_expense` and `reject_expense` re-read the stored status inside
//! the DB transaction and consult the transition table before touching
//! anything, so a double approval fails with `InvalidTransition` instead of
//! debiting twice. The status write and the ledger effect commit together or
//! not at all.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Amount, CreateExpenseCmd, Expense, ExpenseEvent, ExpenseStatus, ResultEngine, TransactionKind,
    expenses,
    util::{normalize_optional_text, normalize_required_text, parse_id},
};

use super::{Engine, with_tx};

impl Engine {
    /// Create an expense in `pending` status.
    pub async fn create_expense(&self, cmd: CreateExpenseCmd) -> ResultEngine<Expense> {
        let description = normalize_required_text(&cmd.description, "description")?;
        let payment_method = normalize_optional_text(cmd.payment_method.as_deref());
        let category_id = normalize_optional_text(cmd.category_id.as_deref());

        with_tx!(self, |db_tx| {
            async {
                self.require_user_exists(&db_tx, &cmd.user_id).await?;
                if let Some(fund_id) = cmd.fund_id {
                    // The link must point at a fund the caller owns.
                    self.require_fund(&db_tx, fund_id, &cmd.user_id).await?;
                }
                let expense = Expense::new(
                    cmd.user_id,
                    description,
                    cmd.amount,
                    cmd.expense_date,
                    payment_method,
                    category_id,
                    cmd.fund_id,
                )?;
                expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
                Ok(expense)
            }
            .await
        })
    }

    /// Return an expense.
    pub async fn expense(&self, expense_id: Uuid, user_id: &str) -> ResultEngine<Expense> {
        let model = self
            .require_expense(&self.database, expense_id, user_id)
            .await?;
        Expense::try_from(model)
    }

    /// List the caller's expenses, most recent first, optionally filtered by
    /// status.
    pub async fn list_expenses(
        &self,
        user_id: &str,
        status: Option<ExpenseStatus>,
    ) -> ResultEngine<Vec<Expense>> {
        let mut query = expenses::Entity::find()
            .filter(expenses::Column::OwnerId.eq(user_id.to_string()))
            .order_by_desc(expenses::Column::CreatedAt);

        if let Some(status) = status {
            query = query.filter(expenses::Column::Status.eq(status.as_str()));
        }

        let models: Vec<expenses::Model> = query.all(&self.database).await?;
        models.into_iter().map(Expense::try_from).collect()
    }

    /// Approve a pending expense.
    ///
    /// When the expense is linked to a fund, the matching `expense` debit is
    /// recorded in the same atomic unit; an insufficient balance aborts the
    /// whole approval and the expense stays `pending`.
    pub async fn approve_expense(
        &self,
        expense_id: Uuid,
        approver_id: &str,
    ) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            async {
                let model = self.require_expense(&db_tx, expense_id, approver_id).await?;
                let status = ExpenseStatus::try_from(model.status.as_str())?;
                let next = status.apply(ExpenseEvent::Approve)?;

                if let Some(fund_id) = model.fund_id.as_deref() {
                    let fund_id = parse_id(fund_id, "fund not exists")?;
                    let description =
                        format!("Expense {}: {}", model.reference, model.description);
                    self.record_on(
                        &db_tx,
                        fund_id,
                        approver_id,
                        TransactionKind::Expense,
                        Amount::new(model.amount_minor),
                        Some(description),
                        Some(expense_id),
                    )
                    .await?;
                }

                let mut active: expenses::ActiveModel = model.into();
                active.status = ActiveValue::Set(next.as_str().to_string());
                active.approved_by = ActiveValue::Set(Some(approver_id.to_string()));
                active.approved_at = ActiveValue::Set(Some(Utc::now()));
                let updated = active.update(&db_tx).await?;
                Expense::try_from(updated)
            }
            .await
        })
    }

    /// Reject a pending or approved expense.
    ///
    /// Rejecting a previously approved fund-linked expense records the
    /// compensating `refund` credit in the same atomic unit, restoring the
    /// balance to its pre-approval value.
    pub async fn reject_expense(&self, expense_id: Uuid, user_id: &str) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            async {
                let model = self.require_expense(&db_tx, expense_id, user_id).await?;
                let status = ExpenseStatus::try_from(model.status.as_str())?;
                let next = status.apply(ExpenseEvent::Reject)?;

                if status == ExpenseStatus::Approved
                    && let Some(fund_id) = model.fund_id.as_deref()
                {
                    let fund_id = parse_id(fund_id, "fund not exists")?;
                    let description =
                        format!("Refund of expense {}: {}", model.reference, model.description);
                    self.record_on(
                        &db_tx,
                        fund_id,
                        user_id,
                        TransactionKind::Refund,
                        Amount::new(model.amount_minor),
                        Some(description),
                        Some(expense_id),
                    )
                    .await?;
                }

                let mut active: expenses::ActiveModel = model.into();
                active.status = ActiveValue::Set(next.as_str().to_string());
                let updated = active.update(&db_tx).await?;
                Expense::try_from(updated)
            }
            .await
        })
    }
}
