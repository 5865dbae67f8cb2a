//! The transaction recorder.
//!
//! Recording a transaction and updating the fund's cached balance are one
//! atomic unit: both writes happen inside the same DB transaction, and the
//! balance write is a compare-and-swap against the balance that was read, so
//! two concurrent debits cannot both pass the sufficiency check on a stale
//! value.

use sea_orm::{
    DatabaseTransaction, DbErr, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Amount, EngineError, FundStatus, FundTransaction, RecordTransactionCmd, ResultEngine,
    TransactionKind, funds, transactions, util::normalize_optional_text,
};

use super::{Engine, with_tx};

/// Bounded retries for the balance compare-and-swap.
const BALANCE_CAS_ATTEMPTS: usize = 5;

impl Engine {
    /// Record a ledger transaction against a fund.
    ///
    /// Fails with [`EngineError::InsufficientFunds`] when a debit would
    /// overdraw the fund, leaving fund and ledger untouched.
    pub async fn record_transaction(
        &self,
        cmd: RecordTransactionCmd,
    ) -> ResultEngine<FundTransaction> {
        let description = normalize_optional_text(cmd.description.as_deref());
        with_tx!(self, |db_tx| {
            self.record_on(
                &db_tx,
                cmd.fund_id,
                &cmd.user_id,
                cmd.kind,
                cmd.amount,
                description,
                cmd.expense_id,
            )
            .await
        })
    }

    /// Lists a fund's transactions in ledger order (oldest first).
    pub async fn list_transactions(
        &self,
        fund_id: Uuid,
        user_id: &str,
        limit: u64,
    ) -> ResultEngine<Vec<FundTransaction>> {
        // Authorization check via fund lookup.
        self.require_fund(&self.database, fund_id, user_id).await?;

        let models: Vec<transactions::Model> = transactions::Entity::find()
            .filter(transactions::Column::FundId.eq(fund_id.to_string()))
            .order_by_asc(transactions::Column::Seq)
            .limit(limit)
            .all(&self.database)
            .await?;

        models.into_iter().map(FundTransaction::try_from).collect()
    }

    /// Shared recorder used by both the public operation and the expense
    /// approval workflow (which passes its own `db_tx` so status change and
    /// ledger effect commit together).
    pub(super) async fn record_on(
        &self,
        db_tx: &DatabaseTransaction,
        fund_id: Uuid,
        user_id: &str,
        kind: TransactionKind,
        amount: Amount,
        description: Option<String>,
        expense_id: Option<Uuid>,
    ) -> ResultEngine<FundTransaction> {
        let mut model = self.require_fund(db_tx, fund_id, user_id).await?;

        for _ in 0..BALANCE_CAS_ATTEMPTS {
            if FundStatus::try_from(model.status.as_str())? == FundStatus::Closed {
                return Err(EngineError::InvalidTransition(
                    "fund is closed".to_string(),
                ));
            }

            let before = Amount::new(model.current_balance_minor);
            let after = kind.apply(before, amount)?;
            let new_status = FundStatus::for_balance(after);

            // Compare-and-swap on the balance that was read: if another
            // writer moved it in the meantime, zero rows match and we retry
            // against the fresh value.
            let result = funds::Entity::update_many()
                .col_expr(
                    funds::Column::CurrentBalanceMinor,
                    Expr::value(after.minor()),
                )
                .col_expr(funds::Column::Status, Expr::value(new_status.as_str()))
                .col_expr(funds::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
                .filter(funds::Column::Id.eq(fund_id.to_string()))
                .filter(funds::Column::CurrentBalanceMinor.eq(before.minor()))
                .exec(db_tx)
                .await?;

            if result.rows_affected == 1 {
                // Winning the balance update serializes writers on this fund,
                // so the next ledger position can be read without racing.
                let last_seq: Option<Option<i64>> = transactions::Entity::find()
                    .select_only()
                    .column_as(transactions::Column::Seq.max(), "max_seq")
                    .filter(transactions::Column::FundId.eq(fund_id.to_string()))
                    .into_tuple()
                    .one(db_tx)
                    .await?;
                let seq = last_seq.flatten().unwrap_or(0) + 1;

                let tx = FundTransaction::new(
                    fund_id,
                    seq,
                    kind,
                    amount,
                    description,
                    after,
                    expense_id,
                    user_id.to_string(),
                );
                transactions::ActiveModel::from(&tx).insert(db_tx).await?;
                return Ok(tx);
            }

            tracing::debug!(%fund_id, "fund balance moved during update, retrying");
            model = self.require_fund(db_tx, fund_id, user_id).await?;
        }

        Err(EngineError::Database(DbErr::Custom(
            "fund balance update kept conflicting".to_string(),
        )))
    }
}
