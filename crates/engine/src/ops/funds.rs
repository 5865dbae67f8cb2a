//! Imprest fund operations.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    CreateFundCmd, EngineError, Fund, FundStatus, ResultEngine, expenses, funds, transactions,
    util::{normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a new imprest fund with `balance = initial_amount`.
    pub async fn create_fund(&self, cmd: CreateFundCmd) -> ResultEngine<Fund> {
        let account_holder = normalize_required_text(&cmd.account_holder, "account holder")?;
        let purpose = normalize_optional_text(cmd.purpose.as_deref());

        with_tx!(self, |db_tx| {
            async {
                self.require_user_exists(&db_tx, &cmd.user_id).await?;
                let fund = Fund::new(cmd.user_id, account_holder, cmd.initial_amount, purpose)?;
                funds::ActiveModel::from(&fund).insert(&db_tx).await?;
                Ok(fund)
            }
            .await
        })
    }

    /// Return a fund.
    pub async fn fund(&self, fund_id: Uuid, user_id: &str) -> ResultEngine<Fund> {
        let model = self.require_fund(&self.database, fund_id, user_id).await?;
        Fund::try_from(model)
    }

    /// List the caller's funds, most recent first.
    pub async fn list_funds(&self, user_id: &str) -> ResultEngine<Vec<Fund>> {
        let models: Vec<funds::Model> = funds::Entity::find()
            .filter(funds::Column::OwnerId.eq(user_id.to_string()))
            .order_by_desc(funds::Column::CreatedAt)
            .all(&self.database)
            .await?;

        models.into_iter().map(Fund::try_from).collect()
    }

    /// Close a fund. Closed funds refuse further transactions.
    pub async fn close_fund(&self, fund_id: Uuid, user_id: &str) -> ResultEngine<Fund> {
        with_tx!(self, |db_tx| {
            async {
                let model = self.require_fund(&db_tx, fund_id, user_id).await?;
                if FundStatus::try_from(model.status.as_str())? == FundStatus::Closed {
                    return Err(EngineError::InvalidTransition(
                        "fund is already closed".to_string(),
                    ));
                }
                let mut active: funds::ActiveModel = model.into();
                active.status = ActiveValue::Set(FundStatus::Closed.as_str().to_string());
                active.updated_at = ActiveValue::Set(chrono::Utc::now());
                let updated = active.update(&db_tx).await?;
                Fund::try_from(updated)
            }
            .await
        })
    }

    /// Delete a fund and its transactions in one atomic step.
    ///
    /// The two-phase delete keeps the "no orphaned transactions" contract
    /// even on backends without foreign-key cascade enabled. Expenses that
    /// still reference the fund get their link nulled rather than blocking
    /// the delete; their status and amounts are untouched.
    pub async fn delete_fund(&self, fund_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            async {
                self.require_fund(&db_tx, fund_id, user_id).await?;

                transactions::Entity::delete_many()
                    .filter(transactions::Column::FundId.eq(fund_id.to_string()))
                    .exec(&db_tx)
                    .await?;

                expenses::Entity::update_many()
                    .col_expr(
                        expenses::Column::FundId,
                        Expr::value(Option::<String>::None),
                    )
                    .filter(expenses::Column::FundId.eq(fund_id.to_string()))
                    .exec(&db_tx)
                    .await?;

                funds::Entity::delete_by_id(fund_id.to_string())
                    .exec(&db_tx)
                    .await?;
                Ok(())
            }
            .await
        })
    }
}
