//! Fund transaction API endpoints

use api_types::transaction::{
    TransactionKind as ApiKind, TransactionListQuery, TransactionListResponse, TransactionNew,
    TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{Amount, RecordTransactionCmd};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Deposit => ApiKind::Deposit,
        engine::TransactionKind::Withdrawal => ApiKind::Withdrawal,
        engine::TransactionKind::Expense => ApiKind::Expense,
        engine::TransactionKind::Refund => ApiKind::Refund,
    }
}

fn unmap_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Deposit => engine::TransactionKind::Deposit,
        ApiKind::Withdrawal => engine::TransactionKind::Withdrawal,
        ApiKind::Expense => engine::TransactionKind::Expense,
        ApiKind::Refund => engine::TransactionKind::Refund,
    }
}

fn view(tx: engine::FundTransaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        reference: tx.reference,
        fund_id: tx.fund_id,
        kind: map_kind(tx.kind),
        amount_minor: tx.amount.minor(),
        description: tx.description,
        balance_after_minor: tx.balance_after.minor(),
        expense_id: tx.expense_id,
        created_at: tx.created_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(fund_id): Path<Uuid>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = RecordTransactionCmd::new(
        fund_id,
        &user.username,
        unmap_kind(payload.kind),
        Amount::new(payload.amount_minor),
    );
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let tx = state.engine.record_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(tx))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(fund_id): Path<Uuid>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let limit = query.limit.unwrap_or(100);
    let transactions = state
        .engine
        .list_transactions(fund_id, &user.username, limit)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: transactions.into_iter().map(view).collect(),
    }))
}
