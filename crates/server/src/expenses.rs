//! Expense API endpoints

use api_types::expense::{
    ExpenseListQuery, ExpenseListResponse, ExpenseNew, ExpenseStatus as ApiStatus, ExpenseView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{Amount, CreateExpenseCmd};

fn map_status(status: engine::ExpenseStatus) -> ApiStatus {
    match status {
        engine::ExpenseStatus::Pending => ApiStatus::Pending,
        engine::ExpenseStatus::Approved => ApiStatus::Approved,
        engine::ExpenseStatus::Rejected => ApiStatus::Rejected,
    }
}

fn unmap_status(status: ApiStatus) -> engine::ExpenseStatus {
    match status {
        ApiStatus::Pending => engine::ExpenseStatus::Pending,
        ApiStatus::Approved => engine::ExpenseStatus::Approved,
        ApiStatus::Rejected => engine::ExpenseStatus::Rejected,
    }
}

fn view(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        reference: expense.reference,
        description: expense.description,
        amount_minor: expense.amount.minor(),
        expense_date: expense.expense_date,
        payment_method: expense.payment_method,
        category_id: expense.category_id,
        fund_id: expense.fund_id,
        status: map_status(expense.status),
        approved_by: expense.approved_by,
        approved_at: expense.approved_at,
        created_at: expense.created_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let mut cmd = CreateExpenseCmd::new(
        &user.username,
        &payload.description,
        Amount::new(payload.amount_minor),
        payload.expense_date,
    );
    if let Some(payment_method) = payload.payment_method {
        cmd = cmd.payment_method(payment_method);
    }
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }
    if let Some(fund_id) = payload.fund_id {
        cmd = cmd.fund_id(fund_id);
    }

    let expense = state.engine.create_expense(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(expense))))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(id, &user.username).await?;
    Ok(Json(view(expense)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(&user.username, query.status.map(unmap_status))
        .await?;

    Ok(Json(ExpenseListResponse {
        expenses: expenses.into_iter().map(view).collect(),
    }))
}

pub async fn approve(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.approve_expense(id, &user.username).await?;
    Ok(Json(view(expense)))
}

pub async fn reject(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.reject_expense(id, &user.username).await?;
    Ok(Json(view(expense)))
}
