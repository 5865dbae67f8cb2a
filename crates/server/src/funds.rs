//! Fund API endpoints

use api_types::fund::{FundListResponse, FundNew, FundStatus as ApiStatus, FundView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{Amount, CreateFundCmd};

fn map_status(status: engine::FundStatus) -> ApiStatus {
    match status {
        engine::FundStatus::Active => ApiStatus::Active,
        engine::FundStatus::Depleted => ApiStatus::Depleted,
        engine::FundStatus::Closed => ApiStatus::Closed,
    }
}

pub(crate) fn view(fund: engine::Fund) -> FundView {
    FundView {
        id: fund.id,
        reference: fund.reference,
        account_holder: fund.account_holder,
        purpose: fund.purpose,
        initial_amount_minor: fund.initial_amount.minor(),
        current_balance_minor: fund.balance.minor(),
        status: map_status(fund.status),
        created_at: fund.created_at,
        updated_at: fund.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<FundNew>,
) -> Result<(StatusCode, Json<FundView>), ServerError> {
    let mut cmd = CreateFundCmd::new(
        &user.username,
        &payload.account_holder,
        Amount::new(payload.initial_amount_minor),
    );
    if let Some(purpose) = payload.purpose {
        cmd = cmd.purpose(purpose);
    }

    let fund = state.engine.create_fund(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(fund))))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FundView>, ServerError> {
    let fund = state.engine.fund(id, &user.username).await?;
    Ok(Json(view(fund)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<FundListResponse>, ServerError> {
    let funds = state.engine.list_funds(&user.username).await?;
    Ok(Json(FundListResponse {
        funds: funds.into_iter().map(view).collect(),
    }))
}

pub async fn close(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FundView>, ServerError> {
    let fund = state.engine.close_fund(id, &user.username).await?;
    Ok(Json(view(fund)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_fund(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
