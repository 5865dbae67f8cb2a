//! Invoice API endpoints

use api_types::invoice::{InvoiceNew, InvoiceStatus as ApiStatus, InvoiceView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::Amount;

fn map_status(status: engine::InvoiceStatus) -> ApiStatus {
    match status {
        engine::InvoiceStatus::Unpaid => ApiStatus::Unpaid,
        engine::InvoiceStatus::Paid => ApiStatus::Paid,
    }
}

fn view(invoice: engine::Invoice) -> InvoiceView {
    InvoiceView {
        id: invoice.id,
        reference: invoice.reference,
        client_name: invoice.client_name,
        total_minor: invoice.total.minor(),
        due_date: invoice.due_date,
        status: map_status(invoice.status),
        created_at: invoice.created_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<InvoiceNew>,
) -> Result<(StatusCode, Json<InvoiceView>), ServerError> {
    let invoice = state
        .engine
        .create_invoice(
            &user.username,
            &payload.client_name,
            Amount::new(payload.total_minor),
            payload.due_date,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(view(invoice))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<InvoiceView>>, ServerError> {
    let invoices = state.engine.list_invoices(&user.username).await?;
    Ok(Json(invoices.into_iter().map(view).collect()))
}

pub async fn mark_paid(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceView>, ServerError> {
    let invoice = state.engine.mark_invoice_paid(id, &user.username).await?;
    Ok(Json(view(invoice)))
}
