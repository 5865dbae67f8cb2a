//! Alert API endpoints

use api_types::alert::{
    AlertCleanupQuery, AlertCleanupResponse, AlertKind as ApiKind, AlertListQuery,
    AlertListResponse, AlertScanResponse, AlertSeverity as ApiSeverity, AlertView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

const DEFAULT_RETENTION_DAYS: i64 = 30;

fn map_kind(kind: engine::AlertKind) -> ApiKind {
    match kind {
        engine::AlertKind::LowStock => ApiKind::LowStock,
        engine::AlertKind::OverdueInvoice => ApiKind::OverdueInvoice,
    }
}

fn map_severity(severity: engine::AlertSeverity) -> ApiSeverity {
    match severity {
        engine::AlertSeverity::Medium => ApiSeverity::Medium,
        engine::AlertSeverity::High => ApiSeverity::High,
        engine::AlertSeverity::Critical => ApiSeverity::Critical,
    }
}

fn view(alert: engine::Alert) -> AlertView {
    AlertView {
        id: alert.id,
        kind: map_kind(alert.kind),
        severity: map_severity(alert.severity),
        title: alert.title,
        message: alert.message,
        entity_type: alert.entity_type,
        entity_id: alert.entity_id,
        metadata: alert.metadata,
        is_read: alert.is_read,
        is_resolved: alert.is_resolved,
        created_at: alert.created_at,
        updated_at: alert.updated_at,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<AlertListQuery>,
) -> Result<Json<AlertListResponse>, ServerError> {
    let alerts = state
        .engine
        .list_alerts(&user.username, query.include_resolved.unwrap_or(false))
        .await?;

    Ok(Json(AlertListResponse {
        alerts: alerts.into_iter().map(view).collect(),
    }))
}

pub async fn scan_stock(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<AlertScanResponse>, ServerError> {
    let generated = state.engine.generate_stock_alerts(&user.username).await?;
    Ok(Json(AlertScanResponse {
        generated: generated.into_iter().map(view).collect(),
    }))
}

pub async fn scan_invoices(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<AlertScanResponse>, ServerError> {
    let generated = state
        .engine
        .generate_overdue_invoice_alerts(&user.username)
        .await?;
    Ok(Json(AlertScanResponse {
        generated: generated.into_iter().map(view).collect(),
    }))
}

pub async fn mark_read(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AlertView>, ServerError> {
    let alert = state.engine.mark_alert_read(id, &user.username).await?;
    Ok(Json(view(alert)))
}

pub async fn resolve(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AlertView>, ServerError> {
    let alert = state.engine.resolve_alert(id, &user.username).await?;
    Ok(Json(view(alert)))
}

pub async fn cleanup(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<AlertCleanupQuery>,
) -> Result<Json<AlertCleanupResponse>, ServerError> {
    let retention_days = query.retention_days.unwrap_or(DEFAULT_RETENTION_DAYS);
    if retention_days < 0 {
        return Err(ServerError::Generic(
            "retention_days cannot be negative".to_string(),
        ));
    }

    let deleted = state
        .engine
        .cleanup_resolved_alerts(&user.username, retention_days)
        .await?;
    Ok(Json(AlertCleanupResponse { deleted }))
}
