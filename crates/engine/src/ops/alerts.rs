//! Alert generation and lifecycle.
//!
//! The two scans are batch operations, not one big transaction: a failure
//! mid-scan leaves already-written alerts in place, which is acceptable for
//! an advisory subsystem. Deduplication is enforced per `(kind, entity_type,
//! entity_id, owner)` by a partial unique index over unresolved alerts.

use chrono::{Duration, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*, sea_query::Expr};
use serde_json::json;
use uuid::Uuid;

use crate::{
    Alert, AlertKind, AlertSeverity, InvoiceStatus, ResultEngine, alerts, invoices, products,
};

use super::Engine;

impl Engine {
    /// Scan the caller's products and re-emit low-stock alerts.
    ///
    /// Resolve-then-recreate: any previously unresolved alert for a
    /// qualifying product is resolved and a fresh one is written, so every
    /// scan produces a canonical snapshot (with current severity) instead of
    /// accumulating duplicates.
    pub async fn generate_stock_alerts(&self, user_id: &str) -> ResultEngine<Vec<Alert>> {
        let low_stock: Vec<products::Model> = products::Entity::find()
            .filter(products::Column::OwnerId.eq(user_id.to_string()))
            .filter(
                Expr::col(products::Column::StockQuantity)
                    .lte(Expr::col(products::Column::AlertThreshold)),
            )
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(low_stock.len());
        for product in low_stock {
            self.resolve_unresolved_alerts(
                user_id,
                AlertKind::LowStock,
                "product",
                &product.id,
            )
            .await?;

            let severity =
                AlertSeverity::for_stock(product.stock_quantity, product.alert_threshold);
            let alert = Alert::new(
                user_id.to_string(),
                AlertKind::LowStock,
                severity,
                format!("Low stock: {}", product.name),
                format!(
                    "Product {} has {} unit(s) left (threshold {})",
                    product.name, product.stock_quantity, product.alert_threshold
                ),
                Some("product".to_string()),
                Some(product.id.clone()),
                Some(json!({
                    "stock_quantity": product.stock_quantity,
                    "alert_threshold": product.alert_threshold,
                })),
            );
            match alerts::ActiveModel::from(&alert).insert(&self.database).await {
                Ok(_) => out.push(alert),
                Err(err) => {
                    // A concurrent scan may have won the unique-index race;
                    // in that case the alert we wanted already exists.
                    if self
                        .unresolved_alert_exists(
                            user_id,
                            AlertKind::LowStock,
                            "product",
                            &product.id,
                        )
                        .await?
                    {
                        continue;
                    }
                    return Err(err.into());
                }
            }
        }

        tracing::debug!(user_id, count = out.len(), "stock alert scan done");
        Ok(out)
    }

    /// Scan the caller's unpaid invoices and emit overdue alerts.
    ///
    /// Unlike the stock scan this skips invoices that already carry an
    /// unresolved alert, so the severity recorded at first detection does not
    /// flicker on later scans.
    pub async fn generate_overdue_invoice_alerts(&self, user_id: &str) -> ResultEngine<Vec<Alert>> {
        let today = Utc::now().date_naive();
        let overdue: Vec<invoices::Model> = invoices::Entity::find()
            .filter(invoices::Column::OwnerId.eq(user_id.to_string()))
            .filter(invoices::Column::Status.eq(InvoiceStatus::Unpaid.as_str()))
            .filter(invoices::Column::DueDate.lt(today))
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(overdue.len());
        for invoice in overdue {
            if self
                .unresolved_alert_exists(user_id, AlertKind::OverdueInvoice, "invoice", &invoice.id)
                .await?
            {
                continue;
            }

            let days_overdue = (today - invoice.due_date).num_days();
            let alert = Alert::new(
                user_id.to_string(),
                AlertKind::OverdueInvoice,
                AlertSeverity::for_days_overdue(days_overdue),
                format!("Overdue invoice {}", invoice.reference),
                format!(
                    "Invoice {} for {} is {} day(s) past due",
                    invoice.reference, invoice.client_name, days_overdue
                ),
                Some("invoice".to_string()),
                Some(invoice.id.clone()),
                Some(json!({
                    "days_overdue": days_overdue,
                    "total_minor": invoice.total_minor,
                })),
            );
            match alerts::ActiveModel::from(&alert).insert(&self.database).await {
                Ok(_) => out.push(alert),
                Err(err) => {
                    // A concurrent scan may have won the unique-index race;
                    // in that case the alert we wanted already exists.
                    if self
                        .unresolved_alert_exists(
                            user_id,
                            AlertKind::OverdueInvoice,
                            "invoice",
                            &invoice.id,
                        )
                        .await?
                    {
                        continue;
                    }
                    return Err(err.into());
                }
            }
        }

        tracing::debug!(user_id, count = out.len(), "overdue invoice scan done");
        Ok(out)
    }

    /// List the caller's alerts, most recent first.
    pub async fn list_alerts(
        &self,
        user_id: &str,
        include_resolved: bool,
    ) -> ResultEngine<Vec<Alert>> {
        let mut query = alerts::Entity::find()
            .filter(alerts::Column::OwnerId.eq(user_id.to_string()))
            .order_by_desc(alerts::Column::CreatedAt);

        if !include_resolved {
            query = query.filter(alerts::Column::IsResolved.eq(false));
        }

        let models: Vec<alerts::Model> = query.all(&self.database).await?;
        models.into_iter().map(Alert::try_from).collect()
    }

    /// Mark an alert as read.
    pub async fn mark_alert_read(&self, alert_id: Uuid, user_id: &str) -> ResultEngine<Alert> {
        let model = self.require_alert(&self.database, alert_id, user_id).await?;
        let mut active: alerts::ActiveModel = model.into();
        active.is_read = ActiveValue::Set(true);
        active.updated_at = ActiveValue::Set(Utc::now());
        Alert::try_from(active.update(&self.database).await?)
    }

    /// Resolve an alert.
    pub async fn resolve_alert(&self, alert_id: Uuid, user_id: &str) -> ResultEngine<Alert> {
        let model = self.require_alert(&self.database, alert_id, user_id).await?;
        let mut active: alerts::ActiveModel = model.into();
        active.is_resolved = ActiveValue::Set(true);
        active.updated_at = ActiveValue::Set(Utc::now());
        Alert::try_from(active.update(&self.database).await?)
    }

    /// Delete resolved alerts older than the retention window. Returns how
    /// many rows were removed.
    pub async fn cleanup_resolved_alerts(
        &self,
        user_id: &str,
        retention_days: i64,
    ) -> ResultEngine<u64> {
        let cutoff = Utc::now() - Duration::days(retention_days);
        let result = alerts::Entity::delete_many()
            .filter(alerts::Column::OwnerId.eq(user_id.to_string()))
            .filter(alerts::Column::IsResolved.eq(true))
            .filter(alerts::Column::UpdatedAt.lt(cutoff))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }

    async fn unresolved_alert_exists(
        &self,
        user_id: &str,
        kind: AlertKind,
        entity_type: &str,
        entity_id: &str,
    ) -> ResultEngine<bool> {
        let existing = alerts::Entity::find()
            .filter(alerts::Column::OwnerId.eq(user_id.to_string()))
            .filter(alerts::Column::Kind.eq(kind.as_str()))
            .filter(alerts::Column::EntityType.eq(entity_type.to_string()))
            .filter(alerts::Column::EntityId.eq(entity_id.to_string()))
            .filter(alerts::Column::IsResolved.eq(false))
            .one(&self.database)
            .await?;
        Ok(existing.is_some())
    }

    async fn resolve_unresolved_alerts(
        &self,
        user_id: &str,
        kind: AlertKind,
        entity_type: &str,
        entity_id: &str,
    ) -> ResultEngine<()> {
        alerts::Entity::update_many()
            .col_expr(alerts::Column::IsResolved, Expr::value(true))
            .col_expr(alerts::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(alerts::Column::OwnerId.eq(user_id.to_string()))
            .filter(alerts::Column::Kind.eq(kind.as_str()))
            .filter(alerts::Column::EntityType.eq(entity_type.to_string()))
            .filter(alerts::Column::EntityId.eq(entity_id.to_string()))
            .filter(alerts::Column::IsResolved.eq(false))
            .exec(&self.database)
            .await?;
        Ok(())
    }
}
