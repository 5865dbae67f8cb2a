//! Invoice support operations for the overdue alert scan.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Amount, EngineError, Invoice, InvoiceStatus, ResultEngine, invoices,
    util::normalize_required_text,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create an unpaid invoice.
    pub async fn create_invoice(
        &self,
        user_id: &str,
        client_name: &str,
        total: Amount,
        due_date: NaiveDate,
    ) -> ResultEngine<Invoice> {
        let client_name = normalize_required_text(client_name, "client name")?;
        if !total.is_positive() {
            return Err(EngineError::Validation(
                "invoice total must be positive".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            async {
                self.require_user_exists(&db_tx, user_id).await?;
                let invoice = Invoice::new(user_id.to_string(), client_name, total, due_date);
                invoices::ActiveModel::from(&invoice).insert(&db_tx).await?;
                Ok(invoice)
            }
            .await
        })
    }

    /// List the caller's invoices, most recent first.
    pub async fn list_invoices(&self, user_id: &str) -> ResultEngine<Vec<Invoice>> {
        let models: Vec<invoices::Model> = invoices::Entity::find()
            .filter(invoices::Column::OwnerId.eq(user_id.to_string()))
            .order_by_desc(invoices::Column::CreatedAt)
            .all(&self.database)
            .await?;

        models.into_iter().map(Invoice::try_from).collect()
    }

    /// Mark an invoice as paid. Paid invoices no longer qualify for overdue
    /// alerts.
    pub async fn mark_invoice_paid(&self, invoice_id: Uuid, user_id: &str) -> ResultEngine<Invoice> {
        let model = self
            .require_invoice(&self.database, invoice_id, user_id)
            .await?;
        if model.status == InvoiceStatus::Paid.as_str() {
            return Err(EngineError::InvalidTransition(
                "invoice is already paid".to_string(),
            ));
        }
        let mut active: invoices::ActiveModel = model.into();
        active.status = ActiveValue::Set(InvoiceStatus::Paid.as_str().to_string());
        Invoice::try_from(active.update(&self.database).await?)
    }
}
