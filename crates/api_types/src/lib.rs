//! Wire types shared between the server and its clients.
//!
//! All monetary amounts travel as `*_minor` integers (minor currency units,
//! e.g. cents). Timestamps are RFC3339 UTC; dates are `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod fund {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum FundStatus {
        Active,
        Depleted,
        Closed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FundNew {
        pub account_holder: String,
        /// Opening amount in minor units. Must be >= 0.
        pub initial_amount_minor: i64,
        pub purpose: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FundView {
        pub id: Uuid,
        pub reference: String,
        pub account_holder: String,
        pub purpose: Option<String>,
        pub initial_amount_minor: i64,
        pub current_balance_minor: i64,
        pub status: FundStatus,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FundListResponse {
        pub funds: Vec<FundView>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Deposit,
        Withdrawal,
        Expense,
        Refund,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        /// Must be > 0. The kind defines the direction.
        pub amount_minor: i64,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub reference: String,
        pub fund_id: Uuid,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: Option<String>,
        /// Fund balance immediately after this entry was applied.
        pub balance_after_minor: i64,
        pub expense_id: Option<Uuid>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ExpenseStatus {
        Pending,
        Approved,
        Rejected,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub description: String,
        /// Must be > 0.
        pub amount_minor: i64,
        pub expense_date: NaiveDate,
        pub payment_method: Option<String>,
        pub category_id: Option<String>,
        /// Fund to debit on approval. Optional: unlinked expenses never touch
        /// a ledger.
        pub fund_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub reference: String,
        pub description: String,
        pub amount_minor: i64,
        pub expense_date: NaiveDate,
        pub payment_method: Option<String>,
        pub category_id: Option<String>,
        pub fund_id: Option<Uuid>,
        pub status: ExpenseStatus,
        pub approved_by: Option<String>,
        pub approved_at: Option<DateTime<Utc>>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListQuery {
        pub status: Option<ExpenseStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }
}

pub mod product {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductNew {
        pub name: String,
        pub stock_quantity: i64,
        pub alert_threshold: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductStockUpdate {
        pub stock_quantity: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductView {
        pub id: Uuid,
        pub name: String,
        pub stock_quantity: i64,
        pub alert_threshold: i64,
        pub created_at: DateTime<Utc>,
    }
}

pub mod invoice {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum InvoiceStatus {
        Unpaid,
        Paid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceNew {
        pub client_name: String,
        /// Must be > 0.
        pub total_minor: i64,
        pub due_date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceView {
        pub id: Uuid,
        pub reference: String,
        pub client_name: String,
        pub total_minor: i64,
        pub due_date: NaiveDate,
        pub status: InvoiceStatus,
        pub created_at: DateTime<Utc>,
    }
}

pub mod alert {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AlertKind {
        LowStock,
        OverdueInvoice,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AlertSeverity {
        Medium,
        High,
        Critical,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AlertListQuery {
        pub include_resolved: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AlertView {
        pub id: Uuid,
        pub kind: AlertKind,
        pub severity: AlertSeverity,
        pub title: String,
        pub message: String,
        pub entity_type: Option<String>,
        pub entity_id: Option<String>,
        pub metadata: Option<serde_json::Value>,
        pub is_read: bool,
        pub is_resolved: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AlertListResponse {
        pub alerts: Vec<AlertView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AlertScanResponse {
        /// Alerts written by this scan (skipped duplicates excluded).
        pub generated: Vec<AlertView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AlertCleanupQuery {
        /// Resolved alerts older than this many days are deleted. Defaults
        /// to 30.
        pub retention_days: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AlertCleanupResponse {
        pub deleted: u64,
    }
}
