pub use alerts::{Alert, AlertKind, AlertSeverity};
pub use commands::{CreateExpenseCmd, CreateFundCmd, RecordTransactionCmd};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseEvent, ExpenseStatus};
pub use funds::{Fund, FundStatus};
pub use invoices::{Invoice, InvoiceStatus};
pub use money::Amount;
pub use ops::{Engine, EngineBuilder};
pub use products::Product;
pub use transactions::{FundTransaction, TransactionKind};

mod alerts;
mod commands;
mod error;
mod expenses;
mod funds;
mod invoices;
mod money;
mod ops;
mod products;
mod transactions;
pub mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
