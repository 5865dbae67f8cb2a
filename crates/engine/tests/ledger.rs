use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    Amount, CreateExpenseCmd, CreateFundCmd, Engine, EngineError, ExpenseStatus, FundStatus,
    RecordTransactionCmd, TransactionKind,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

async fn insert_user(db: &DatabaseConnection, username: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec![username.into(), "password".into()],
    ))
    .await
    .unwrap();
}

fn expense_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, 15).unwrap()
}

#[tokio::test]
async fn new_fund_starts_active_with_opening_balance() {
    let (engine, _db) = engine_with_db().await;

    let fund = engine
        .create_fund(
            CreateFundCmd::new("alice", "Mario", Amount::new(100_000)).purpose("office supplies"),
        )
        .await
        .unwrap();

    assert_eq!(fund.balance, Amount::new(100_000));
    assert_eq!(fund.initial_amount, Amount::new(100_000));
    assert_eq!(fund.status, FundStatus::Active);
    assert!(fund.reference.starts_with("IMF-"));

    let fetched = engine.fund(fund.id, "alice").await.unwrap();
    assert_eq!(fetched, fund);
}

#[tokio::test]
async fn negative_opening_balance_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_fund(CreateFundCmd::new("alice", "Mario", Amount::new(-1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn deposits_and_withdrawals_move_the_balance() {
    let (engine, _db) = engine_with_db().await;
    let fund = engine
        .create_fund(CreateFundCmd::new("alice", "Mario", Amount::new(10_000)))
        .await
        .unwrap();

    let deposit = engine
        .record_transaction(RecordTransactionCmd::new(
            fund.id,
            "alice",
            TransactionKind::Deposit,
            Amount::new(5_000),
        ))
        .await
        .unwrap();
    assert_eq!(deposit.balance_after, Amount::new(15_000));

    let withdrawal = engine
        .record_transaction(
            RecordTransactionCmd::new(
                fund.id,
                "alice",
                TransactionKind::Withdrawal,
                Amount::new(2_500),
            )
            .description("taxi"),
        )
        .await
        .unwrap();
    assert_eq!(withdrawal.balance_after, Amount::new(12_500));

    let fund = engine.fund(fund.id, "alice").await.unwrap();
    assert_eq!(fund.balance, Amount::new(12_500));
}

#[tokio::test]
async fn overdraw_is_refused_and_nothing_is_written() {
    let (engine, _db) = engine_with_db().await;
    let fund = engine
        .create_fund(CreateFundCmd::new("alice", "Mario", Amount::new(1_000)))
        .await
        .unwrap();

    let err = engine
        .record_transaction(RecordTransactionCmd::new(
            fund.id,
            "alice",
            TransactionKind::Withdrawal,
            Amount::new(2_000),
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientFunds {
            required: Amount::new(2_000),
            available: Amount::new(1_000),
        }
    );

    let fund = engine.fund(fund.id, "alice").await.unwrap();
    assert_eq!(fund.balance, Amount::new(1_000));
    let txs = engine.list_transactions(fund.id, "alice", 10).await.unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn draining_the_fund_marks_it_depleted() {
    let (engine, _db) = engine_with_db().await;
    let fund = engine
        .create_fund(CreateFundCmd::new("alice", "Mario", Amount::new(500)))
        .await
        .unwrap();

    engine
        .record_transaction(RecordTransactionCmd::new(
            fund.id,
            "alice",
            TransactionKind::Withdrawal,
            Amount::new(500),
        ))
        .await
        .unwrap();

    let fund = engine.fund(fund.id, "alice").await.unwrap();
    assert_eq!(fund.balance, Amount::ZERO);
    assert_eq!(fund.status, FundStatus::Depleted);

    // A deposit revives it.
    engine
        .record_transaction(RecordTransactionCmd::new(
            fund.id,
            "alice",
            TransactionKind::Deposit,
            Amount::new(100),
        ))
        .await
        .unwrap();
    let fund = engine.fund(fund.id, "alice").await.unwrap();
    assert_eq!(fund.status, FundStatus::Active);
}

#[tokio::test]
async fn balance_after_chain_matches_running_balance() {
    let (engine, _db) = engine_with_db().await;
    let fund = engine
        .create_fund(CreateFundCmd::new("alice", "Mario", Amount::new(10_000)))
        .await
        .unwrap();

    for (kind, amount) in [
        (TransactionKind::Deposit, 3_000),
        (TransactionKind::Withdrawal, 1_200),
        (TransactionKind::Withdrawal, 800),
        (TransactionKind::Deposit, 500),
    ] {
        engine
            .record_transaction(RecordTransactionCmd::new(
                fund.id,
                "alice",
                kind,
                Amount::new(amount),
            ))
            .await
            .unwrap();
    }

    let txs = engine.list_transactions(fund.id, "alice", 10).await.unwrap();
    assert_eq!(txs.len(), 4);

    let mut running = Amount::new(10_000);
    for (i, tx) in txs.iter().enumerate() {
        // Ledger positions are dense and start at 1, so ordering never
        // depends on timestamps.
        assert_eq!(tx.seq, i as i64 + 1);
        running = if tx.kind.is_credit() {
            running.checked_add(tx.amount).unwrap()
        } else {
            running.checked_sub(tx.amount).unwrap()
        };
        assert_eq!(tx.balance_after, running);
    }

    let fund = engine.fund(fund.id, "alice").await.unwrap();
    assert_eq!(fund.balance, running);
}

#[tokio::test]
async fn closed_fund_refuses_transactions() {
    let (engine, _db) = engine_with_db().await;
    let fund = engine
        .create_fund(CreateFundCmd::new("alice", "Mario", Amount::new(1_000)))
        .await
        .unwrap();

    let closed = engine.close_fund(fund.id, "alice").await.unwrap();
    assert_eq!(closed.status, FundStatus::Closed);

    let err = engine
        .record_transaction(RecordTransactionCmd::new(
            fund.id,
            "alice",
            TransactionKind::Deposit,
            Amount::new(100),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));

    // Closing twice is refused too.
    let err = engine.close_fund(fund.id, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));
}

#[tokio::test]
async fn delete_fund_removes_transactions_and_unlinks_expenses() {
    let (engine, _db) = engine_with_db().await;
    let fund = engine
        .create_fund(CreateFundCmd::new("alice", "Mario", Amount::new(10_000)))
        .await
        .unwrap();
    engine
        .record_transaction(RecordTransactionCmd::new(
            fund.id,
            "alice",
            TransactionKind::Withdrawal,
            Amount::new(1_000),
        ))
        .await
        .unwrap();
    let expense = engine
        .create_expense(
            CreateExpenseCmd::new("alice", "stamps", Amount::new(500), expense_date())
                .fund_id(fund.id),
        )
        .await
        .unwrap();

    engine.delete_fund(fund.id, "alice").await.unwrap();

    let err = engine.fund(fund.id, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    // The expense survives, unlinked.
    let expense = engine.expense(expense.id, "alice").await.unwrap();
    assert_eq!(expense.fund_id, None);
    assert_eq!(expense.status, ExpenseStatus::Pending);
}

#[tokio::test]
async fn other_users_funds_are_invisible() {
    let (engine, db) = engine_with_db().await;
    insert_user(&db, "bob").await;

    let fund = engine
        .create_fund(CreateFundCmd::new("alice", "Mario", Amount::new(1_000)))
        .await
        .unwrap();

    let err = engine.fund(fund.id, "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let funds = engine.list_funds("bob").await.unwrap();
    assert!(funds.is_empty());
}

#[tokio::test]
async fn approving_a_linked_expense_debits_the_fund() {
    let (engine, _db) = engine_with_db().await;
    let fund = engine
        .create_fund(CreateFundCmd::new("alice", "Mario", Amount::new(100_000)))
        .await
        .unwrap();
    let expense = engine
        .create_expense(
            CreateExpenseCmd::new("alice", "printer ink", Amount::new(30_000), expense_date())
                .fund_id(fund.id),
        )
        .await
        .unwrap();
    assert_eq!(expense.status, ExpenseStatus::Pending);

    let approved = engine.approve_expense(expense.id, "alice").await.unwrap();
    assert_eq!(approved.status, ExpenseStatus::Approved);
    assert_eq!(approved.approved_by.as_deref(), Some("alice"));
    assert!(approved.approved_at.is_some());

    let fund = engine.fund(fund.id, "alice").await.unwrap();
    assert_eq!(fund.balance, Amount::new(70_000));

    let txs = engine.list_transactions(fund.id, "alice", 10).await.unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].kind, TransactionKind::Expense);
    assert_eq!(txs[0].amount, Amount::new(30_000));
    assert_eq!(txs[0].balance_after, Amount::new(70_000));
    assert_eq!(txs[0].expense_id, Some(expense.id));
}

#[tokio::test]
async fn rejecting_an_approved_expense_refunds_the_fund() {
    let (engine, _db) = engine_with_db().await;
    let fund = engine
        .create_fund(CreateFundCmd::new("alice", "Mario", Amount::new(100_000)))
        .await
        .unwrap();
    let expense = engine
        .create_expense(
            CreateExpenseCmd::new("alice", "printer ink", Amount::new(30_000), expense_date())
                .fund_id(fund.id),
        )
        .await
        .unwrap();

    engine.approve_expense(expense.id, "alice").await.unwrap();
    let rejected = engine.reject_expense(expense.id, "alice").await.unwrap();
    assert_eq!(rejected.status, ExpenseStatus::Rejected);

    let fund = engine.fund(fund.id, "alice").await.unwrap();
    assert_eq!(fund.balance, Amount::new(100_000));

    let txs = engine.list_transactions(fund.id, "alice", 10).await.unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[1].kind, TransactionKind::Refund);
    assert_eq!(txs[1].balance_after, Amount::new(100_000));
}

#[tokio::test]
async fn approval_with_insufficient_funds_leaves_everything_untouched() {
    let (engine, _db) = engine_with_db().await;
    let fund = engine
        .create_fund(CreateFundCmd::new("alice", "Mario", Amount::new(10_000)))
        .await
        .unwrap();
    let expense = engine
        .create_expense(
            CreateExpenseCmd::new("alice", "new desk", Amount::new(50_000), expense_date())
                .fund_id(fund.id),
        )
        .await
        .unwrap();

    let err = engine.approve_expense(expense.id, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds { .. }));

    let expense = engine.expense(expense.id, "alice").await.unwrap();
    assert_eq!(expense.status, ExpenseStatus::Pending);
    assert_eq!(expense.approved_by, None);

    let fund = engine.fund(fund.id, "alice").await.unwrap();
    assert_eq!(fund.balance, Amount::new(10_000));
    let txs = engine.list_transactions(fund.id, "alice", 10).await.unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn double_approval_is_refused() {
    let (engine, _db) = engine_with_db().await;
    let fund = engine
        .create_fund(CreateFundCmd::new("alice", "Mario", Amount::new(100_000)))
        .await
        .unwrap();
    let expense = engine
        .create_expense(
            CreateExpenseCmd::new("alice", "printer ink", Amount::new(30_000), expense_date())
                .fund_id(fund.id),
        )
        .await
        .unwrap();

    engine.approve_expense(expense.id, "alice").await.unwrap();
    let err = engine.approve_expense(expense.id, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));

    // The fund was only debited once.
    let fund = engine.fund(fund.id, "alice").await.unwrap();
    assert_eq!(fund.balance, Amount::new(70_000));
    let txs = engine.list_transactions(fund.id, "alice", 10).await.unwrap();
    assert_eq!(txs.len(), 1);
}

#[tokio::test]
async fn unlinked_expense_never_touches_a_ledger() {
    let (engine, _db) = engine_with_db().await;

    let expense = engine
        .create_expense(CreateExpenseCmd::new(
            "alice",
            "team lunch",
            Amount::new(4_500),
            expense_date(),
        ))
        .await
        .unwrap();

    let approved = engine.approve_expense(expense.id, "alice").await.unwrap();
    assert_eq!(approved.status, ExpenseStatus::Approved);

    let rejected = engine.reject_expense(expense.id, "alice").await.unwrap();
    assert_eq!(rejected.status, ExpenseStatus::Rejected);
}

#[tokio::test]
async fn rejecting_a_rejected_expense_is_refused() {
    let (engine, _db) = engine_with_db().await;
    let expense = engine
        .create_expense(CreateExpenseCmd::new(
            "alice",
            "team lunch",
            Amount::new(4_500),
            expense_date(),
        ))
        .await
        .unwrap();

    engine.reject_expense(expense.id, "alice").await.unwrap();
    let err = engine.reject_expense(expense.id, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));
}

#[tokio::test]
async fn expenses_can_be_filtered_by_status() {
    let (engine, _db) = engine_with_db().await;

    let pending = engine
        .create_expense(CreateExpenseCmd::new(
            "alice",
            "stamps",
            Amount::new(500),
            expense_date(),
        ))
        .await
        .unwrap();
    let approved = engine
        .create_expense(CreateExpenseCmd::new(
            "alice",
            "envelopes",
            Amount::new(300),
            expense_date(),
        ))
        .await
        .unwrap();
    engine.approve_expense(approved.id, "alice").await.unwrap();

    let all = engine.list_expenses("alice", None).await.unwrap();
    assert_eq!(all.len(), 2);

    let only_pending = engine
        .list_expenses("alice", Some(ExpenseStatus::Pending))
        .await
        .unwrap();
    assert_eq!(only_pending.len(), 1);
    assert_eq!(only_pending[0].id, pending.id);
}

#[tokio::test]
async fn expense_linked_to_foreign_fund_is_rejected() {
    let (engine, db) = engine_with_db().await;
    insert_user(&db, "bob").await;

    let fund = engine
        .create_fund(CreateFundCmd::new("alice", "Mario", Amount::new(1_000)))
        .await
        .unwrap();

    let err = engine
        .create_expense(
            CreateExpenseCmd::new("bob", "stamps", Amount::new(500), expense_date())
                .fund_id(fund.id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn unknown_fund_id_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.fund(Uuid::new_v4(), "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
