use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{AlertKind, AlertSeverity, Amount, Engine};
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

#[tokio::test]
async fn stock_scan_flags_products_at_or_below_threshold() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_product("alice", "Paper", 50, 10)
        .await
        .unwrap();
    let low = engine
        .create_product("alice", "Toner", 3, 10)
        .await
        .unwrap();
    let out = engine
        .create_product("alice", "Staples", 0, 5)
        .await
        .unwrap();

    let generated = engine.generate_stock_alerts("alice").await.unwrap();
    assert_eq!(generated.len(), 2);

    let alerts = engine.list_alerts("alice", false).await.unwrap();
    assert_eq!(alerts.len(), 2);

    let toner = alerts
        .iter()
        .find(|a| a.entity_id.as_deref() == Some(low.id.to_string().as_str()))
        .unwrap();
    assert_eq!(toner.kind, AlertKind::LowStock);
    assert_eq!(toner.severity, AlertSeverity::High);

    let staples = alerts
        .iter()
        .find(|a| a.entity_id.as_deref() == Some(out.id.to_string().as_str()))
        .unwrap();
    assert_eq!(staples.severity, AlertSeverity::Critical);
}

#[tokio::test]
async fn stock_scan_does_not_accumulate_duplicates() {
    let (engine, _db) = engine_with_db().await;

    engine.create_product("alice", "Toner", 3, 10).await.unwrap();
    engine.create_product("alice", "Staples", 0, 5).await.unwrap();

    engine.generate_stock_alerts("alice").await.unwrap();
    engine.generate_stock_alerts("alice").await.unwrap();

    let unresolved = engine.list_alerts("alice", false).await.unwrap();
    assert_eq!(unresolved.len(), 2);

    // The earlier generation was resolved, not deleted.
    let all = engine.list_alerts("alice", true).await.unwrap();
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn stock_scan_refreshes_severity() {
    let (engine, _db) = engine_with_db().await;

    let product = engine.create_product("alice", "Toner", 3, 10).await.unwrap();
    engine.generate_stock_alerts("alice").await.unwrap();

    engine
        .set_product_stock(product.id, "alice", 0)
        .await
        .unwrap();
    engine.generate_stock_alerts("alice").await.unwrap();

    let unresolved = engine.list_alerts("alice", false).await.unwrap();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].severity, AlertSeverity::Critical);
}

#[tokio::test]
async fn restocked_product_is_not_flagged() {
    let (engine, _db) = engine_with_db().await;

    let product = engine.create_product("alice", "Toner", 3, 10).await.unwrap();
    engine
        .set_product_stock(product.id, "alice", 50)
        .await
        .unwrap();

    let generated = engine.generate_stock_alerts("alice").await.unwrap();
    assert!(generated.is_empty());
}

#[tokio::test]
async fn invoice_scan_flags_overdue_unpaid_invoices() {
    let (engine, _db) = engine_with_db().await;
    let today = Utc::now().date_naive();

    engine
        .create_invoice("alice", "Acme", Amount::new(120_000), today + Duration::days(10))
        .await
        .unwrap();
    let overdue = engine
        .create_invoice("alice", "Bravo", Amount::new(80_000), today - Duration::days(40))
        .await
        .unwrap();

    let generated = engine.generate_overdue_invoice_alerts("alice").await.unwrap();
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].kind, AlertKind::OverdueInvoice);
    assert_eq!(generated[0].severity, AlertSeverity::Critical);
    assert_eq!(
        generated[0].entity_id.as_deref(),
        Some(overdue.id.to_string().as_str())
    );
}

#[tokio::test]
async fn invoice_scan_skips_already_flagged_invoices() {
    let (engine, _db) = engine_with_db().await;
    let today = Utc::now().date_naive();

    engine
        .create_invoice("alice", "Bravo", Amount::new(80_000), today - Duration::days(5))
        .await
        .unwrap();

    let first = engine.generate_overdue_invoice_alerts("alice").await.unwrap();
    assert_eq!(first.len(), 1);

    let second = engine.generate_overdue_invoice_alerts("alice").await.unwrap();
    assert!(second.is_empty());

    let alerts = engine.list_alerts("alice", true).await.unwrap();
    assert_eq!(alerts.len(), 1);
}

#[tokio::test]
async fn paid_invoice_is_not_flagged() {
    let (engine, _db) = engine_with_db().await;
    let today = Utc::now().date_naive();

    let invoice = engine
        .create_invoice("alice", "Bravo", Amount::new(80_000), today - Duration::days(5))
        .await
        .unwrap();
    engine.mark_invoice_paid(invoice.id, "alice").await.unwrap();

    let generated = engine.generate_overdue_invoice_alerts("alice").await.unwrap();
    assert!(generated.is_empty());
}

#[tokio::test]
async fn resolved_invoice_alert_can_reappear_on_next_scan() {
    let (engine, _db) = engine_with_db().await;
    let today = Utc::now().date_naive();

    engine
        .create_invoice("alice", "Bravo", Amount::new(80_000), today - Duration::days(5))
        .await
        .unwrap();

    let first = engine.generate_overdue_invoice_alerts("alice").await.unwrap();
    engine.resolve_alert(first[0].id, "alice").await.unwrap();

    let second = engine.generate_overdue_invoice_alerts("alice").await.unwrap();
    assert_eq!(second.len(), 1);
}

#[tokio::test]
async fn read_and_resolve_flags_are_independent() {
    let (engine, _db) = engine_with_db().await;

    engine.create_product("alice", "Toner", 0, 5).await.unwrap();
    let generated = engine.generate_stock_alerts("alice").await.unwrap();
    let alert_id = generated[0].id;

    let read = engine.mark_alert_read(alert_id, "alice").await.unwrap();
    assert!(read.is_read);
    assert!(!read.is_resolved);

    let resolved = engine.resolve_alert(alert_id, "alice").await.unwrap();
    assert!(resolved.is_resolved);

    let unresolved = engine.list_alerts("alice", false).await.unwrap();
    assert!(unresolved.is_empty());
}

#[tokio::test]
async fn cleanup_deletes_only_resolved_alerts() {
    let (engine, _db) = engine_with_db().await;

    engine.create_product("alice", "Toner", 0, 5).await.unwrap();
    engine.create_product("alice", "Paper", 1, 10).await.unwrap();
    let generated = engine.generate_stock_alerts("alice").await.unwrap();
    assert_eq!(generated.len(), 2);

    engine.resolve_alert(generated[0].id, "alice").await.unwrap();

    let deleted = engine.cleanup_resolved_alerts("alice", 0).await.unwrap();
    assert_eq!(deleted, 1);

    let all = engine.list_alerts("alice", true).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, generated[1].id);
}
