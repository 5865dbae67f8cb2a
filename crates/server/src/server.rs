use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{alerts, expenses, funds, invoices, products, transactions, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Taken as Option so a missing header is our 401, not the extractor's 400.
    let Some(auth_header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/funds", post(funds::create).get(funds::list))
        .route("/funds/{id}", get(funds::get).delete(funds::remove))
        .route("/funds/{id}/close", post(funds::close))
        .route(
            "/funds/{id}/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route("/expenses", post(expenses::create).get(expenses::list))
        .route("/expenses/{id}", get(expenses::get))
        .route("/expenses/{id}/approve", post(expenses::approve))
        .route("/expenses/{id}/reject", post(expenses::reject))
        .route("/products", post(products::create).get(products::list))
        .route("/products/{id}/stock", post(products::set_stock))
        .route("/invoices", post(invoices::create).get(invoices::list))
        .route("/invoices/{id}/pay", post(invoices::mark_paid))
        .route("/alerts", get(alerts::list))
        .route("/alerts/scan/stock", post(alerts::scan_stock))
        .route("/alerts/scan/invoices", post(alerts::scan_invoices))
        .route("/alerts/{id}/read", post(alerts::mark_read))
        .route("/alerts/{id}/resolve", post(alerts::resolve))
        .route("/alerts/resolved", delete(alerts::cleanup))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
