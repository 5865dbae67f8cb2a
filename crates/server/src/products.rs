//! Product API endpoints

use api_types::product::{ProductNew, ProductStockUpdate, ProductView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn view(product: engine::Product) -> ProductView {
    ProductView {
        id: product.id,
        name: product.name,
        stock_quantity: product.stock_quantity,
        alert_threshold: product.alert_threshold,
        created_at: product.created_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ProductNew>,
) -> Result<(StatusCode, Json<ProductView>), ServerError> {
    let product = state
        .engine
        .create_product(
            &user.username,
            &payload.name,
            payload.stock_quantity,
            payload.alert_threshold,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(view(product))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<ProductView>>, ServerError> {
    let products = state.engine.list_products(&user.username).await?;
    Ok(Json(products.into_iter().map(view).collect()))
}

pub async fn set_stock(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductStockUpdate>,
) -> Result<Json<ProductView>, ServerError> {
    let product = state
        .engine
        .set_product_stock(id, &user.username, payload.stock_quantity)
        .await?;
    Ok(Json(view(product)))
}
