//! Product support operations for the stock alert scan.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Product, ResultEngine, products, util::normalize_required_text};

use super::{Engine, with_tx};

impl Engine {
    /// Create a product with an initial stock level and alert threshold.
    pub async fn create_product(
        &self,
        user_id: &str,
        name: &str,
        stock_quantity: i64,
        alert_threshold: i64,
    ) -> ResultEngine<Product> {
        let name = normalize_required_text(name, "product name")?;
        if stock_quantity < 0 {
            return Err(EngineError::Validation(
                "stock quantity cannot be negative".to_string(),
            ));
        }
        if alert_threshold < 0 {
            return Err(EngineError::Validation(
                "alert threshold cannot be negative".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            async {
                self.require_user_exists(&db_tx, user_id).await?;
                let product =
                    Product::new(user_id.to_string(), name, stock_quantity, alert_threshold);
                products::ActiveModel::from(&product).insert(&db_tx).await?;
                Ok(product)
            }
            .await
        })
    }

    /// List the caller's products, most recent first.
    pub async fn list_products(&self, user_id: &str) -> ResultEngine<Vec<Product>> {
        let models: Vec<products::Model> = products::Entity::find()
            .filter(products::Column::OwnerId.eq(user_id.to_string()))
            .order_by_desc(products::Column::CreatedAt)
            .all(&self.database)
            .await?;

        models.into_iter().map(Product::try_from).collect()
    }

    /// Set a product's stock level.
    pub async fn set_product_stock(
        &self,
        product_id: Uuid,
        user_id: &str,
        stock_quantity: i64,
    ) -> ResultEngine<Product> {
        if stock_quantity < 0 {
            return Err(EngineError::Validation(
                "stock quantity cannot be negative".to_string(),
            ));
        }

        let model = self
            .require_product(&self.database, product_id, user_id)
            .await?;
        let mut active: products::ActiveModel = model.into();
        active.stock_quantity = ActiveValue::Set(stock_quantity);
        Product::try_from(active.update(&self.database).await?)
    }
}
