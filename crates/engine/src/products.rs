//! Products table (minimal entity).
//!
//! The ledger core only needs products for the low-stock alert scan; the
//! wider catalog surface lives outside this crate.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub stock_quantity: i64,
    pub alert_threshold: i64,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub(crate) fn new(
        owner_id: String,
        name: String,
        stock_quantity: i64,
        alert_threshold: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            stock_quantity,
            alert_threshold,
            owner_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub stock_quantity: i64,
    pub alert_threshold: i64,
    pub owner_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Product> for ActiveModel {
    fn from(product: &Product) -> Self {
        Self {
            id: ActiveValue::Set(product.id.to_string()),
            name: ActiveValue::Set(product.name.clone()),
            stock_quantity: ActiveValue::Set(product.stock_quantity),
            alert_threshold: ActiveValue::Set(product.alert_threshold),
            owner_id: ActiveValue::Set(product.owner_id.clone()),
            created_at: ActiveValue::Set(product.created_at),
        }
    }
}

impl TryFrom<Model> for Product {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_id(&model.id, "product not exists")?,
            name: model.name,
            stock_quantity: model.stock_quantity,
            alert_threshold: model.alert_threshold,
            owner_id: model.owner_id,
            created_at: model.created_at,
        })
    }
}
