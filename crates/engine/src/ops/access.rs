//! Owner-scoped lookups.
//!
//! Every helper returns [`EngineError::NotFound`] both when the row is absent
//! and when it belongs to another owner, so callers cannot tell the two cases
//! apart.

use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, alerts, expenses, funds, invoices, products, users};

use super::Engine;

/// Generates a `require_*` lookup scoped by owner for a target entity.
macro_rules! impl_require_owned {
    ($fn_name:ident, $module:ident, $err_msg:literal) => {
        pub(super) async fn $fn_name(
            &self,
            db: &impl ConnectionTrait,
            id: Uuid,
            user_id: &str,
        ) -> ResultEngine<$module::Model> {
            $module::Entity::find_by_id(id.to_string())
                .filter($module::Column::OwnerId.eq(user_id.to_string()))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::NotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_require_owned!(require_fund, funds, "fund not exists");
    impl_require_owned!(require_expense, expenses, "expense not exists");
    impl_require_owned!(require_alert, alerts, "alert not exists");
    impl_require_owned!(require_product, products, "product not exists");
    impl_require_owned!(require_invoice, invoices, "invoice not exists");

    pub(super) async fn require_user_exists(
        &self,
        db: &impl ConnectionTrait,
        username: &str,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::NotFound("user not exists".to_string()));
        }
        Ok(())
    }
}
