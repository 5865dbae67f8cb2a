pub use sea_orm_migration::prelude::*;

mod m20260712_000000_init;
mod m20260720_000000_catalog;
mod m20260721_000000_alerts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260712_000000_init::Migration),
            Box::new(m20260720_000000_catalog::Migration),
            Box::new(m20260721_000000_alerts::Migration),
        ]
    }
}
