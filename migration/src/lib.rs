//! Database migrations for the Aromara marketplace API.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_06_01_000001_create_companies;
mod m2025_06_01_000002_create_product_categories;
mod m2025_06_01_000003_create_products;
mod m2025_06_01_000004_create_product_images;
mod m2025_06_01_000005_create_inquiries;
mod m2025_06_01_000006_create_inquiry_items;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_06_01_000001_create_companies::Migration),
            Box::new(m2025_06_01_000002_create_product_categories::Migration),
            Box::new(m2025_06_01_000003_create_products::Migration),
            Box::new(m2025_06_01_000004_create_product_images::Migration),
            Box::new(m2025_06_01_000005_create_inquiries::Migration),
            Box::new(m2025_06_01_000006_create_inquiry_items::Migration),
        ]
    }
}
