//! Catalog seeding functionality
//!
//! Seeds the product_categories table with the base fragrance-ingredient
//! taxonomy, and optionally a demo supplier/buyer pair with products and a
//! sample inquiry for local development. Both seeds are idempotent: existing
//! rows are detected and skipped.

use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;

use crate::models::company::CompanyRole;
use crate::repositories::{
    CategoryRepository, CompanyRepository, CreateInquiryRequest, CreateProductRequest,
    InquiryItemRequest, InquiryRepository, ProductRepository, RegisterCompanyRequest, slugify,
};

/// Base category taxonomy for fragrance ingredients.
const BASE_CATEGORIES: &[&str] = &[
    "Essential Oils",
    "Absolutes",
    "Aroma Chemicals",
    "Resins & Balsams",
    "Carrier Oils",
    "Hydrosols",
];

/// Seeds the product_categories table with the base taxonomy
///
/// Each category is looked up by its derived slug and created only when
/// missing, so running the seed repeatedly is safe.
pub async fn seed_categories(db: &DatabaseConnection) -> Result<()> {
    let repo = CategoryRepository::new(db);

    for name in BASE_CATEGORIES {
        let slug = slugify(name);

        match repo.find_by_slug(&slug).await {
            Ok(Some(_)) => {
                log::info!("Category '{}' already exists, skipping", slug);
                continue;
            }
            Ok(None) => {
                log::info!("Creating category: {}", name);
                repo.create(name)
                    .await
                    .with_context(|| format!("creating category '{}'", name))?;
            }
            Err(e) => {
                log::error!("Error checking if category '{}' exists: {}", slug, e);
                return Err(e.into());
            }
        }
    }

    log::info!("Category seeding completed successfully");
    Ok(())
}

/// Seeds a demo supplier, buyer, two products, and a sample inquiry
///
/// Intended for local development only. Idempotent by the demo accounts'
/// emails: when the supplier already exists the whole seed is skipped.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<()> {
    const SUPPLIER_EMAIL: &str = "demo-supplier@aromara.test";
    const BUYER_EMAIL: &str = "demo-buyer@aromara.test";
    const DEMO_PASSWORD: &str = "aromara-demo";

    let companies = CompanyRepository::new(db);

    if companies.find_by_email(SUPPLIER_EMAIL).await?.is_some() {
        log::info!("Demo data already present, skipping");
        return Ok(());
    }

    let supplier = companies
        .register(RegisterCompanyRequest {
            name: "Nusantara Aroma".to_string(),
            email: SUPPLIER_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
            role: CompanyRole::Supplier,
            phone: Some("+62-812-0000-1111".to_string()),
            address: Some("Jl. Raya Distilasi 12".to_string()),
            city: Some("Surabaya".to_string()),
            province: Some("Jawa Timur".to_string()),
        })
        .await
        .context("creating demo supplier")?;

    let buyer = companies
        .register(RegisterCompanyRequest {
            name: "Parfum Jakarta".to_string(),
            email: BUYER_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
            role: CompanyRole::Buyer,
            phone: None,
            address: None,
            city: Some("Jakarta".to_string()),
            province: Some("DKI Jakarta".to_string()),
        })
        .await
        .context("creating demo buyer")?;

    let categories = CategoryRepository::new(db);
    let essential_oils = categories
        .find_by_slug("essential-oils")
        .await?
        .map(|category| category.id);

    let products = ProductRepository::new(db);
    let patchouli = products
        .create(CreateProductRequest {
            supplier_id: supplier.id,
            category_id: essential_oils,
            name: "Patchouli Oil (Dark)".to_string(),
            description: Some("Steam-distilled patchouli from Sulawesi.".to_string()),
            price_idr: 850_000,
            unit: "kg".to_string(),
            stock_qty: 120,
            min_order_qty: 5,
        })
        .await
        .context("creating demo product")?;

    products
        .create(CreateProductRequest {
            supplier_id: supplier.id,
            category_id: essential_oils,
            name: "Vetiver Root Oil".to_string(),
            description: Some("Java vetiver, double distilled.".to_string()),
            price_idr: 2_400_000,
            unit: "kg".to_string(),
            stock_qty: 40,
            min_order_qty: 1,
        })
        .await
        .context("creating demo product")?;

    InquiryRepository::new(db)
        .create(CreateInquiryRequest {
            buyer_id: buyer.id,
            supplier_id: supplier.id,
            message: "Looking for 10kg patchouli monthly, COA required.".to_string(),
            items: vec![InquiryItemRequest {
                product_id: patchouli.id,
                quantity: 10,
            }],
        })
        .await
        .context("creating demo inquiry")?;

    log::info!("Demo data seeding completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn seed_categories_is_idempotent() {
        let db = setup_test_db().await;

        seed_categories(&db).await.unwrap();
        seed_categories(&db).await.unwrap();

        let categories = CategoryRepository::new(&db).list().await.unwrap();
        assert_eq!(categories.len(), BASE_CATEGORIES.len());
        assert!(categories.iter().any(|c| c.slug == "essential-oils"));
        assert!(categories.iter().any(|c| c.slug == "resins-balsams"));
    }

    #[tokio::test]
    async fn demo_seed_is_idempotent() {
        let db = setup_test_db().await;

        seed_categories(&db).await.unwrap();
        seed_demo_data(&db).await.unwrap();
        seed_demo_data(&db).await.unwrap();

        let suppliers = CompanyRepository::new(&db)
            .list_suppliers(Default::default())
            .await
            .unwrap();
        assert_eq!(suppliers.len(), 1);
    }
}
