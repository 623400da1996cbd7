//! # Product Repository
//!
//! Repository for supplier product listings: ownership-scoped CRUD for the
//! dashboard, the public browse/detail queries, the catalog snapshot used by
//! the recommendation proxy, and dashboard counts.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::company;
use crate::models::product::{
    ActiveModel as ProductActiveModel, Column, Entity as Product, Model as ProductModel,
};
use crate::models::product_category;
use crate::models::product_image;
use crate::recommend::CatalogProduct;

/// Request data for creating a product
#[derive(Debug, Clone)]
pub struct CreateProductRequest {
    pub supplier_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub price_idr: i64,
    pub unit: String,
    pub stock_qty: i32,
    pub min_order_qty: i32,
}

/// Partial update of a product's fields
#[derive(Debug, Clone, Default)]
pub struct UpdateProductRequest {
    pub category_id: Option<Option<Uuid>>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price_idr: Option<i64>,
    pub unit: Option<String>,
    pub stock_qty: Option<i32>,
    pub min_order_qty: Option<i32>,
    pub is_active: Option<bool>,
}

/// Filters for the public product browse query
#[derive(Debug, Clone, Default)]
pub struct BrowseFilter {
    pub category_slug: Option<String>,
    pub q: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub offset: u64,
    pub limit: u64,
}

/// A browse result row: the product plus display context.
#[derive(Debug, Clone)]
pub struct ProductListing {
    pub product: ProductModel,
    pub supplier_name: String,
    pub category_slug: Option<String>,
    pub primary_image_url: Option<String>,
}

/// A product detail view: all images plus a supplier summary.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub product: ProductModel,
    pub supplier: company::Model,
    pub category: Option<product_category::Model>,
    pub images: Vec<product_image::Model>,
}

/// Repository for Product database operations
pub struct ProductRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProductRepository<'a> {
    /// Create a new ProductRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new product for a supplier.
    pub async fn create(
        &self,
        request: CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        self.validate_fields(
            Some(&request.name),
            Some(request.price_idr),
            Some(&request.unit),
            Some(request.stock_qty),
            Some(request.min_order_qty),
        )?;

        if let Some(category_id) = request.category_id {
            let exists = product_category::Entity::find_by_id(category_id)
                .one(self.db)
                .await?
                .is_some();
            if !exists {
                return Err(RepositoryError::validation_error("Category does not exist"));
            }
        }

        let now = Utc::now();
        let product = ProductActiveModel {
            id: Set(Uuid::new_v4()),
            supplier_id: Set(request.supplier_id),
            category_id: Set(request.category_id),
            name: Set(request.name.trim().to_string()),
            description: Set(request.description),
            price_idr: Set(request.price_idr),
            unit: Set(request.unit.trim().to_string()),
            stock_qty: Set(request.stock_qty),
            min_order_qty: Set(request.min_order_qty),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let result = product.insert(self.db).await?;

        Ok(result)
    }

    /// Get a product scoped to its owning supplier. A product belonging to a
    /// different supplier is indistinguishable from a missing one.
    pub async fn find_owned(
        &self,
        supplier_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<ProductModel>, RepositoryError> {
        let product = Product::find_by_id(product_id)
            .filter(Column::SupplierId.eq(supplier_id))
            .one(self.db)
            .await?;

        Ok(product)
    }

    /// List all products of a supplier (including inactive), newest first.
    pub async fn list_for_supplier(
        &self,
        supplier_id: Uuid,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        let products = Product::find()
            .filter(Column::SupplierId.eq(supplier_id))
            .order_by_desc(Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(products)
    }

    /// Apply a partial update to an owned product.
    pub async fn update_owned(
        &self,
        supplier_id: Uuid,
        product_id: Uuid,
        request: UpdateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        self.validate_fields(
            request.name.as_deref(),
            request.price_idr,
            request.unit.as_deref(),
            request.stock_qty,
            request.min_order_qty,
        )?;

        if let Some(Some(category_id)) = request.category_id {
            let exists = product_category::Entity::find_by_id(category_id)
                .one(self.db)
                .await?
                .is_some();
            if !exists {
                return Err(RepositoryError::validation_error("Category does not exist"));
            }
        }

        let product = self
            .find_owned(supplier_id, product_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Product not found".to_string()))?;

        let mut active = product.into_active_model();

        if let Some(category_id) = request.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(price_idr) = request.price_idr {
            active.price_idr = Set(price_idr);
        }
        if let Some(unit) = request.unit {
            active.unit = Set(unit.trim().to_string());
        }
        if let Some(stock_qty) = request.stock_qty {
            active.stock_qty = Set(stock_qty);
        }
        if let Some(min_order_qty) = request.min_order_qty {
            active.min_order_qty = Set(min_order_qty);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        let result = active.update(self.db).await?;

        Ok(result)
    }

    /// Delete an owned product and its image rows, returning the stored
    /// image URLs so the caller can remove the files.
    pub async fn delete_owned(
        &self,
        supplier_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<String>, RepositoryError> {
        let product = self
            .find_owned(supplier_id, product_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Product not found".to_string()))?;

        let image_urls: Vec<String> = product_image::Entity::find()
            .filter(product_image::Column::ProductId.eq(product_id))
            .all(self.db)
            .await?
            .into_iter()
            .map(|image| image.url)
            .collect();

        let txn = self.db.begin().await?;

        product_image::Entity::delete_many()
            .filter(product_image::Column::ProductId.eq(product_id))
            .exec(&txn)
            .await?;

        product.delete(&txn).await?;

        txn.commit().await?;

        Ok(image_urls)
    }

    /// Browse active products with optional category/search/supplier filters.
    ///
    /// Returns up to `limit` listings starting at `offset`, plus a flag
    /// indicating whether more rows exist past this page.
    pub async fn browse(
        &self,
        filter: BrowseFilter,
    ) -> Result<(Vec<ProductListing>, bool), RepositoryError> {
        let mut query = Product::find().filter(Column::IsActive.eq(true));

        if let Some(slug) = filter
            .category_slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let Some(category) = product_category::Entity::find()
                .filter(product_category::Column::Slug.eq(slug))
                .one(self.db)
                .await?
            else {
                // Unknown category matches nothing.
                return Ok((Vec::new(), false));
            };
            query = query.filter(Column::CategoryId.eq(category.id));
        }

        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            use sea_orm::sea_query::{Expr, Func};
            let pattern = format!("%{}%", q.to_lowercase());
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((Product, Column::Name)))).like(pattern),
            );
        }

        if let Some(supplier_id) = filter.supplier_id {
            query = query.filter(Column::SupplierId.eq(supplier_id));
        }

        // Fetch one extra row to detect whether another page exists.
        let products = query
            .order_by_desc(Column::CreatedAt)
            .offset(filter.offset)
            .limit(filter.limit + 1)
            .all(self.db)
            .await?;

        let has_more = products.len() as u64 > filter.limit;
        let page: Vec<ProductModel> = products.into_iter().take(filter.limit as usize).collect();

        let listings = self.decorate(page).await?;

        Ok((listings, has_more))
    }

    /// Detail view of an active product; inactive and unknown products both
    /// come back as None.
    pub async fn detail(
        &self,
        product_id: Uuid,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let Some(product) = Product::find_by_id(product_id)
            .filter(Column::IsActive.eq(true))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let supplier = company::Entity::find_by_id(product.supplier_id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Supplier not found".to_string()))?;

        let category = match product.category_id {
            Some(category_id) => {
                product_category::Entity::find_by_id(category_id)
                    .one(self.db)
                    .await?
            }
            None => None,
        };

        let images = product_image::Entity::find()
            .filter(product_image::Column::ProductId.eq(product_id))
            .order_by_asc(product_image::Column::SortOrder)
            .all(self.db)
            .await?;

        Ok(Some(ProductDetail {
            product,
            supplier,
            category,
            images,
        }))
    }

    /// Snapshot of the active catalog for the recommendation prompt.
    pub async fn active_catalog(
        &self,
        limit: u64,
    ) -> Result<Vec<CatalogProduct>, RepositoryError> {
        let products = Product::find()
            .filter(Column::IsActive.eq(true))
            .order_by_desc(Column::CreatedAt)
            .limit(limit)
            .all(self.db)
            .await?;

        let supplier_names = self
            .supplier_names(products.iter().map(|p| p.supplier_id))
            .await?;
        let category_slugs = self
            .category_slugs(products.iter().filter_map(|p| p.category_id))
            .await?;

        let catalog = products
            .into_iter()
            .map(|product| CatalogProduct {
                id: product.id,
                name: product.name,
                category: product
                    .category_id
                    .and_then(|id| category_slugs.get(&id).cloned()),
                price_idr: product.price_idr,
                unit: product.unit,
                min_order_qty: product.min_order_qty,
                supplier_name: supplier_names
                    .get(&product.supplier_id)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();

        Ok(catalog)
    }

    /// Total and active product counts for a supplier's dashboard.
    pub async fn count_for_supplier(
        &self,
        supplier_id: Uuid,
    ) -> Result<(u64, u64), RepositoryError> {
        let total = Product::find()
            .filter(Column::SupplierId.eq(supplier_id))
            .count(self.db)
            .await?;

        let active = Product::find()
            .filter(Column::SupplierId.eq(supplier_id))
            .filter(Column::IsActive.eq(true))
            .count(self.db)
            .await?;

        Ok((total, active))
    }

    /// Attach supplier names, category slugs, and primary image URLs to a
    /// page of products.
    async fn decorate(
        &self,
        products: Vec<ProductModel>,
    ) -> Result<Vec<ProductListing>, RepositoryError> {
        let supplier_names = self
            .supplier_names(products.iter().map(|p| p.supplier_id))
            .await?;
        let category_slugs = self
            .category_slugs(products.iter().filter_map(|p| p.category_id))
            .await?;

        let product_ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
        let primary_images: HashMap<Uuid, String> = if product_ids.is_empty() {
            HashMap::new()
        } else {
            product_image::Entity::find()
                .filter(product_image::Column::ProductId.is_in(product_ids))
                .filter(product_image::Column::IsPrimary.eq(true))
                .all(self.db)
                .await?
                .into_iter()
                .map(|image| (image.product_id, image.url))
                .collect()
        };

        let listings = products
            .into_iter()
            .map(|product| ProductListing {
                supplier_name: supplier_names
                    .get(&product.supplier_id)
                    .cloned()
                    .unwrap_or_default(),
                category_slug: product
                    .category_id
                    .and_then(|id| category_slugs.get(&id).cloned()),
                primary_image_url: primary_images.get(&product.id).cloned(),
                product,
            })
            .collect();

        Ok(listings)
    }

    async fn supplier_names(
        &self,
        supplier_ids: impl Iterator<Item = Uuid>,
    ) -> Result<HashMap<Uuid, String>, RepositoryError> {
        let ids: Vec<Uuid> = supplier_ids.collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let names = company::Entity::find()
            .filter(company::Column::Id.is_in(ids))
            .all(self.db)
            .await?
            .into_iter()
            .map(|supplier| (supplier.id, supplier.name))
            .collect();

        Ok(names)
    }

    async fn category_slugs(
        &self,
        category_ids: impl Iterator<Item = Uuid>,
    ) -> Result<HashMap<Uuid, String>, RepositoryError> {
        let ids: Vec<Uuid> = category_ids.collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let slugs = product_category::Entity::find()
            .filter(product_category::Column::Id.is_in(ids))
            .all(self.db)
            .await?
            .into_iter()
            .map(|category| (category.id, category.slug))
            .collect();

        Ok(slugs)
    }

    fn validate_fields(
        &self,
        name: Option<&str>,
        price_idr: Option<i64>,
        unit: Option<&str>,
        stock_qty: Option<i32>,
        min_order_qty: Option<i32>,
    ) -> Result<(), RepositoryError> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(RepositoryError::validation_error(
                    "Product name cannot be empty",
                ));
            }
            if name.len() > 255 {
                return Err(RepositoryError::validation_error(
                    "Product name cannot exceed 255 characters",
                ));
            }
        }

        if let Some(price) = price_idr
            && price <= 0
        {
            return Err(RepositoryError::validation_error(
                "Price must be greater than zero",
            ));
        }

        if let Some(unit) = unit
            && unit.trim().is_empty()
        {
            return Err(RepositoryError::validation_error("Unit cannot be empty"));
        }

        if let Some(stock) = stock_qty
            && stock < 0
        {
            return Err(RepositoryError::validation_error(
                "Stock cannot be negative",
            ));
        }

        if let Some(moq) = min_order_qty
            && moq < 1
        {
            return Err(RepositoryError::validation_error(
                "Minimum order quantity must be at least 1",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::company::CompanyRole;
    use crate::repositories::company::{CompanyRepository, RegisterCompanyRequest};
    use crate::repositories::product_category::CategoryRepository;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn create_supplier(db: &DatabaseConnection, email: &str) -> Uuid {
        let repo = CompanyRepository::new(db);
        repo.register(RegisterCompanyRequest {
            name: format!("Supplier {email}"),
            email: email.to_string(),
            password: "rahasia-123".to_string(),
            role: CompanyRole::Supplier,
            phone: None,
            address: None,
            city: None,
            province: None,
        })
        .await
        .unwrap()
        .id
    }

    fn product_request(supplier_id: Uuid, name: &str) -> CreateProductRequest {
        CreateProductRequest {
            supplier_id,
            category_id: None,
            name: name.to_string(),
            description: None,
            price_idr: 850_000,
            unit: "kg".to_string(),
            stock_qty: 40,
            min_order_qty: 5,
        }
    }

    #[tokio::test]
    async fn create_validates_fields() {
        let db = setup_test_db().await;
        let supplier_id = create_supplier(&db, "s@x.co.id").await;
        let repo = ProductRepository::new(&db);

        let mut zero_price = product_request(supplier_id, "Patchouli Oil");
        zero_price.price_idr = 0;
        assert!(matches!(
            repo.create(zero_price).await,
            Err(RepositoryError::Validation(_))
        ));

        let mut zero_moq = product_request(supplier_id, "Patchouli Oil");
        zero_moq.min_order_qty = 0;
        assert!(matches!(
            repo.create(zero_moq).await,
            Err(RepositoryError::Validation(_))
        ));

        let mut unknown_category = product_request(supplier_id, "Patchouli Oil");
        unknown_category.category_id = Some(Uuid::new_v4());
        assert!(matches!(
            repo.create(unknown_category).await,
            Err(RepositoryError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn ownership_scoping_hides_foreign_products() {
        let db = setup_test_db().await;
        let supplier_a = create_supplier(&db, "a@x.co.id").await;
        let supplier_b = create_supplier(&db, "b@x.co.id").await;
        let repo = ProductRepository::new(&db);

        let product = repo
            .create(product_request(supplier_a, "Vetiver Oil"))
            .await
            .unwrap();

        assert!(repo
            .find_owned(supplier_a, product.id)
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .find_owned(supplier_b, product.id)
            .await
            .unwrap()
            .is_none());

        let foreign_update = repo
            .update_owned(
                supplier_b,
                product.id,
                UpdateProductRequest {
                    price_idr: Some(1),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(foreign_update, Err(RepositoryError::NotFound(_))));

        let foreign_delete = repo.delete_owned(supplier_b, product.id).await;
        assert!(matches!(foreign_delete, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn browse_filters_and_pagination() {
        let db = setup_test_db().await;
        let supplier_id = create_supplier(&db, "s@x.co.id").await;
        let category_repo = CategoryRepository::new(&db);
        let category = category_repo.create("Essential Oils").await.unwrap();
        let repo = ProductRepository::new(&db);

        let mut in_category = product_request(supplier_id, "Patchouli Oil (Dark)");
        in_category.category_id = Some(category.id);
        repo.create(in_category).await.unwrap();

        repo.create(product_request(supplier_id, "Vetiver Root Oil"))
            .await
            .unwrap();

        let hidden = repo
            .create(product_request(supplier_id, "Discontinued Oil"))
            .await
            .unwrap();
        repo.update_owned(
            supplier_id,
            hidden.id,
            UpdateProductRequest {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // Inactive products never show up in browse
        let (all, has_more) = repo
            .browse(BrowseFilter {
                limit: 20,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert!(!has_more);

        // Case-insensitive name search
        let (matched, _) = repo
            .browse(BrowseFilter {
                q: Some("patchouli".to_string()),
                limit: 20,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].product.name, "Patchouli Oil (Dark)");
        assert_eq!(matched[0].category_slug.as_deref(), Some("essential-oils"));
        assert!(!matched[0].supplier_name.is_empty());

        // Category filter
        let (in_cat, _) = repo
            .browse(BrowseFilter {
                category_slug: Some("essential-oils".to_string()),
                limit: 20,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(in_cat.len(), 1);

        // Unknown category matches nothing
        let (none, _) = repo
            .browse(BrowseFilter {
                category_slug: Some("no-such-category".to_string()),
                limit: 20,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());

        // Pagination: page size one leaves more rows
        let (page, has_more) = repo
            .browse(BrowseFilter {
                limit: 1,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert!(has_more);
    }

    #[tokio::test]
    async fn detail_hides_inactive_products() {
        let db = setup_test_db().await;
        let supplier_id = create_supplier(&db, "s@x.co.id").await;
        let repo = ProductRepository::new(&db);

        let product = repo
            .create(product_request(supplier_id, "Nutmeg Oil"))
            .await
            .unwrap();

        let detail = repo.detail(product.id).await.unwrap().unwrap();
        assert_eq!(detail.product.id, product.id);
        assert!(detail.images.is_empty());

        repo.update_owned(
            supplier_id,
            product.id,
            UpdateProductRequest {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(repo.detail(product.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn catalog_snapshot_and_counts() {
        let db = setup_test_db().await;
        let supplier_id = create_supplier(&db, "s@x.co.id").await;
        let repo = ProductRepository::new(&db);

        repo.create(product_request(supplier_id, "Clove Bud Oil"))
            .await
            .unwrap();
        let inactive = repo
            .create(product_request(supplier_id, "Old Stock"))
            .await
            .unwrap();
        repo.update_owned(
            supplier_id,
            inactive.id,
            UpdateProductRequest {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let catalog = repo.active_catalog(50).await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "Clove Bud Oil");
        assert!(!catalog[0].supplier_name.is_empty());

        let (total, active) = repo.count_for_supplier(supplier_id).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(active, 1);
    }
}
