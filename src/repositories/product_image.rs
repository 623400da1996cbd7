//! # Product Image Repository
//!
//! Repository for product image rows. Maintains the gallery invariants:
//! at most one primary image per product, the first upload becomes primary,
//! and deleting the primary promotes the next image by sort order.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::product_image::{
    ActiveModel as ImageActiveModel, Column, Entity as ProductImage, Model as ImageModel,
};

/// Repository for ProductImage database operations
pub struct ProductImageRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProductImageRepository<'a> {
    /// Create a new ProductImageRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// List a product's images ordered by sort order.
    pub async fn list(&self, product_id: Uuid) -> Result<Vec<ImageModel>, RepositoryError> {
        let images = ProductImage::find()
            .filter(Column::ProductId.eq(product_id))
            .order_by_asc(Column::SortOrder)
            .all(self.db)
            .await?;

        Ok(images)
    }

    /// Register a stored object as a product image. The first image of a
    /// product automatically becomes primary.
    pub async fn add(&self, product_id: Uuid, url: String) -> Result<ImageModel, RepositoryError> {
        let existing = self.list(product_id).await?;
        let next_sort_order = existing
            .iter()
            .map(|image| image.sort_order)
            .max()
            .map_or(0, |max| max + 1);

        let image = ImageActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            url: Set(url),
            is_primary: Set(existing.is_empty()),
            sort_order: Set(next_sort_order),
            created_at: Set(Utc::now().into()),
        };

        let result = image.insert(self.db).await?;

        Ok(result)
    }

    /// Make an image the product's primary, demoting the previous one.
    pub async fn set_primary(
        &self,
        product_id: Uuid,
        image_id: Uuid,
    ) -> Result<(), RepositoryError> {
        let image = self.find_owned(product_id, image_id).await?;

        let txn = self.db.begin().await?;

        ProductImage::update_many()
            .col_expr(Column::IsPrimary, sea_orm::sea_query::Expr::value(false))
            .filter(Column::ProductId.eq(product_id))
            .filter(Column::IsPrimary.eq(true))
            .exec(&txn)
            .await?;

        let mut active = image.into_active_model();
        active.is_primary = Set(true);
        active.update(&txn).await?;

        txn.commit().await?;

        Ok(())
    }

    /// Remove an image row, returning its URL so the caller can delete the
    /// stored file. If the primary image was removed the next image by sort
    /// order is promoted.
    pub async fn remove(
        &self,
        product_id: Uuid,
        image_id: Uuid,
    ) -> Result<String, RepositoryError> {
        let image = self.find_owned(product_id, image_id).await?;
        let was_primary = image.is_primary;
        let url = image.url.clone();

        image.delete(self.db).await?;

        if was_primary
            && let Some(successor) = ProductImage::find()
                .filter(Column::ProductId.eq(product_id))
                .order_by_asc(Column::SortOrder)
                .one(self.db)
                .await?
        {
            let mut active = successor.into_active_model();
            active.is_primary = Set(true);
            active.update(self.db).await?;
        }

        Ok(url)
    }

    async fn find_owned(
        &self,
        product_id: Uuid,
        image_id: Uuid,
    ) -> Result<ImageModel, RepositoryError> {
        ProductImage::find_by_id(image_id)
            .filter(Column::ProductId.eq(product_id))
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Image not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::company::CompanyRole;
    use crate::repositories::company::{CompanyRepository, RegisterCompanyRequest};
    use crate::repositories::product::{CreateProductRequest, ProductRepository};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> (DatabaseConnection, Uuid) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let supplier_id = CompanyRepository::new(&db)
            .register(RegisterCompanyRequest {
                name: "Supplier".to_string(),
                email: "s@x.co.id".to_string(),
                password: "rahasia-123".to_string(),
                role: CompanyRole::Supplier,
                phone: None,
                address: None,
                city: None,
                province: None,
            })
            .await
            .unwrap()
            .id;

        let product_id = ProductRepository::new(&db)
            .create(CreateProductRequest {
                supplier_id,
                category_id: None,
                name: "Patchouli Oil".to_string(),
                description: None,
                price_idr: 850_000,
                unit: "kg".to_string(),
                stock_qty: 10,
                min_order_qty: 1,
            })
            .await
            .unwrap()
            .id;

        (db, product_id)
    }

    #[tokio::test]
    async fn first_image_becomes_primary() {
        let (db, product_id) = setup().await;
        let repo = ProductImageRepository::new(&db);

        let first = repo
            .add(product_id, "/uploads/a.png".to_string())
            .await
            .unwrap();
        let second = repo
            .add(product_id, "/uploads/b.png".to_string())
            .await
            .unwrap();

        assert!(first.is_primary);
        assert!(!second.is_primary);
        assert!(second.sort_order > first.sort_order);
    }

    #[tokio::test]
    async fn set_primary_demotes_previous() {
        let (db, product_id) = setup().await;
        let repo = ProductImageRepository::new(&db);

        let first = repo
            .add(product_id, "/uploads/a.png".to_string())
            .await
            .unwrap();
        let second = repo
            .add(product_id, "/uploads/b.png".to_string())
            .await
            .unwrap();

        repo.set_primary(product_id, second.id).await.unwrap();

        let images = repo.list(product_id).await.unwrap();
        let primary: Vec<_> = images.iter().filter(|image| image.is_primary).collect();
        assert_eq!(primary.len(), 1);
        assert_eq!(primary[0].id, second.id);
        assert!(!images.iter().any(|i| i.id == first.id && i.is_primary));
    }

    #[tokio::test]
    async fn removing_primary_promotes_successor() {
        let (db, product_id) = setup().await;
        let repo = ProductImageRepository::new(&db);

        let first = repo
            .add(product_id, "/uploads/a.png".to_string())
            .await
            .unwrap();
        let second = repo
            .add(product_id, "/uploads/b.png".to_string())
            .await
            .unwrap();

        let url = repo.remove(product_id, first.id).await.unwrap();
        assert_eq!(url, "/uploads/a.png");

        let images = repo.list(product_id).await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id, second.id);
        assert!(images[0].is_primary);
    }

    #[tokio::test]
    async fn foreign_image_ids_are_not_found() {
        let (db, product_id) = setup().await;
        let repo = ProductImageRepository::new(&db);

        let result = repo.set_primary(product_id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));

        let result = repo.remove(product_id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
