//! # Product Category Repository
//!
//! Repository for the category taxonomy: slug derivation, CRUD, and the
//! detach-on-delete behavior that keeps products alive when their category
//! goes away.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::product;
use crate::models::product_category::{
    ActiveModel as CategoryActiveModel, Column, Entity as ProductCategory, Model as CategoryModel,
};

/// Derive a URL-safe slug from a category name: lowercase, runs of
/// non-alphanumerics collapsed to single hyphens, no leading/trailing hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;

    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// Repository for ProductCategory database operations
pub struct CategoryRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new CategoryRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// List all categories ordered by name
    pub async fn list(&self) -> Result<Vec<CategoryModel>, RepositoryError> {
        let categories = ProductCategory::find()
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        Ok(categories)
    }

    /// Get a category by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryModel>, RepositoryError> {
        let category = ProductCategory::find_by_id(id).one(self.db).await?;

        Ok(category)
    }

    /// Get a category by slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryModel>, RepositoryError> {
        let category = ProductCategory::find()
            .filter(Column::Slug.eq(slug))
            .one(self.db)
            .await?;

        Ok(category)
    }

    /// Create a new category. The slug is derived from the name; a clash
    /// with an existing slug is a conflict.
    pub async fn create(&self, name: &str) -> Result<CategoryModel, RepositoryError> {
        let slug = self.validate_and_slug(name)?;

        if self.find_by_slug(&slug).await?.is_some() {
            return Err(RepositoryError::Conflict(format!(
                "Category '{}' already exists",
                slug
            )));
        }

        let category = CategoryActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.trim().to_string()),
            slug: Set(slug),
            created_at: Set(Utc::now().into()),
        };

        let result = category.insert(self.db).await?;

        Ok(result)
    }

    /// Rename a category, re-deriving its slug.
    pub async fn rename(&self, id: Uuid, name: &str) -> Result<CategoryModel, RepositoryError> {
        let slug = self.validate_and_slug(name)?;

        let category = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Category not found".to_string()))?;

        if let Some(existing) = self.find_by_slug(&slug).await?
            && existing.id != id
        {
            return Err(RepositoryError::Conflict(format!(
                "Category '{}' already exists",
                slug
            )));
        }

        let mut active = category.into_active_model();
        active.name = Set(name.trim().to_string());
        active.slug = Set(slug);

        let result = active.update(self.db).await?;

        Ok(result)
    }

    /// Delete a category, detaching its products rather than removing them.
    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let category = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Category not found".to_string()))?;

        let txn = self.db.begin().await?;

        // Detach explicitly so the behavior does not depend on the backend
        // honoring ON DELETE SET NULL.
        product::Entity::update_many()
            .col_expr(product::Column::CategoryId, sea_orm::sea_query::Expr::value(Option::<Uuid>::None))
            .filter(product::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;

        category.delete(&txn).await?;

        txn.commit().await?;

        Ok(())
    }

    fn validate_and_slug(&self, name: &str) -> Result<String, RepositoryError> {
        if name.trim().is_empty() {
            return Err(RepositoryError::validation_error(
                "Category name cannot be empty",
            ));
        }

        if name.len() > 120 {
            return Err(RepositoryError::validation_error(
                "Category name cannot exceed 120 characters",
            ));
        }

        let slug = slugify(name);
        if slug.is_empty() {
            return Err(RepositoryError::validation_error(
                "Category name must contain at least one letter or digit",
            ));
        }

        Ok(slug)
    }
}
