//! # Inquiry Repository
//!
//! Repository for buyer RFQs: transactional creation with line-item
//! validation, visibility scoped to the two parties, and the status
//! lifecycle driven by supplier- and buyer-side transitions.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::inquiry::{
    ActiveModel as InquiryActiveModel, Column, Entity as Inquiry, InquiryStatus,
    Model as InquiryModel,
};
use crate::models::inquiry_item::{
    ActiveModel as ItemActiveModel, Column as ItemColumn, Entity as InquiryItem,
    Model as ItemModel,
};
use crate::models::product;

/// A requested line item in a new inquiry
#[derive(Debug, Clone)]
pub struct InquiryItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Request data for submitting a new inquiry
#[derive(Debug, Clone)]
pub struct CreateInquiryRequest {
    pub buyer_id: Uuid,
    pub supplier_id: Uuid,
    pub message: String,
    pub items: Vec<InquiryItemRequest>,
}

/// Supplier-side status transitions
#[derive(Debug, Clone)]
pub enum SupplierAction {
    Quote {
        price_idr: i64,
        notes: Option<String>,
    },
    Reject,
}

/// Buyer-side status transitions
#[derive(Debug, Clone, Copy)]
pub enum BuyerAction {
    Accept,
    Reject,
}

/// A line item joined with its product's display name
#[derive(Debug, Clone)]
pub struct ItemWithProduct {
    pub item: ItemModel,
    pub product_name: String,
}

/// Per-status inquiry counts for the supplier dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InquiryCounts {
    pub pending: u64,
    pub quoted: u64,
    pub accepted: u64,
    pub rejected: u64,
}

impl InquiryCounts {
    pub fn total(&self) -> u64 {
        self.pending + self.quoted + self.accepted + self.rejected
    }
}

/// Repository for Inquiry database operations
pub struct InquiryRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> InquiryRepository<'a> {
    /// Create a new InquiryRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Submit a new inquiry with its line items in one transaction.
    ///
    /// Every referenced product must be active, belong to the addressed
    /// supplier, and be requested at or above its minimum order quantity.
    pub async fn create(
        &self,
        request: CreateInquiryRequest,
    ) -> Result<(InquiryModel, Vec<ItemModel>), RepositoryError> {
        if request.message.trim().is_empty() {
            return Err(RepositoryError::validation_error("Message is required"));
        }

        if request.items.is_empty() {
            return Err(RepositoryError::validation_error(
                "At least one item is required",
            ));
        }

        for item in &request.items {
            if item.quantity < 1 {
                return Err(RepositoryError::validation_error(
                    "Quantity must be at least 1",
                ));
            }

            let product = product::Entity::find_by_id(item.product_id)
                .filter(product::Column::SupplierId.eq(request.supplier_id))
                .filter(product::Column::IsActive.eq(true))
                .one(self.db)
                .await?
                .ok_or_else(|| {
                    RepositoryError::validation_error(
                        "Item references a product not offered by this supplier",
                    )
                })?;

            if item.quantity < product.min_order_qty {
                return Err(RepositoryError::Validation(format!(
                    "Quantity for '{}' is below the minimum order of {} {}",
                    product.name, product.min_order_qty, product.unit
                )));
            }
        }

        let now = Utc::now();
        let inquiry_id = Uuid::new_v4();

        let txn = self.db.begin().await?;

        let inquiry = InquiryActiveModel {
            id: Set(inquiry_id),
            buyer_id: Set(request.buyer_id),
            supplier_id: Set(request.supplier_id),
            message: Set(request.message.trim().to_string()),
            status: Set(InquiryStatus::Pending.as_str().to_string()),
            quoted_price_idr: Set(None),
            quote_notes: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(request.items.len());
        for item in request.items {
            let inserted = ItemActiveModel {
                id: Set(Uuid::new_v4()),
                inquiry_id: Set(inquiry_id),
                product_id: Set(item.product_id),
                quantity: Set(item.quantity),
                created_at: Set(now.into()),
            }
            .insert(&txn)
            .await?;
            items.push(inserted);
        }

        txn.commit().await?;

        Ok((inquiry, items))
    }

    /// List a buyer's inquiries, newest first, optionally by status.
    pub async fn list_for_buyer(
        &self,
        buyer_id: Uuid,
        status: Option<InquiryStatus>,
    ) -> Result<Vec<InquiryModel>, RepositoryError> {
        let mut query = Inquiry::find()
            .filter(Column::BuyerId.eq(buyer_id))
            .order_by_desc(Column::CreatedAt);

        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }

        let inquiries = query.all(self.db).await?;

        Ok(inquiries)
    }

    /// List inquiries addressed to a supplier, newest first, optionally by status.
    pub async fn list_for_supplier(
        &self,
        supplier_id: Uuid,
        status: Option<InquiryStatus>,
    ) -> Result<Vec<InquiryModel>, RepositoryError> {
        let mut query = Inquiry::find()
            .filter(Column::SupplierId.eq(supplier_id))
            .order_by_desc(Column::CreatedAt);

        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }

        let inquiries = query.all(self.db).await?;

        Ok(inquiries)
    }

    /// Fetch an inquiry visible to the given viewer (its buyer or supplier),
    /// with line items joined to product names. Inquiries of other parties
    /// are indistinguishable from missing ones.
    pub async fn find_visible(
        &self,
        inquiry_id: Uuid,
        viewer_id: Uuid,
    ) -> Result<Option<(InquiryModel, Vec<ItemWithProduct>)>, RepositoryError> {
        let Some(inquiry) = Inquiry::find_by_id(inquiry_id).one(self.db).await? else {
            return Ok(None);
        };

        if inquiry.buyer_id != viewer_id && inquiry.supplier_id != viewer_id {
            return Ok(None);
        }

        let items = self.items_with_products(inquiry_id).await?;

        Ok(Some((inquiry, items)))
    }

    /// Apply a supplier-side transition: quote or reject.
    pub async fn supplier_transition(
        &self,
        supplier_id: Uuid,
        inquiry_id: Uuid,
        action: SupplierAction,
    ) -> Result<InquiryModel, RepositoryError> {
        let inquiry = Inquiry::find_by_id(inquiry_id)
            .filter(Column::SupplierId.eq(supplier_id))
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Inquiry not found".to_string()))?;

        let current = Self::parse_status(&inquiry)?;

        let (next, quoted_price, notes) = match action {
            SupplierAction::Quote { price_idr, notes } => {
                if price_idr <= 0 {
                    return Err(RepositoryError::validation_error(
                        "Quoted price must be greater than zero",
                    ));
                }
                (InquiryStatus::Quoted, Some(price_idr), notes)
            }
            SupplierAction::Reject => (InquiryStatus::Rejected, None, None),
        };

        if !current.can_transition_to(next) {
            return Err(RepositoryError::Conflict(format!(
                "Cannot move inquiry from {} to {}",
                current, next
            )));
        }

        let mut active = inquiry.into_active_model();
        active.status = Set(next.as_str().to_string());
        if let Some(price) = quoted_price {
            active.quoted_price_idr = Set(Some(price));
            active.quote_notes = Set(notes);
        }
        active.updated_at = Set(Utc::now().into());

        let result = active.update(self.db).await?;

        Ok(result)
    }

    /// Apply a buyer-side transition: accept or reject a quote.
    pub async fn buyer_transition(
        &self,
        buyer_id: Uuid,
        inquiry_id: Uuid,
        action: BuyerAction,
    ) -> Result<InquiryModel, RepositoryError> {
        let inquiry = Inquiry::find_by_id(inquiry_id)
            .filter(Column::BuyerId.eq(buyer_id))
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Inquiry not found".to_string()))?;

        let current = Self::parse_status(&inquiry)?;
        let next = match action {
            BuyerAction::Accept => InquiryStatus::Accepted,
            BuyerAction::Reject => InquiryStatus::Rejected,
        };

        // Buyers only act on quotes; a pending reject is the supplier's move.
        if current != InquiryStatus::Quoted || !current.can_transition_to(next) {
            return Err(RepositoryError::Conflict(format!(
                "Cannot move inquiry from {} to {}",
                current, next
            )));
        }

        let mut active = inquiry.into_active_model();
        active.status = Set(next.as_str().to_string());
        active.updated_at = Set(Utc::now().into());

        let result = active.update(self.db).await?;

        Ok(result)
    }

    /// Per-status inquiry counts for a supplier's dashboard.
    pub async fn counts_for_supplier(
        &self,
        supplier_id: Uuid,
    ) -> Result<InquiryCounts, RepositoryError> {
        let count_of = |status: InquiryStatus| {
            Inquiry::find()
                .filter(Column::SupplierId.eq(supplier_id))
                .filter(Column::Status.eq(status.as_str()))
                .count(self.db)
        };

        Ok(InquiryCounts {
            pending: count_of(InquiryStatus::Pending).await?,
            quoted: count_of(InquiryStatus::Quoted).await?,
            accepted: count_of(InquiryStatus::Accepted).await?,
            rejected: count_of(InquiryStatus::Rejected).await?,
        })
    }

    async fn items_with_products(
        &self,
        inquiry_id: Uuid,
    ) -> Result<Vec<ItemWithProduct>, RepositoryError> {
        let items = InquiryItem::find()
            .filter(ItemColumn::InquiryId.eq(inquiry_id))
            .order_by_asc(ItemColumn::CreatedAt)
            .all(self.db)
            .await?;

        let product_ids: Vec<Uuid> = items.iter().map(|item| item.product_id).collect();
        let products: std::collections::HashMap<Uuid, String> = if product_ids.is_empty() {
            Default::default()
        } else {
            product::Entity::find()
                .filter(product::Column::Id.is_in(product_ids))
                .all(self.db)
                .await?
                .into_iter()
                .map(|product| (product.id, product.name))
                .collect()
        };

        Ok(items
            .into_iter()
            .map(|item| ItemWithProduct {
                product_name: products.get(&item.product_id).cloned().unwrap_or_default(),
                item,
            })
            .collect())
    }

    fn parse_status(inquiry: &InquiryModel) -> Result<InquiryStatus, RepositoryError> {
        InquiryStatus::parse(&inquiry.status).ok_or_else(|| {
            RepositoryError::Database(sea_orm::DbErr::Custom(format!(
                "inquiry {} has unknown status '{}'",
                inquiry.id, inquiry.status
            )))
        })
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

    struct Fixture {
        db: DatabaseConnection,
        buyer_id: Uuid,
        supplier_id: Uuid,
        product_id: Uuid,
    }

    async fn setup() -> Fixture {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let companies = CompanyRepository::new(&db);
        let supplier_id = companies
            .register(RegisterCompanyRequest {
                name: "Nusantara Aroma".to_string(),
                email: "supplier@x.co.id".to_string(),
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
        let buyer_id = companies
            .register(RegisterCompanyRequest {
                name: "Parfum Jakarta".to_string(),
                email: "buyer@x.co.id".to_string(),
                password: "rahasia-123".to_string(),
                role: CompanyRole::Buyer,
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
                stock_qty: 100,
                min_order_qty: 5,
            })
            .await
            .unwrap()
            .id;

        Fixture {
            db,
            buyer_id,
            supplier_id,
            product_id,
        }
    }

    fn request(fixture: &Fixture, message: &str, quantity: i32) -> CreateInquiryRequest {
        CreateInquiryRequest {
            buyer_id: fixture.buyer_id,
            supplier_id: fixture.supplier_id,
            message: message.to_string(),
            items: vec![InquiryItemRequest {
                product_id: fixture.product_id,
                quantity,
            }],
        }
    }

    #[tokio::test]
    async fn create_requires_message_and_items() {
        let fixture = setup().await;
        let repo = InquiryRepository::new(&fixture.db);

        let blank = repo.create(request(&fixture, "   ", 5)).await;
        assert!(matches!(blank, Err(RepositoryError::Validation(_))));

        let empty_items = repo
            .create(CreateInquiryRequest {
                items: Vec::new(),
                ..request(&fixture, "Need patchouli", 5)
            })
            .await;
        assert!(matches!(empty_items, Err(RepositoryError::Validation(_))));

        // Nothing was persisted by the failed attempts
        let inquiries = repo.list_for_buyer(fixture.buyer_id, None).await.unwrap();
        assert!(inquiries.is_empty());
    }

    #[tokio::test]
    async fn create_enforces_moq_and_supplier_ownership() {
        let fixture = setup().await;
        let repo = InquiryRepository::new(&fixture.db);

        let below_moq = repo.create(request(&fixture, "Need patchouli", 2)).await;
        assert!(matches!(below_moq, Err(RepositoryError::Validation(_))));

        let foreign_product = repo
            .create(CreateInquiryRequest {
                items: vec![InquiryItemRequest {
                    product_id: Uuid::new_v4(),
                    quantity: 5,
                }],
                ..request(&fixture, "Need patchouli", 5)
            })
            .await;
        assert!(matches!(
            foreign_product,
            Err(RepositoryError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn full_lifecycle_pending_quoted_accepted() {
        let fixture = setup().await;
        let repo = InquiryRepository::new(&fixture.db);

        let (inquiry, items) = repo
            .create(request(&fixture, "Need 10kg for Q3 production", 10))
            .await
            .unwrap();
        assert_eq!(inquiry.status, "pending");
        assert_eq!(items.len(), 1);

        let quoted = repo
            .supplier_transition(
                fixture.supplier_id,
                inquiry.id,
                SupplierAction::Quote {
                    price_idr: 8_200_000,
                    notes: Some("Includes COA".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(quoted.status, "quoted");
        assert_eq!(quoted.quoted_price_idr, Some(8_200_000));

        let accepted = repo
            .buyer_transition(fixture.buyer_id, inquiry.id, BuyerAction::Accept)
            .await
            .unwrap();
        assert_eq!(accepted.status, "accepted");

        // Terminal: no further transitions
        let too_late = repo
            .supplier_transition(fixture.supplier_id, inquiry.id, SupplierAction::Reject)
            .await;
        assert!(matches!(too_late, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn illegal_transitions_conflict() {
        let fixture = setup().await;
        let repo = InquiryRepository::new(&fixture.db);

        let (inquiry, _) = repo
            .create(request(&fixture, "Need patchouli", 5))
            .await
            .unwrap();

        // Buyer cannot accept a pending inquiry
        let premature = repo
            .buyer_transition(fixture.buyer_id, inquiry.id, BuyerAction::Accept)
            .await;
        assert!(matches!(premature, Err(RepositoryError::Conflict(_))));

        // Quote with non-positive price is invalid
        let zero_quote = repo
            .supplier_transition(
                fixture.supplier_id,
                inquiry.id,
                SupplierAction::Quote {
                    price_idr: 0,
                    notes: None,
                },
            )
            .await;
        assert!(matches!(zero_quote, Err(RepositoryError::Validation(_))));

        // Supplier may reject a pending inquiry outright
        let rejected = repo
            .supplier_transition(fixture.supplier_id, inquiry.id, SupplierAction::Reject)
            .await
            .unwrap();
        assert_eq!(rejected.status, "rejected");
    }

    #[tokio::test]
    async fn visibility_is_limited_to_the_two_parties() {
        let fixture = setup().await;
        let repo = InquiryRepository::new(&fixture.db);

        let (inquiry, _) = repo
            .create(request(&fixture, "Need patchouli", 5))
            .await
            .unwrap();

        let as_buyer = repo
            .find_visible(inquiry.id, fixture.buyer_id)
            .await
            .unwrap();
        assert!(as_buyer.is_some());
        let (_, items) = as_buyer.unwrap();
        assert_eq!(items[0].product_name, "Patchouli Oil");

        let as_supplier = repo
            .find_visible(inquiry.id, fixture.supplier_id)
            .await
            .unwrap();
        assert!(as_supplier.is_some());

        let as_stranger = repo
            .find_visible(inquiry.id, Uuid::new_v4())
            .await
            .unwrap();
        assert!(as_stranger.is_none());
    }

    #[tokio::test]
    async fn status_filters_and_counts() {
        let fixture = setup().await;
        let repo = InquiryRepository::new(&fixture.db);

        let (first, _) = repo
            .create(request(&fixture, "First inquiry", 5))
            .await
            .unwrap();
        repo.create(request(&fixture, "Second inquiry", 6))
            .await
            .unwrap();

        repo.supplier_transition(
            fixture.supplier_id,
            first.id,
            SupplierAction::Quote {
                price_idr: 1_000_000,
                notes: None,
            },
        )
        .await
        .unwrap();

        let pending = repo
            .list_for_supplier(fixture.supplier_id, Some(InquiryStatus::Pending))
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);

        let counts = repo.counts_for_supplier(fixture.supplier_id).await.unwrap();
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.quoted, 1);
        assert_eq!(counts.total(), 2);
    }
}
