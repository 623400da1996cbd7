//! # Company Repository
//!
//! This module contains the repository implementation for Company entities:
//! account registration, credential checks, the public supplier directory,
//! and profile updates.

use chrono::Utc;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::sync::OnceLock;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::company::{
    ActiveModel as CompanyActiveModel, Column, CompanyRole, Entity as Company,
    Model as CompanyModel,
};
use crate::password;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"))
}

/// Request data for registering a new company account
#[derive(Debug, Clone)]
pub struct RegisterCompanyRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: CompanyRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
}

/// Partial update of supplier profile fields. Email, role, and credentials
/// are deliberately not updatable here.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub description: Option<String>,
    pub halal_certified: Option<bool>,
    pub has_coa: Option<bool>,
    pub has_msds: Option<bool>,
}

/// Filters for the public supplier directory
#[derive(Debug, Clone, Default)]
pub struct SupplierFilter {
    pub city: Option<String>,
    pub q: Option<String>,
}

/// Repository for Company database operations
pub struct CompanyRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CompanyRepository<'a> {
    /// Create a new CompanyRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a new company account with a freshly salted credential digest.
    pub async fn register(
        &self,
        request: RegisterCompanyRequest,
    ) -> Result<CompanyModel, RepositoryError> {
        self.validate_name(&request.name)?;
        self.validate_email(&request.email)?;
        self.validate_password(&request.password)?;

        let email = request.email.trim().to_lowercase();

        if self.find_by_email(&email).await?.is_some() {
            return Err(RepositoryError::Conflict(
                "Email is already registered".to_string(),
            ));
        }

        let salt = password::generate_salt();
        let digest = password::digest(&request.password, &salt);
        let now = Utc::now();

        let company = CompanyActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            email: Set(email),
            password_digest: Set(digest),
            password_salt: Set(salt),
            role: Set(request.role.as_str().to_string()),
            phone: Set(request.phone),
            address: Set(request.address),
            city: Set(request.city),
            province: Set(request.province),
            description: Set(None),
            halal_certified: Set(false),
            has_coa: Set(false),
            has_msds: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let result = company.insert(self.db).await?;

        Ok(result)
    }

    /// Check credentials for a login attempt.
    ///
    /// Returns None for an unknown email and for a wrong password alike, so
    /// callers cannot distinguish the two cases.
    pub async fn authenticate(
        &self,
        email: &str,
        candidate_password: &str,
    ) -> Result<Option<CompanyModel>, RepositoryError> {
        let normalized = email.trim().to_lowercase();

        let Some(company) = self.find_by_email(&normalized).await? else {
            return Ok(None);
        };

        if password::verify(
            candidate_password,
            &company.password_salt,
            &company.password_digest,
        ) {
            Ok(Some(company))
        } else {
            Ok(None)
        }
    }

    /// Get a company by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CompanyModel>, RepositoryError> {
        let company = Company::find_by_id(id).one(self.db).await?;

        Ok(company)
    }

    /// Get a company by login email
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CompanyModel>, RepositoryError> {
        let company = Company::find()
            .filter(Column::Email.eq(email))
            .one(self.db)
            .await?;

        Ok(company)
    }

    /// List supplier accounts for the public directory, ordered by name.
    pub async fn list_suppliers(
        &self,
        filter: SupplierFilter,
    ) -> Result<Vec<CompanyModel>, RepositoryError> {
        let mut query = Company::find()
            .filter(Column::Role.eq(CompanyRole::Supplier.as_str()))
            .order_by_asc(Column::Name);

        if let Some(city) = filter.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            query = query.filter(Column::City.eq(city));
        }

        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            query = query.filter(Column::Name.contains(q));
        }

        let suppliers = query.all(self.db).await?;

        Ok(suppliers)
    }

    /// Update profile fields of the given company.
    pub async fn update_profile(
        &self,
        company_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<CompanyModel, RepositoryError> {
        let company = self
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Company not found".to_string()))?;

        if let Some(name) = &request.name {
            self.validate_name(name)?;
        }

        let mut active = company.into_active_model();

        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(phone) = request.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = request.address {
            active.address = Set(Some(address));
        }
        if let Some(city) = request.city {
            active.city = Set(Some(city));
        }
        if let Some(province) = request.province {
            active.province = Set(Some(province));
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(halal) = request.halal_certified {
            active.halal_certified = Set(halal);
        }
        if let Some(coa) = request.has_coa {
            active.has_coa = Set(coa);
        }
        if let Some(msds) = request.has_msds {
            active.has_msds = Set(msds);
        }
        active.updated_at = Set(Utc::now().into());

        let result = active.update(self.db).await?;

        Ok(result)
    }

    fn validate_name(&self, name: &str) -> Result<(), RepositoryError> {
        if name.trim().is_empty() {
            return Err(RepositoryError::validation_error(
                "Company name cannot be empty",
            ));
        }

        if name.len() > 255 {
            return Err(RepositoryError::validation_error(
                "Company name cannot exceed 255 characters",
            ));
        }

        Ok(())
    }

    fn validate_email(&self, email: &str) -> Result<(), RepositoryError> {
        if !email_regex().is_match(email.trim()) {
            return Err(RepositoryError::validation_error(
                "Email address is not valid",
            ));
        }

        Ok(())
    }

    fn validate_password(&self, password: &str) -> Result<(), RepositoryError> {
        if password.len() < 8 {
            return Err(RepositoryError::validation_error(
                "Password must be at least 8 characters",
            ));
        }

        Ok(())
    }
}
