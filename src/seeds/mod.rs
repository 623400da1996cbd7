//! Database seeding functionality
//!
//! This module provides functionality to seed the database with initial
//! data: the base fragrance-ingredient category taxonomy, and an optional
//! demo data set for local development.

pub mod catalog;

pub use catalog::{seed_categories, seed_demo_data};
