//! Route handlers, one module per resource:
//!
//! - `health`: liveness probe
//! - `auth`: registration, login, token refresh
//! - `ingredients`, `recipes`: template data
//! - `inventory_items`, `batches`: transactional data
//! - `dashboard`: owner-scoped counts and recent activity

pub mod auth;
pub mod batches;
pub mod dashboard;
pub mod health;
pub mod ingredients;
pub mod inventory_items;
pub mod recipes;
