//! Database models and their SQL operations.
//!
//! Two families of records, both owned by a user:
//!
//! - Template data - reusable definitions: [`ingredient`], [`recipe`]
//! - Transactional data - concrete real-world events referencing templates:
//!   [`inventory_item`] (a purchase), [`batch`] (a production run)
//!
//! Every read and write below the account level is owner-scoped: finders
//! take the owner's user id and match it in SQL, so a record that exists but
//! belongs to someone else is indistinguishable from one that does not
//! exist.

pub mod batch;
pub mod ingredient;
pub mod inventory_item;
pub mod recipe;
pub mod user;
