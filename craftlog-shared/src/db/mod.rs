//! Database layer: PostgreSQL connection pooling and schema migrations.
//!
//! Records themselves live in the crate-level `models` module; this module
//! only owns how connections are made and how the schema gets to the
//! version the code expects.

pub mod migrations;
pub mod pool;
