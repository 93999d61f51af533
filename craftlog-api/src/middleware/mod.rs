//! HTTP middleware.
//!
//! Authentication middleware lives in `craftlog-shared::auth::middleware`
//! because the tests build routers against it too; this module holds the
//! purely server-side layers.

pub mod security;
