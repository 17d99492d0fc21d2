//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `milkbook_db`, run domain checks
//! through `milkbook_core`, and map errors via [`crate::error::AppError`].

pub mod auth;
pub mod bill;
pub mod customer;
pub mod milk;
