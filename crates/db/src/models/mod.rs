//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A safe `Serialize` response struct where the row carries credentials
//! - A create DTO for inserts

pub mod customer;
pub mod milk_entry;
pub mod notification;
pub mod seller;
