//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod customer_repo;
pub mod milk_entry_repo;
pub mod notification_repo;
pub mod seller_repo;

pub use customer_repo::CustomerRepo;
pub use milk_entry_repo::MilkEntryRepo;
pub use notification_repo::NotificationRepo;
pub use seller_repo::SellerRepo;
