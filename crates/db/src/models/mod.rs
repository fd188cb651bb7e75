//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod analytics;
pub mod campaign;
pub mod college;
pub mod exam;
pub mod filter;
pub mod redirect;
pub mod scholarship;
pub mod slug_record;
pub mod tracker;
pub mod user;
pub mod versioned_asset;
