//! Domain types and pure policy logic for the pagedesk admin back-office.
//!
//! Nothing in this crate touches the database or performs I/O. The `db`
//! crate persists what these modules decide and the `api` crate wires the two
//! together behind HTTP handlers.

pub mod content;
pub mod error;
pub mod import;
pub mod lifecycle;
pub mod redirects;
pub mod roles;
pub mod search;
pub mod seo;
pub mod slugs;
pub mod structure;
pub mod trackers;
pub mod types;
