//! Catalog access for the survey workspace.
//!
//! The [`Catalog`] trait is the seam between the form logic and storage:
//! - [`RestCatalog`] talks to a PostgREST table API (Supabase `rest/v1`)
//! - [`MemoryCatalog`] keeps everything in memory, for tests and demos
//!
//! [`CatalogConfig`] reads the API location and key from the environment.

mod catalog;
pub use catalog::Catalog;

mod config;
pub use config::{CatalogConfig, ConfigError, KEY_VAR, URL_VAR};

mod error;
pub use error::CatalogError;

mod memory;
pub use memory::MemoryCatalog;

mod rest;
pub use rest::RestCatalog;

mod rows;
