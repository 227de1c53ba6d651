//! Service layer implementing the catalog rules on top of models.
//! - Category and product services depend on an injected `CatalogRepository`.
//! - Validation reuses the field validators in the `models` crate.
//! - Store failures surface as `ServiceError`, classified by `ServiceError::kind`.

pub mod errors;
pub mod catalog;
#[cfg(test)]
pub mod test_support;

pub use catalog::{CategoryService, ProductService};
