//! Catalog module: domain, repository contract, and the two store services.
//!
//! Both services share one `CatalogRepository`; the product service joins
//! categories through `CategoryService::find`.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod category_service;
pub mod product_service;

pub use category_service::CategoryService;
pub use product_service::ProductService;
