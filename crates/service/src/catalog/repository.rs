use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Category, CategoryPatch, NewProduct, Product, ProductPatch};
use crate::errors::ServiceError;

/// Store contract shared by the category and product services.
///
/// Lookups, updates and deletes return `None` when no record has the id.
/// Category names are unique; a clash is reported as `ServiceError::Validation`.
/// Inputs arrive already validated by the services.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn insert_category(&self, name: &str) -> Result<Category, ServiceError>;
    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError>;
    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, ServiceError>;
    async fn update_category(&self, id: Uuid, patch: &CategoryPatch) -> Result<Option<Category>, ServiceError>;
    async fn delete_category(&self, id: Uuid) -> Result<Option<Category>, ServiceError>;

    async fn insert_product(&self, product: NewProduct) -> Result<Product, ServiceError>;
    async fn list_products(&self) -> Result<Vec<Product>, ServiceError>;
    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, ServiceError>;
    async fn products_in_category(&self, category_id: Uuid) -> Result<Vec<Product>, ServiceError>;
    async fn update_product(&self, id: Uuid, patch: &ProductPatch) -> Result<Option<Product>, ServiceError>;
    async fn delete_product(&self, id: Uuid) -> Result<Option<Product>, ServiceError>;
    /// Set `category_id` to null on every product referencing `category_id`; returns how many changed.
    async fn unlink_category(&self, category_id: Uuid) -> Result<u64, ServiceError>;
}

/// In-memory repository for tests, doc examples and running without Postgres
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;

    #[derive(Default)]
    pub struct MockCatalogRepository {
        categories: Mutex<HashMap<Uuid, Category>>,
        products: Mutex<HashMap<Uuid, Product>>,
    }

    fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, ServiceError> {
        m.lock().map_err(|_| ServiceError::Db("in-memory store lock poisoned".into()))
    }

    fn name_taken(categories: &HashMap<Uuid, Category>, name: &str, except: Option<Uuid>) -> bool {
        categories.values().any(|c| c.name == name && Some(c.id) != except)
    }

    fn by_creation<T, F: Fn(&T) -> chrono::DateTime<Utc>>(mut items: Vec<T>, key: F) -> Vec<T> {
        items.sort_by_key(key);
        items
    }

    #[async_trait]
    impl CatalogRepository for MockCatalogRepository {
        async fn insert_category(&self, name: &str) -> Result<Category, ServiceError> {
            let mut categories = lock(&self.categories)?;
            if name_taken(&categories, name, None) {
                return Err(ServiceError::Validation("category name already in use".into()));
            }
            let now = Utc::now();
            let c = Category { id: Uuid::new_v4(), name: name.to_string(), created_at: now, updated_at: now };
            categories.insert(c.id, c.clone());
            Ok(c)
        }

        async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
            let categories = lock(&self.categories)?;
            Ok(by_creation(categories.values().cloned().collect(), |c| c.created_at))
        }

        async fn find_category(&self, id: Uuid) -> Result<Option<Category>, ServiceError> {
            Ok(lock(&self.categories)?.get(&id).cloned())
        }

        async fn update_category(&self, id: Uuid, patch: &CategoryPatch) -> Result<Option<Category>, ServiceError> {
            let mut categories = lock(&self.categories)?;
            if !categories.contains_key(&id) {
                return Ok(None);
            }
            if let Some(name) = &patch.name {
                if name_taken(&categories, name, Some(id)) {
                    return Err(ServiceError::Validation("category name already in use".into()));
                }
            }
            let Some(c) = categories.get_mut(&id) else { return Ok(None) };
            if let Some(name) = &patch.name {
                c.name = name.clone();
                c.updated_at = Utc::now();
            }
            Ok(Some(c.clone()))
        }

        async fn delete_category(&self, id: Uuid) -> Result<Option<Category>, ServiceError> {
            Ok(lock(&self.categories)?.remove(&id))
        }

        async fn insert_product(&self, product: NewProduct) -> Result<Product, ServiceError> {
            // categories before products, same order as every other path
            let categories = lock(&self.categories)?;
            if let Some(cid) = product.category_id {
                if !categories.contains_key(&cid) {
                    return Err(ServiceError::not_found("Category"));
                }
            }
            let mut products = lock(&self.products)?;
            let now = Utc::now();
            let p = Product {
                id: Uuid::new_v4(),
                name: product.name,
                price: product.price,
                stock: product.stock,
                category_id: product.category_id,
                created_at: now,
                updated_at: now,
            };
            products.insert(p.id, p.clone());
            Ok(p)
        }

        async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
            let products = lock(&self.products)?;
            Ok(by_creation(products.values().cloned().collect(), |p| p.created_at))
        }

        async fn find_product(&self, id: Uuid) -> Result<Option<Product>, ServiceError> {
            Ok(lock(&self.products)?.get(&id).cloned())
        }

        async fn products_in_category(&self, category_id: Uuid) -> Result<Vec<Product>, ServiceError> {
            let products = lock(&self.products)?;
            let matching = products.values().filter(|p| p.category_id == Some(category_id)).cloned().collect();
            Ok(by_creation(matching, |p| p.created_at))
        }

        async fn update_product(&self, id: Uuid, patch: &ProductPatch) -> Result<Option<Product>, ServiceError> {
            let categories = lock(&self.categories)?;
            let mut products = lock(&self.products)?;
            let Some(p) = products.get_mut(&id) else { return Ok(None) };
            if let Some(cid) = patch.category_id {
                if !categories.contains_key(&cid) {
                    return Err(ServiceError::not_found("Category"));
                }
            }
            if let Some(name) = &patch.name { p.name = name.clone(); }
            if let Some(price) = patch.price { p.price = price; }
            if let Some(stock) = patch.stock { p.stock = stock; }
            if let Some(cid) = patch.category_id { p.category_id = Some(cid); }
            p.updated_at = Utc::now();
            Ok(Some(p.clone()))
        }

        async fn delete_product(&self, id: Uuid) -> Result<Option<Product>, ServiceError> {
            Ok(lock(&self.products)?.remove(&id))
        }

        async fn unlink_category(&self, category_id: Uuid) -> Result<u64, ServiceError> {
            let mut products = lock(&self.products)?;
            let now = Utc::now();
            let mut changed = 0;
            for p in products.values_mut().filter(|p| p.category_id == Some(category_id)) {
                p.category_id = None;
                p.updated_at = now;
                changed += 1;
            }
            Ok(changed)
        }
    }
}
