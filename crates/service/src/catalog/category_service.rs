use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{Category, CategoryDeleted, CategoryDetail, CategoryPatch, CreateCategoryInput};
use super::repository::CatalogRepository;
use crate::errors::ServiceError;

/// Category store service: CRUD plus the cascading unlink on delete.
pub struct CategoryService {
    repo: Arc<dyn CatalogRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self { Self { repo } }

    /// Create a category with a unique, non-blank name.
    ///
    /// # Examples
    /// ```
    /// use service::catalog::{CategoryService, repository::mock::MockCatalogRepository};
    /// use service::catalog::domain::CreateCategoryInput;
    /// use std::sync::Arc;
    /// let svc = CategoryService::new(Arc::new(MockCatalogRepository::default()));
    /// let c = tokio_test::block_on(svc.create(CreateCategoryInput { name: Some("Electronics".into()) })).unwrap();
    /// assert_eq!(c.name, "Electronics");
    /// ```
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateCategoryInput) -> Result<Category, ServiceError> {
        let raw = input.name.ok_or_else(|| ServiceError::Validation("category name required".into()))?;
        let name = models::category::validate_name(&raw)?;
        let created = self.repo.insert_category(&name).await?;
        info!(category_id = %created.id, name = %created.name, "category_created");
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<Category>, ServiceError> {
        self.repo.list_categories().await
    }

    /// Plain lookup by id, used for existence checks and joins.
    pub async fn find(&self, id: Uuid) -> Result<Option<Category>, ServiceError> {
        self.repo.find_category(id).await
    }

    /// The category and exactly the products whose `category_id` equals it.
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<CategoryDetail, ServiceError> {
        let category = self.find(id).await?.ok_or_else(|| ServiceError::not_found("Category"))?;
        let products = self.repo.products_in_category(id).await?;
        Ok(CategoryDetail { category, products })
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Category, ServiceError> {
        let name = match patch.name {
            Some(n) => Some(models::category::validate_name(&n)?),
            None => None,
        };
        let updated = self
            .repo
            .update_category(id, &CategoryPatch { name })
            .await?
            .ok_or_else(|| ServiceError::not_found("Category"))?;
        info!(category_id = %updated.id, name = %updated.name, "category_updated");
        Ok(updated)
    }

    /// Remove the category, then null out `category_id` on every product that referenced it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<CategoryDeleted, ServiceError> {
        let category = self
            .repo
            .delete_category(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category"))?;
        let unlinked = self.repo.unlink_category(id).await?;
        info!(category_id = %id, unlinked_products = unlinked, "category_deleted");
        Ok(CategoryDeleted { message: "Category deleted successfully".into(), category })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::NewProduct;
    use crate::catalog::repository::mock::MockCatalogRepository;
    use crate::errors::ErrorKind;

    fn setup() -> (Arc<MockCatalogRepository>, CategoryService) {
        let repo = Arc::new(MockCatalogRepository::default());
        let svc = CategoryService::new(repo.clone());
        (repo, svc)
    }

    fn named(name: &str) -> CreateCategoryInput {
        CreateCategoryInput { name: Some(name.into()) }
    }

    async fn product_in(repo: &MockCatalogRepository, name: &str, category_id: Option<Uuid>) -> Uuid {
        repo.insert_product(NewProduct { name: name.into(), price: 10.0, stock: 3, category_id })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn create_returns_fresh_ids() {
        let (_, svc) = setup();
        let a = svc.create(named("Electronics")).await.unwrap();
        let b = svc.create(named("Books")).await.unwrap();
        assert_eq!(a.name, "Electronics");
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn duplicate_name_is_validation_error() {
        let (_, svc) = setup();
        svc.create(named("Electronics")).await.unwrap();
        let err = svc.create(named("Electronics")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn missing_or_blank_name_is_validation_error() {
        let (_, svc) = setup();
        assert_eq!(svc.create(CreateCategoryInput::default()).await.unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(svc.create(named("  ")).await.unwrap_err().kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn get_returns_only_its_products() {
        let (repo, svc) = setup();
        let c1 = svc.create(named("Electronics")).await.unwrap();
        let c2 = svc.create(named("Books")).await.unwrap();
        let p1 = product_in(&repo, "Phone", Some(c1.id)).await;
        let p2 = product_in(&repo, "Laptop", Some(c1.id)).await;
        product_in(&repo, "Novel", Some(c2.id)).await;
        product_in(&repo, "Loose", None).await;

        let detail = svc.get(c1.id).await.unwrap();
        assert_eq!(detail.category.id, c1.id);
        let mut ids: Vec<Uuid> = detail.products.iter().map(|p| p.id).collect();
        ids.sort();
        let mut expected = vec![p1, p2];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let (_, svc) = setup();
        let err = svc.get(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Category not found");
    }

    #[tokio::test]
    async fn rename_rechecks_uniqueness() {
        let (_, svc) = setup();
        let a = svc.create(named("Electronics")).await.unwrap();
        svc.create(named("Books")).await.unwrap();

        let err = svc.update(a.id, CategoryPatch { name: Some("Books".into()) }).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        // renaming to its own name is not a clash
        let same = svc.update(a.id, CategoryPatch { name: Some("Electronics".into()) }).await.unwrap();
        assert_eq!(same.name, "Electronics");

        let renamed = svc.update(a.id, CategoryPatch { name: Some(" Gadgets ".into()) }).await.unwrap();
        assert_eq!(renamed.name, "Gadgets");
        assert_eq!(renamed.id, a.id);
    }

    #[tokio::test]
    async fn update_unknown_is_not_found() {
        let (_, svc) = setup();
        let err = svc.update(Uuid::new_v4(), CategoryPatch { name: Some("X".into()) }).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn delete_unlinks_but_keeps_products() {
        let (repo, svc) = setup();
        let c = svc.create(named("Electronics")).await.unwrap();
        let other = svc.create(named("Books")).await.unwrap();
        let p1 = product_in(&repo, "Phone", Some(c.id)).await;
        let p2 = product_in(&repo, "Laptop", Some(c.id)).await;
        let p3 = product_in(&repo, "Novel", Some(other.id)).await;

        let before = repo.find_product(p1).await.unwrap().unwrap();
        let deleted = svc.delete(c.id).await.unwrap();
        assert_eq!(deleted.message, "Category deleted successfully");
        assert_eq!(deleted.category.id, c.id);

        for id in [p1, p2] {
            let p = repo.find_product(id).await.unwrap().expect("product survives");
            assert_eq!(p.category_id, None);
        }
        let after = repo.find_product(p1).await.unwrap().unwrap();
        assert_eq!((after.name.as_str(), after.price, after.stock), (before.name.as_str(), before.price, before.stock));
        assert_eq!(repo.find_product(p3).await.unwrap().unwrap().category_id, Some(other.id));
        assert!(svc.find(c.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let (_, svc) = setup();
        assert_eq!(svc.delete(Uuid::new_v4()).await.unwrap_err().kind(), ErrorKind::NotFound);
    }
}
