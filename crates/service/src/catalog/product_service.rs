use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::category_service::CategoryService;
use super::domain::{Category, CreateProductInput, NewProduct, Product, ProductDeleted, ProductPatch, ProductWithCategory};
use super::repository::CatalogRepository;
use crate::errors::ServiceError;

/// Product store service. Category existence and expansion go through [`CategoryService`].
pub struct ProductService {
    repo: Arc<dyn CatalogRepository>,
    categories: Arc<CategoryService>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn CatalogRepository>, categories: Arc<CategoryService>) -> Self {
        Self { repo, categories }
    }

    async fn require_category(&self, id: Option<Uuid>) -> Result<Category, ServiceError> {
        let Some(id) = id else { return Err(ServiceError::not_found("Category")) };
        self.categories.find(id).await?.ok_or_else(|| ServiceError::not_found("Category"))
    }

    /// Create a product under an existing category.
    ///
    /// The category is resolved first; a dangling reference fails with `NotFound`
    /// before any field is validated and nothing is written.
    ///
    /// # Examples
    /// ```
    /// use service::catalog::{CategoryService, ProductService, repository::mock::MockCatalogRepository};
    /// use service::catalog::domain::{CreateCategoryInput, CreateProductInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockCatalogRepository::default());
    /// let categories = Arc::new(CategoryService::new(repo.clone()));
    /// let products = ProductService::new(repo, categories.clone());
    /// let c = tokio_test::block_on(categories.create(CreateCategoryInput { name: Some("Electronics".into()) })).unwrap();
    /// let p = tokio_test::block_on(products.create(CreateProductInput {
    ///     name: Some("Phone".into()), price: Some(699.0), stock: Some(50), category_id: Some(c.id),
    /// })).unwrap();
    /// assert_eq!(p.category_id, Some(c.id));
    /// ```
    #[instrument(skip(self, input), fields(category_id = ?input.category_id))]
    pub async fn create(&self, input: CreateProductInput) -> Result<Product, ServiceError> {
        let category = self.require_category(input.category_id).await?;

        let raw_name = input.name.ok_or_else(|| ServiceError::Validation("product name required".into()))?;
        let name = models::product::validate_name(&raw_name)?;
        let price = input.price.ok_or_else(|| ServiceError::Validation("price required".into()))?;
        models::product::validate_price(price)?;
        let stock = input.stock.unwrap_or(0);
        models::product::validate_stock(stock)?;

        let created = self
            .repo
            .insert_product(NewProduct { name, price, stock, category_id: Some(category.id) })
            .await?;
        info!(product_id = %created.id, category_id = %category.id, "product_created");
        Ok(created)
    }

    /// All products with their category expanded (or `None` when uncategorized).
    pub async fn list(&self) -> Result<Vec<ProductWithCategory>, ServiceError> {
        let products = self.repo.list_products().await?;
        let mut resolved: HashMap<Uuid, Option<Category>> = HashMap::new();
        for cid in products.iter().filter_map(|p| p.category_id) {
            if !resolved.contains_key(&cid) {
                let found = self.categories.find(cid).await?;
                resolved.insert(cid, found);
            }
        }
        debug!(products = products.len(), categories = resolved.len(), "joined product categories");
        Ok(products
            .into_iter()
            .map(|p| {
                let category = p.category_id.and_then(|cid| resolved.get(&cid).cloned().flatten());
                ProductWithCategory::join(p, category)
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<ProductWithCategory, ServiceError> {
        let product = self.repo.find_product(id).await?.ok_or_else(|| ServiceError::not_found("Product"))?;
        let category = match product.category_id {
            Some(cid) => self.categories.find(cid).await?,
            None => None,
        };
        Ok(ProductWithCategory::join(product, category))
    }

    /// Partial update. A new `category_id` must resolve before anything is applied;
    /// present fields follow the create rules. The result is not expanded.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product, ServiceError> {
        if patch.category_id.is_some() {
            self.require_category(patch.category_id).await?;
        }
        let name = match patch.name {
            Some(n) => Some(models::product::validate_name(&n)?),
            None => None,
        };
        if let Some(p) = patch.price { models::product::validate_price(p)?; }
        if let Some(s) = patch.stock { models::product::validate_stock(s)?; }

        let normalized = ProductPatch { name, ..patch };
        let updated = self
            .repo
            .update_product(id, &normalized)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product"))?;
        info!(product_id = %updated.id, "product_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<ProductDeleted, ServiceError> {
        let product = self.repo.delete_product(id).await?.ok_or_else(|| ServiceError::not_found("Product"))?;
        info!(product_id = %id, "product_deleted");
        Ok(ProductDeleted { message: "Product deleted successfully".into(), product })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::CreateCategoryInput;
    use crate::catalog::repository::mock::MockCatalogRepository;
    use crate::errors::ErrorKind;

    struct Fixture {
        repo: Arc<MockCatalogRepository>,
        categories: Arc<CategoryService>,
        products: ProductService,
    }

    fn setup() -> Fixture {
        let repo = Arc::new(MockCatalogRepository::default());
        let categories = Arc::new(CategoryService::new(repo.clone()));
        let products = ProductService::new(repo.clone(), categories.clone());
        Fixture { repo, categories, products }
    }

    async fn category(f: &Fixture, name: &str) -> Category {
        f.categories.create(CreateCategoryInput { name: Some(name.into()) }).await.unwrap()
    }

    fn phone(category_id: Option<Uuid>) -> CreateProductInput {
        CreateProductInput { name: Some("Phone".into()), price: Some(699.0), stock: Some(50), category_id }
    }

    #[tokio::test]
    async fn create_under_existing_category() {
        let f = setup();
        let c = category(&f, "Electronics").await;
        let p = f.products.create(phone(Some(c.id))).await.unwrap();
        assert_eq!(p.name, "Phone");
        assert_eq!(p.price, 699.0);
        assert_eq!(p.stock, 50);
        assert_eq!(p.category_id, Some(c.id));
    }

    #[tokio::test]
    async fn stock_defaults_to_zero() {
        let f = setup();
        let c = category(&f, "Electronics").await;
        let p = f.products.create(CreateProductInput { stock: None, ..phone(Some(c.id)) }).await.unwrap();
        assert_eq!(p.stock, 0);
    }

    #[tokio::test]
    async fn unknown_category_rejects_create_without_writing() {
        let f = setup();
        let err = f.products.create(phone(Some(Uuid::new_v4()))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Category not found");
        assert!(f.repo.list_products().await.unwrap().is_empty());

        let err = f.products.create(phone(None)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn invalid_fields_are_validation_errors() {
        let f = setup();
        let c = category(&f, "Electronics").await;
        let cases = [
            CreateProductInput { price: Some(0.0), ..phone(Some(c.id)) },
            CreateProductInput { stock: Some(-1), ..phone(Some(c.id)) },
            CreateProductInput { name: None, ..phone(Some(c.id)) },
            CreateProductInput { price: None, ..phone(Some(c.id)) },
        ];
        for input in cases {
            let err = f.products.create(input).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(f.repo.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_and_get_expand_category() {
        let f = setup();
        let c = category(&f, "Electronics").await;
        let p = f.products.create(phone(Some(c.id))).await.unwrap();
        let loose = f.repo
            .insert_product(NewProduct { name: "Loose".into(), price: 1.0, stock: 0, category_id: None })
            .await
            .unwrap();

        let all = f.products.list().await.unwrap();
        assert_eq!(all.len(), 2);
        let listed = all.iter().find(|x| x.id == p.id).unwrap();
        assert_eq!(listed.category.as_ref().map(|c| c.name.as_str()), Some("Electronics"));
        assert!(all.iter().find(|x| x.id == loose.id).unwrap().category.is_none());

        let one = f.products.get(p.id).await.unwrap();
        assert_eq!(one.category, Some(c));
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let f = setup();
        let err = f.products.get(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
    }

    #[tokio::test]
    async fn update_to_unknown_category_leaves_product_unchanged() {
        let f = setup();
        let c = category(&f, "Electronics").await;
        let p = f.products.create(phone(Some(c.id))).await.unwrap();

        let patch = ProductPatch { name: Some("Renamed".into()), category_id: Some(Uuid::new_v4()), ..Default::default() };
        let err = f.products.update(p.id, patch).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let after = f.repo.find_product(p.id).await.unwrap().unwrap();
        assert_eq!(after, p);
    }

    #[tokio::test]
    async fn update_applies_fields_and_moves_category() {
        let f = setup();
        let c1 = category(&f, "Electronics").await;
        let c2 = category(&f, "Phones").await;
        let p = f.products.create(phone(Some(c1.id))).await.unwrap();

        let patch = ProductPatch { price: Some(799.0), stock: Some(45), category_id: Some(c2.id), ..Default::default() };
        let updated = f.products.update(p.id, patch).await.unwrap();
        assert_eq!(updated.name, "Phone");
        assert_eq!(updated.price, 799.0);
        assert_eq!(updated.stock, 45);
        assert_eq!(updated.category_id, Some(c2.id));
    }

    #[tokio::test]
    async fn update_validates_present_fields() {
        let f = setup();
        let c = category(&f, "Electronics").await;
        let p = f.products.create(phone(Some(c.id))).await.unwrap();

        let err = f.products.update(p.id, ProductPatch { price: Some(-5.0), ..Default::default() }).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = f.products.update(p.id, ProductPatch { stock: Some(-1), ..Default::default() }).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = f.products.update(Uuid::new_v4(), ProductPatch::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
    }

    #[tokio::test]
    async fn delete_returns_removed_product() {
        let f = setup();
        let c = category(&f, "Electronics").await;
        let p = f.products.create(phone(Some(c.id))).await.unwrap();

        let deleted = f.products.delete(p.id).await.unwrap();
        assert_eq!(deleted.message, "Product deleted successfully");
        assert_eq!(deleted.product.id, p.id);
        assert_eq!(f.products.delete(p.id).await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn category_delete_shows_as_uncategorized() {
        let f = setup();
        let c = category(&f, "Electronics").await;
        let p = f.products.create(phone(Some(c.id))).await.unwrap();

        f.categories.delete(c.id).await.unwrap();
        let after = f.products.get(p.id).await.unwrap();
        assert!(after.category.is_none());
        assert_eq!(after.stock, 50);
    }
}
