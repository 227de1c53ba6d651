use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use models::errors::ModelError;
use models::{category, product};

use crate::catalog::domain::{Category, CategoryPatch, NewProduct, Product, ProductPatch};
use crate::catalog::repository::CatalogRepository;
use crate::errors::ServiceError;

fn db_err(e: sea_orm::DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

/// SeaORM-backed repository over the `category` and `product` tables.
pub struct SeaOrmCatalogRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn insert_category(&self, name: &str) -> Result<Category, ServiceError> {
        let created = category::create(&self.db, name).await?;
        Ok(created.into())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        let rows = category::Entity::find()
            .order_by_asc(category::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, ServiceError> {
        let found = category::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn update_category(&self, id: Uuid, patch: &CategoryPatch) -> Result<Option<Category>, ServiceError> {
        match &patch.name {
            Some(name) => Ok(category::rename(&self.db, id, name).await?.map(Into::into)),
            None => self.find_category(id).await,
        }
    }

    async fn delete_category(&self, id: Uuid) -> Result<Option<Category>, ServiceError> {
        let Some(found) = category::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)? else {
            return Ok(None);
        };
        let res = category::Entity::delete_by_id(id).exec(&self.db).await.map_err(db_err)?;
        if res.rows_affected == 0 {
            return Ok(None);
        }
        Ok(Some(found.into()))
    }

    async fn insert_product(&self, p: NewProduct) -> Result<Product, ServiceError> {
        let created = product::create(&self.db, &p.name, p.price, p.stock, p.category_id).await?;
        Ok(created.into())
    }

    async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        let rows = product::Entity::find()
            .order_by_asc(product::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, ServiceError> {
        let found = product::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn products_in_category(&self, category_id: Uuid) -> Result<Vec<Product>, ServiceError> {
        let rows = product::Entity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .order_by_asc(product::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_product(&self, id: Uuid, patch: &ProductPatch) -> Result<Option<Product>, ServiceError> {
        let Some(existing) = product::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)? else {
            return Ok(None);
        };
        let mut am: product::ActiveModel = existing.into();
        if let Some(n) = &patch.name { am.name = Set(n.clone()); }
        if let Some(p) = patch.price { am.price = Set(p); }
        if let Some(s) = patch.stock { am.stock = Set(s); }
        if let Some(c) = patch.category_id { am.category_id = Set(Some(c)); }
        am.updated_at = Set(Utc::now().into());
        let updated = am
            .update(&self.db)
            .await
            .map_err(|e| ServiceError::from(ModelError::from_db(e, "product")))?;
        Ok(Some(updated.into()))
    }

    async fn delete_product(&self, id: Uuid) -> Result<Option<Product>, ServiceError> {
        let Some(found) = product::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)? else {
            return Ok(None);
        };
        let res = product::Entity::delete_by_id(id).exec(&self.db).await.map_err(db_err)?;
        if res.rows_affected == 0 {
            return Ok(None);
        }
        Ok(Some(found.into()))
    }

    async fn unlink_category(&self, category_id: Uuid) -> Result<u64, ServiceError> {
        Ok(product::unlink_category(&self.db, category_id).await?)
    }
}
