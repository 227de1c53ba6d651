use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use service::catalog::domain::{CreateProductInput, Product, ProductDeleted, ProductPatch, ProductWithCategory};

use crate::{errors::JsonApiError, extract::ApiJson, routes::parse_id, startup::AppState};

/// Request body for create and update. `categoryId` stays a string so that a
/// malformed reference reads as a missing category rather than a bad body.
/// A blank `categoryId` counts as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBody {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub category_id: Option<String>,
}

impl ProductBody {
    fn category_ref(&self) -> Result<Option<Uuid>, JsonApiError> {
        match self.category_id.as_deref() {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_id(raw, "Category").map(Some),
        }
    }
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body = crate::openapi::CreateProductDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Category Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ProductBody>,
) -> Result<(StatusCode, Json<Product>), JsonApiError> {
    info!(name = ?body.name, category_id = ?body.category_id, "product_create_request");
    let category_id = body.category_ref()?;
    let input = CreateProductInput { name: body.name, price: body.price, stock: body.stock, category_id };
    let created = state
        .products
        .create(input)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to create product"))?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/products", tag = "products",
    responses(
        (status = 200, description = "List OK, categories expanded", body = [crate::openapi::ProductWithCategoryDoc]),
        (status = 500, description = "List Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductWithCategory>>, JsonApiError> {
    let list = state
        .products
        .list()
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch products"))?;
    info!(count = list.len(), "list products");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "OK, category expanded", body = crate::openapi::ProductWithCategoryDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Fetch Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<ProductWithCategory>, JsonApiError> {
    let id = parse_id(&id, "Product")?;
    state
        .products
        .get(id)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch product"))
}

#[utoipa::path(
    patch, path = "/products/{id}", tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    request_body = crate::openapi::UpdateProductDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Product or Category Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ProductBody>,
) -> Result<Json<Product>, JsonApiError> {
    let id = parse_id(&id, "Product")?;
    let category_id = body.category_ref()?;
    let patch = ProductPatch { name: body.name, price: body.price, stock: body.stock, category_id };
    let updated = state
        .products
        .update(id, patch)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to update product"))?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::ProductDeletedDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Delete Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<ProductDeleted>, JsonApiError> {
    let id = parse_id(&id, "Product")?;
    let deleted = state
        .products
        .delete(id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to delete product"))?;
    Ok(Json(deleted))
}
