use axum::{extract::{Path, State}, http::StatusCode, Json};
use tracing::info;

use service::catalog::domain::{Category, CategoryDeleted, CategoryDetail, CategoryPatch, CreateCategoryInput};

use crate::{errors::JsonApiError, extract::ApiJson, routes::parse_id, startup::AppState};

#[utoipa::path(
    post, path = "/categories", tag = "categories",
    request_body = crate::openapi::CreateCategoryDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CategoryDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateCategoryInput>,
) -> Result<(StatusCode, Json<Category>), JsonApiError> {
    info!(name = ?input.name, "category_create_request");
    let created = state
        .categories
        .create(input)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to create category"))?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/categories", tag = "categories",
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::CategoryDoc]),
        (status = 500, description = "List Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, JsonApiError> {
    let list = state
        .categories
        .list()
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch categories"))?;
    info!(count = list.len(), "list categories");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/categories/{id}", tag = "categories",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category with its products", body = crate::openapi::CategoryDetailDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Fetch Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<CategoryDetail>, JsonApiError> {
    let id = parse_id(&id, "Category")?;
    state
        .categories
        .get(id)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch category"))
}

#[utoipa::path(
    patch, path = "/categories/{id}", tag = "categories",
    params(("id" = String, Path, description = "Category ID")),
    request_body = crate::openapi::UpdateCategoryDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CategoryDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<CategoryPatch>,
) -> Result<Json<Category>, JsonApiError> {
    let id = parse_id(&id, "Category")?;
    let updated = state
        .categories
        .update(id, patch)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to update category"))?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/categories/{id}", tag = "categories",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted; referencing products become uncategorized", body = crate::openapi::CategoryDeletedDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Delete Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<CategoryDeleted>, JsonApiError> {
    let id = parse_id(&id, "Category")?;
    let deleted = state
        .categories
        .delete(id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to delete category"))?;
    Ok(Json(deleted))
}
