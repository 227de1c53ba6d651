use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorBodyDoc {
    pub error: String,
    pub details: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CategoryDoc {
    pub id: Uuid,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct CreateCategoryDoc { pub name: String }

#[derive(ToSchema)]
pub struct UpdateCategoryDoc { pub name: Option<String> }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ProductDoc {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub stock: i32,
    pub category_id: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ProductWithCategoryDoc {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub stock: i32,
    /// Expanded category, `null` when uncategorized
    pub category_id: Option<CategoryDoc>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateProductDoc {
    pub name: String,
    pub price: f64,
    /// Defaults to 0
    pub stock: Option<i32>,
    pub category_id: Uuid,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UpdateProductDoc {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub category_id: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct CategoryDetailDoc {
    pub category: CategoryDoc,
    pub products: Vec<ProductDoc>,
}

#[derive(ToSchema)]
pub struct CategoryDeletedDoc {
    pub message: String,
    pub category: CategoryDoc,
}

#[derive(ToSchema)]
pub struct ProductDeletedDoc {
    pub message: String,
    pub product: ProductDoc,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::categories::create,
        crate::routes::categories::list,
        crate::routes::categories::get,
        crate::routes::categories::update,
        crate::routes::categories::delete,
        crate::routes::products::create,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::products::update,
        crate::routes::products::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBodyDoc,
            CategoryDoc,
            CreateCategoryDoc,
            UpdateCategoryDoc,
            ProductDoc,
            ProductWithCategoryDoc,
            CreateProductDoc,
            UpdateProductDoc,
            CategoryDetailDoc,
            CategoryDeletedDoc,
            ProductDeletedDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "categories"),
        (name = "products")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_catalog_paths() {
        let doc = ApiDoc::openapi();
        for p in ["/categories", "/categories/{id}", "/products", "/products/{id}", "/health"] {
            assert!(doc.paths.paths.contains_key(p), "missing {p}");
        }
    }
}
