use axum::{
    response::Html,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use common::types::Health;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;
use crate::startup::AppState;

pub mod categories;
pub mod products;

const INDEX_HTML: &str = r#"<!doctype html>
<html>
  <head><title>Catalog API</title></head>
  <body>
    <h1>Catalog API</h1>
    <p>CRUD endpoints for categories and products. Deleting a category keeps its products and marks them uncategorized.</p>
    <ul>
      <li><code>POST|GET /categories</code>, <code>GET|PATCH|DELETE /categories/:id</code></li>
      <li><code>POST|GET /products</code>, <code>GET|PATCH|DELETE /products/:id</code></li>
      <li>The same routes are available under <code>/api</code>.</li>
      <li>OpenAPI: <a href="/swagger-ui">/swagger-ui</a></li>
    </ul>
  </body>
</html>"#;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Path ids that are not UUIDs can never match a record.
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<Uuid, JsonApiError> {
    Uuid::parse_str(raw).map_err(|_| JsonApiError::not_found(entity))
}

/// Category and product routes, mounted at the root and under `/api`.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            get(categories::get).patch(categories::update).delete(categories::delete),
        )
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            get(products::get).patch(products::update).delete(products::delete),
        )
}

/// Build the full application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let catalog = catalog_routes();

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .merge(catalog.clone())
        .nest("/api", catalog)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx and connection failures at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
