use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use service::catalog::{
    repo::seaorm::SeaOrmCatalogRepository,
    repository::CatalogRepository,
    CategoryService, ProductService,
};

/// Handler state: both services over one injected store.
#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<CategoryService>,
    pub products: Arc<ProductService>,
}

impl AppState {
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        let categories = Arc::new(CategoryService::new(Arc::clone(&repo)));
        let products = Arc::new(ProductService::new(repo, Arc::clone(&categories)));
        Self { categories, products }
    }
}

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, shutting down");
    }
}

/// Public entry: connect the store, migrate, build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    // Unreachable store is fatal: nothing is served without it.
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("schema migrations applied");

    let repo: Arc<dyn CatalogRepository> = Arc::new(SeaOrmCatalogRepository { db });
    let state = AppState::new(repo);
    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    info!(%addr, "starting catalog server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
