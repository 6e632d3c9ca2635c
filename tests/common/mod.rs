//! Shared helpers: start the router in-process on an ephemeral port.

use product_catalog::transport::http::{create_router, AppState};
use product_catalog::{InMemoryProductRepository, ProductRepository, ProductService};
use std::sync::Arc;

#[allow(dead_code)]
pub async fn spawn_app_with(repository: Arc<dyn ProductRepository>) -> String {
    let router = create_router(AppState::new(ProductService::new(repository)));

    // Bind to an ephemeral port to avoid conflicts between tests.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

#[allow(dead_code)]
pub async fn spawn_app() -> String {
    spawn_app_with(Arc::new(InMemoryProductRepository::new())).await
}
