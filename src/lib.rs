pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::product_service::ProductService;
pub use domain::{Product, INITIAL_VERSION};
pub use infra::config::AppConfig;
pub use storage::{InMemoryProductRepository, PostgresProductRepository, ProductRepository};
