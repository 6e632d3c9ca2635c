//! Persistence gateway for products.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryProductRepository;
pub use postgres::PostgresProductRepository;

use crate::domain::Product;
use crate::infra::config::{AppConfig, StorageBackend};
use async_trait::async_trait;
use std::sync::Arc;

/// Contract for any product store.
///
/// Implementations own the durable product state. Callers receive copies; mutating a
/// returned `Product` has no effect until it is passed back to [`save`](Self::save).
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Returns the product with the given id, or `None` if there is none.
    async fn find_one(&self, id: i32) -> anyhow::Result<Option<Product>>;

    /// Returns every stored product ordered by id.
    async fn find_all(&self) -> anyhow::Result<Vec<Product>>;

    /// Inserts the product if it has no id, otherwise inserts or replaces the row with
    /// that id. Returns the stored product, including the assigned id.
    async fn save(&self, product: Product) -> anyhow::Result<Product>;

    /// Removes the product with the given id. Deleting a missing id is not an error.
    async fn delete_by_id(&self, id: i32) -> anyhow::Result<()>;

    /// Returns the product only if both `id` and `name` match.
    async fn find_by_id_and_name(&self, id: i32, name: &str) -> anyhow::Result<Option<Product>> {
        Ok(self.find_one(id).await?.filter(|p| p.name == name))
    }

    /// Cheap reachability check used by `/health`.
    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Builds the repository selected by `config`.
pub async fn connect(config: &AppConfig) -> anyhow::Result<Arc<dyn ProductRepository>> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory product repository");
            Ok(Arc::new(InMemoryProductRepository::new()))
        }
        StorageBackend::Postgres => {
            let database_url = config.require_database_url()?;
            let repository =
                PostgresProductRepository::connect(database_url, config.db_max_connections).await?;
            repository.run_migrations(&config.migrations_dir).await?;
            tracing::info!("Using PostgreSQL product repository");
            Ok(Arc::new(repository))
        }
    }
}
