//! Product service: thin orchestration over a [`ProductRepository`].
//!
//! Absence is reported as `None`, never as an error. Repository failures are passed
//! through unchanged.

use crate::domain::Product;
use crate::storage::ProductRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn find_all(&self) -> anyhow::Result<Vec<Product>> {
        self.repository.find_all().await
    }

    pub async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Product>> {
        self.repository.find_one(id).await
    }

    pub async fn find_by_id_and_name(
        &self,
        id: i32,
        name: &str,
    ) -> anyhow::Result<Option<Product>> {
        self.repository.find_by_id_and_name(id, name).await
    }

    /// Persists `product` as given. No field validation happens here.
    pub async fn save(&self, product: Product) -> anyhow::Result<Product> {
        self.repository.save(product).await
    }

    /// Saves `product` if a record with its id still exists.
    ///
    /// The caller's value is stored as-is, not merged with the current record, and no
    /// version check is made. Returns `None` when the product has no id or the record is
    /// gone.
    pub async fn update(&self, product: Product) -> anyhow::Result<Option<Product>> {
        let Some(id) = product.id else {
            return Ok(None);
        };
        if self.repository.find_one(id).await?.is_none() {
            return Ok(None);
        }
        self.repository.save(product).await.map(Some)
    }

    /// Deletes without checking existence; callers look the product up first.
    pub async fn delete(&self, id: i32) -> anyhow::Result<()> {
        self.repository.delete_by_id(id).await
    }

    pub async fn health_check(&self) -> anyhow::Result<()> {
        self.repository.ping().await
    }
}
