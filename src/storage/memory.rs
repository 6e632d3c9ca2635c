//! In-memory product store, used by tests and `STORAGE_BACKEND=memory`.

use crate::domain::Product;
use crate::storage::ProductRepository;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug)]
struct MemoryState {
    products: BTreeMap<i32, Product>,
    next_id: i32,
}

/// Keeps products in a `BTreeMap` keyed by id, so iteration order is id order.
#[derive(Debug)]
pub struct InMemoryProductRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                products: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_one(&self, id: i32) -> anyhow::Result<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).cloned())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Product>> {
        let state = self.state.read().await;
        Ok(state.products.values().cloned().collect())
    }

    async fn save(&self, mut product: Product) -> anyhow::Result<Product> {
        let mut state = self.state.write().await;
        let id = match product.id {
            Some(id) => id,
            None => state.next_id,
        };
        // Explicit ids must not be handed out again later.
        if id >= state.next_id {
            state.next_id = id
                .checked_add(1)
                .ok_or_else(|| anyhow::anyhow!("product id space exhausted"))?;
        }
        product.id = Some(id);
        state.products.insert(id, product.clone());
        Ok(product)
    }

    async fn delete_by_id(&self, id: i32) -> anyhow::Result<()> {
        let mut state = self.state.write().await;
        state.products.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_assigns_fresh_ids() {
        let repo = InMemoryProductRepository::new();

        let first = repo.save(Product::new("a", "", 1)).await.unwrap();
        let second = repo.save(Product::new("b", "", 2)).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryProductRepository::new();
        let first = repo.save(Product::new("a", "", 1)).await.unwrap();
        repo.delete_by_id(first.id.unwrap()).await.unwrap();

        let second = repo.save(Product::new("b", "", 1)).await.unwrap();
        assert_eq!(second.id, Some(2));
    }

    #[tokio::test]
    async fn explicit_id_advances_the_counter() {
        let repo = InMemoryProductRepository::new();
        repo.save(Product::with_id(10, "x", "", 0, 1)).await.unwrap();

        let next = repo.save(Product::new("y", "", 0)).await.unwrap();
        assert_eq!(next.id, Some(11));
    }

    #[tokio::test]
    async fn save_with_existing_id_replaces_the_record() {
        let repo = InMemoryProductRepository::new();
        let mut product = repo.save(Product::new("a", "desc", 1)).await.unwrap();
        product.name = "renamed".into();
        product.version = 4;
        repo.save(product.clone()).await.unwrap();

        let found = repo.find_one(product.id.unwrap()).await.unwrap();
        assert_eq!(found, Some(product));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn find_one_missing_is_none() {
        let repo = InMemoryProductRepository::new();
        assert_eq!(repo.find_one(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_then_find_is_none() {
        let repo = InMemoryProductRepository::new();
        let saved = repo.save(Product::new("a", "", 1)).await.unwrap();
        let id = saved.id.unwrap();

        repo.delete_by_id(id).await.unwrap();

        assert_eq!(repo.find_one(id).await.unwrap(), None);
        // Deleting again is a no-op.
        repo.delete_by_id(id).await.unwrap();
    }

    #[tokio::test]
    async fn find_all_is_ordered_by_id() {
        let repo = InMemoryProductRepository::new();
        repo.save(Product::with_id(5, "five", "", 0, 1)).await.unwrap();
        repo.save(Product::with_id(2, "two", "", 0, 1)).await.unwrap();
        repo.save(Product::new("six", "", 0)).await.unwrap();

        let names: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["two", "five", "six"]);
    }

    #[tokio::test]
    async fn find_by_id_and_name_requires_both() {
        let repo = InMemoryProductRepository::new();
        let saved = repo.save(Product::new("Widget", "", 3)).await.unwrap();
        let id = saved.id.unwrap();

        assert_eq!(repo.find_by_id_and_name(id, "Widget").await.unwrap(), Some(saved));
        assert_eq!(repo.find_by_id_and_name(id, "Gadget").await.unwrap(), None);
        assert_eq!(repo.find_by_id_and_name(id + 1, "Widget").await.unwrap(), None);
    }
}
