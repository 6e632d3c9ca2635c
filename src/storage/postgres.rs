//! Product store backed by PostgreSQL.

use crate::domain::Product;
use crate::storage::ProductRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::path::Path;

const PRODUCT_COLUMNS: &str = "id, name, description, quantity, version";

/// A product store that uses a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("failed to connect to PostgreSQL")?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies the SQL migrations found in `dir` (creates the `products` table).
    pub async fn run_migrations(&self, dir: &Path) -> Result<()> {
        let migrator = Migrator::new(dir.to_path_buf())
            .await
            .with_context(|| format!("failed initializing migrator from {}", dir.display()))?;
        migrator
            .run(&self.pool)
            .await
            .context("failed applying migrations")?;
        Ok(())
    }
}

fn product_from_row(row: &PgRow) -> Result<Product> {
    Ok(Product {
        id: Some(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        quantity: row.try_get("quantity")?,
        version: row.try_get("version")?,
    })
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn find_one(&self, id: i32) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM products ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(product_from_row).collect()
    }

    async fn save(&self, product: Product) -> Result<Product> {
        let row = match product.id {
            None => {
                sqlx::query(&format!(
                    "INSERT INTO products (name, description, quantity, version)
                     VALUES ($1, $2, $3, $4)
                     RETURNING {}",
                    PRODUCT_COLUMNS
                ))
                .bind(&product.name)
                .bind(&product.description)
                .bind(product.quantity)
                .bind(product.version)
                .fetch_one(&self.pool)
                .await?
            }
            Some(id) => {
                sqlx::query(&format!(
                    "INSERT INTO products (id, name, description, quantity, version)
                     VALUES ($1, $2, $3, $4, $5)
                     ON CONFLICT (id) DO UPDATE SET
                        name = EXCLUDED.name,
                        description = EXCLUDED.description,
                        quantity = EXCLUDED.quantity,
                        version = EXCLUDED.version
                     RETURNING {}",
                    PRODUCT_COLUMNS
                ))
                .bind(id)
                .bind(&product.name)
                .bind(&product.description)
                .bind(product.quantity)
                .bind(product.version)
                .fetch_one(&self.pool)
                .await?
            }
        };
        product_from_row(&row)
    }

    async fn delete_by_id(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_by_id_and_name(&self, id: i32, name: &str) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM products WHERE id = $1 AND name = $2",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
