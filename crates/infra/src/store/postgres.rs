//! Postgres-backed product store.
//!
//! Products live in a single `products` table keyed by a `BIGSERIAL` id.
//!
//! ## Error Mapping
//!
//! | Failure | StoreError |
//! |---------|------------|
//! | product without id on update/delete | `Validation` |
//! | malformed fields before write | `Validation` |
//! | unknown category / out-of-range price in a stored row | `Validation` |
//! | update matched no row | `NotFound` |
//! | anything raised by sqlx (connectivity, constraints) | `Database`, unchanged |

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{Span, debug, instrument};

use catalog_core::{Entity, ProductId};
use catalog_products::{Category, Price, Product};

use super::{ProductStore, StoreError, StoreResult};

macro_rules! select_products {
    ($($tail:literal)?) => {
        concat!(
            "SELECT id, name, description, price, available, category FROM products",
            $(" ", $tail,)?
            " ORDER BY id ASC"
        )
    };
}

/// Postgres-backed product store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is `Send + Sync`; each operation is a
/// single statement, so the pool's implicit per-statement transaction is the
/// only transaction this store opens.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    /// Create a new store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `products` table and its lookup indexes if they are missing.
    #[instrument(skip(self), err)]
    pub async fn init_db(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                description VARCHAR(250),
                price NUMERIC(10, 2) NOT NULL,
                available BOOLEAN NOT NULL DEFAULT TRUE,
                category VARCHAR(16) NOT NULL DEFAULT 'UNKNOWN'
            )
            "#,
        )
        .execute(&*self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS products_name_idx ON products (name)")
            .execute(&*self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS products_category_idx ON products (category)")
            .execute(&*self.pool)
            .await?;

        debug!("products table ready");
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self, product), fields(product_id), err)]
    async fn create(&self, product: &mut Product) -> StoreResult<()> {
        product.validate()?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, description, price, available, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.amount())
        .bind(product.available)
        .bind(product.category.as_str())
        .fetch_one(&*self.pool)
        .await?;

        let id = ProductId::new(id);
        product.assign_id(id);
        Span::current().record("product_id", id.get());
        debug!(name = %product.name, "created product");
        Ok(())
    }

    #[instrument(skip(self, product), fields(product_id), err)]
    async fn update(&self, product: &Product) -> StoreResult<()> {
        let id = product.require_id("Update")?;
        Span::current().record("product_id", id.get());
        product.validate()?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2,
                description = $3,
                price = $4,
                available = $5,
                category = $6
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.amount())
        .bind(product.available)
        .bind(product.category.as_str())
        .execute(&*self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        debug!("updated product");
        Ok(())
    }

    #[instrument(skip(self, product), fields(product_id), err)]
    async fn delete(&self, product: &Product) -> StoreResult<()> {
        let id = product.require_id("Delete")?;
        Span::current().record("product_id", id.get());

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await?;

        debug!(rows = result.rows_affected(), "deleted product");
        Ok(())
    }

    #[instrument(skip(self, id), fields(product_id = %id), err)]
    async fn find(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query(select_products!("WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn all(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(select_products!())
            .fetch_all(&*self.pool)
            .await?;
        products_from_rows(&rows)
    }

    #[instrument(skip(self), err)]
    async fn find_by_name(&self, name: &str) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(select_products!("WHERE name = $1"))
            .bind(name)
            .fetch_all(&*self.pool)
            .await?;
        products_from_rows(&rows)
    }

    #[instrument(skip(self), err)]
    async fn find_by_availability(&self, available: bool) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(select_products!("WHERE available = $1"))
            .bind(available)
            .fetch_all(&*self.pool)
            .await?;
        products_from_rows(&rows)
    }

    #[instrument(skip(self, category), fields(category = %category), err)]
    async fn find_by_category(&self, category: Category) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(select_products!("WHERE category = $1"))
            .bind(category.as_str())
            .fetch_all(&*self.pool)
            .await?;
        products_from_rows(&rows)
    }

    #[instrument(skip(self, price), fields(price = %price), err)]
    async fn find_by_price(&self, price: Price) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(select_products!("WHERE price = $1"))
            .bind(price.amount())
            .fetch_all(&*self.pool)
            .await?;
        products_from_rows(&rows)
    }

    #[instrument(skip(self), err)]
    async fn count(&self) -> StoreResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&*self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    #[instrument(skip(self), err)]
    async fn clear(&self) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM products")
            .execute(&*self.pool)
            .await?;
        debug!(rows = result.rows_affected(), "cleared products");
        Ok(())
    }
}

fn products_from_rows(rows: &[PgRow]) -> StoreResult<Vec<Product>> {
    rows.iter().map(product_from_row).collect()
}

/// Map a `products` row back to the entity.
///
/// Stored values that no longer satisfy the domain rules (a category name
/// outside the enum, a price outside `NUMERIC(10,2)`) are data validation
/// errors, not database errors.
fn product_from_row(row: &PgRow) -> StoreResult<Product> {
    let id: i64 = row.try_get("id")?;
    let name: String = row.try_get("name")?;
    let description: Option<String> = row.try_get("description")?;
    let price: Decimal = row.try_get("price")?;
    let available: bool = row.try_get("available")?;
    let category: String = row.try_get("category")?;

    Ok(Product::from_row(
        ProductId::new(id),
        name,
        description,
        Price::new(price)?,
        available,
        Category::from_str(&category)?,
    ))
}
