use async_trait::async_trait;
use chrono::Utc;
use domain::{CustomerId, Order, OrderState, ProductId};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{OrderId, OrderStoreError, Result, store::OrderStore};

const SELECT_COLUMNS: &str =
    "id, customer_id, product_id, quantity, amount, status, created_at, updated_at";

/// PostgreSQL-backed order store implementation.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url` and creates a store on top of it.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<OrderState>()
            .map_err(|e| OrderStoreError::CorruptRecord(e.to_string()))?;

        let quantity: i64 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity).map_err(|_| {
            OrderStoreError::CorruptRecord(format!("quantity out of range: {quantity}"))
        })?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            customer_id: CustomerId::new(row.try_get("customer_id")?),
            product_id: ProductId::new(row.try_get("product_id")?),
            quantity,
            amount: row.try_get::<Decimal, _>("amount")?,
            status,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id))]
    async fn create(&self, order: Order) -> Result<Order> {
        sqlx::query(
            r#"
            INSERT INTO orders
                (id, customer_id, product_id, quantity, amount, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.customer_id.value())
        .bind(order.product_id.value())
        .bind(i64::from(order.quantity))
        .bind(order.amount)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return OrderStoreError::AlreadyExists(order.id);
            }
            OrderStoreError::Database(e)
        })?;

        metrics::counter!("order_store_writes_total", "op" => "create").increment(1);
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(&self, id: OrderId, status: OrderState) -> Result<Order> {
        // The terminal guard lives in the WHERE clause so the check and the
        // write are a single statement.
        let row = sqlx::query(&format!(
            r#"
            UPDATE orders
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status NOT IN ($4, $5)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(OrderState::OrderCompleted.as_str())
        .bind(OrderState::OrderFailed.as_str())
        .fetch_optional(&self.pool)
        .await?;

        metrics::counter!("order_store_writes_total", "op" => "update_status").increment(1);

        match row {
            Some(row) => Self::row_to_order(row),
            None => match self.get(id).await? {
                Some(existing) => Err(OrderStoreError::TerminalState {
                    order_id: id,
                    status: existing.status,
                }),
                None => Err(OrderStoreError::NotFound(id)),
            },
        }
    }
}
