// server/src/db/postgres.rs

//! PostgreSQL implementation of the storefront store.
//!
//! Runtime queries only (no compile-time checked macros), so the crate builds
//! without a live database.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use eterna::models::{CartItem, Order, OrderItem, Product, User, UserProfile};
use eterna::{CatalogStore, OrderStore, StoreError, StoreResult, UserStore};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use tracing::{error, event, instrument, Level};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct ProductRow {
  id: Uuid,
  name: String,
  price: Decimal,
  image: String,
  description: String,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      id: row.id,
      name: row.name,
      price: row.price,
      image: row.image,
      description: row.description,
    }
  }
}

#[derive(Debug, FromRow)]
struct UserRow {
  id: Uuid,
  email: String,
  password_hash: String,
  name: String,
  surname: String,
  address: String,
  birthdate: NaiveDate,
  version: i64,
  created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ProfileRow {
  id: Uuid,
  email: String,
  name: String,
  surname: String,
  address: String,
  birthdate: NaiveDate,
}

impl From<ProfileRow> for UserProfile {
  fn from(row: ProfileRow) -> Self {
    UserProfile {
      id: row.id,
      email: row.email,
      name: row.name,
      surname: row.surname,
      address: row.address,
      birthdate: row.birthdate,
    }
  }
}

#[derive(Debug, FromRow)]
struct CartItemRow {
  product_id: Uuid,
  quantity: i32,
}

#[derive(Debug, FromRow)]
struct OrderRow {
  id: Uuid,
  user_id: Uuid,
  address: String,
  card_holder: String,
  card_last4: String,
  created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
  order_id: Uuid,
  product_id: Uuid,
  quantity: i32,
  price: Decimal,
}

const PRODUCT_COLUMNS: &str = "id, name, price, image, description";
const ORDER_COLUMNS: &str = "id, user_id, address, card_holder, card_last4, created_at";

fn backend(err: sqlx::Error) -> StoreError {
  error!(error = %err, "Database operation failed.");
  StoreError::from(anyhow::Error::new(err))
}

/// Store backed by a shared connection pool. Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await?;
    Ok(Self::new(pool))
  }

  /// Applies the embedded migrations from `server/migrations`.
  pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(&self.pool).await
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  async fn assemble_orders(&self, rows: Vec<OrderRow>) -> StoreResult<Vec<Order>> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let item_rows: Vec<OrderItemRow> = sqlx::query_as(
      "SELECT order_id, product_id, quantity, price FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, position",
    )
    .bind(&ids)
    .fetch_all(&self.pool)
    .await
    .map_err(backend)?;

    let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for item in item_rows {
      items_by_order.entry(item.order_id).or_default().push(OrderItem {
        product_id: item.product_id,
        quantity: item.quantity,
        price: item.price,
      });
    }

    Ok(
      rows
        .into_iter()
        .map(|row| Order {
          items: items_by_order.remove(&row.id).unwrap_or_default(),
          id: row.id,
          user_id: row.user_id,
          address: row.address,
          card_holder: row.card_holder,
          card_last4: row.card_last4,
          created_at: row.created_at,
        })
        .collect(),
    )
  }

  async fn assemble_user(&self, row: UserRow) -> StoreResult<User> {
    let cart_rows: Vec<CartItemRow> =
      sqlx::query_as("SELECT product_id, quantity FROM cart_items WHERE user_id = $1 ORDER BY position")
        .bind(row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
    let orders: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM orders WHERE user_id = $1 ORDER BY seq")
      .bind(row.id)
      .fetch_all(&self.pool)
      .await
      .map_err(backend)?;

    Ok(User {
      id: row.id,
      email: row.email,
      password_hash: row.password_hash,
      name: row.name,
      surname: row.surname,
      address: row.address,
      birthdate: row.birthdate,
      cart_items: cart_rows
        .into_iter()
        .map(|item| CartItem::new(item.product_id, item.quantity))
        .collect(),
      orders,
      version: row.version,
      created_at: row.created_at,
    })
  }
}

/// Bumps the user's version inside `tx` if it still matches.
async fn claim_version(
  tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
  user_id: Uuid,
  expected_version: i64,
) -> StoreResult<i64> {
  let new_version: Option<i64> =
    sqlx::query_scalar("UPDATE users SET version = version + 1 WHERE id = $1 AND version = $2 RETURNING version")
      .bind(user_id)
      .bind(expected_version)
      .fetch_optional(&mut **tx)
      .await
      .map_err(backend)?;
  new_version.ok_or_else(|| {
    event!(Level::DEBUG, %user_id, expected_version, "Rejecting stale write.");
    StoreError::VersionConflict {
      user_id,
      expected: expected_version,
    }
  })
}

async fn replace_cart_rows(
  tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
  user_id: Uuid,
  items: &[CartItem],
) -> StoreResult<()> {
  sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
    .bind(user_id)
    .execute(&mut **tx)
    .await
    .map_err(backend)?;
  if items.is_empty() {
    return Ok(());
  }

  let product_ids: Vec<Uuid> = items.iter().map(|item| item.product_id).collect();
  let quantities: Vec<i32> = items.iter().map(|item| item.quantity).collect();
  let positions: Vec<i32> = (0..items.len() as i32).collect();
  sqlx::query(
    "INSERT INTO cart_items (user_id, product_id, quantity, position) \
     SELECT $1, product_id, quantity, position FROM UNNEST($2::uuid[], $3::int4[], $4::int4[]) \
     AS t(product_id, quantity, position)",
  )
  .bind(user_id)
  .bind(&product_ids)
  .bind(&quantities)
  .bind(&positions)
  .execute(&mut **tx)
  .await
  .map_err(backend)?;
  Ok(())
}

#[async_trait]
impl CatalogStore for PgStore {
  #[instrument(name = "pg_store::list_products", skip(self), err(Display))]
  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    let rows: Vec<ProductRow> = sqlx::query_as(&format!("SELECT {} FROM products ORDER BY name ASC, id ASC", PRODUCT_COLUMNS))
      .fetch_all(&self.pool)
      .await
      .map_err(backend)?;
    Ok(rows.into_iter().map(Product::from).collect())
  }

  #[instrument(name = "pg_store::find_product", skip(self), err(Display))]
  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
    let row: Option<ProductRow> = sqlx::query_as(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(backend)?;
    Ok(row.map(Product::from))
  }

  #[instrument(name = "pg_store::find_products", skip(self, ids), fields(count = ids.len()), err(Display))]
  async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let rows: Vec<ProductRow> = sqlx::query_as(&format!("SELECT {} FROM products WHERE id = ANY($1)", PRODUCT_COLUMNS))
      .bind(ids)
      .fetch_all(&self.pool)
      .await
      .map_err(backend)?;
    Ok(rows.into_iter().map(Product::from).collect())
  }

  #[instrument(name = "pg_store::insert_product", skip(self, product), fields(product_id = %product.id), err(Display))]
  async fn insert_product(&self, product: &Product) -> StoreResult<()> {
    sqlx::query(
      "INSERT INTO products (id, name, price, image, description) VALUES ($1, $2, $3, $4, $5) \
       ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, price = EXCLUDED.price, \
       image = EXCLUDED.image, description = EXCLUDED.description",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(product.price)
    .bind(&product.image)
    .bind(&product.description)
    .execute(&self.pool)
    .await
    .map_err(backend)?;
    Ok(())
  }
}

#[async_trait]
impl UserStore for PgStore {
  #[instrument(name = "pg_store::find_user", skip(self), err(Display))]
  async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
      "SELECT id, email, password_hash, name, surname, address, birthdate, version, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(backend)?;
    match row {
      Some(row) => Ok(Some(self.assemble_user(row).await?)),
      None => Ok(None),
    }
  }

  #[instrument(name = "pg_store::find_user_by_email", skip(self, email), err(Display))]
  async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
      "SELECT id, email, password_hash, name, surname, address, birthdate, version, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(&self.pool)
    .await
    .map_err(backend)?;
    match row {
      Some(row) => Ok(Some(self.assemble_user(row).await?)),
      None => Ok(None),
    }
  }

  #[instrument(name = "pg_store::find_profiles", skip(self, ids), fields(count = ids.len()), err(Display))]
  async fn find_profiles(&self, ids: &[Uuid]) -> StoreResult<Vec<UserProfile>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let rows: Vec<ProfileRow> =
      sqlx::query_as("SELECT id, email, name, surname, address, birthdate FROM users WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
    Ok(rows.into_iter().map(UserProfile::from).collect())
  }

  #[instrument(name = "pg_store::insert_user", skip(self, user), fields(user_id = %user.id), err(Display))]
  async fn insert_user(&self, user: &User) -> StoreResult<()> {
    let result = sqlx::query(
      "INSERT INTO users (id, email, password_hash, name, surname, address, birthdate, version, created_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.name)
    .bind(&user.surname)
    .bind(&user.address)
    .bind(user.birthdate)
    .bind(user.version)
    .bind(user.created_at)
    .execute(&self.pool)
    .await;

    match result {
      Ok(_) => Ok(()),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(StoreError::DuplicateEmail {
        email: user.email.clone(),
      }),
      Err(e) => Err(backend(e)),
    }
  }

  #[instrument(name = "pg_store::save_cart", skip(self, items), fields(entries = items.len()), err(Display))]
  async fn save_cart(&self, user_id: Uuid, expected_version: i64, items: &[CartItem]) -> StoreResult<i64> {
    let mut tx = self.pool.begin().await.map_err(backend)?;
    let new_version = claim_version(&mut tx, user_id, expected_version).await?;
    replace_cart_rows(&mut tx, user_id, items).await?;
    tx.commit().await.map_err(backend)?;
    Ok(new_version)
  }
}

#[async_trait]
impl OrderStore for PgStore {
  #[instrument(name = "pg_store::place_order", skip(self, order), fields(order_id = %order.id, user_id = %order.user_id), err(Display))]
  async fn place_order(&self, order: &Order, expected_version: i64) -> StoreResult<()> {
    let mut tx = self.pool.begin().await.map_err(backend)?;
    claim_version(&mut tx, order.user_id, expected_version).await?;

    sqlx::query(
      "INSERT INTO orders (id, user_id, address, card_holder, card_last4, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(&order.address)
    .bind(&order.card_holder)
    .bind(&order.card_last4)
    .bind(order.created_at)
    .execute(&mut *tx)
    .await
    .map_err(backend)?;

    let product_ids: Vec<Uuid> = order.items.iter().map(|item| item.product_id).collect();
    let quantities: Vec<i32> = order.items.iter().map(|item| item.quantity).collect();
    let prices: Vec<Decimal> = order.items.iter().map(|item| item.price).collect();
    let positions: Vec<i32> = (0..order.items.len() as i32).collect();
    sqlx::query(
      "INSERT INTO order_items (order_id, position, product_id, quantity, price) \
       SELECT $1, position, product_id, quantity, price \
       FROM UNNEST($2::int4[], $3::uuid[], $4::int4[], $5::numeric[]) AS t(position, product_id, quantity, price)",
    )
    .bind(order.id)
    .bind(&positions)
    .bind(&product_ids)
    .bind(&quantities)
    .bind(&prices)
    .execute(&mut *tx)
    .await
    .map_err(backend)?;

    replace_cart_rows(&mut tx, order.user_id, &[]).await?;
    // Both writes land together or not at all.
    tx.commit().await.map_err(backend)?;
    Ok(())
  }

  #[instrument(name = "pg_store::find_order", skip(self), err(Display))]
  async fn find_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
      .bind(id)
      .fetch_all(&self.pool)
      .await
      .map_err(backend)?;
    Ok(self.assemble_orders(rows).await?.into_iter().next())
  }

  #[instrument(name = "pg_store::orders_for_user", skip(self), err(Display))]
  async fn orders_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>> {
    let rows: Vec<OrderRow> =
      sqlx::query_as(&format!("SELECT {} FROM orders WHERE user_id = $1 ORDER BY seq", ORDER_COLUMNS))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
    self.assemble_orders(rows).await
  }

  #[instrument(name = "pg_store::list_orders", skip(self), err(Display))]
  async fn list_orders(&self) -> StoreResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!("SELECT {} FROM orders ORDER BY seq", ORDER_COLUMNS))
      .fetch_all(&self.pool)
      .await
      .map_err(backend)?;
    self.assemble_orders(rows).await
  }
}
