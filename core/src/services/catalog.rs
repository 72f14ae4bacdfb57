// core/src/services/catalog.rs

use crate::error::{ShopError, ShopResult};
use crate::models::{NewProduct, Product};
use crate::store::Store;

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Read access to the product catalog.
#[derive(Clone)]
pub struct CatalogService {
  store: Arc<dyn Store>,
}

impl CatalogService {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }

  #[instrument(name = "catalog_service::products", skip(self), err(Display))]
  pub async fn products(&self) -> ShopResult<Vec<Product>> {
    Ok(self.store.list_products().await?)
  }

  #[instrument(name = "catalog_service::product", skip(self), err(Display))]
  pub async fn product(&self, product_id: Uuid) -> ShopResult<Option<Product>> {
    Ok(self.store.find_product(product_id).await?)
  }

  /// Used for seeding demo data.
  #[instrument(name = "catalog_service::add_product", skip(self, new_product), fields(name = %new_product.name), err(Display))]
  pub async fn add_product(&self, new_product: NewProduct) -> ShopResult<Product> {
    ensure_valid_price(new_product.price)?;
    let product = new_product.into_product(Uuid::new_v4());
    self.store.insert_product(&product).await?;
    info!(product_id = %product.id, "Product added to catalog.");
    Ok(product)
  }
}

/// Prices are stored with cent precision; anything finer would be rounded by the database.
fn ensure_valid_price(price: Decimal) -> ShopResult<()> {
  if price.is_sign_negative() || price.normalize().scale() > 2 {
    return Err(ShopError::InvalidPrice(price));
  }
  Ok(())
}
