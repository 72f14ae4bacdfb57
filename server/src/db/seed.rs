// server/src/db/seed.rs

//! Demo catalog inserted on startup when `SEED_DB` is set.

use eterna::models::NewProduct;
use eterna::{ShopResult, Services};
use rust_decimal::Decimal;
use tracing::{info, instrument};

fn demo_products() -> Vec<NewProduct> {
  let product = |name: &str, cents: i64, image: &str, description: &str| NewProduct {
    name: name.to_string(),
    price: Decimal::new(cents, 2),
    image: image.to_string(),
    description: description.to_string(),
  };
  vec![
    product("Ceramic Mug", 1450, "/images/mug.jpg", "Stoneware mug, 350 ml."),
    product("Linen Tote", 2200, "/images/tote.jpg", "Washed linen bag with inner pocket."),
    product("Notebook A5", 899, "/images/notebook.jpg", "Dot grid, 120 pages."),
    product("Desk Lamp", 4999, "/images/lamp.jpg", "Adjustable arm, warm LED."),
  ]
}

/// Inserts the demo catalog unless products already exist. Returns how many were added.
#[instrument(name = "seed::catalog", skip(services), err(Display))]
pub async fn seed_catalog(services: &Services) -> ShopResult<usize> {
  if !services.catalog.products().await?.is_empty() {
    info!("Catalog already populated, skipping seed.");
    return Ok(0);
  }

  let mut inserted = 0;
  for new_product in demo_products() {
    services.catalog.add_product(new_product).await?;
    inserted += 1;
  }
  info!(inserted, "Seeded demo catalog.");
  Ok(inserted)
}
