// tests/catalog_tests.rs
mod common;
use common::*;
use uuid::Uuid;

#[tokio::test]
async fn test_products_are_listed_by_name() {
  let shop = TestShop::new();
  shop.product("Sofa", price(89900)).await;
  shop.product("Lamp", price(4999)).await;
  shop.product("Chair", price(12000)).await;

  let names: Vec<String> = shop
    .services
    .catalog
    .products()
    .await
    .unwrap()
    .into_iter()
    .map(|product| product.name)
    .collect();

  assert_eq!(names, vec!["Chair", "Lamp", "Sofa"]);
}

#[tokio::test]
async fn test_product_lookup() {
  let shop = TestShop::new();
  let lamp = shop.product("Lamp", price(4999)).await;

  assert_eq!(shop.services.catalog.product(lamp.id).await.unwrap(), Some(lamp));
  assert_eq!(shop.services.catalog.product(Uuid::new_v4()).await.unwrap(), None);
}

#[tokio::test]
async fn test_product_price_serializes_as_number() {
  let shop = TestShop::new();
  let mug = shop.product("Mug", price(1250)).await;

  let json = serde_json::to_value(&mug).unwrap();
  assert_eq!(json["price"], serde_json::json!(12.5));
}

#[tokio::test]
async fn test_prices_finer_than_a_cent_are_rejected() {
  let shop = TestShop::new();
  let new_product = |price| eterna::models::NewProduct {
    name: "Mug".to_string(),
    price,
    image: "/images/mug.jpg".to_string(),
    description: "A mug".to_string(),
  };

  let err = shop
    .services
    .catalog
    .add_product(new_product(rust_decimal::Decimal::new(12345, 3)))
    .await
    .unwrap_err();
  assert!(matches!(err, eterna::ShopError::InvalidPrice(_)));

  let err = shop
    .services
    .catalog
    .add_product(new_product(rust_decimal::Decimal::new(-100, 2)))
    .await
    .unwrap_err();
  assert!(matches!(err, eterna::ShopError::InvalidPrice(_)));

  // Trailing zeros are not extra precision.
  let mug = shop
    .services
    .catalog
    .add_product(new_product(rust_decimal::Decimal::new(12500, 3)))
    .await
    .unwrap();
  assert_eq!(mug.price, price(1250));
  assert!(shop.services.catalog.products().await.unwrap().len() == 1);
}
