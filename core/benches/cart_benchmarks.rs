use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use eterna::models::{CheckoutDetails, NewProduct, NewUser};
use eterna::{Argon2Hasher, HashCost, MemoryStore, Services, Store};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::runtime::Runtime; // To run async code within Criterion
use uuid::Uuid;

struct Fixture {
  services: Services,
  user_id: Uuid,
  product_ids: Vec<Uuid>,
}

fn build_fixture(rt: &Runtime, catalog_size: usize) -> Fixture {
  rt.block_on(async {
    let hasher = Argon2Hasher::new(HashCost {
      memory_kib: 1024,
      iterations: 1,
      parallelism: 1,
    })
    .unwrap();
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let services = Services::new(store, Arc::new(hasher), eterna::DEFAULT_WRITE_RETRIES);

    let mut product_ids = Vec::with_capacity(catalog_size);
    for i in 0..catalog_size {
      let product = services
        .catalog
        .add_product(NewProduct {
          name: format!("Product {}", i),
          price: Decimal::new(1000 + i as i64, 2),
          image: format!("/images/{}.jpg", i),
          description: String::new(),
        })
        .await
        .unwrap();
      product_ids.push(product.id);
    }

    let user_id = services
      .accounts
      .register(NewUser {
        email: "bench@example.com".to_string(),
        password: "bench-password".to_string(),
        name: "Bench".to_string(),
        surname: "Mark".to_string(),
        address: "1 Bench Rd".to_string(),
        birthdate: chrono::NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
      })
      .await
      .unwrap();

    Fixture {
      services,
      user_id,
      product_ids,
    }
  })
}

fn bench_cart_mutations(c: &mut Criterion) {
  let rt = Runtime::new().unwrap();
  let mut group = c.benchmark_group("CartMutations");
  group.throughput(Throughput::Elements(1));

  for catalog_size in [1usize, 10, 50] {
    let fixture = build_fixture(&rt, catalog_size);
    group.bench_with_input(
      BenchmarkId::new("add_product", catalog_size),
      &fixture,
      |b, fixture| {
        let mut next = 0usize;
        b.to_async(&rt).iter(|| {
          let product_id = fixture.product_ids[next % fixture.product_ids.len()];
          next += 1;
          async move {
            fixture.services.carts.add_product(fixture.user_id, product_id, 1).await.unwrap();
          }
        });
      },
    );
    group.bench_with_input(
      BenchmarkId::new("update_item", catalog_size),
      &fixture,
      |b, fixture| {
        let product_id = fixture.product_ids[0];
        b.to_async(&rt).iter(|| async move {
          fixture.services.carts.update_item(fixture.user_id, product_id, 2).await.unwrap();
        });
      },
    );
  }
  group.finish();
}

fn bench_checkout(c: &mut Criterion) {
  let rt = Runtime::new().unwrap();
  let fixture = build_fixture(&rt, 10);
  c.bench_function("create_order_10_lines", |b| {
    b.to_async(&rt).iter(|| async {
      for product_id in &fixture.product_ids {
        fixture.services.carts.add_product(fixture.user_id, *product_id, 1).await.unwrap();
      }
      let details = CheckoutDetails {
        address: "1 Bench Rd".to_string(),
        card_holder: "Bench Mark".to_string(),
        card_number: "4242424242424242".to_string(),
      };
      fixture.services.orders.create_order(fixture.user_id, details).await.unwrap();
    });
  });
}

criterion_group!(benches, bench_cart_mutations, bench_checkout);
criterion_main!(benches);
