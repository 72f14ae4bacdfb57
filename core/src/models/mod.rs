// core/src/models/mod.rs

//! Data structures for users, products, carts and orders.

pub mod cart_item;
pub mod order;
pub mod order_item;
pub mod product;
pub mod user;

pub use cart_item::{CartItem, CartLine, CartUpdate};
pub use order::{CheckoutDetails, Order, OrderDetails, OrderWithOwner};
pub use order_item::{OrderItem, OrderLine};
pub use product::{NewProduct, Product};
pub use user::{normalize_email, NewUser, User, UserProfile};
