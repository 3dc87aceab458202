//! Domain models for the storefront API.
//!
//! These are the shapes handed to route handlers and serialized to clients.
//! Field names serialize as camelCase to match the public API contract.

pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use order::{AdminOrderView, Order, OrderItemDetail, OrderUser, OrderWithItems};
pub use product::{Product, ProductDetail};
pub use review::ReviewWithAuthor;
pub use user::User;
