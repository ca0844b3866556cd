//! HTTP handlers, one module per resource.

pub mod admin_users;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod posts;
pub mod products;
pub mod profile;
