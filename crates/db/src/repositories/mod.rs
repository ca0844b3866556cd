//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. [`CheckoutService`] is the
//! one member that owns a multi-statement transaction.

pub mod cart_repo;
pub mod checkout;
pub mod order_repo;
pub mod post_repo;
pub mod product_repo;
pub mod profile_repo;
pub mod role_repo;
pub mod session_repo;
pub mod user_repo;

pub use cart_repo::CartRepo;
pub use checkout::{CheckoutError, CheckoutService};
pub use order_repo::OrderRepo;
pub use post_repo::PostRepo;
pub use product_repo::ProductRepo;
pub use profile_repo::ProfileRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
