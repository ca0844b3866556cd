//! Framework-free domain layer for the shoply backend.
//!
//! Contains the error taxonomy, shared type aliases, role constants, and the
//! pure checkout arithmetic. Nothing in this crate touches the database or
//! the HTTP layer.

pub mod checkout;
pub mod error;
pub mod roles;
pub mod types;
