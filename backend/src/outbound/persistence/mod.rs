//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL through `diesel` with async connections from `diesel-async`.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) are implementation details, never exposed to the domain.
//! - **Per-call connections**: every operation opens one connection through
//!   [`ConnectionFactory`] and drops it after a single statement set; there
//!   is no pooling and no cross-call transaction.
//! - **Strongly typed errors**: database failures map to the port error
//!   types, keeping the coordinate uniqueness violation distinguishable from
//!   infrastructure faults.

mod connect;
mod diesel_error_mapping;
mod diesel_heritage_repository;
mod diesel_user_repository;
mod models;
mod schema;

pub use connect::{ConnectError, ConnectionFactory, StoreConfig};
pub use diesel_heritage_repository::DieselHeritagePointRepository;
pub use diesel_user_repository::DieselUserRepository;
