//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! The enrollment ledger lives here, backed by PostgreSQL via Diesel with
//! async support through `diesel-async` and `bb8` connection pooling.
//!
//! Diesel row structs (`models.rs`) and schema definitions (`schema.rs`) are
//! internal; the domain only sees `EnrollmentRecord`.
//!
//! # Example
//!
//! ```ignore
//! use dashboard::outbound::persistence::{DbPool, DieselEnrollmentLedger, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/dashboard")).await?;
//! let ledger = DieselEnrollmentLedger::new(pool);
//! ```

mod diesel_enrollment_ledger;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_enrollment_ledger::DieselEnrollmentLedger;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
