//! Phishing remediation dashboard library.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the enrollment
//! workflow and its ports, [`outbound`] adapts the campaign server, learning
//! platform, generative model and PostgreSQL ledger, and [`inbound`] exposes
//! the JSON API.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
