//! GoPhish outbound adapters.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_GOPHISH_TIMEOUT, GophishHttpSource, GophishSettings};
