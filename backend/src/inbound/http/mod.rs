//! HTTP inbound adapter exposing the dashboard's JSON API.

pub mod campaigns;
pub mod content_lab;
pub mod courses;
pub mod enrollments;
pub mod error;
pub mod flash;
pub mod health;
pub mod messages;
pub mod schemas;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
