//! Moodle outbound adapters.
//!
//! This module provides the reqwest implementation of the
//! `LearningPlatform` port.

mod dto;
mod http_client;

pub use http_client::{DEFAULT_MOODLE_TIMEOUT, MoodleHttpClient};
