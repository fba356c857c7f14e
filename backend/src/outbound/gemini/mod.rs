//! Gemini outbound adapter for the content lab.

mod http_generator;

pub use http_generator::{DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_TIMEOUT, GeminiHttpGenerator};
