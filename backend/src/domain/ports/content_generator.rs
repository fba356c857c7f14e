//! Driven port for the generative text model used by the content lab.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by content generator adapters.
    pub enum ContentGeneratorError {
        /// Network transport failed or a non-success status came back.
        Transport { message: String } =>
            "content generator transport failed: {message}",
        /// The model returned no usable text.
        EmptyResponse =>
            "content generator returned no text",
        /// The payload could not be decoded.
        Decode { message: String } =>
            "content generator response decode failed: {message}",
    }
}

/// Port for single-shot text generation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate text for a fully assembled prompt.
    async fn generate(&self, prompt: &str) -> Result<String, ContentGeneratorError>;
}
