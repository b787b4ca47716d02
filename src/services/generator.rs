use async_trait::async_trait;

use crate::models::job::ImagePayload;

/// A remote service that turns a source image and a prompt into a new image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        source: &ImagePayload,
        prompt: &str,
    ) -> Result<ImagePayload, GenerationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse generation response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No image was generated in the response")]
    NoImage,

    #[error("Generated image is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
}
