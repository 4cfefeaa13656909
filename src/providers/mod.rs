/*!
 * Provider implementations for the generative AI service.
 *
 * This module contains the client implementations used by the generation pipeline:
 * - Gemini: Google Generative Language REST API (text, Imagen, Veo)
 * - Mock: scripted in-process provider for tests
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::operation::LongRunningOperation;

/// Request for the structured slide outline
#[derive(Debug, Clone)]
pub struct OutlineRequest {
    /// Presentation topic
    pub topic: String,
    /// Number of slides the prompt asks for
    pub slides_count: usize,
    /// User prompt
    pub prompt: String,
    /// System instruction, including the style directive
    pub system_instruction: String,
    /// JSON schema the response must follow
    pub response_schema: serde_json::Value,
}

/// Request for a single slide image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    /// Full image prompt, including the style directive
    pub prompt: String,
    /// Number of images to generate
    pub number_of_images: u32,
    /// Aspect ratio, e.g. "16:9"
    pub aspect_ratio: String,
    /// Output image format
    pub mime_type: String,
}

impl ImageRequest {
    /// Single 16:9 JPEG image for the given prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            number_of_images: 1,
            aspect_ratio: "16:9".to_string(),
            mime_type: "image/jpeg".to_string(),
        }
    }
}

/// Encoded image returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Image format
    pub mime_type: String,
    /// Base64 encoded image bytes
    pub bytes_base64: String,
}

impl GeneratedImage {
    /// Displayable inline reference for the image
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.bytes_base64)
    }
}

/// Request for the introductory video
#[derive(Debug, Clone)]
pub struct VideoRequest {
    /// Presentation topic
    pub topic: String,
    /// Video prompt
    pub prompt: String,
    /// Aspect ratio, e.g. "16:9"
    pub aspect_ratio: String,
}

/// Handle to a submitted video job resolving to the video reference
pub type VideoOperation = Box<dyn LongRunningOperation<Output = String>>;

/// Common trait for generative AI providers
///
/// This trait defines the three calls the generation pipeline relies on,
/// allowing the real service and test doubles to be used interchangeably.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Generate the slide outline
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The raw JSON text returned by the model
    async fn generate_outline(&self, request: OutlineRequest) -> Result<String, ProviderError>;

    /// Generate one image
    async fn generate_image(&self, request: ImageRequest) -> Result<GeneratedImage, ProviderError>;

    /// Submit the intro video job
    async fn start_video(&self, request: VideoRequest) -> Result<VideoOperation, ProviderError>;
}

pub mod gemini;
pub mod mock;
