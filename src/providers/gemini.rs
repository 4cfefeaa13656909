use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::app_config::{ProviderConfig, VideoMode};
use crate::errors::ProviderError;
use crate::operation::{LongRunningOperation, OperationStatus, SimulatedOperation};
use crate::providers::{GeneratedImage, ImageRequest, OutlineRequest, Provider, VideoOperation, VideoRequest};

/// API version prefix of the Generative Language REST API
const API_VERSION: &str = "v1beta";

/// Gemini client for the Generative Language API
#[derive(Clone)]
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Base URL of the service
    endpoint: String,
    /// Model used for slide text
    text_model: String,
    /// Model used for images
    image_model: String,
    /// Model used for video
    video_model: String,
    /// Temperature for text generation
    temperature: Option<f32>,
    /// How the intro video is produced
    video_mode: VideoMode,
    /// Delay of the simulated video job
    simulated_video_delay: Duration,
    /// Video reference returned by the simulated job
    placeholder_video_url: String,
}

impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("endpoint", &self.endpoint)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("video_model", &self.video_model)
            .field("video_mode", &self.video_mode)
            .finish()
    }
}

/// Text part of a content block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Text payload
    #[serde(default)]
    pub text: String,
}

/// Content block of a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Author role (user or model)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Parts of the content
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Generation parameters of a generateContent request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParameters {
    /// Output MIME type
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    /// Output schema
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// generateContent request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents
    contents: Vec<Content>,
    /// System instruction
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    /// Generation parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationParameters>,
}

impl GenerateContentRequest {
    /// Create a request with a single user prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::text(Some("user"), prompt)],
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Set the system instruction
    pub fn system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::text(None, instruction));
        self
    }

    /// Require a JSON response following the given schema
    pub fn json_schema(mut self, schema: serde_json::Value) -> Self {
        let params = self.generation_config.get_or_insert(GenerationParameters {
            response_mime_type: None,
            response_schema: None,
            temperature: None,
        });
        params.response_mime_type = Some("application/json".to_string());
        params.response_schema = Some(schema);
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        let params = self.generation_config.get_or_insert(GenerationParameters {
            response_mime_type: None,
            response_schema: None,
            temperature: None,
        });
        params.temperature = Some(temperature);
        self
    }
}

/// Candidate answer of a generateContent response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Number of prompt tokens
    #[serde(default)]
    pub prompt_token_count: u64,
    /// Number of generated tokens
    #[serde(default)]
    pub candidates_token_count: u64,
}

/// generateContent response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate answers
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Token usage information
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

/// Prompt instance of a predict request
#[derive(Debug, Clone, Serialize)]
pub struct PromptInstance {
    /// Prompt text
    prompt: String,
}

/// Image output options
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    /// Output image format
    mime_type: String,
}

/// Image generation parameters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageParameters {
    /// Number of images
    sample_count: u32,
    /// Aspect ratio
    aspect_ratio: String,
    /// Output options
    output_options: OutputOptions,
}

/// Imagen predict request
#[derive(Debug, Clone, Serialize)]
pub struct PredictImageRequest {
    instances: Vec<PromptInstance>,
    parameters: ImageParameters,
}

impl From<&ImageRequest> for PredictImageRequest {
    fn from(request: &ImageRequest) -> Self {
        Self {
            instances: vec![PromptInstance { prompt: request.prompt.clone() }],
            parameters: ImageParameters {
                sample_count: request.number_of_images,
                aspect_ratio: request.aspect_ratio.clone(),
                output_options: OutputOptions {
                    mime_type: request.mime_type.clone(),
                },
            },
        }
    }
}

/// Single generated image
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Base64 encoded image bytes
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    /// Image format
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Imagen predict response
#[derive(Debug, Clone, Deserialize)]
pub struct PredictImageResponse {
    /// Generated images
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// Video generation parameters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoParameters {
    aspect_ratio: String,
}

/// Veo predictLongRunning request
#[derive(Debug, Clone, Serialize)]
pub struct PredictVideoRequest {
    instances: Vec<PromptInstance>,
    parameters: VideoParameters,
}

/// Error block of a long-running operation
#[derive(Debug, Clone, Deserialize)]
pub struct OperationErrorBody {
    /// Status code
    #[serde(default)]
    pub code: i32,
    /// Error message
    #[serde(default)]
    pub message: String,
}

/// Long-running operation resource
#[derive(Debug, Clone, Deserialize)]
pub struct OperationResource {
    /// Operation name used for polling
    pub name: String,
    /// Whether the operation has finished
    #[serde(default)]
    pub done: bool,
    /// Error, when finished unsuccessfully
    #[serde(default)]
    pub error: Option<OperationErrorBody>,
    /// Result payload, when finished successfully
    #[serde(default)]
    pub response: Option<serde_json::Value>,
}

impl OperationResource {
    /// Translate the resource into an operation status
    pub fn status(&self) -> OperationStatus<String> {
        if !self.done {
            return OperationStatus::Pending;
        }

        if let Some(err) = &self.error {
            return OperationStatus::Failed(format!("{} (code {})", err.message, err.code));
        }

        let uri = self
            .response
            .as_ref()
            .and_then(|r| r.pointer("/generateVideoResponse/generatedSamples/0/video/uri"))
            .and_then(|v| v.as_str());

        match uri {
            Some(uri) => OperationStatus::Done(uri.to_string()),
            None => OperationStatus::Failed("operation finished without a video".to_string()),
        }
    }
}

impl Gemini {
    /// Create a client from the provider configuration
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            video_model: config.video_model.clone(),
            temperature: config.temperature,
            video_mode: config.video.mode,
            simulated_video_delay: Duration::from_millis(config.video.simulated_delay_ms),
            placeholder_video_url: config.video.placeholder_url.clone(),
        }
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/{}/models/{}:{}", self.endpoint, API_VERSION, model, method)
    }

    /// Send a JSON request and decode the JSON answer
    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        read_json(response).await
    }

    /// Complete a generateContent request
    pub async fn generate_content(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse, ProviderError> {
        let url = self.model_url(&self.text_model, "generateContent");
        let response: GenerateContentResponse = self.post_json(&url, request).await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                "Gemini usage: {} prompt tokens, {} completion tokens",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(response)
    }

    /// Extract text from the first candidate of a response
    pub fn extract_text(response: &GenerateContentResponse) -> String {
        response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }

    /// Convert an Imagen response into the first generated image
    pub fn first_image(response: PredictImageResponse, requested_mime: &str) -> Result<GeneratedImage, ProviderError> {
        response
            .predictions
            .into_iter()
            .find_map(|p| {
                p.bytes_base64_encoded.filter(|b| !b.is_empty()).map(|bytes| GeneratedImage {
                    mime_type: p.mime_type.unwrap_or_else(|| requested_mime.to_string()),
                    bytes_base64: bytes,
                })
            })
            .ok_or_else(|| ProviderError::EmptyResponse("No images were generated.".to_string()))
    }
}

/// Decode a JSON body, turning non-success statuses into provider errors
async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("Gemini API error ({}): {}", status, error_text);
        return Err(ProviderError::from_status(status.as_u16(), error_text));
    }

    response
        .json::<R>()
        .await
        .map_err(|e| ProviderError::ParseError(e.to_string()))
}

/// Video job running on the service, polled through its operation name
pub struct RemoteVideoOperation {
    client: Client,
    api_key: String,
    endpoint: String,
    name: String,
}

#[async_trait]
impl LongRunningOperation for RemoteVideoOperation {
    type Output = String;

    fn name(&self) -> &str {
        &self.name
    }

    async fn poll(&self) -> Result<OperationStatus<String>, ProviderError> {
        let url = format!("{}/{}/{}", self.endpoint, API_VERSION, self.name);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let resource: OperationResource = read_json(response).await?;
        Ok(resource.status())
    }
}

#[async_trait]
impl Provider for Gemini {
    async fn generate_outline(&self, request: OutlineRequest) -> Result<String, ProviderError> {
        let mut body = GenerateContentRequest::new(request.prompt)
            .system(request.system_instruction)
            .json_schema(request.response_schema);
        if let Some(temperature) = self.temperature {
            body = body.temperature(temperature);
        }

        let response = self.generate_content(&body).await?;
        let text = Self::extract_text(&response);
        if text.trim().is_empty() {
            let reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(ProviderError::EmptyResponse(format!("model returned no text ({})", reason)));
        }

        Ok(text)
    }

    async fn generate_image(&self, request: ImageRequest) -> Result<GeneratedImage, ProviderError> {
        let url = self.model_url(&self.image_model, "predict");
        let response: PredictImageResponse = self.post_json(&url, &PredictImageRequest::from(&request)).await?;
        Self::first_image(response, &request.mime_type)
    }

    async fn start_video(&self, request: VideoRequest) -> Result<VideoOperation, ProviderError> {
        match self.video_mode {
            VideoMode::Simulated => {
                debug!(
                    "Simulating video generation for topic: {} with model {}",
                    request.topic, self.video_model
                );
                Ok(Box::new(SimulatedOperation::start(
                    format!("simulated video for '{}'", request.topic),
                    self.simulated_video_delay,
                    self.placeholder_video_url.clone(),
                )))
            }
            VideoMode::Remote => {
                let url = self.model_url(&self.video_model, "predictLongRunning");
                let body = PredictVideoRequest {
                    instances: vec![PromptInstance { prompt: request.prompt }],
                    parameters: VideoParameters {
                        aspect_ratio: request.aspect_ratio,
                    },
                };
                let resource: OperationResource = self.post_json(&url, &body).await?;
                debug!("Submitted video operation {}", resource.name);

                Ok(Box::new(RemoteVideoOperation {
                    client: self.client.clone(),
                    api_key: self.api_key.clone(),
                    endpoint: self.endpoint.clone(),
                    name: resource.name,
                }))
            }
        }
    }
}
