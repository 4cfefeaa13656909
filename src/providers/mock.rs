/*!
 * Mock provider implementation for testing.
 *
 * This module provides a scripted provider that simulates different behaviors:
 * - `MockProvider::working()` - Always returns a well-formed outline, images and video
 * - `MockProvider::malformed_outline()` - Returns an outline missing the bullet list
 * - `MockProvider::failing()` - Every call errors
 * - `fail_images_containing(..)` - Image requests whose prompt matches fail
 */

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::operation::SimulatedOperation;
use crate::providers::{GeneratedImage, ImageRequest, OutlineRequest, Provider, VideoOperation, VideoRequest};

/// Behavior mode for outline requests
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a schema-conforming outline
    Working,
    /// Succeeds but omits the bullet list of every slide
    MalformedOutline,
    /// Returns a valid outline with one slide fewer than requested
    ShortOutline,
    /// Every call fails with an error
    Failing,
    /// Simulates slow responses
    Slow { delay_ms: u64 },
}

/// Mock provider recording every call it receives
#[derive(Debug, Clone)]
pub struct MockProvider {
    behavior: MockBehavior,
    /// Substrings of image prompts that must fail
    failing_image_prompts: Vec<String>,
    /// Whether the video job fails to start
    video_fails: bool,
    /// Delay of the simulated video job
    video_delay: Duration,
    /// Custom outline generator
    custom_outline: Option<fn(&OutlineRequest) -> String>,
    /// Ordered log of calls ("outline", "image:<prompt>", "video")
    calls: Arc<Mutex<Vec<String>>>,
    /// Request counter
    request_count: Arc<AtomicUsize>,
    /// Image requests currently awaiting a response
    images_in_flight: Arc<AtomicUsize>,
    /// Highest number of image requests seen in flight together
    peak_images_in_flight: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            failing_image_prompts: Vec::new(),
            video_fails: false,
            video_delay: Duration::from_millis(5),
            custom_outline: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            request_count: Arc::new(AtomicUsize::new(0)),
            images_in_flight: Arc::new(AtomicUsize::new(0)),
            peak_images_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock provider
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock returning outlines without bullets
    pub fn malformed_outline() -> Self {
        Self::new(MockBehavior::MalformedOutline)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Fail image requests whose prompt contains the given text
    pub fn fail_images_containing(mut self, needle: impl Into<String>) -> Self {
        self.failing_image_prompts.push(needle.into());
        self
    }

    /// Make the video job fail to start
    pub fn failing_video(mut self) -> Self {
        self.video_fails = true;
        self
    }

    /// Set a custom outline generator
    pub fn with_custom_outline(mut self, generator: fn(&OutlineRequest) -> String) -> Self {
        self.custom_outline = Some(generator);
        self
    }

    /// Ordered log of received calls
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Total number of requests received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Highest number of image requests that were in flight at the same time
    pub fn peak_images_in_flight(&self) -> usize {
        self.peak_images_in_flight.load(Ordering::SeqCst)
    }

    /// Well-formed outline JSON with `count` slides about `topic`
    pub fn outline_json(topic: &str, count: usize) -> String {
        let slides: Vec<_> = (0..count)
            .map(|i| {
                json!({
                    "title": format!("{} part {}", topic, i + 1),
                    "bullets": [
                        format!("Point A of slide {}", i + 1),
                        format!("Point B of slide {}", i + 1),
                        format!("Point C of slide {}", i + 1),
                    ],
                    "speaker_notes": format!("Talk about part {} of {}.", i + 1, topic),
                    "image_prompt": format!("illustration for slide {}", i + 1),
                })
            })
            .collect();
        json!({ "slides": slides }).to_string()
    }

    /// Base64 payload the mock returns for a given image prompt
    pub fn image_payload(prompt: &str) -> String {
        STANDARD.encode(format!("image:{}", prompt))
    }

    fn record(&self, call: String) {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn generate_outline(&self, request: OutlineRequest) -> Result<String, ProviderError> {
        self.record("outline".to_string());

        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),
            MockBehavior::MalformedOutline => {
                let slides: Vec<_> = (0..request.slides_count)
                    .map(|i| json!({"title": format!("Slide {}", i + 1), "speaker_notes": "", "image_prompt": "x"}))
                    .collect();
                Ok(json!({ "slides": slides }).to_string())
            }
            MockBehavior::ShortOutline => Ok(Self::outline_json(&request.topic, request.slides_count.saturating_sub(1))),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(Self::outline_json(&request.topic, request.slides_count))
            }
            MockBehavior::Working => Ok(match self.custom_outline {
                Some(generator) => generator(&request),
                None => Self::outline_json(&request.topic, request.slides_count),
            }),
        }
    }

    async fn generate_image(&self, request: ImageRequest) -> Result<GeneratedImage, ProviderError> {
        self.record(format!("image:{}", request.prompt));

        let in_flight = self.images_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_images_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        if let MockBehavior::Slow { delay_ms } = self.behavior {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        self.images_in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.behavior == MockBehavior::Failing
            || self.failing_image_prompts.iter().any(|needle| request.prompt.contains(needle))
        {
            return Err(ProviderError::ApiError {
                message: "Simulated image failure".to_string(),
                status_code: 503,
            });
        }

        Ok(GeneratedImage {
            mime_type: request.mime_type,
            bytes_base64: Self::image_payload(&request.prompt),
        })
    }

    async fn start_video(&self, request: VideoRequest) -> Result<VideoOperation, ProviderError> {
        self.record("video".to_string());

        if self.video_fails || self.behavior == MockBehavior::Failing {
            return Err(ProviderError::ApiError {
                message: "Simulated video failure".to_string(),
                status_code: 500,
            });
        }

        Ok(Box::new(SimulatedOperation::start(
            "mock video",
            self.video_delay,
            format!("https://videos.example.com/{}.mp4", request.topic.replace(' ', "-")),
        )))
    }
}
