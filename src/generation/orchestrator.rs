/*!
 * Generation orchestrator coordinating the pipeline stages.
 *
 * The orchestrator runs three strictly ordered stages:
 * 1. Outline: structured slide text from the text model (fatal on failure)
 * 2. Images: one image per slide, concurrently, with a fallback per failure
 * 3. Video: one intro video through a long-running operation
 */

use futures::stream::{self, StreamExt};
use log::{error, info, warn};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, VideoMode};
use crate::errors::GenerationError;
use crate::operation::await_operation;
use crate::presentation::{GenerationConfig, Presentation, Slide};
use crate::providers::Provider;
use crate::store::PresentationStore;
use crate::templates::Template;

use super::images::{regenerate_image, request_image};
use super::outline::parse_outline;
use super::prompts;

/// Poll interval for locally simulated video jobs
const SIMULATED_POLL_INTERVAL_MS: u64 = 250;

/// Stage of a generation run, displayed as a progress message
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationStage {
    /// Requesting the slide text
    Outline { topic: String },
    /// Requesting slide images
    Images { count: usize },
    /// Producing the intro video
    Video,
    /// Assembling the result
    Finalizing,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outline { topic } => write!(f, "Crafting presentation outline for \"{}\"...", topic),
            Self::Images { count } => write!(f, "Generating visuals for {} slides...", count),
            Self::Video => write!(f, "Producing animated intro video..."),
            Self::Finalizing => write!(f, "Finalizing presentation..."),
        }
    }
}

/// Result of a single-slide image regeneration
#[derive(Debug, Clone, PartialEq)]
pub enum RegenerationOutcome {
    /// The slide image was replaced; the store is at `version`
    Updated { slide_id: String, version: u64 },
    /// Another regeneration is in flight
    Busy { in_flight: String },
    /// The slide does not exist in the current presentation
    UnknownSlide { slide_id: String },
    /// The image request failed; the previous image is kept
    Failed { slide_id: String, reason: String },
}

/// Tuning of the generation pipeline
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Maximum number of image requests in flight
    pub max_concurrent_images: usize,
    /// Image reference substituted for failed image requests
    pub fallback_image_url: String,
    /// Pause before returning a finished presentation
    pub finalize_delay: Duration,
    /// Delay between video status polls
    pub video_poll_interval: Duration,
    /// Maximum time to wait for the video
    pub video_timeout: Option<Duration>,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl OrchestratorOptions {
    /// Build options from the application configuration
    pub fn from_config(config: &Config) -> Self {
        let video = &config.provider.video;
        Self {
            max_concurrent_images: config.provider.concurrent_image_requests.max(1),
            fallback_image_url: config.generation.fallback_image_url.clone(),
            finalize_delay: Duration::from_millis(config.generation.finalize_delay_ms),
            video_poll_interval: match video.mode {
                VideoMode::Simulated => Duration::from_millis(SIMULATED_POLL_INTERVAL_MS),
                VideoMode::Remote => Duration::from_millis(video.poll_interval_ms),
            },
            video_timeout: Some(Duration::from_secs(video.timeout_secs)),
        }
    }

    /// Options without artificial delays, polling quickly
    pub fn immediate() -> Self {
        Self {
            finalize_delay: Duration::ZERO,
            video_poll_interval: Duration::from_millis(1),
            ..Self::default()
        }
    }

    /// Set the fallback image reference
    pub fn with_fallback_image(mut self, url: impl Into<String>) -> Self {
        self.fallback_image_url = url.into();
        self
    }

    /// Set the image concurrency limit
    pub fn with_max_concurrent_images(mut self, limit: usize) -> Self {
        self.max_concurrent_images = limit.max(1);
        self
    }
}

/// Runs generation requests against a provider
#[derive(Debug, Clone)]
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    options: OrchestratorOptions,
}

impl Orchestrator {
    /// Create an orchestrator for the given provider
    pub fn new(provider: Arc<dyn Provider>, options: OrchestratorOptions) -> Self {
        Self { provider, options }
    }

    /// Provider in use
    pub fn provider(&self) -> Arc<dyn Provider> {
        self.provider.clone()
    }

    /// Options in use
    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    /// Generate a complete presentation.
    ///
    /// # Arguments
    /// * `config` - The generation request
    /// * `progress` - Receives a human-readable description of each stage
    ///
    /// # Returns
    /// * `Result<Presentation, GenerationError>` - The presentation, or the error that aborted the run
    pub async fn generate<F>(&self, config: &GenerationConfig, progress: F) -> Result<Presentation, GenerationError>
    where
        F: Fn(&str) + Send + Sync,
    {
        config.validate()?;
        let started = Instant::now();
        let report = |stage: GenerationStage| {
            let message = stage.to_string();
            info!("{}", message);
            progress(&message);
        };

        report(GenerationStage::Outline { topic: config.topic.clone() });
        let outline_text = self
            .provider
            .generate_outline(prompts::outline_request(config))
            .await
            .map_err(|e| {
                error!("Error generating slide content: {}", e);
                GenerationError::ContentGeneration(e)
            })?;
        let contents = parse_outline(&outline_text, config.slides_count)?;
        let mut presentation = Presentation::from_contents(config.topic.clone(), contents);

        if config.include_images {
            report(GenerationStage::Images { count: presentation.slides.len() });
            let images = self.generate_images(&presentation.slides, config.style_prompt()).await;
            for (slide, image) in presentation.slides.iter_mut().zip(images) {
                slide.image_url = Some(image);
            }
        }

        if config.include_video {
            report(GenerationStage::Video);
            let video_url = self.generate_video(&config.topic).await?;
            presentation = presentation.with_video(video_url);
        }

        report(GenerationStage::Finalizing);
        if !self.options.finalize_delay.is_zero() {
            tokio::time::sleep(self.options.finalize_delay).await;
        }

        info!(
            "Generated {} slides for \"{}\" in {:.1}s",
            presentation.slides.len(),
            presentation.title,
            started.elapsed().as_secs_f64()
        );
        Ok(presentation)
    }

    /// Request one image per slide; each failure becomes the fallback image.
    ///
    /// The returned references are in slide order.
    async fn generate_images(&self, slides: &[Slide], style: Option<&str>) -> Vec<String> {
        let provider = self.provider.as_ref();
        let fallback = self.options.fallback_image_url.as_str();

        stream::iter(slides.iter().enumerate())
            .map(|(index, slide)| async move {
                match request_image(provider, &slide.image_prompt, style).await {
                    Ok(uri) => uri,
                    Err(e) => {
                        warn!("Image for slide {} failed, using fallback: {}", index + 1, e);
                        fallback.to_string()
                    }
                }
            })
            .buffered(self.options.max_concurrent_images)
            .collect()
            .await
    }

    async fn generate_video(&self, topic: &str) -> Result<String, GenerationError> {
        let operation = self
            .provider
            .start_video(prompts::video_request(topic))
            .await
            .map_err(GenerationError::VideoGeneration)?;

        await_operation(operation.as_ref(), self.options.video_poll_interval, self.options.video_timeout)
            .await
            .map_err(GenerationError::VideoGeneration)
    }

    /// Replace one slide's image in the store.
    ///
    /// Only one regeneration runs per store at a time. Failures are logged
    /// and reported in the outcome; the store is left untouched.
    pub async fn regenerate_slide_image(
        &self,
        store: &PresentationStore,
        slide_id: &str,
        template: Option<&Template>,
    ) -> RegenerationOutcome {
        let _guard = match store.begin_regeneration(slide_id) {
            Ok(guard) => guard,
            Err(in_flight) => return RegenerationOutcome::Busy { in_flight },
        };

        let snapshot = store.snapshot();
        let Some(slide) = snapshot.slide(slide_id) else {
            return RegenerationOutcome::UnknownSlide { slide_id: slide_id.to_string() };
        };

        match regenerate_image(self.provider.as_ref(), slide, template).await {
            Ok(image) => match store.update(|p| p.with_slide_image(slide_id, image)) {
                Ok(version) => RegenerationOutcome::Updated {
                    slide_id: slide_id.to_string(),
                    version,
                },
                Err(_) => RegenerationOutcome::UnknownSlide { slide_id: slide_id.to_string() },
            },
            Err(e) => {
                error!("Failed to regenerate image: {}", e);
                RegenerationOutcome::Failed {
                    slide_id: slide_id.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }
}
