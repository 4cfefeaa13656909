use anyhow::{anyhow, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use url::Url;

use crate::presentation::{MAX_SLIDES, MIN_SLIDES};
use crate::templates::{TemplateCatalog, DEFAULT_TEMPLATE_ID};

/// Environment variables consulted for the API key, in priority order
pub const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Generative AI service settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Defaults for generation requests
    #[serde(default)]
    pub generation: GenerationDefaults,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// How the intro video is produced
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoMode {
    // @mode: Timer-backed placeholder job
    #[default]
    Simulated,
    // @mode: Real long-running job on the service
    Remote,
}

impl std::fmt::Display for VideoMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simulated => write!(f, "simulated"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

impl std::str::FromStr for VideoMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "simulated" => Ok(Self::Simulated),
            "remote" => Ok(Self::Remote),
            _ => Err(anyhow!("Invalid video mode: {}", s)),
        }
    }
}

/// Intro video settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VideoConfig {
    /// Simulated or remote generation
    #[serde(default)]
    pub mode: VideoMode,

    /// Duration of the simulated job in milliseconds
    #[serde(default = "default_simulated_video_delay_ms")]
    pub simulated_delay_ms: u64,

    /// Video reference returned by the simulated job
    #[serde(default = "default_placeholder_video_url")]
    pub placeholder_url: String,

    /// Delay between status polls in milliseconds
    #[serde(default = "default_video_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Maximum time to wait for the video in seconds
    #[serde(default = "default_video_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            mode: VideoMode::default(),
            simulated_delay_ms: default_simulated_video_delay_ms(),
            placeholder_url: default_placeholder_video_url(),
            poll_interval_ms: default_video_poll_interval_ms(),
            timeout_secs: default_video_timeout_secs(),
        }
    }
}

/// Generative AI service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model used for slide text
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Model used for slide images
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Model used for the intro video
    #[serde(default = "default_video_model")]
    pub video_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of image requests in flight
    #[serde(default = "default_concurrent_image_requests")]
    pub concurrent_image_requests: usize,

    /// Temperature parameter for text generation (0.0 to 2.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Intro video settings
    #[serde(default)]
    pub video: VideoConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            video_model: default_video_model(),
            timeout_secs: default_timeout_secs(),
            concurrent_image_requests: default_concurrent_image_requests(),
            temperature: None,
            video: VideoConfig::default(),
        }
    }
}

/// Defaults applied to generation requests
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationDefaults {
    /// Number of slides
    #[serde(default = "default_slides_count")]
    pub slides_count: usize,

    /// Generate one image per slide
    #[serde(default = "default_true")]
    pub include_images: bool,

    /// Generate the intro video
    #[serde(default)]
    pub include_video: bool,

    /// Template id
    #[serde(default = "default_template")]
    pub template: String,

    /// Image reference used when an image request fails
    #[serde(default = "default_fallback_image_url")]
    pub fallback_image_url: String,

    /// Pause before returning a finished presentation, in milliseconds
    #[serde(default = "default_finalize_delay_ms")]
    pub finalize_delay_ms: u64,

    /// Optional JSON file replacing the built-in template catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_path: Option<String>,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            slides_count: default_slides_count(),
            include_images: true,
            include_video: false,
            template: default_template(),
            fallback_image_url: default_fallback_image_url(),
            finalize_delay_ms: default_finalize_delay_ms(),
            templates_path: None,
        }
    }
}

impl GenerationDefaults {
    /// Load the template catalog this configuration points at
    pub fn template_catalog(&self) -> Result<TemplateCatalog> {
        match &self.templates_path {
            Some(path) => TemplateCatalog::from_json_file(path),
            None => Ok(TemplateCatalog::builtin()),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "imagen-4.0-generate-001".to_string()
}

fn default_video_model() -> String {
    "veo-2.0-generate-001".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_concurrent_image_requests() -> usize {
    // One request per slide at the maximum deck size
    MAX_SLIDES
}

fn default_simulated_video_delay_ms() -> u64 {
    8000
}

fn default_placeholder_video_url() -> String {
    "https://storage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4".to_string()
}

fn default_video_poll_interval_ms() -> u64 {
    10_000
}

fn default_video_timeout_secs() -> u64 {
    600
}

fn default_slides_count() -> usize {
    8
}

fn default_template() -> String {
    DEFAULT_TEMPLATE_ID.to_string()
}

fn default_fallback_image_url() -> String {
    "https://picsum.photos/seed/error/1280/720".to_string()
}

fn default_finalize_delay_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Override the API key from the environment when one is set
    pub fn apply_env_overrides(&mut self) {
        self.apply_api_key_from(|name| std::env::var(name).ok());
    }

    /// Override the API key using the given variable lookup
    pub fn apply_api_key_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty())
        {
            self.provider.api_key = key;
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_key.trim().is_empty() {
            return Err(anyhow!(
                "API key is required: set provider.api_key or the {} environment variable",
                API_KEY_ENV_VARS.join(" / ")
            ));
        }

        Url::parse(&self.provider.endpoint)
            .map_err(|e| anyhow!("Invalid provider endpoint '{}': {}", self.provider.endpoint, e))?;

        if self.provider.concurrent_image_requests == 0 {
            return Err(anyhow!("concurrent_image_requests must be at least 1"));
        }

        let count = self.generation.slides_count;
        if !(MIN_SLIDES..=MAX_SLIDES).contains(&count) {
            return Err(anyhow!(
                "Default slide count must be between {} and {}, got {}",
                MIN_SLIDES,
                MAX_SLIDES,
                count
            ));
        }

        if self.provider.video.mode == VideoMode::Remote && self.provider.video.poll_interval_ms == 0 {
            return Err(anyhow!("video.poll_interval_ms must be greater than zero in remote mode"));
        }

        Ok(())
    }
}
