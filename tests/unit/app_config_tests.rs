/*!
 * Tests for application configuration functionality
 */

use slidesmith::app_config::{Config, LogLevel, VideoMode, API_KEY_ENV_VARS};
use slidesmith::generation::OrchestratorOptions;
use slidesmith::templates::DEFAULT_TEMPLATE_ID;
use std::time::Duration;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.provider.endpoint, "https://generativelanguage.googleapis.com");
    assert_eq!(config.provider.timeout_secs, 60);
    assert_eq!(config.provider.concurrent_image_requests, 15);
    assert_eq!(config.provider.video.simulated_delay_ms, 8000);
    assert_eq!(config.generation.template, DEFAULT_TEMPLATE_ID);
    assert_eq!(config.generation.finalize_delay_ms, 1000);
    assert_eq!(config.generation.fallback_image_url, "https://picsum.photos/seed/error/1280/720");
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = common::test_config();
    assert!(config.validate().is_ok());

    config.generation.slides_count = 2;
    assert!(config.validate().is_err());
    config.generation.slides_count = 8;

    config.provider.video.mode = VideoMode::Remote;
    config.provider.video.poll_interval_ms = 0;
    assert!(config.validate().is_err());
    config.provider.video.poll_interval_ms = 5000;
    assert!(config.validate().is_ok());

    config.provider.api_key = String::new();
    assert!(config.validate().is_err());
}

/// Test environment variable names for the API key
#[test]
fn test_api_key_env_vars_shouldListApiKeyFirst() {
    assert_eq!(API_KEY_ENV_VARS, ["API_KEY", "GEMINI_API_KEY"]);

    let mut config = Config::default();
    config.apply_api_key_from(|name| (name == "GEMINI_API_KEY").then(|| "from-env".to_string()));
    assert_eq!(config.provider.api_key, "from-env");
}

/// Test round trip through the JSON file format
#[test]
fn test_config_json_withCustomValues_shouldRoundTrip() -> anyhow::Result<()> {
    let mut config = common::test_config();
    config.provider.temperature = Some(0.5);
    config.generation.include_video = true;

    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", &serde_json::to_string_pretty(&config)?)?;
    let loaded: Config = serde_json::from_str(&std::fs::read_to_string(path)?)?;

    assert_eq!(loaded.provider.temperature, Some(0.5));
    assert!(loaded.generation.include_video);
    assert_eq!(loaded.provider.api_key, "test-key");
    Ok(())
}

/// Test the video mode string form
#[test]
fn test_video_mode_fromStr_shouldAcceptKnownModes() {
    assert_eq!("remote".parse::<VideoMode>().unwrap(), VideoMode::Remote);
    assert_eq!("Simulated".parse::<VideoMode>().unwrap(), VideoMode::Simulated);
    assert!("cloud".parse::<VideoMode>().is_err());
    assert_eq!(VideoMode::Remote.to_string(), "remote");
}

/// Test pipeline options derived from configuration
#[test]
fn test_orchestrator_options_fromConfig_shouldMirrorSettings() {
    let mut config = common::test_config();
    config.provider.concurrent_image_requests = 4;
    config.provider.video.mode = VideoMode::Remote;
    config.provider.video.poll_interval_ms = 2000;

    let options = OrchestratorOptions::from_config(&config);

    assert_eq!(options.max_concurrent_images, 4);
    assert_eq!(options.finalize_delay, Duration::ZERO);
    assert_eq!(options.video_poll_interval, Duration::from_millis(2000));
    assert_eq!(options.video_timeout, Some(Duration::from_secs(600)));
}
