/*!
 * Common test utilities for the slidesmith test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use slidesmith::app_config::Config;
use slidesmith::generation::{Orchestrator, OrchestratorOptions};
use slidesmith::presentation::{Presentation, SlideContent};
use slidesmith::providers::mock::MockProvider;

// Re-export the mock renderers module
pub mod mock_renderers;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Configuration usable without network access or delays
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.provider.api_key = "test-key".to_string();
    config.generation.finalize_delay_ms = 0;
    config
}

/// Orchestrator over the given mock without artificial delays
pub fn orchestrator(provider: &MockProvider) -> Orchestrator {
    Orchestrator::new(Arc::new(provider.clone()), OrchestratorOptions::immediate())
}

/// Slide content with three bullets
pub fn slide_content(title: &str, image_prompt: &str) -> SlideContent {
    SlideContent {
        title: title.to_string(),
        bullets: vec!["First".to_string(), "Second".to_string(), "Third".to_string()],
        speaker_notes: format!("Notes for {}.", title),
        image_prompt: image_prompt.to_string(),
    }
}

/// Three-slide presentation without images
pub fn sample_presentation() -> Presentation {
    Presentation::from_contents(
        "Renewable Energy",
        vec![
            slide_content("Solar", "illustration for slide 1"),
            slide_content("Wind", "illustration for slide 2"),
            slide_content("Hydro", "illustration for slide 3"),
        ],
    )
}
