/*!
 * Tests for error types
 */

use std::error::Error;

use slidesmith::errors::{DiagramError, GenerationError, ProviderError, StoreError};

#[test]
fn test_generation_error_withProviderSource_shouldExposeSource() {
    let err = GenerationError::ImageGeneration(ProviderError::RateLimitExceeded("quota".to_string()));

    let source = err.source().expect("source should be set");
    assert!(source.to_string().contains("quota"));
}

#[test]
fn test_video_generation_error_shouldMentionVideo() {
    let err = GenerationError::VideoGeneration(ProviderError::Timeout("veo".to_string()));
    assert!(err.to_string().starts_with("Failed to generate intro video"));
}

#[test]
fn test_store_error_unknownSlide_shouldNameSlide() {
    let err = StoreError::UnknownSlide("slide-9".to_string());
    assert_eq!(err.to_string(), "Unknown slide: slide-9");
}

#[test]
fn test_diagram_error_renderFailed_shouldDisplayRendererMessage() {
    let err = DiagramError::RenderFailed("Parse error on line 2".to_string());
    assert_eq!(err.to_string(), "Parse error on line 2");
}
