/*!
 * Tests for the presentation model
 */

use slidesmith::presentation::{GenerationConfig, Presentation};
use slidesmith::templates::TemplateCatalog;

use crate::common;

#[test]
fn test_presentation_json_shouldOmitMissingReferences() {
    let presentation = common::sample_presentation();
    let json = serde_json::to_value(&presentation).unwrap();

    assert!(json.get("video_url").is_none());
    assert!(json["slides"][0].get("image_url").is_none());

    let restored: Presentation = serde_json::from_value(json).unwrap();
    assert_eq!(restored, presentation);
}

#[test]
fn test_with_video_shouldKeepSlides() {
    let presentation = common::sample_presentation();
    let with_video = presentation.with_video("https://videos.example.com/intro.mp4");

    assert_eq!(with_video.slides, presentation.slides);
    assert_eq!(with_video.video_url.as_deref(), Some("https://videos.example.com/intro.mp4"));
    assert!(presentation.video_url.is_none());
}

#[test]
fn test_generation_config_withTemplate_shouldExposeStylePrompt() {
    let catalog = TemplateCatalog::builtin();
    let template = catalog.find("template-academic").unwrap().clone();
    let style = template.style_prompt.clone();

    let config = GenerationConfig::new("Photosynthesis", 5).with_template(template);

    assert_eq!(config.style_prompt(), Some(style.as_str()));
    assert!(config.include_images);
    assert!(!config.include_video);
}

#[test]
fn test_slide_lookup_shouldFindByIdAndIndex() {
    let presentation = common::sample_presentation();
    let id = presentation.slides[2].id.clone();

    assert_eq!(presentation.slide(&id).map(|s| s.title.as_str()), Some("Hydro"));
    assert_eq!(presentation.slide_index(&id), Some(2));
    assert!(presentation.slide("slide-99").is_none());
}
