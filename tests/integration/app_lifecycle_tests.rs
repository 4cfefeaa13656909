/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use std::sync::Arc;

use slidesmith::app_controller::{Controller, GenerateOptions};
use slidesmith::export::load_presentation;
use slidesmith::generation::{OrchestratorOptions, RegenerationOutcome};
use slidesmith::providers::mock::MockProvider;
use slidesmith::templates::DEFAULT_TEMPLATE_ID;

use crate::common;

fn controller(provider: &MockProvider) -> Result<Controller> {
    Ok(Controller::with_provider(common::test_config(), Arc::new(provider.clone()))?
        .with_options(OrchestratorOptions::immediate()))
}

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::with_config(common::test_config())?;

    assert_eq!(controller.catalog().templates().len(), 6);
    assert_eq!(controller.config().provider.api_key, "test-key");
    Ok(())
}

/// Test request building from configured defaults and overrides
#[test]
fn test_build_request_withOverrides_shouldApplyThemOverDefaults() -> Result<()> {
    let controller = controller(&MockProvider::working())?;

    let defaults = controller.build_request("Volcanoes", &GenerateOptions::default())?;
    assert_eq!(defaults.slides_count, 8);
    assert!(defaults.include_images);
    assert!(!defaults.include_video);
    assert_eq!(defaults.template.as_ref().map(|t| t.id.as_str()), Some(DEFAULT_TEMPLATE_ID));

    let options = GenerateOptions {
        slides_count: Some(4),
        include_images: Some(false),
        include_video: Some(true),
        template: Some("template-academic".to_string()),
    };
    let custom = controller.build_request("Volcanoes", &options)?;
    assert_eq!(custom.slides_count, 4);
    assert!(!custom.include_images);
    assert!(custom.include_video);
    assert_eq!(custom.template.as_ref().map(|t| t.id.as_str()), Some("template-academic"));
    Ok(())
}

/// Test that invalid requests are rejected before generation
#[test]
fn test_build_request_withInvalidInput_shouldFail() -> Result<()> {
    let controller = controller(&MockProvider::working())?;

    let unknown_template = GenerateOptions {
        template: Some("template-nope".to_string()),
        ..Default::default()
    };
    assert!(controller.build_request("Volcanoes", &unknown_template).is_err());

    let too_many = GenerateOptions {
        slides_count: Some(16),
        ..Default::default()
    };
    assert!(controller.build_request("Volcanoes", &too_many).is_err());
    Ok(())
}

/// Test generation, regeneration and export through the controller
#[tokio::test]
async fn test_full_workflow_withMockProvider_shouldGenerateRegenerateAndExport() -> Result<()> {
    let provider = MockProvider::working();
    let controller = controller(&provider)?;
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("volcanoes.json");

    let request = controller.build_request("Volcanoes", &GenerateOptions { slides_count: Some(3), ..Default::default() })?;
    let saved = controller.generate_to_file(&request, Some(output.clone())).await?;
    assert_eq!(saved, output);

    let generated = load_presentation(&output)?;
    assert_eq!(generated.slides.len(), 3);

    let outcome = controller.regenerate_image(&output, "2", Some("template-minimal")).await?;
    let target = generated.slides[1].id.clone();
    assert_eq!(outcome, RegenerationOutcome::Updated { slide_id: target, version: 2 });

    let regenerated = load_presentation(&output)?;
    assert_eq!(regenerated.slides[0], generated.slides[0]);
    assert_eq!(regenerated.slides[2], generated.slides[2]);
    assert_ne!(regenerated.slides[1].image_url, generated.slides[1].image_url);

    let summary = controller.export(&output, temp_dir.path().join("export"), false).await?;
    assert_eq!(summary.images.len(), 3);
    assert!(summary.markdown_path.exists());
    Ok(())
}

/// Test that a failed regeneration does not rewrite the saved file
#[tokio::test]
async fn test_regenerate_image_withFailingImage_shouldLeaveFileUntouched() -> Result<()> {
    let provider = MockProvider::working().fail_images_containing("illustration for slide 1");
    let controller = controller(&provider)?;
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("deck.json");
    slidesmith::export::save_presentation(&common::sample_presentation(), &output)?;
    let before = std::fs::read_to_string(&output)?;

    let outcome = controller.regenerate_image(&output, "1", None).await?;

    assert!(matches!(outcome, RegenerationOutcome::Failed { .. }));
    assert_eq!(std::fs::read_to_string(&output)?, before);
    Ok(())
}

/// Test that a failed regeneration is reported as an error
#[tokio::test]
async fn test_replace_image_withFailingImage_shouldReturnError() -> Result<()> {
    let provider = MockProvider::working().fail_images_containing("illustration for slide 2");
    let controller = controller(&provider)?;
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("deck.json");
    slidesmith::export::save_presentation(&common::sample_presentation(), &output)?;
    let before = std::fs::read_to_string(&output)?;

    let result = controller.replace_image(&output, "2", None).await;

    let err = result.expect_err("a failed image must not count as replaced");
    assert!(err.to_string().contains("was not changed"));
    assert_eq!(std::fs::read_to_string(&output)?, before);
    Ok(())
}

/// Test that a successful regeneration returns the updated slide id
#[tokio::test]
async fn test_replace_image_withWorkingProvider_shouldReturnSlideId() -> Result<()> {
    let provider = MockProvider::working();
    let controller = controller(&provider)?;
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("deck.json");
    let presentation = common::sample_presentation();
    slidesmith::export::save_presentation(&presentation, &output)?;

    let slide_id = controller.replace_image(&output, "3", None).await?;

    assert_eq!(slide_id, presentation.slides[2].id);
    assert!(load_presentation(&output)?.slides[2].image_url.is_some());
    Ok(())
}

/// Test slide references by id and by number
#[test]
fn test_resolve_slide_id_withIdOrNumber_shouldFindSlide() {
    let presentation = common::sample_presentation();
    let third = presentation.slides[2].id.clone();

    assert_eq!(Controller::resolve_slide_id(&presentation, &third).unwrap(), third);
    assert_eq!(Controller::resolve_slide_id(&presentation, "3").unwrap(), third);
    assert!(Controller::resolve_slide_id(&presentation, "0").is_err());
    assert!(Controller::resolve_slide_id(&presentation, "4").is_err());
    assert!(Controller::resolve_slide_id(&presentation, "slide-x").is_err());
}

/// Test the template listing
#[test]
fn test_list_templates_shouldMarkConfiguredDefault() -> Result<()> {
    let controller = controller(&MockProvider::working())?;
    let listing = controller.list_templates();

    assert!(listing.starts_with("Business\n"));
    assert!(listing.contains(&format!("* {}", DEFAULT_TEMPLATE_ID)));
    assert!(listing.contains("Education\n"));
    Ok(())
}

/// Test duration formatting
#[test]
fn test_format_duration_shouldUseLargestUnits() {
    use std::time::Duration;
    assert_eq!(Controller::format_duration(Duration::from_secs(5)), "5s");
    assert_eq!(Controller::format_duration(Duration::from_secs(125)), "2m 5s");
    assert_eq!(Controller::format_duration(Duration::from_secs(3725)), "1h 2m 5s");
}
