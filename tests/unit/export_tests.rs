/*!
 * Tests for persistence and export
 */

use anyhow::Result;
use slidesmith::export::{self, extension_for_mime, load_presentation, save_presentation};
use slidesmith::presentation::Presentation;

use crate::common;
use crate::common::mock_renderers::{RejectingRenderer, SvgEchoRenderer};

fn presentation_with_assets() -> Presentation {
    let mut presentation = common::sample_presentation();
    presentation.slides[1].bullets.push("```mermaid\ngraph TD; Wind-->Power\n```".to_string());

    let first = presentation.slides[0].id.clone();
    let second = presentation.slides[1].id.clone();
    presentation
        .with_slide_image(&first, "data:image/png;base64,aGVsbG8=")
        .and_then(|p| p.with_slide_image(&second, "https://picsum.photos/seed/error/1280/720"))
        .unwrap()
        .with_video("https://videos.example.com/intro.mp4")
}

#[test]
fn test_save_and_load_shouldPreserveEverySlide() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deck.json");
    let presentation = presentation_with_assets();

    save_presentation(&presentation, &path)?;
    let loaded = load_presentation(&path)?;

    assert_eq!(loaded, presentation);
    Ok(())
}

#[test]
fn test_load_presentation_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "deck.json", "[]")?;
    assert!(load_presentation(&path).is_err());
    Ok(())
}

#[test]
fn test_to_markdown_withDiagramSlide_shouldOmitItsImage() {
    let md = export::to_markdown(&presentation_with_assets());

    assert!(md.contains("[Intro video](https://videos.example.com/intro.mp4)"));
    assert!(!md.contains("![Wind]"));
    assert!(!md.contains("![Solar]"));
}

#[test]
fn test_to_markdown_withRemoteImage_shouldLinkIt() {
    let presentation = common::sample_presentation();
    let third = presentation.slides[2].id.clone();
    let presentation = presentation
        .with_slide_image(&third, "https://picsum.photos/seed/hydro/1280/720")
        .unwrap();

    let md = export::to_markdown(&presentation);

    assert!(md.contains("![Hydro](https://picsum.photos/seed/hydro/1280/720)"));
}

#[tokio::test]
async fn test_export_assets_shouldDecodeImagesAndRenderDiagrams() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let renderer = SvgEchoRenderer::default();
    let presentation = presentation_with_assets();

    let summary = export::export_assets(&presentation, temp_dir.path(), Some(&renderer)).await?;

    assert_eq!(summary.images.len(), 1);
    assert_eq!(std::fs::read(&summary.images[0])?, b"hello");
    assert!(summary.images[0].ends_with("assets/slide-01.png"));

    assert_eq!(summary.diagrams.len(), 1);
    assert!(summary.diagrams[0].ends_with("assets/slide-02-diagram-1.svg"));
    assert_eq!(summary.failed_diagrams, 0);

    let md = std::fs::read_to_string(&summary.markdown_path)?;
    assert!(md.contains("![Solar](assets/slide-01.png)"));
    assert!(!md.contains("![Wind]"));
    assert_eq!(load_presentation(&summary.presentation_path)?, presentation);
    Ok(())
}

#[tokio::test]
async fn test_export_assets_withRejectingRenderer_shouldCountFailures() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let summary = export::export_assets(&presentation_with_assets(), temp_dir.path(), Some(&RejectingRenderer)).await?;

    assert!(summary.diagrams.is_empty());
    assert_eq!(summary.failed_diagrams, 1);
    assert!(summary.markdown_path.exists());
    Ok(())
}

#[tokio::test]
async fn test_export_assets_withoutRenderer_shouldKeepDiagramSource() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let summary = export::export_assets(&presentation_with_assets(), temp_dir.path(), None).await?;

    assert!(summary.diagrams.is_empty());
    let md = std::fs::read_to_string(&summary.markdown_path)?;
    assert!(md.contains("```mermaid\ngraph TD; Wind-->Power\n```"));
    Ok(())
}

#[test]
fn test_extension_for_mime_shouldDefaultToJpg() {
    assert_eq!(extension_for_mime("image/png"), "png");
    assert_eq!(extension_for_mime("image/jpeg"), "jpg");
    assert_eq!(extension_for_mime("application/octet-stream"), "jpg");
}
