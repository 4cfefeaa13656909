/*!
 * Tests for diagram bullets
 */

use slidesmith::diagram::{fallback_message, render_bullets, RenderedBullet};
use slidesmith::errors::DiagramError;
use slidesmith::presentation::Slide;

use crate::common;
use crate::common::mock_renderers::{RejectingRenderer, SvgEchoRenderer};

fn diagram_slide() -> Slide {
    let mut slide = Slide::from_content(0, common::slide_content("Pipeline", "a pipeline"));
    slide.bullets = vec![
        "Stages run in order".to_string(),
        "```mermaid\ngraph LR; Outline-->Images-->Video\n```".to_string(),
        "Failures are isolated".to_string(),
    ];
    slide
}

#[tokio::test]
async fn test_render_bullets_withWorkingRenderer_shouldPassSourceWithoutFence() {
    let renderer = SvgEchoRenderer::default();
    let rendered = render_bullets(&renderer, &diagram_slide()).await;

    assert_eq!(rendered.len(), 3);
    assert_eq!(rendered[0], RenderedBullet::Text("Stages run in order".to_string()));
    assert!(matches!(rendered[1], RenderedBullet::Svg(_)));
    assert_eq!(
        renderer.sources.lock().as_slice(),
        ["graph LR; Outline-->Images-->Video".to_string()]
    );
}

#[tokio::test]
async fn test_render_bullets_withRejectingRenderer_shouldKeepOtherBullets() {
    let rendered = render_bullets(&RejectingRenderer, &diagram_slide()).await;

    assert_eq!(rendered[0], RenderedBullet::Text("Stages run in order".to_string()));
    assert_eq!(rendered[2], RenderedBullet::Text("Failures are isolated".to_string()));
    match &rendered[1] {
        RenderedBullet::Fallback(message) => {
            assert!(message.starts_with("Failed to render diagram. Check syntax."));
            assert!(message.contains("Parse error on line 1"));
        }
        other => panic!("expected fallback, got {other:?}"),
    }
}

#[test]
fn test_fallback_message_shouldIncludeRendererDetails() {
    let message = fallback_message(&DiagramError::RendererUnavailable("mmdc not found".to_string()));
    assert_eq!(
        message,
        "Failed to render diagram. Check syntax.\nDiagram renderer unavailable: mmdc not found"
    );
}
