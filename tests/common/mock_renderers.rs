/*!
 * Mock diagram renderers for testing
 *
 * These avoid spawning the mermaid CLI in tests.
 */

use async_trait::async_trait;
use parking_lot::Mutex;

use slidesmith::diagram::DiagramRenderer;
use slidesmith::errors::DiagramError;

/// Renderer wrapping the source in a minimal SVG document
#[derive(Debug, Default)]
pub struct SvgEchoRenderer {
    /// Sources received, in order
    pub sources: Mutex<Vec<String>>,
}

#[async_trait]
impl DiagramRenderer for SvgEchoRenderer {
    async fn render(&self, source: &str) -> Result<String, DiagramError> {
        self.sources.lock().push(source.to_string());
        Ok(format!("<svg><!-- {} --></svg>", source))
    }
}

/// Renderer rejecting every diagram
#[derive(Debug, Default)]
pub struct RejectingRenderer;

#[async_trait]
impl DiagramRenderer for RejectingRenderer {
    async fn render(&self, _source: &str) -> Result<String, DiagramError> {
        Err(DiagramError::RenderFailed("Parse error on line 1".to_string()))
    }
}
