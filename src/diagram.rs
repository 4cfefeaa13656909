/*!
 * Diagram bullets and the external diagram renderer.
 *
 * A bullet whose text starts with a mermaid code fence carries diagram
 * source instead of prose. Rendering is delegated to an external tool;
 * when it fails the bullet is shown as a fallback message instead.
 */

use async_trait::async_trait;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use tokio::process::Command;

use crate::errors::DiagramError;
use crate::presentation::{BulletKind, Slide};

/// Opening fence marking a diagram bullet
pub const DIAGRAM_FENCE: &str = "```mermaid";

static OPENING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^```mermaid[ \t]*\r?\n?").expect("valid opening fence regex")
});

static CLOSING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n?```\s*$").expect("valid closing fence regex")
});

/// Whether the bullet holds diagram source
pub fn is_diagram(bullet: &str) -> bool {
    bullet.trim().starts_with(DIAGRAM_FENCE)
}

/// Strip the surrounding fence from a diagram bullet.
pub fn diagram_source(bullet: &str) -> String {
    let trimmed = bullet.trim();
    let without_opening = OPENING_FENCE.replace(trimmed, "");
    CLOSING_FENCE.replace(&without_opening, "").trim().to_string()
}

/// Message shown in place of a diagram that could not be rendered
pub fn fallback_message(error: &DiagramError) -> String {
    format!("Failed to render diagram. Check syntax.\n{}", error)
}

/// External renderer turning diagram source into SVG markup
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Render the diagram source (without fences) to inline SVG
    async fn render(&self, source: &str) -> Result<String, DiagramError>;
}

/// A bullet ready for display
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBullet {
    /// Plain text bullet
    Text(String),
    /// Rendered diagram markup
    Svg(String),
    /// Diagram that failed to render, with the message to display
    Fallback(String),
}

/// Render every bullet of a slide, in order.
pub async fn render_bullets(renderer: &dyn DiagramRenderer, slide: &Slide) -> Vec<RenderedBullet> {
    let mut rendered = Vec::with_capacity(slide.bullets.len());

    for kind in slide.bullet_kinds() {
        match kind {
            BulletKind::Text(text) => rendered.push(RenderedBullet::Text(text.to_string())),
            BulletKind::Diagram(source) => match renderer.render(&source).await {
                Ok(svg) => rendered.push(RenderedBullet::Svg(svg)),
                Err(e) => {
                    warn!("Diagram rendering failed on slide '{}': {}", slide.title, e);
                    rendered.push(RenderedBullet::Fallback(fallback_message(&e)));
                }
            },
        }
    }

    rendered
}

/// Renderer backed by the mermaid command line tool (`mmdc`)
#[derive(Debug, Clone)]
pub struct MermaidCli {
    /// Path or name of the executable
    program: PathBuf,
    /// Mermaid theme
    theme: String,
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self {
            program: PathBuf::from("mmdc"),
            theme: "dark".to_string(),
        }
    }
}

impl MermaidCli {
    /// Create a renderer using the given executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    /// Set the mermaid theme
    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }
}

#[async_trait]
impl DiagramRenderer for MermaidCli {
    async fn render(&self, source: &str) -> Result<String, DiagramError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("diagram.mmd");
        let output = workdir.path().join("diagram.svg");
        tokio::fs::write(&input, source).await?;

        debug!("Rendering diagram with {:?}", self.program);
        let result = Command::new(&self.program)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .arg("-t")
            .arg(&self.theme)
            .arg("-b")
            .arg("transparent")
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DiagramError::RendererUnavailable(format!("{:?} not found", self.program))
                } else {
                    DiagramError::Io(e)
                }
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(DiagramError::RenderFailed(stderr.trim().to_string()));
        }

        Ok(tokio::fs::read_to_string(&output).await?)
    }
}
