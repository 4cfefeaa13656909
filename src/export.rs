/*!
 * Presentation persistence and export.
 *
 * A presentation is saved as pretty-printed JSON and can be exported to a
 * directory holding the JSON document, a Markdown rendition and the slide
 * assets decoded from data URIs.
 */

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{info, warn};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::diagram::{self, DiagramRenderer};
use crate::file_utils::FileManager;
use crate::presentation::{BulletKind, Presentation};

/// File name of the JSON document inside an export directory
pub const PRESENTATION_FILE: &str = "presentation.json";

/// File name of the Markdown rendition inside an export directory
pub const MARKDOWN_FILE: &str = "slides.md";

/// Directory holding decoded assets inside an export directory
pub const ASSETS_DIR: &str = "assets";

/// Files produced by an export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSummary {
    /// JSON document path
    pub presentation_path: PathBuf,
    /// Markdown rendition path
    pub markdown_path: PathBuf,
    /// Decoded slide images
    pub images: Vec<PathBuf>,
    /// Rendered diagrams
    pub diagrams: Vec<PathBuf>,
    /// Diagrams that could not be rendered
    pub failed_diagrams: usize,
}

/// Save a presentation as JSON
pub fn save_presentation<P: AsRef<Path>>(presentation: &Presentation, path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(presentation).context("Failed to serialize presentation")?;
    FileManager::write_to_file(path, &json)
}

/// Load a presentation saved with `save_presentation`
pub fn load_presentation<P: AsRef<Path>>(path: P) -> Result<Presentation> {
    let content = FileManager::read_to_string(&path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse presentation: {:?}", path.as_ref()))
}

/// Split a `data:<mime>;base64,<payload>` URI into its mime type and bytes.
pub fn parse_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:").ok_or_else(|| anyhow!("Not a data URI"))?;
    let (header, payload) = rest.split_once(',').ok_or_else(|| anyhow!("Data URI has no payload"))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| anyhow!("Only base64 data URIs are supported"))?;

    let bytes = STANDARD.decode(payload.trim()).context("Invalid base64 payload")?;
    Ok((mime.to_string(), bytes))
}

/// File extension for an image mime type
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/svg+xml" => "svg",
        _ => "jpg",
    }
}

/// Render a presentation as Markdown.
///
/// Data URI images are referenced by `image_links`, keyed by slide index,
/// when present; remote image URLs are linked directly. Slides holding a
/// diagram show the diagram in place of their image, so no image is linked.
fn render_markdown(presentation: &Presentation, image_links: &[Option<String>]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", presentation.title);

    if let Some(video) = &presentation.video_url {
        let _ = writeln!(out, "[Intro video]({})\n", video);
    }

    for (index, slide) in presentation.slides.iter().enumerate() {
        let _ = writeln!(out, "## {}. {}\n", index + 1, slide.title);

        for kind in slide.bullet_kinds() {
            match kind {
                BulletKind::Text(text) => {
                    let _ = writeln!(out, "- {}", text);
                }
                BulletKind::Diagram(source) => {
                    let _ = writeln!(out, "\n{}\n{}\n```\n", diagram::DIAGRAM_FENCE, source);
                }
            }
        }

        let link = image_links
            .get(index)
            .cloned()
            .flatten()
            .or_else(|| slide.image_url.clone().filter(|url| !url.starts_with("data:")))
            .filter(|_| !slide.contains_diagram());
        if let Some(link) = link {
            let _ = writeln!(out, "\n![{}]({})", slide.title, link);
        }

        if !slide.speaker_notes.trim().is_empty() {
            let _ = writeln!(out, "\n> Notes: {}", slide.speaker_notes.trim());
        }
        out.push('\n');
    }

    out
}

/// Render a presentation as Markdown, linking only remote images
pub fn to_markdown(presentation: &Presentation) -> String {
    render_markdown(presentation, &[])
}

/// Export a presentation to a directory.
///
/// # Arguments
/// * `presentation` - The presentation to export
/// * `dir` - Target directory, created if missing
/// * `renderer` - Diagram renderer; diagrams are left as source when `None`
///
/// # Returns
/// * `Result<ExportSummary>` - Paths of everything written
pub async fn export_assets<P: AsRef<Path>>(
    presentation: &Presentation,
    dir: P,
    renderer: Option<&dyn DiagramRenderer>,
) -> Result<ExportSummary> {
    let dir = dir.as_ref();
    let assets = dir.join(ASSETS_DIR);
    FileManager::ensure_dir(&assets)?;

    let mut summary = ExportSummary::default();
    let mut image_links = Vec::with_capacity(presentation.slides.len());

    for (index, slide) in presentation.slides.iter().enumerate() {
        let number = index + 1;

        let link = match slide.image_url.as_deref() {
            Some(uri) if uri.starts_with("data:") => match parse_data_uri(uri) {
                Ok((mime, bytes)) => {
                    let name = format!("slide-{:02}.{}", number, extension_for_mime(&mime));
                    let path = assets.join(&name);
                    FileManager::write_bytes(&path, &bytes)?;
                    summary.images.push(path);
                    Some(format!("{}/{}", ASSETS_DIR, name))
                }
                Err(e) => {
                    warn!("Skipping image of slide {}: {}", number, e);
                    None
                }
            },
            _ => None,
        };
        image_links.push(link);

        if let Some(renderer) = renderer {
            let diagrams = slide.bullet_kinds().into_iter().filter_map(|kind| match kind {
                BulletKind::Diagram(source) => Some(source),
                BulletKind::Text(_) => None,
            });

            for (diagram_index, source) in diagrams.enumerate() {
                match renderer.render(&source).await {
                    Ok(svg) => {
                        let path = assets.join(format!("slide-{:02}-diagram-{}.svg", number, diagram_index + 1));
                        FileManager::write_to_file(&path, &svg)?;
                        summary.diagrams.push(path);
                    }
                    Err(e) => {
                        warn!("Diagram {} of slide {} failed: {}", diagram_index + 1, number, e);
                        summary.failed_diagrams += 1;
                    }
                }
            }
        }
    }

    summary.presentation_path = dir.join(PRESENTATION_FILE);
    save_presentation(presentation, &summary.presentation_path)?;

    summary.markdown_path = dir.join(MARKDOWN_FILE);
    FileManager::write_to_file(&summary.markdown_path, &render_markdown(presentation, &image_links))?;

    info!(
        "Exported \"{}\" to {:?} ({} images, {} diagrams)",
        presentation.title,
        dir,
        summary.images.len(),
        summary.diagrams.len()
    );
    Ok(summary)
}
