/*!
 * Outline schema and validation.
 *
 * The text stage asks the model for a JSON object holding a `slides` array.
 * A response is accepted only when it holds exactly the requested number of
 * slides and every slide carries all required fields.
 */

use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::GenerationError;
use crate::presentation::SlideContent;

/// Fewest bullets a slide may carry
pub const MIN_BULLETS: usize = 3;

/// Most bullets a slide may carry
pub const MAX_BULLETS: usize = 5;

/// Response schema sent with the outline request
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "slides": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": {
                            "type": "STRING",
                            "description": "The title of the slide (max 8 words)."
                        },
                        "bullets": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "3 to 5 short bullet points for the slide content."
                        },
                        "speaker_notes": {
                            "type": "STRING",
                            "description": "2-4 sentences of speaker notes."
                        },
                        "image_prompt": {
                            "type": "STRING",
                            "description": "A short, descriptive prompt for an AI image generator to create a relevant visual for the slide. This prompt should NOT include styling information like \"vector\", \"illustration\", etc."
                        }
                    },
                    "required": ["title", "bullets", "speaker_notes", "image_prompt"]
                }
            }
        },
        "required": ["slides"]
    })
}

#[derive(Debug, Deserialize)]
struct RawOutline {
    slides: Option<Vec<RawSlide>>,
}

#[derive(Debug, Deserialize)]
struct RawSlide {
    title: Option<String>,
    bullets: Option<Vec<String>>,
    speaker_notes: Option<String>,
    image_prompt: Option<String>,
}

/// Remove a surrounding Markdown code fence, if any
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let body = match trimmed.find('\n') {
        Some(pos) => &trimmed[pos + 1..],
        None => return trimmed,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn malformed(message: String) -> GenerationError {
    GenerationError::MalformedResponse(message)
}

fn required<T>(value: Option<T>, field: &str, index: usize) -> Result<T, GenerationError> {
    value.ok_or_else(|| malformed(format!("slide {} is missing required field '{}'", index + 1, field)))
}

/// Parse and validate the outline returned by the text stage.
///
/// # Arguments
/// * `text` - Raw model output
/// * `expected_slides` - Number of slides that was requested
///
/// # Returns
/// * `Result<Vec<SlideContent>, GenerationError>` - Slides in model order, or `MalformedResponse`
pub fn parse_outline(text: &str, expected_slides: usize) -> Result<Vec<SlideContent>, GenerationError> {
    let raw: RawOutline = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| malformed(format!("response is not valid JSON for the slide schema: {}", e)))?;

    let slides = raw
        .slides
        .ok_or_else(|| malformed("response has no 'slides' array".to_string()))?;

    if slides.len() != expected_slides {
        return Err(malformed(format!(
            "expected {} slides, received {}",
            expected_slides,
            slides.len()
        )));
    }

    slides
        .into_iter()
        .enumerate()
        .map(|(index, slide)| {
            let title = required(slide.title, "title", index)?.trim().to_string();
            let bullets = required(slide.bullets, "bullets", index)?;
            let speaker_notes = required(slide.speaker_notes, "speaker_notes", index)?;
            let image_prompt = required(slide.image_prompt, "image_prompt", index)?;

            if title.is_empty() {
                return Err(malformed(format!("slide {} has an empty title", index + 1)));
            }

            if !(MIN_BULLETS..=MAX_BULLETS).contains(&bullets.len()) {
                return Err(malformed(format!(
                    "slide {} has {} bullets, expected {} to {}",
                    index + 1,
                    bullets.len(),
                    MIN_BULLETS,
                    MAX_BULLETS
                )));
            }

            Ok(SlideContent {
                title,
                bullets,
                speaker_notes,
                image_prompt,
            })
        })
        .collect()
}
