/*!
 * Prompt construction for the generation stages.
 */

use crate::presentation::GenerationConfig;
use crate::providers::{ImageRequest, OutlineRequest, VideoRequest};

use super::outline::response_schema;

/// System instruction sent with every outline request
pub const BASE_SYSTEM_INSTRUCTION: &str = "You are a professional presentation writer. You must output valid JSON that adheres to the provided schema. Do not output anything other than the JSON object.";

/// Image style used when no template directive is given
pub const DEFAULT_IMAGE_STYLE: &str = "flat-vector illustration, corporate tech, light gradients, professional, clean lines.";

fn non_empty(style: Option<&str>) -> Option<&str> {
    style.map(str::trim).filter(|s| !s.is_empty())
}

/// System instruction, extended with the style directive when present
pub fn system_instruction(style: Option<&str>) -> String {
    match non_empty(style) {
        Some(style) => format!(
            "{} The presentation should have the following style and tone: {}.",
            BASE_SYSTEM_INSTRUCTION, style
        ),
        None => BASE_SYSTEM_INSTRUCTION.to_string(),
    }
}

/// User prompt asking for the slide outline
pub fn outline_prompt(topic: &str, slides_count: usize) -> String {
    format!(
        "Create a presentation about \"{}\". Produce exactly {} slides. For each slide, provide a title, 3 to 5 bullet points, speaker notes, and a descriptive image prompt.",
        topic, slides_count
    )
}

/// Full request for the outline stage
pub fn outline_request(config: &GenerationConfig) -> OutlineRequest {
    OutlineRequest {
        topic: config.topic.clone(),
        slides_count: config.slides_count,
        prompt: outline_prompt(&config.topic, config.slides_count),
        system_instruction: system_instruction(config.style_prompt()),
        response_schema: response_schema(),
    }
}

/// Image prompt for a slide, with the template style or the default style
pub fn image_prompt(slide_prompt: &str, style: Option<&str>) -> String {
    let base = format!(
        "A clean, modern image showing \"{}\", centered composition, high contrast, 16:9 aspect ratio, suitable for a presentation slide.",
        slide_prompt
    );
    format!("{} Style: {}", base, non_empty(style).unwrap_or(DEFAULT_IMAGE_STYLE))
}

/// Image request for a slide
pub fn image_request(slide_prompt: &str, style: Option<&str>) -> ImageRequest {
    ImageRequest::new(image_prompt(slide_prompt, style))
}

/// Request for the intro video
pub fn video_request(topic: &str) -> VideoRequest {
    VideoRequest {
        topic: topic.to_string(),
        prompt: format!(
            "A short cinematic animated introduction for a presentation about \"{}\", smooth camera motion, no text.",
            topic
        ),
        aspect_ratio: "16:9".to_string(),
    }
}
