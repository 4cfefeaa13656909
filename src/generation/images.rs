/*!
 * Image requests for slides.
 */

use log::debug;

use crate::errors::GenerationError;
use crate::presentation::Slide;
use crate::providers::Provider;
use crate::templates::Template;

use super::prompts;

/// Request one image and return it as a data URI.
pub async fn request_image(
    provider: &dyn Provider,
    slide_prompt: &str,
    style: Option<&str>,
) -> Result<String, GenerationError> {
    let request = prompts::image_request(slide_prompt, style);
    debug!("Requesting image: {}", request.prompt);

    let image = provider
        .generate_image(request)
        .await
        .map_err(GenerationError::ImageGeneration)?;

    Ok(image.to_data_uri())
}

/// Request a fresh image for an existing slide.
///
/// No fallback is substituted here; the caller decides what a failure means.
pub async fn regenerate_image(
    provider: &dyn Provider,
    slide: &Slide,
    template: Option<&Template>,
) -> Result<String, GenerationError> {
    request_image(provider, &slide.image_prompt, template.map(|t| t.style_prompt.as_str())).await
}
