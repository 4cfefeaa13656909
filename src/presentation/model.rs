/*!
 * Core presentation model types.
 *
 * Updates never mutate a presentation in place: every change produces a
 * new `Presentation` value so that concurrent readers keep a consistent view.
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::diagram;
use crate::errors::{GenerationError, StoreError};
use crate::templates::Template;

/// Smallest slide count a generation request may ask for
pub const MIN_SLIDES: usize = 3;

/// Largest slide count a generation request may ask for
pub const MAX_SLIDES: usize = 15;

/// Text content of one slide as produced by the text generation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideContent {
    /// Slide title
    pub title: String,

    /// Ordered bullet points
    pub bullets: Vec<String>,

    /// Speaker notes
    pub speaker_notes: String,

    /// Prompt used to request the slide image
    pub image_prompt: String,
}

/// A single slide of a presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Unique identifier within the presentation
    pub id: String,

    /// Slide title
    pub title: String,

    /// Ordered bullet points, plain text or diagram source
    pub bullets: Vec<String>,

    /// Speaker notes
    pub speaker_notes: String,

    /// Prompt used to request the slide image
    pub image_prompt: String,

    /// Image reference (URL or data URI)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Classification of a bullet for display.
#[derive(Debug, Clone, PartialEq)]
pub enum BulletKind<'a> {
    /// Plain text bullet
    Text(&'a str),
    /// Diagram source, with the surrounding fence removed
    Diagram(String),
}

impl Slide {
    /// Build a slide from generated content, assigning a fresh id.
    pub fn from_content(index: usize, content: SlideContent) -> Self {
        Self {
            id: format!("slide-{}-{}", index, Uuid::new_v4().simple()),
            title: content.title,
            bullets: content.bullets,
            speaker_notes: content.speaker_notes,
            image_prompt: content.image_prompt,
            image_url: None,
        }
    }

    /// Classify every bullet, keeping the original order.
    pub fn bullet_kinds(&self) -> Vec<BulletKind<'_>> {
        self.bullets
            .iter()
            .map(|bullet| {
                if diagram::is_diagram(bullet) {
                    BulletKind::Diagram(diagram::diagram_source(bullet))
                } else {
                    BulletKind::Text(bullet.as_str())
                }
            })
            .collect()
    }

    /// Whether any bullet holds diagram source
    pub fn contains_diagram(&self) -> bool {
        self.bullets.iter().any(|b| diagram::is_diagram(b))
    }
}

/// A generated slide deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    /// Presentation title (the requested topic)
    pub title: String,

    /// Slides in display order
    pub slides: Vec<Slide>,

    /// Optional introductory video reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl Presentation {
    /// Assemble a presentation from generated slide content.
    pub fn from_contents(title: impl Into<String>, contents: Vec<SlideContent>) -> Self {
        Self {
            title: title.into(),
            slides: contents
                .into_iter()
                .enumerate()
                .map(|(index, content)| Slide::from_content(index, content))
                .collect(),
            video_url: None,
        }
    }

    /// Find a slide by id
    pub fn slide(&self, slide_id: &str) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == slide_id)
    }

    /// Position of a slide by id
    pub fn slide_index(&self, slide_id: &str) -> Option<usize> {
        self.slides.iter().position(|s| s.id == slide_id)
    }

    /// Return a copy of this presentation where only the given slide's
    /// image reference is replaced.
    pub fn with_slide_image(&self, slide_id: &str, image_url: impl Into<String>) -> Result<Self, StoreError> {
        let index = self
            .slide_index(slide_id)
            .ok_or_else(|| StoreError::UnknownSlide(slide_id.to_string()))?;

        let mut updated = self.clone();
        updated.slides[index].image_url = Some(image_url.into());
        Ok(updated)
    }

    /// Return a copy of this presentation with the given video reference.
    pub fn with_video(&self, video_url: impl Into<String>) -> Self {
        Self {
            video_url: Some(video_url.into()),
            ..self.clone()
        }
    }
}

/// Parameters of one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Presentation topic
    pub topic: String,

    /// Requested number of slides
    pub slides_count: usize,

    /// Whether to generate one image per slide
    pub include_images: bool,

    /// Whether to generate an introductory video
    pub include_video: bool,

    /// Selected style template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
}

impl GenerationConfig {
    /// Create a request with images on, video off and no template.
    pub fn new(topic: impl Into<String>, slides_count: usize) -> Self {
        Self {
            topic: topic.into(),
            slides_count,
            include_images: true,
            include_video: false,
            template: None,
        }
    }

    /// Enable or disable image generation.
    pub fn with_images(mut self, enabled: bool) -> Self {
        self.include_images = enabled;
        self
    }

    /// Enable or disable the intro video.
    pub fn with_video(mut self, enabled: bool) -> Self {
        self.include_video = enabled;
        self
    }

    /// Select a style template.
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = Some(template);
        self
    }

    /// Style directive of the selected template, if any
    pub fn style_prompt(&self) -> Option<&str> {
        self.template.as_ref().map(|t| t.style_prompt.as_str())
    }

    /// Check the request before any call is made.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.topic.trim().is_empty() {
            return Err(GenerationError::InvalidRequest("topic must not be empty".to_string()));
        }

        if !(MIN_SLIDES..=MAX_SLIDES).contains(&self.slides_count) {
            return Err(GenerationError::InvalidRequest(format!(
                "slide count must be between {} and {}, got {}",
                MIN_SLIDES, MAX_SLIDES, self.slides_count
            )));
        }

        Ok(())
    }
}
