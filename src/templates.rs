/*!
 * Style templates.
 *
 * A template is an immutable style preset whose `style_prompt` is appended
 * to generation prompts. The built-in catalog can be replaced by a JSON file.
 */

use anyhow::{Context, Result, anyhow};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identifier of the template selected when none is requested
pub const DEFAULT_TEMPLATE_ID: &str = "template-modern-tech";

/// Style preset applied to generated text and images
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Gallery category
    pub category: String,
    /// Short description
    pub description: String,
    /// Preview image reference
    pub preview_image_url: String,
    /// Free-text style directive appended to prompts
    pub style_prompt: String,
}

impl Template {
    fn builtin(id: &str, name: &str, category: &str, description: &str, style_prompt: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            preview_image_url: format!("https://picsum.photos/seed/{}/640/360", id),
            style_prompt: style_prompt.to_string(),
        }
    }
}

static BUILTIN_TEMPLATES: Lazy<Vec<Template>> = Lazy::new(|| {
    vec![
        Template::builtin(
            DEFAULT_TEMPLATE_ID,
            "Modern Tech",
            "Business",
            "Crisp gradients and clean geometry for product and technology talks.",
            "modern technology aesthetic, deep indigo and violet gradients, clean geometric shapes, confident and forward-looking tone",
        ),
        Template::builtin(
            "template-minimal",
            "Minimalist",
            "Business",
            "Plenty of white space and restrained typography.",
            "minimalist, lots of negative space, muted neutral palette, concise and calm tone",
        ),
        Template::builtin(
            "template-medhavi",
            "Medhavi Corporate",
            "Corporate",
            "Light corporate theme with charcoal and cyan accents.",
            "light corporate style, white background, charcoal grey with cyan accent colors, formal and precise tone",
        ),
        Template::builtin(
            "template-creative",
            "Creative Pop",
            "Creative",
            "Bold colors and playful illustrations for workshops and pitches.",
            "bold saturated colors, playful hand-drawn illustrations, energetic and friendly tone",
        ),
        Template::builtin(
            "template-academic",
            "Academic",
            "Education",
            "Structured layouts suited to lectures and research summaries.",
            "academic style, muted blues, diagrams and charts, clear explanatory and objective tone",
        ),
        Template::builtin(
            "template-dark-elegance",
            "Dark Elegance",
            "Creative",
            "Dramatic dark backgrounds with gold highlights.",
            "dark elegant background, gold highlights, cinematic lighting, sophisticated and inspiring tone",
        ),
    ]
});

/// Ordered collection of templates
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// Catalog of the built-in templates
    pub fn builtin() -> Self {
        Self {
            templates: BUILTIN_TEMPLATES.clone(),
        }
    }

    /// Create a catalog from explicit templates
    pub fn new(templates: Vec<Template>) -> Result<Self> {
        if templates.is_empty() {
            return Err(anyhow!("Template catalog must contain at least one template"));
        }
        Ok(Self { templates })
    }

    /// Load a catalog from a JSON array of templates
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template catalog: {:?}", path))?;
        let templates: Vec<Template> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse template catalog: {:?}", path))?;
        Self::new(templates)
    }

    /// All templates in catalog order
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Look up a template by id
    pub fn find(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// The default template, or the first one when the catalog lacks it
    pub fn default_template(&self) -> &Template {
        self.find(DEFAULT_TEMPLATE_ID).unwrap_or(&self.templates[0])
    }

    /// Templates grouped by category, categories in first-seen order
    pub fn grouped_by_category(&self) -> Vec<(&str, Vec<&Template>)> {
        let mut groups: Vec<(&str, Vec<&Template>)> = Vec::new();

        for template in &self.templates {
            match groups.iter_mut().find(|(category, _)| *category == template.category) {
                Some((_, members)) => members.push(template),
                None => groups.push((template.category.as_str(), vec![template])),
            }
        }

        groups
    }
}
