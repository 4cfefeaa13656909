use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::diagram::{DiagramRenderer, MermaidCli};
use crate::export::{self, ExportSummary};
use crate::file_utils::FileManager;
use crate::generation::{Orchestrator, OrchestratorOptions, RegenerationOutcome};
use crate::presentation::{GenerationConfig, Presentation};
use crate::providers::gemini::Gemini;
use crate::providers::Provider;
use crate::store::PresentationStore;
use crate::templates::{Template, TemplateCatalog};

// @module: Application controller for presentation generation

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Available style templates
    catalog: TemplateCatalog,
    // @field: Pipeline bound to the configured provider
    orchestrator: Orchestrator,
}

/// Per-run overrides of the configured generation defaults
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub slides_count: Option<usize>,
    pub include_images: Option<bool>,
    pub include_video: Option<bool>,
    pub template: Option<String>,
}

impl Controller {
    // @method: Create a new controller talking to the configured Gemini endpoint
    pub fn with_config(config: Config) -> Result<Self> {
        let provider = Arc::new(Gemini::from_config(&config.provider));
        Self::with_provider(config, provider)
    }

    /// Create a controller using the given provider
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Result<Self> {
        let catalog = config
            .generation
            .template_catalog()
            .context("Failed to load template catalog")?;
        let orchestrator = Orchestrator::new(provider, OrchestratorOptions::from_config(&config));

        Ok(Self {
            config,
            catalog,
            orchestrator,
        })
    }

    /// Replace the pipeline options
    pub fn with_options(mut self, options: OrchestratorOptions) -> Self {
        self.orchestrator = Orchestrator::new(self.orchestrator.provider(), options);
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Template catalog in use
    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Resolve a template id, falling back to the configured default
    pub fn resolve_template(&self, id: Option<&str>) -> Result<Template> {
        let id = id.unwrap_or(&self.config.generation.template);
        match self.catalog.find(id) {
            Some(template) => Ok(template.clone()),
            None if id == self.config.generation.template => {
                warn!("Configured template '{}' not found, using default", id);
                Ok(self.catalog.default_template().clone())
            }
            None => Err(anyhow!("Unknown template '{}'. Run `slidesmith templates` to list them", id)),
        }
    }

    /// Build a generation request from the configured defaults and overrides
    pub fn build_request(&self, topic: &str, options: &GenerateOptions) -> Result<GenerationConfig> {
        let defaults = &self.config.generation;
        let template = self.resolve_template(options.template.as_deref())?;

        let request = GenerationConfig::new(topic, options.slides_count.unwrap_or(defaults.slides_count))
            .with_images(options.include_images.unwrap_or(defaults.include_images))
            .with_video(options.include_video.unwrap_or(defaults.include_video))
            .with_template(template);

        request.validate()?;
        Ok(request)
    }

    /// Generate a presentation, showing progress on a spinner
    pub async fn generate(&self, request: &GenerationConfig) -> Result<Presentation> {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner.set_message("Initializing generation...");

        let result = self
            .orchestrator
            .generate(request, |message| spinner.set_message(message.to_string()))
            .await;
        spinner.finish_and_clear();

        Ok(result?)
    }

    /// Generate a presentation and save it as JSON.
    ///
    /// Without an explicit output path the file is named after the topic
    /// in the current directory.
    pub async fn generate_to_file(&self, request: &GenerationConfig, output: Option<PathBuf>) -> Result<PathBuf> {
        let presentation = self.generate(request).await?;
        let output = output.unwrap_or_else(|| FileManager::generate_output_path(".", &request.topic, "json"));

        export::save_presentation(&presentation, &output)?;
        info!("Presentation saved to {:?}", output);
        Ok(output)
    }

    /// Regenerate the image of one slide of a saved presentation.
    ///
    /// `slide` is either a slide id or a 1-based slide number. The file is
    /// only rewritten when the image was replaced.
    pub async fn regenerate_image<P: AsRef<Path>>(
        &self,
        path: P,
        slide: &str,
        template: Option<&str>,
    ) -> Result<RegenerationOutcome> {
        let path = path.as_ref();
        let presentation = export::load_presentation(path)?;
        let slide_id = Self::resolve_slide_id(&presentation, slide)?;
        let template = self.resolve_template(template)?;

        let store = PresentationStore::new(presentation);
        let outcome = self
            .orchestrator
            .regenerate_slide_image(&store, &slide_id, Some(&template))
            .await;

        if let RegenerationOutcome::Updated { .. } = outcome {
            export::save_presentation(&store.snapshot(), path)?;
            info!("Updated image of slide {} in {:?}", slide_id, path);
        }

        Ok(outcome)
    }

    /// Regenerate the image of one slide and fail unless it was replaced.
    ///
    /// Returns the id of the updated slide.
    pub async fn replace_image<P: AsRef<Path>>(&self, path: P, slide: &str, template: Option<&str>) -> Result<String> {
        let path = path.as_ref();
        match self.regenerate_image(path, slide, template).await? {
            RegenerationOutcome::Updated { slide_id, .. } => Ok(slide_id),
            RegenerationOutcome::Failed { slide_id, reason } => {
                Err(anyhow!("Image of {} was not changed: {}", slide_id, reason))
            }
            RegenerationOutcome::Busy { in_flight } => {
                Err(anyhow!("Another regeneration is in progress for {}", in_flight))
            }
            RegenerationOutcome::UnknownSlide { slide_id } => {
                Err(anyhow!("Slide {} no longer exists in {:?}", slide_id, path))
            }
        }
    }

    /// Map a slide id or 1-based slide number to a slide id
    pub fn resolve_slide_id(presentation: &Presentation, slide: &str) -> Result<String> {
        if presentation.slide(slide).is_some() {
            return Ok(slide.to_string());
        }

        slide
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| presentation.slides.get(index))
            .map(|s| s.id.clone())
            .ok_or_else(|| anyhow!("No slide '{}' in \"{}\"", slide, presentation.title))
    }

    /// Catalog listing grouped by category
    pub fn list_templates(&self) -> String {
        let mut out = String::new();
        for (category, templates) in self.catalog.grouped_by_category() {
            out.push_str(category);
            out.push('\n');
            for template in templates {
                let marker = if template.id == self.config.generation.template { "*" } else { " " };
                out.push_str(&format!("  {} {:<24} {}\n", marker, template.id, template.description));
            }
        }
        out
    }

    /// Export a saved presentation to a directory
    pub async fn export<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        path: P1,
        dir: P2,
        render_diagrams: bool,
    ) -> Result<ExportSummary> {
        let presentation = export::load_presentation(path)?;
        let mermaid = MermaidCli::default();
        let renderer: Option<&dyn DiagramRenderer> = if render_diagrams { Some(&mermaid) } else { None };

        let summary = export::export_assets(&presentation, dir, renderer).await?;
        if summary.failed_diagrams > 0 {
            warn!("{} diagram(s) could not be rendered", summary.failed_diagrams);
        }
        Ok(summary)
    }

    /// Format a duration as `1h 2m 3s`, `2m 3s` or `3s`
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
