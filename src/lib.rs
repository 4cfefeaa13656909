/*!
 * # Slidesmith - AI presentation generator
 *
 * A Rust library turning a topic into a slide deck using generative AI.
 *
 * ## Features
 *
 * - Structured slide outlines (title, bullets, speaker notes, image prompt)
 * - One image per slide, requested concurrently with per-slide fallback
 * - Optional intro video through a long-running operation
 * - Style templates applied to text and image prompts
 * - Single-slide image regeneration against a versioned store
 * - Diagram bullets rendered by an external mermaid renderer
 * - JSON persistence and Markdown/asset export
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `presentation`: Slide and presentation data model
 * - `generation`: The generation pipeline:
 *   - `generation::prompts`: Prompt construction
 *   - `generation::outline`: Outline schema and validation
 *   - `generation::images`: Image requests and regeneration
 *   - `generation::orchestrator`: Ordered text, image and video stages
 * - `providers`: Generative AI clients:
 *   - `providers::gemini`: Google Gemini, Imagen and Veo REST client
 *   - `providers::mock`: Scripted provider for tests
 * - `operation`: Long-running operation polling
 * - `store`: Versioned presentation store
 * - `templates`: Style template catalog
 * - `diagram`: Diagram bullet detection and rendering seam
 * - `export`: JSON persistence and asset export
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod diagram;
pub mod errors;
pub mod export;
pub mod file_utils;
pub mod generation;
pub mod operation;
pub mod presentation;
pub mod providers;
pub mod store;
pub mod templates;

// Re-export main types for easier usage
pub use app_config::Config;
pub use generation::{Orchestrator, OrchestratorOptions, RegenerationOutcome};
pub use presentation::{GenerationConfig, Presentation, Slide};
pub use store::PresentationStore;
pub use templates::{Template, TemplateCatalog};
