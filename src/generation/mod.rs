/*!
 * Presentation generation pipeline.
 *
 * This module sequences the calls to the generative AI service:
 * - `generation::prompts`: Prompt and request construction
 * - `generation::outline`: Response schema and outline validation
 * - `generation::images`: Single image requests and slide image regeneration
 * - `generation::orchestrator`: The ordered text, image and video stages
 */

pub mod images;
pub mod orchestrator;
pub mod outline;
pub mod prompts;

pub use images::{regenerate_image, request_image};
pub use orchestrator::{GenerationStage, Orchestrator, OrchestratorOptions, RegenerationOutcome};
pub use outline::{parse_outline, response_schema};
