/*!
 * Presentation document model.
 *
 * This module provides the JSON-serializable types that flow from the
 * generation pipeline to consumers of the finished deck:
 * - Slides with ordered bullets, notes and image references
 * - The presentation itself, updated through pure functions
 * - The per-request generation configuration
 */

pub mod model;

pub use model::{BulletKind, GenerationConfig, Presentation, Slide, SlideContent, MAX_SLIDES, MIN_SLIDES};
