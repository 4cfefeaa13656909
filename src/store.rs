/*!
 * Versioned presentation store.
 *
 * The store owns the current presentation as an immutable snapshot. Changes
 * are expressed as functions from the current snapshot to a new one; each
 * accepted change publishes a new version. Readers holding an older
 * snapshot are never affected.
 */

use log::debug;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

use crate::errors::StoreError;
use crate::presentation::Presentation;

/// A published version of the presentation
#[derive(Debug, Clone)]
pub struct PresentationDocument {
    /// Monotonic version number, starting at 1
    pub version: u64,
    /// Presentation content
    pub presentation: Arc<Presentation>,
}

/// Owner of the presentation shown to the user
#[derive(Debug)]
pub struct PresentationStore {
    /// Current document
    current: RwLock<PresentationDocument>,
    /// Slide whose image is being regenerated, if any
    regenerating: Mutex<Option<String>>,
}

/// Marks a regeneration as in flight until dropped
#[derive(Debug)]
pub struct RegenerationGuard<'a> {
    slot: &'a Mutex<Option<String>>,
}

impl Drop for RegenerationGuard<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = None;
    }
}

impl PresentationStore {
    /// Create a store holding the given presentation as version 1
    pub fn new(presentation: Presentation) -> Self {
        Self {
            current: RwLock::new(PresentationDocument {
                version: 1,
                presentation: Arc::new(presentation),
            }),
            regenerating: Mutex::new(None),
        }
    }

    /// Current presentation snapshot
    pub fn snapshot(&self) -> Arc<Presentation> {
        self.current.read().presentation.clone()
    }

    /// Current document including its version
    pub fn document(&self) -> PresentationDocument {
        self.current.read().clone()
    }

    /// Current version number
    pub fn version(&self) -> u64 {
        self.current.read().version
    }

    /// Replace the whole presentation, e.g. with a newly generated one
    pub fn replace(&self, presentation: Presentation) -> u64 {
        let mut current = self.current.write();
        current.version += 1;
        current.presentation = Arc::new(presentation);
        debug!("Presentation replaced, now at version {}", current.version);
        current.version
    }

    /// Apply a pure update to the current presentation.
    ///
    /// The update sees the latest snapshot and returns the next one; nothing
    /// is published when it fails.
    pub fn update<F>(&self, update: F) -> Result<u64, StoreError>
    where
        F: FnOnce(&Presentation) -> Result<Presentation, StoreError>,
    {
        let mut current = self.current.write();
        let next = update(&current.presentation)?;
        current.version += 1;
        current.presentation = Arc::new(next);
        debug!("Presentation updated to version {}", current.version);
        Ok(current.version)
    }

    /// Reserve the single regeneration slot for a slide.
    ///
    /// # Returns
    /// * `Ok(guard)` - The slot is held until the guard is dropped
    /// * `Err(slide_id)` - Another regeneration, for the returned slide, is in flight
    pub fn begin_regeneration(&self, slide_id: &str) -> Result<RegenerationGuard<'_>, String> {
        let mut slot = self.regenerating.lock();
        if let Some(in_flight) = slot.as_ref() {
            return Err(in_flight.clone());
        }
        *slot = Some(slide_id.to_string());
        Ok(RegenerationGuard { slot: &self.regenerating })
    }

    /// Slide currently being regenerated
    pub fn regenerating(&self) -> Option<String> {
        self.regenerating.lock().clone()
    }
}
