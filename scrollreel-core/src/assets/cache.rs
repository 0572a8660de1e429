use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use anyhow::Context;

use crate::{
    assets::decode::{PreparedImage, decode_image},
    foundation::error::{ReelError, ReelResult},
};

/// Where frame bytes come from. Implementations must be usable from the preload worker.
pub trait ImageSource: Send + Sync {
    /// Load and decode the frame at the relative `path`.
    fn load(&self, path: &str) -> ReelResult<PreparedImage>;
}

/// Reads and decodes frames relative to a root directory.
#[derive(Clone, Debug)]
pub struct FsImageSource {
    root: PathBuf,
}

impl FsImageSource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory frame paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ImageSource for FsImageSource {
    fn load(&self, path: &str) -> ReelResult<PreparedImage> {
        let full = self.root.join(Path::new(path));
        let bytes = std::fs::read(&full)
            .with_context(|| format!("read frame bytes from '{}'", full.display()))
            .map_err(|e| ReelError::asset(format!("{e:#}")))?;
        decode_image(&bytes).map_err(|e| ReelError::asset(format!("'{path}': {e}")))
    }
}

type Slot = Arc<Mutex<Option<Arc<PreparedImage>>>>;

/// Path-keyed decode cache.
///
/// `preload` is idempotent: a path that already decoded returns the same `Arc` without touching
/// the source, and concurrent requests for one path wait on a single load. Failures are not
/// cached.
pub struct ImageCache {
    source: Arc<dyn ImageSource>,
    slots: Mutex<HashMap<String, Slot>>,
    loads_issued: AtomicU64,
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("loads_issued", &self.loads_issued())
            .field("cached", &self.len())
            .finish()
    }
}

impl ImageCache {
    /// Empty cache over `source`.
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self {
            source,
            slots: Mutex::new(HashMap::new()),
            loads_issued: AtomicU64::new(0),
        }
    }

    /// Decode `path` once and return the shared image.
    ///
    /// A failed load leaves the slot empty, so a later call retries.
    pub fn preload(&self, path: &str) -> ReelResult<Arc<PreparedImage>> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.entry(path.to_string()).or_default().clone()
        };

        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(img) = guard.as_ref() {
            return Ok(img.clone());
        }

        self.loads_issued.fetch_add(1, Ordering::Relaxed);
        let img = Arc::new(self.source.load(path)?);
        *guard = Some(img.clone());
        Ok(img)
    }

    /// Already-decoded image for `path`, without loading.
    pub fn get(&self, path: &str) -> Option<Arc<PreparedImage>> {
        let slot = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()?;
        let guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// Number of source loads attempted so far (successful or not).
    pub fn loads_issued(&self) -> u64 {
        self.loads_issued.load(Ordering::Relaxed)
    }

    /// Number of paths with a decoded image.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .values()
            .filter(|s| s.lock().unwrap_or_else(PoisonError::into_inner).is_some())
            .count()
    }

    /// `true` when nothing has decoded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
