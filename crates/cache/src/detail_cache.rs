//! Single-image cache backing the detail view.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use gallery_core::clock::{Clock, SystemClock};
use gallery_core::error::FetchFailure;
use gallery_core::image::ImageSummary;
use gallery_core::source::ImageSource;
use gallery_core::types::{ImageId, Timestamp};

use crate::config::CacheConfig;

/// Caches images by id for [`CacheConfig::stale_time`].
///
/// Failures are returned to the caller and never cached, so the next call
/// after a failure always tries the network again.
pub struct DetailCache<S: ?Sized> {
    source: Arc<S>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    entries: Mutex<HashMap<ImageId, (ImageSummary, Timestamp)>>,
}

impl<S: ImageSource + ?Sized> DetailCache<S> {
    pub fn new(source: Arc<S>, config: CacheConfig) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock),
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Return the image with `id`, from cache while fresh.
    pub async fn get(&self, id: ImageId) -> Result<ImageSummary, FetchFailure> {
        let now = self.clock.now();
        {
            let mut entries = self.lock();
            entries.retain(|_, (_, fetched_at)| now - *fetched_at < self.config.gc_time);
            if let Some((image, fetched_at)) = entries.get(&id) {
                if now - *fetched_at < self.config.stale_time {
                    return Ok(image.clone());
                }
            }
        }

        let image = self.source.fetch_image(id).await?;
        self.lock().insert(id, (image.clone(), self.clock.now()));
        Ok(image)
    }

    /// Cached image without any network access, fresh or not.
    pub fn peek(&self, id: ImageId) -> Option<ImageSummary> {
        self.lock().get(&id).map(|(image, _)| image.clone())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ImageId, (ImageSummary, Timestamp)>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
