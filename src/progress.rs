//! Progress-callback trait for per-page split events.
//!
//! Inject an [`Arc<dyn SplitProgressCallback>`] via
//! [`crate::config::SplitConfigBuilder::progress_callback`] to hear about
//! each page as it is normalised. Detection itself is a single pass, so the
//! first event fires once the page count is known.
//!
//! # Example
//!
//! ```rust
//! use pagesplit::{SplitProgressCallback, SplitConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl SplitProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {}/{} normalised", page_num, total_pages);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//!
//! let config = SplitConfig::builder()
//!     .progress_callback(counter as Arc<dyn SplitProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the split pipeline as it works through an image.
///
/// All methods default to no-ops. Implementations must be `Send + Sync`:
/// one callback may be shared by several concurrently running splits.
pub trait SplitProgressCallback: Send + Sync {
    /// Called once, after detection, with the number of accepted pages.
    fn on_split_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before a page is cropped and scaled.
    ///
    /// # Arguments
    /// * `page_num`   : 1-indexed page number, i.e. the region's rank + 1
    /// * `total_pages`: pages in the output document
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called once a page canvas is ready. Same numbering as
    /// [`on_page_start`](Self::on_page_start).
    fn on_page_complete(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called once the document has been assembled.
    fn on_split_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SplitProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SplitConfig`].
pub type ProgressCallback = Arc<dyn SplitProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        started_total: AtomicUsize,
        completed_total: AtomicUsize,
    }

    impl SplitProgressCallback for TrackingCallback {
        fn on_split_start(&self, total_pages: usize) {
            self.started_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_start(&self, _page_num: usize, _total_pages: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_complete(&self, _page_num: usize, _total_pages: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_split_complete(&self, total_pages: usize) {
            self.completed_total.store(total_pages, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_split_start(2);
        cb.on_page_start(1, 2);
        cb.on_page_complete(1, 2);
        cb.on_split_complete(2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_split_start(2);
        tracker.on_page_start(1, 2);
        tracker.on_page_complete(1, 2);
        tracker.on_page_start(2, 2);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);

        tracker.on_page_complete(2, 2);
        tracker.on_split_complete(2);
        assert_eq!(tracker.completed_total.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_is_shareable_across_threads() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        let handle = {
            let cb = Arc::clone(&cb);
            std::thread::spawn(move || cb.on_page_start(1, 1))
        };
        handle.join().expect("callback thread panicked");
        cb.on_split_complete(1);
    }
}
