//! Viewport Visibility Detectors
//!
//! A detector watches a dynamic set of elements and reports, some time later
//! and in no particular order, which of them entered (or left) the proximity
//! zone around the viewport.
//!
//! - **viewport**: polling geometry detector for hosts that know element
//!   bounds (simulator, tests, native front-ends)
//!
//! The browser implementation backed by `IntersectionObserver` lives in the
//! `lazyview-ui` crate.
//!
//! # Contract
//!
//! ```text
//! watch(el)    → registered, nothing delivered yet
//! ...later...  → Visibility { element: el, proximate: true }
//! unwatch(el)  → no further entries for el
//! ```

mod viewport;

#[cfg(test)]
pub(crate) mod mock;

pub use viewport::ViewportDetector;

use crate::loader::{ElementId, ImageSurface, LoaderResult, ProximityMargin};

/// Subscribe/unsubscribe half of a visibility facility.
///
/// Entries are never delivered from inside `watch` or `unwatch`; how they
/// reach the loader is up to the implementation (returned from a poll,
/// pushed from a platform callback).
pub trait VisibilityDetector {
    type Target: ImageSurface;

    /// Start observing `target`. Watching an already watched element is a
    /// no-op. Fails with `DetectorUnavailable` when the platform facility is
    /// gone.
    fn watch(&mut self, target: &Self::Target, margin: ProximityMargin) -> LoaderResult<()>;

    /// Stop observing. Unknown ids are ignored.
    fn unwatch(&mut self, id: ElementId);

    fn is_watching(&self, id: ElementId) -> bool;

    fn watched_count(&self) -> usize;
}
