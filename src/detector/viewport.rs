//! Polling geometry detector
//!
//! Keeps the watched elements in a map keyed by id and recomputes proximity
//! only when the host calls [`ViewportDetector::poll`]. Bounds are read at poll
//! time, so elements that reflow between polls are measured where they are
//! now.

use std::collections::HashMap;

use super::VisibilityDetector;
use crate::geometry::{Bounded, Rect};
use crate::loader::{ElementId, ImageSurface, LoaderResult, ProximityMargin, Visibility};

struct Watch<T> {
    target: T,
    margin: ProximityMargin,
    /// Last proximity reported; `None` until the first poll after `watch`
    reported: Option<bool>,
}

/// Detector driven by explicit viewport moves and polls
pub struct ViewportDetector<T> {
    viewport: Rect,
    watched: HashMap<ElementId, Watch<T>>,
}

impl<T> ViewportDetector<T>
where
    T: ImageSurface + Bounded + Clone,
{
    /// Create a detector for a viewport of the given size at the top of the
    /// document
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_viewport(Rect::new(0.0, 0.0, width, height))
    }

    pub fn with_viewport(viewport: Rect) -> Self {
        Self {
            viewport,
            watched: HashMap::new(),
        }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Move the viewport to an absolute document offset
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.viewport.x = x;
        self.viewport.y = y;
    }

    /// Move the viewport vertically by `dy`
    pub fn scroll_by(&mut self, dy: f64) {
        self.viewport = self.viewport.translate(0.0, dy);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Measure every watched element against the current viewport.
    ///
    /// Newly watched elements are always reported once; after that an entry
    /// is produced only when an element crosses the zone boundary. The order
    /// of the returned entries is unspecified.
    pub fn poll(&mut self) -> Vec<Visibility> {
        let viewport = self.viewport;
        let mut entries = Vec::new();

        for (id, watch) in self.watched.iter_mut() {
            let zone = viewport.expand(watch.margin);
            let proximate = zone.intersects(&watch.target.bounds());

            if watch.reported != Some(proximate) {
                watch.reported = Some(proximate);
                entries.push(Visibility {
                    element: *id,
                    proximate,
                });
            }
        }

        if !entries.is_empty() {
            tracing::trace!(
                entries = entries.len(),
                viewport_y = viewport.y,
                "Visibility changes detected"
            );
        }

        entries
    }
}

impl<T> VisibilityDetector for ViewportDetector<T>
where
    T: ImageSurface + Bounded + Clone,
{
    type Target = T;

    fn watch(&mut self, target: &T, margin: ProximityMargin) -> LoaderResult<()> {
        self.watched.entry(target.id()).or_insert_with(|| Watch {
            target: target.clone(),
            margin,
            reported: None,
        });
        Ok(())
    }

    fn unwatch(&mut self, id: ElementId) {
        self.watched.remove(&id);
    }

    fn is_watching(&self, id: ElementId) -> bool {
        self.watched.contains_key(&id)
    }

    fn watched_count(&self) -> usize {
        self.watched.len()
    }
}
