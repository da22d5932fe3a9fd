//! Scripted detector for loader tests

use std::collections::HashSet;
use std::marker::PhantomData;

use super::VisibilityDetector;
use crate::loader::{ElementId, ImageSurface, LoaderError, LoaderResult, ProximityMargin};

/// Records registrations; visibility is injected by the test
pub struct MockDetector<T> {
    pub watched: HashSet<ElementId>,
    pub watch_calls: usize,
    pub unwatch_calls: usize,
    /// Every `watch` fails with `DetectorUnavailable` while set
    pub unavailable: bool,
    _target: PhantomData<T>,
}

impl<T> MockDetector<T> {
    pub fn new() -> Self {
        Self {
            watched: HashSet::new(),
            watch_calls: 0,
            unwatch_calls: 0,
            unavailable: false,
            _target: PhantomData,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }
}

impl<T: ImageSurface> VisibilityDetector for MockDetector<T> {
    type Target = T;

    fn watch(&mut self, target: &T, _margin: ProximityMargin) -> LoaderResult<()> {
        self.watch_calls += 1;
        if self.unavailable {
            return Err(LoaderError::DetectorUnavailable(
                "mock facility disabled".to_string(),
            ));
        }
        self.watched.insert(target.id());
        Ok(())
    }

    fn unwatch(&mut self, id: ElementId) {
        self.unwatch_calls += 1;
        self.watched.remove(&id);
    }

    fn is_watching(&self, id: ElementId) -> bool {
        self.watched.contains(&id)
    }

    fn watched_count(&self) -> usize {
        self.watched.len()
    }
}
