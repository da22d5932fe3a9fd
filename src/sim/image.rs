//! In-memory image element

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::{Bounded, Rect};
use crate::loader::{ElementId, ImageSurface};

#[derive(Debug)]
struct ImageState {
    name: String,
    bounds: Rect,
    src: String,
    classes: Vec<String>,
    source_changes: usize,
}

/// Shared handle to a simulated `<img>`.
///
/// Clones refer to the same element, the way DOM handles do, so the loader,
/// the detector and the test can all hold one.
#[derive(Debug, Clone)]
pub struct SimImage {
    id: ElementId,
    inner: Rc<RefCell<ImageState>>,
}

impl SimImage {
    pub fn new(name: impl Into<String>, bounds: Rect) -> Self {
        Self {
            id: ElementId::next(),
            inner: Rc::new(RefCell::new(ImageState {
                name: name.into(),
                bounds,
                src: String::new(),
                classes: Vec::new(),
                source_changes: 0,
            })),
        }
    }

    pub fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    /// Currently displayed source
    pub fn src(&self) -> String {
        self.inner.borrow().src.clone()
    }

    pub fn classes(&self) -> Vec<String> {
        self.inner.borrow().classes.clone()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.inner.borrow().classes.iter().any(|c| c == class)
    }

    /// How many times the displayed source was replaced
    pub fn source_changes(&self) -> usize {
        self.inner.borrow().source_changes
    }

    /// Move or resize the element (reflow)
    pub fn set_bounds(&self, bounds: Rect) {
        self.inner.borrow_mut().bounds = bounds;
    }
}

impl ImageSurface for SimImage {
    fn id(&self) -> ElementId {
        self.id
    }

    fn set_source(&self, url: &str) {
        let mut state = self.inner.borrow_mut();
        state.src = url.to_string();
        state.source_changes += 1;
    }

    fn add_class(&self, class: &str) {
        let mut state = self.inner.borrow_mut();
        if !state.classes.iter().any(|c| c == class) {
            state.classes.push(class.to_string());
        }
    }
}

impl Bounded for SimImage {
    fn bounds(&self) -> Rect {
        self.inner.borrow().bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let img = SimImage::new("avatar", Rect::new(0.0, 0.0, 40.0, 40.0));
        let handle = img.clone();

        handle.set_source("a.png");
        handle.add_class("loaded");
        handle.add_class("loaded");

        assert_eq!(img.id(), handle.id());
        assert_eq!(img.src(), "a.png");
        assert_eq!(img.classes(), vec!["loaded".to_string()]);
        assert_eq!(img.source_changes(), 1);
        assert_eq!(img.name(), "avatar");
    }
}
