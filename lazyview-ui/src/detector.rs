//! Browser Visibility Detector
//!
//! `IntersectionObserver` wrapped in the loader's detector contract, plus the
//! `<img>` handle the loader drives.

use lazyview::loader::{
    ElementId, ImageSurface, LoaderError, LoaderResult, ProximityMargin, Visibility,
};
use lazyview::VisibilityDetector;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, HtmlImageElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

/// Attribute carrying the element id, read back from observer entries
const ID_ATTRIBUTE: &str = "data-lazy-id";

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// `<img>` element managed by the loader
#[derive(Clone)]
pub struct WebImage {
    id: ElementId,
    element: HtmlImageElement,
}

impl WebImage {
    pub fn new(element: HtmlImageElement) -> Self {
        let id = ElementId::next();
        if let Err(e) = element.set_attribute(ID_ATTRIBUTE, &id.get().to_string()) {
            web_sys::console::warn_1(&format!("Failed to tag image {}: {:?}", id, e).into());
        }
        Self { id, element }
    }

    pub fn element(&self) -> &HtmlImageElement {
        &self.element
    }
}

impl ImageSurface for WebImage {
    fn id(&self) -> ElementId {
        self.id
    }

    fn set_source(&self, url: &str) {
        self.element.set_src(url);
    }

    fn add_class(&self, class: &str) {
        if let Err(e) = self.element.class_list().add_1(class) {
            web_sys::console::warn_1(&format!("Failed to add class {}: {:?}", class, e).into());
        }
    }
}

fn element_id(element: &Element) -> Option<ElementId> {
    element
        .get_attribute(ID_ATTRIBUTE)?
        .parse()
        .ok()
        .map(ElementId::new)
}

/// Detector backed by a single `IntersectionObserver`.
///
/// The proximity margin becomes the observer's `rootMargin` and is fixed for
/// the observer's lifetime. Entries are handed to `handler` from the
/// browser's observer task, never from `watch`/`unwatch`.
pub struct WebDetector {
    observer: IntersectionObserver,
    watched: HashMap<ElementId, Element>,
    _callback: ObserverCallback,
}

impl WebDetector {
    pub fn new<F>(margin: ProximityMargin, mut handler: F) -> LoaderResult<Self>
    where
        F: FnMut(Visibility) + 'static,
    {
        let callback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    let Some(id) = element_id(&entry.target()) else {
                        continue;
                    };
                    handler(Visibility {
                        element: id,
                        proximate: entry.is_intersecting(),
                    });
                }
            },
        ) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let mut options = IntersectionObserverInit::new();
        options.root_margin(&margin.to_css());

        let observer = IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|e| LoaderError::DetectorUnavailable(format!("{:?}", e)))?;

        Ok(Self {
            observer,
            watched: HashMap::new(),
            _callback: callback,
        })
    }
}

impl VisibilityDetector for WebDetector {
    type Target = WebImage;

    fn watch(&mut self, target: &WebImage, _margin: ProximityMargin) -> LoaderResult<()> {
        if self.watched.contains_key(&target.id) {
            return Ok(());
        }

        let element: Element = target.element.clone().unchecked_into();
        self.observer.observe(&element);
        self.watched.insert(target.id, element);
        Ok(())
    }

    fn unwatch(&mut self, id: ElementId) {
        if let Some(element) = self.watched.remove(&id) {
            self.observer.unobserve(&element);
        }
    }

    fn is_watching(&self, id: ElementId) -> bool {
        self.watched.contains_key(&id)
    }

    fn watched_count(&self) -> usize {
        self.watched.len()
    }
}

impl Drop for WebDetector {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn image() -> WebImage {
        let element: HtmlImageElement = web_sys::window()
            .unwrap()
            .document()
            .unwrap()
            .create_element("img")
            .unwrap()
            .unchecked_into();
        WebImage::new(element)
    }

    #[wasm_bindgen_test]
    fn test_image_is_tagged_with_id() {
        let img = image();
        let element: &Element = img.element().as_ref();
        assert_eq!(element_id(element), Some(img.id()));
    }

    #[wasm_bindgen_test]
    fn test_image_surface() {
        let img = image();
        img.set_source("data:image/gif;base64,R0lGODlhAQABAAAAACw=");
        img.add_class("loaded");

        assert!(img.element().src().starts_with("data:image/gif"));
        assert!(img.element().class_list().contains("loaded"));
    }

    #[wasm_bindgen_test]
    fn test_watch_is_idempotent() {
        let mut detector = WebDetector::new(ProximityMargin::default(), |_| {}).unwrap();
        let img = image();

        detector.watch(&img, ProximityMargin::default()).unwrap();
        detector.watch(&img, ProximityMargin::default()).unwrap();
        assert_eq!(detector.watched_count(), 1);

        detector.unwatch(img.id());
        detector.unwatch(img.id());
        assert!(!detector.is_watching(img.id()));
    }
}
