//! Shared Image Loader
//!
//! One loader and one `IntersectionObserver` per page. Components reach it
//! through the Leptos context.

use lazyview::config::LoaderConfig;
use lazyview::loader::{ElementId, Loader, LoaderResult, LoaderStats, UpdateOutcome, Visibility};
use leptos::*;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::detector::{WebDetector, WebImage};

type PageLoader = Loader<WebDetector>;

/// Observer entries that arrived while the loader was borrowed
type Backlog = Rc<RefCell<Vec<Visibility>>>;

/// Handle to the page's loader
#[derive(Clone)]
pub struct LazyLoader {
    inner: Rc<RefCell<PageLoader>>,
    backlog: Backlog,
}

impl LazyLoader {
    /// Build the loader and its observer. Falls back to eager loading when
    /// the browser has no `IntersectionObserver`.
    pub fn new(config: &LoaderConfig) -> Self {
        let margin = config.margin().unwrap_or_default();
        let backlog: Backlog = Rc::default();

        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<PageLoader>>| {
            let weak = weak.clone();
            let backlog = backlog.clone();
            let detector = WebDetector::new(margin, move |visibility| {
                let Some(loader) = weak.upgrade() else {
                    return;
                };
                // Observers report transitions only; an entry lost here is
                // never repeated, so a busy loader gets it on its next borrow.
                match loader.try_borrow_mut() {
                    Ok(mut loader) => {
                        drain(&mut loader, &backlog);
                        loader.on_visibility(visibility);
                    }
                    Err(_) => backlog.borrow_mut().push(visibility),
                }
            });

            if let Err(e) = &detector {
                web_sys::console::warn_1(&format!("{}; loading images eagerly", e).into());
            }

            RefCell::new(Loader::from_detector(config, detector))
        });

        Self { inner, backlog }
    }

    fn with_loader<R>(&self, f: impl FnOnce(&mut PageLoader) -> R) -> R {
        let mut loader = self.inner.borrow_mut();
        drain(&mut loader, &self.backlog);
        let result = f(&mut loader);
        drain(&mut loader, &self.backlog);
        result
    }

    /// Directive mount hook
    pub fn attach(&self, image: WebImage, url: &str) -> LoaderResult<()> {
        self.with_loader(|loader| loader.attach(image, url))
    }

    /// Directive update hook
    pub fn update(&self, id: ElementId, url: &str) -> UpdateOutcome {
        self.with_loader(|loader| loader.update(id, url))
    }

    /// Directive unmount hook
    pub fn destroy(&self, id: ElementId) {
        self.with_loader(|loader| loader.destroy(id));
    }

    pub fn stats(&self) -> LoaderStats {
        self.with_loader(|loader| loader.stats())
    }

    /// Entries waiting for the loader to be free
    pub fn backlog_len(&self) -> usize {
        self.backlog.borrow().len()
    }
}

/// Feed queued entries in arrival order
fn drain(loader: &mut PageLoader, backlog: &Backlog) {
    let queued = std::mem::take(&mut *backlog.borrow_mut());
    if !queued.is_empty() {
        loader.deliver(queued);
    }
}

/// Provide the loader to the component tree
pub fn provide_lazy_loader(config: LoaderConfig) {
    provide_context(LazyLoader::new(&config));
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use lazyview::loader::{ImageSurface, LoadState};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn image() -> WebImage {
        let element: web_sys::HtmlImageElement = web_sys::window()
            .unwrap()
            .document()
            .unwrap()
            .create_element("img")
            .unwrap()
            .unchecked_into();
        WebImage::new(element)
    }

    #[wasm_bindgen_test]
    fn test_entries_queued_while_busy_are_replayed() {
        let loader = LazyLoader::new(&LoaderConfig::default());
        let img = image();
        loader.attach(img.clone(), "a.png").unwrap();

        loader.backlog.borrow_mut().push(Visibility::entered(img.id()));
        assert_eq!(loader.backlog_len(), 1);

        let stats = loader.stats();
        assert_eq!(stats.loaded, 1);
        assert_eq!(loader.backlog_len(), 0);
        assert_eq!(
            loader.inner.borrow().state(img.id()),
            Some(LoadState::Loaded)
        );
    }
}
