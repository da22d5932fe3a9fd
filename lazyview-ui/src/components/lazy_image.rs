//! Lazy Image Component
//!
//! `<img>` whose real source is set only once it nears the viewport. Mount,
//! source changes and unmount map onto the loader's attach, update and
//! destroy hooks.

use lazyview::loader::{ElementId, UpdateOutcome};
use leptos::*;
use std::cell::Cell;
use std::rc::Rc;

use crate::detector::WebImage;
use crate::state::LazyLoader;

/// Deferred-loading image
#[component]
pub fn LazyImage(
    /// Real image URL; may change while the placeholder is still showing
    #[prop(into)]
    src: MaybeSignal<String>,
    #[prop(optional, into)]
    alt: String,
    #[prop(optional, into)]
    class: String,
) -> impl IntoView {
    let loader = use_context::<LazyLoader>().expect("LazyLoader not found");
    let img_ref = create_node_ref::<html::Img>();
    let element_id: Rc<Cell<Option<ElementId>>> = Rc::new(Cell::new(None));

    // Attach on mount
    let mount_loader = loader.clone();
    let mount_id = Rc::clone(&element_id);
    let mount_src = src.clone();
    img_ref.on_load(move |img| {
        let element: &web_sys::HtmlImageElement = &img;
        let image = WebImage::new(element.clone());
        mount_id.set(Some(image.id()));

        if let Err(e) = mount_loader.attach(image, &mount_src.get_untracked()) {
            web_sys::console::warn_1(&e.to_string().into());
        }
    });

    // Forward source changes
    let update_loader = loader.clone();
    let update_id = Rc::clone(&element_id);
    create_effect(move |_| {
        let url = src.get();
        if let Some(id) = update_id.get() {
            if update_loader.update(id, &url) == UpdateOutcome::Rejected {
                web_sys::console::log_1(
                    &format!("Image {} already loaded, ignoring new source", id).into(),
                );
            }
        }
    });

    // Destroy on unmount
    on_cleanup(move || {
        if let Some(id) = element_id.get() {
            loader.destroy(id);
        }
    });

    view! {
        <img
            node_ref=img_ref
            alt=alt
            class=format!("lazy-image {}", class)
            decoding="async"
        />
    }
}
