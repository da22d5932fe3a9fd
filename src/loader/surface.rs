//! Image surface boundary
//!
//! The loader never renders anything itself. It drives whatever the UI layer
//! hands it through this trait: a DOM `<img>` in the browser, an in-memory
//! record in the simulator and tests.

use super::types::ElementId;

/// Handle to a renderable image element owned by the UI layer
pub trait ImageSurface {
    /// Stable identity of the element for its whole lifetime
    fn id(&self) -> ElementId;

    /// Replace the displayed resource
    fn set_source(&self, url: &str);

    /// Add a state class used by styling hooks
    fn add_class(&self, class: &str);
}
