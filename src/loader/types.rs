//! Core data types for the deferred asset loader
//!
//! - `ElementId`: identity of an observed image element
//! - `ProximityMargin`: how far outside the viewport loading starts
//! - `ObservedElement`: per-element pending/loaded state
//! - `Visibility`: a single report from a detector

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Neutral 200x200 rectangle shown until the real image is committed.
///
/// Embedded as a data URI so showing it never touches the network.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns=\"http://www.w3.org/2000/svg\" width=\"200\" height=\"200\"%3E%3Crect width=\"200\" height=\"200\" fill=\"%23f0f0f0\"/%3E%3C/svg%3E";

/// Class added to an element once its real image has been committed
pub const LOADED_CLASS: &str = "loaded";

/// Default proximity margin in logical pixels
pub const DEFAULT_MARGIN_PX: f64 = 50.0;

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an observed element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(u64);

impl ElementId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Allocate a process-unique id
    pub fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Distance the viewport is expanded by on every side when deciding
/// whether an element is close enough to start loading
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ProximityMargin(f64);

impl ProximityMargin {
    /// Create a margin; negative and non-finite values are rejected
    pub fn new(px: f64) -> Option<Self> {
        if px.is_finite() && px >= 0.0 {
            Some(Self(px))
        } else {
            None
        }
    }

    pub fn px(self) -> f64 {
        self.0
    }

    /// CSS form used for `rootMargin`
    pub fn to_css(self) -> String {
        format!("{}px", self.0)
    }
}

impl Default for ProximityMargin {
    fn default() -> Self {
        Self(DEFAULT_MARGIN_PX)
    }
}

impl fmt::Display for ProximityMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

/// Lifecycle of a tracked element. Untracked elements have no state at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// Placeholder shown, waiting for the element to come near the viewport
    Pending,
    /// Real resource committed (terminal)
    Loaded,
}

/// Per-element state held by the loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedElement {
    /// Resource to commit on visibility; `None` while the bound value is empty
    pub pending_resource: Option<String>,
    /// Set exactly once, on commit
    pub loaded: bool,
    /// Raw value most recently supplied by the UI binding
    pub last_bound_resource: String,
    /// Proximity from the detector's latest report for this element
    pub proximate: bool,
}

impl ObservedElement {
    pub fn new(bound: &str) -> Self {
        Self {
            pending_resource: non_empty(bound),
            loaded: false,
            last_bound_resource: bound.to_string(),
            proximate: false,
        }
    }

    /// Record a new bound value. Returns false when the value did not change.
    pub fn rebind(&mut self, bound: &str) -> bool {
        if self.last_bound_resource == bound {
            return false;
        }
        self.last_bound_resource = bound.to_string();
        // An empty rebind keeps the previous target, as the binding falls
        // back to the last recorded source.
        if let Some(url) = non_empty(bound) {
            self.pending_resource = Some(url);
        }
        true
    }

    pub fn state(&self) -> LoadState {
        if self.loaded {
            LoadState::Loaded
        } else {
            LoadState::Pending
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// One report from a detector: `element` is now inside (or outside) the
/// proximity zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub element: ElementId,
    pub proximate: bool,
}

impl Visibility {
    pub fn entered(element: ElementId) -> Self {
        Self {
            element,
            proximate: true,
        }
    }

    pub fn left(element: ElementId) -> Self {
        Self {
            element,
            proximate: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ids_are_unique() {
        let a = ElementId::next();
        let b = ElementId::next();
        assert_ne!(a, b);
        assert_eq!(ElementId::new(42).to_string(), "#42");
    }

    #[test]
    fn test_margin_validation() {
        assert_eq!(ProximityMargin::new(50.0).map(|m| m.px()), Some(50.0));
        assert!(ProximityMargin::new(0.0).is_some());
        assert!(ProximityMargin::new(-1.0).is_none());
        assert!(ProximityMargin::new(f64::NAN).is_none());
        assert!(ProximityMargin::new(f64::INFINITY).is_none());
        assert_eq!(ProximityMargin::default().to_css(), "50px");
    }

    #[test]
    fn test_empty_binding_has_no_pending_resource() {
        let element = ObservedElement::new("");
        assert_eq!(element.pending_resource, None);
        assert_eq!(element.state(), LoadState::Pending);

        assert!(!element.proximate);
    }

    #[test]
    fn test_whitespace_binding_is_kept_verbatim() {
        let element = ObservedElement::new("  ");
        assert_eq!(element.pending_resource.as_deref(), Some("  "));

        let element = ObservedElement::new(" a.png ");
        assert_eq!(element.pending_resource.as_deref(), Some(" a.png "));
    }

    #[test]
    fn test_rebind() {
        let mut element = ObservedElement::new("a.png");
        assert!(!element.rebind("a.png"));

        assert!(element.rebind("b.png"));
        assert_eq!(element.pending_resource.as_deref(), Some("b.png"));

        // Empty value keeps the last real target
        assert!(element.rebind(""));
        assert_eq!(element.pending_resource.as_deref(), Some("b.png"));
        assert_eq!(element.last_bound_resource, "");
    }

    #[test]
    fn test_placeholder_is_inline_svg() {
        assert!(PLACEHOLDER_IMAGE.starts_with("data:image/svg+xml,"));
        assert!(PLACEHOLDER_IMAGE.contains("%23f0f0f0"));
    }
}
