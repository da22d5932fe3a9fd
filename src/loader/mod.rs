//! Deferred Asset Loader
//!
//! This module provides the per-element loading state machine:
//!
//! - **types**: Core data types (ElementId, ProximityMargin, ObservedElement)
//! - **surface**: The image handle trait the UI layer implements
//! - **engine**: The loader orchestrating attach/update/destroy and commits
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! attach(img, url) → placeholder shown → detector.watch(img)
//!         ...
//! detector reports proximate → img.src = url, class "loaded" → detector.unwatch(img)
//! ```
//!
//! # Example
//!
//! ```rust
//! use lazyview::config::LoaderConfig;
//! use lazyview::detector::ViewportDetector;
//! use lazyview::geometry::Rect;
//! use lazyview::loader::Loader;
//! use lazyview::sim::SimImage;
//!
//! let detector = ViewportDetector::<SimImage>::new(800.0, 600.0);
//! let mut loader = Loader::new(&LoaderConfig::default(), detector);
//!
//! let below = SimImage::new("below", Rect::new(0.0, 2000.0, 200.0, 200.0));
//! loader.attach(below.clone(), "moments/1.jpg").unwrap();
//!
//! let detector = loader.detector_mut().unwrap();
//! detector.scroll_to(0.0, 1500.0);
//! let entries = detector.poll();
//! loader.deliver(entries);
//!
//! assert_eq!(below.src(), "moments/1.jpg");
//! ```

pub mod engine;
pub mod error;
pub mod surface;
pub mod types;

// Re-export commonly used types
pub use engine::{CommitOutcome, Loader, LoaderStats, UpdateOutcome};
pub use error::{LoaderError, LoaderResult};
pub use surface::ImageSurface;
pub use types::{
    ElementId, LoadState, ObservedElement, ProximityMargin, Visibility, DEFAULT_MARGIN_PX,
    LOADED_CLASS, PLACEHOLDER_IMAGE,
};
