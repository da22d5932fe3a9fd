//! # Lazyview
//!
//! Viewport-triggered image loading. Images start out showing a lightweight
//! placeholder and receive their real source only when they come within a
//! margin of the visible viewport, at most once per element.
//!
//! ## Modules
//!
//! - [`loader`]: Per-element state machine and the single commit point
//! - [`detector`]: Visibility detector contract and a polling implementation
//! - [`geometry`]: Rectangles and the proximity test
//! - [`config`]: TOML configuration with environment overrides
//! - [`sim`]: Scroll simulator over a synthetic gallery
//!
//! ## Quick Start
//!
//! ```rust
//! use lazyview::{Config, GalleryLayout, Simulation};
//!
//! let layout = GalleryLayout::grid(4, 25, 200.0, 16.0);
//! let mut sim = Simulation::new(&Config::default(), &layout, false);
//!
//! // Only the first rows are committed before scrolling
//! let first = sim.scroll_to(0.0);
//! assert!(first.committed.len() < layout.len());
//!
//! let report = sim.run(240.0);
//! assert_eq!(report.loaded, layout.len());
//! ```

pub mod config;
pub mod detector;
pub mod geometry;
pub mod loader;
pub mod sim;

// Re-export top-level types for convenience
pub use loader::{
    CommitOutcome, ElementId, ImageSurface, LoadState, Loader, LoaderError, LoaderResult,
    LoaderStats, ObservedElement, ProximityMargin, UpdateOutcome, Visibility, PLACEHOLDER_IMAGE,
};

pub use detector::{ViewportDetector, VisibilityDetector};

pub use geometry::{Bounded, Rect};

pub use config::{Config, ConfigError, LoaderConfig, LoggingConfig, ViewportConfig};

pub use sim::{GalleryLayout, ScrollReport, SimImage, Simulation};
