//! Scroll Simulator
//!
//! Drives the loader over a synthetic moments gallery without a browser:
//!
//! - **image**: `SimImage`, an in-memory image element
//! - **gallery**: tile layouts (JSON or generated grid)
//! - **simulation**: scrolls a viewport and records commits per offset

mod gallery;
mod image;
mod simulation;

pub use gallery::{GalleryItem, GalleryLayout, LayoutError};
pub use image::SimImage;
pub use simulation::{ScrollReport, Simulation, StepReport};
