//! UI Components
//!
//! Reusable Leptos components for the gallery.

pub mod lazy_image;
pub mod nav;

pub use lazy_image::LazyImage;
pub use nav::Nav;
