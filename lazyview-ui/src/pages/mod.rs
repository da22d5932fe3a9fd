//! Application Pages
//!
//! Top-level page components for routing.

pub mod moments;

pub use moments::Moments;
