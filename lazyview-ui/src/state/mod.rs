//! State Management
//!
//! The page-wide image loader shared through the Leptos context.

pub mod loader;

pub use loader::{provide_lazy_loader, LazyLoader};
