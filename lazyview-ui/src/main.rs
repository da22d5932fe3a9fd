//! Lazyview Frontend
//!
//! Moments gallery built with Leptos (WASM) whose images load only when they
//! scroll near the viewport.
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. One loader per page is shared through the Leptos context; it
//! registers `<img>` elements with the browser's `IntersectionObserver` and
//! swaps in their real source on the first intersection.

use leptos::*;

mod app;
mod components;
mod detector;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
