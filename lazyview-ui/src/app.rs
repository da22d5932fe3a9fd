//! App Root Component
//!
//! Main application component with routing and the shared image loader.

use lazyview::config::LoaderConfig;
use leptos::*;
use leptos_router::*;

use crate::components::Nav;
use crate::pages::Moments;
use crate::state::provide_lazy_loader;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // One loader and observer for the whole page
    provide_lazy_loader(LoaderConfig::default());

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                <Nav />

                <main class="flex-1 container mx-auto px-4 py-8">
                    <Routes>
                        <Route path="/" view=Moments />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-gray-700 hover:bg-gray-600 rounded-lg font-medium transition-colors"
            >
                "Go to Moments"
            </A>
        </div>
    }
}
