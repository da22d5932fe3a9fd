//! Moments Page
//!
//! Long feed of moments, each with a photo grid. Photos load as they scroll
//! near the viewport.

use leptos::*;

use crate::components::LazyImage;
use crate::state::LazyLoader;

/// Number of moments in the feed
const MOMENT_COUNT: usize = 60;

/// Photos per moment
const PHOTOS_PER_MOMENT: usize = 6;

fn photo_url(moment: usize, photo: usize, size: &str) -> String {
    format!("/api/media/moments/{}/{}?size={}", moment, photo, size)
}

/// Moments page component
#[component]
pub fn Moments() -> impl IntoView {
    let loader = use_context::<LazyLoader>().expect("LazyLoader not found");

    // Switching resolution rebinds every photo that has not loaded yet
    let (size, set_size) = create_signal("thumb".to_string());
    let (stats, set_stats) = create_signal(loader.stats());

    let refresh_stats = move |_| set_stats.set(loader.stats());
    let toggle_size = move |_| {
        set_size.update(|s| {
            *s = if *s == "thumb" { "full".to_string() } else { "thumb".to_string() };
        });
    };

    view! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Moments"</h1>
                    <p class="text-gray-400 mt-1">"Photos load as you scroll"</p>
                </div>

                <div class="flex items-center space-x-2">
                    <button
                        class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg text-sm"
                        on:click=toggle_size
                    >
                        {move || format!("Size: {}", size.get())}
                    </button>
                    <button
                        class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg text-sm"
                        on:click=refresh_stats
                    >
                        {move || stats.get().to_string()}
                    </button>
                </div>
            </div>

            {(0..MOMENT_COUNT)
                .map(|moment| view! { <MomentCard moment=moment size=size /> })
                .collect_view()}
        </div>
    }
}

/// One moment with its photo grid
#[component]
fn MomentCard(moment: usize, size: ReadSignal<String>) -> impl IntoView {
    view! {
        <article class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-lg font-semibold mb-4">{format!("Moment #{}", moment + 1)}</h2>
            <div class="grid grid-cols-3 gap-2">
                {(0..PHOTOS_PER_MOMENT)
                    .map(|photo| {
                        let src = Signal::derive(move || photo_url(moment, photo, &size.get()));
                        view! {
                            <LazyImage
                                src=src
                                alt=format!("Moment {} photo {}", moment + 1, photo + 1)
                                class="w-full aspect-square object-cover rounded"
                            />
                        }
                    })
                    .collect_view()}
            </div>
        </article>
    }
}
