use icons::LoaderCircle;
use leptos::prelude::*;
use tw_merge::tw_merge;

#[component]
pub fn Spinner(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("size-4 animate-spin", class);

    view! { <LoaderCircle class=merged_class attr:role="status" attr:aria-label="Loading" /> }
}

/// Centered spinner with a caption, for whole-page loads.
#[component]
pub fn PageSpinner(#[prop(into, optional)] label: String) -> impl IntoView {
    let label = if label.is_empty() { "Loading...".to_string() } else { label };

    view! {
        <div class="flex min-h-[240px] w-full flex-col items-center justify-center gap-2 text-sm text-muted-foreground">
            <Spinner class="size-6" />
            <span>{label}</span>
        </div>
    }
}
