use leptos::prelude::*;
use leptos_ui::clx;

use super::button::{Button, ButtonSize, ButtonVariant};

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {AlertDescription, p, "text-sm [&_p]:leading-relaxed"}
}

pub use components::*;

/// Inline failure message for a list or fetch, with an optional retry.
#[component]
pub fn ErrorAlert(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(optional)] on_retry: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some()>
            <Alert class="flex items-center justify-between gap-3 border-destructive/30">
                <AlertDescription class="text-destructive text-xs">
                    {move || message.get().unwrap_or_default()}
                </AlertDescription>
                {on_retry.map(|retry| view! {
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        on:click=move |_| retry.run(())
                    >
                        "Retry"
                    </Button>
                })}
            </Alert>
        </Show>
    }
}
