use leptos::prelude::*;
use tw_merge::tw_merge;

/// A labelled form row with an optional hint under the control.
#[component]
pub fn Field(
    #[prop(into)] label: String,
    #[prop(into)] html_for: String,
    #[prop(default = None)] hint: Option<&'static str>,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let class = tw_merge!("flex flex-col gap-2", class);

    view! {
        <div data-name="Field" class=class>
            <label
                r#for=html_for
                class="text-xs font-medium uppercase tracking-wide text-muted-foreground select-none"
            >
                {label}
            </label>
            {children()}
            {hint.map(|h| view! { <p class="text-xs text-muted-foreground/80">{h}</p> })}
        </div>
    }
}
