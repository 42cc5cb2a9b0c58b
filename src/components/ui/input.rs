use leptos::prelude::*;
use tw_merge::tw_merge;

const CONTROL: &str = "w-full min-w-0 rounded-lg border border-input bg-background px-3 text-sm outline-none transition-colors placeholder:text-muted-foreground/70 focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/40 disabled:cursor-not-allowed disabled:opacity-50";

/// Text input bound to a string signal.
#[component]
pub fn Input(
    #[prop(into)] bind_value: RwSignal<String>,
    #[prop(default = "text")] r#type: &'static str,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(optional)] required: bool,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let class = tw_merge!("h-9", CONTROL, class);

    view! {
        <input
            data-name="Input"
            id=id
            type=r#type
            class=class
            placeholder=placeholder
            required=required
            prop:value=move || bind_value.get()
            on:input=move |ev| bind_value.set(event_target_value(&ev))
        />
    }
}

#[component]
pub fn Textarea(
    #[prop(into)] bind_value: RwSignal<String>,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(default = 4)] rows: u32,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let class = tw_merge!("resize-y py-2", CONTROL, class);

    view! {
        <textarea
            data-name="Textarea"
            id=id
            rows=rows
            class=class
            placeholder=placeholder
            prop:value=move || bind_value.get()
            on:input=move |ev| bind_value.set(event_target_value(&ev))
        ></textarea>
    }
}
