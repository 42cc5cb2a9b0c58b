use super::{CommitPlan, EditableField, FieldCommand, FieldMode, KeyInput};
use crate::state::AppContext;
use futures::future::LocalBoxFuture;
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use std::future::Future;
use std::sync::Arc;
use wasm_bindgen::JsCast;

/// Persists a committed value; resolves to whether the save stuck.
pub(crate) type SaveFn = Arc<dyn Fn(String) -> LocalBoxFuture<'static, bool> + Send + Sync>;

pub(crate) fn save_fn<F, Fut>(f: F) -> SaveFn
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + 'static,
{
    Arc::new(move |v| Box::pin(f(v)))
}

fn commit(field: RwSignal<EditableField>, on_save: &SaveFn) {
    let Some(plan) = field.try_update(|f| f.commit()) else {
        return;
    };
    let CommitPlan::Persist(value) = plan else {
        return;
    };

    let fut = on_save(value);
    spawn_local(async move {
        let ok = fut.await;
        // The field may have unmounted while the request ran.
        let _ = field.try_update(|f| f.finish_save(ok));
    });
}

/// Click-to-edit text. Enter (Ctrl/Cmd+Enter when multiline) or a click
/// outside saves; Escape cancels.
#[component]
pub(crate) fn EditableText(
    #[prop(into)] value: Signal<String>,
    on_save: SaveFn,
    /// Local-only draft path, offered next to save on multiline fields.
    #[prop(optional)]
    on_temp_save: Option<Callback<String>>,
    #[prop(optional, into)] class: String,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional)] multiline: bool,
    #[prop(optional)] disabled: bool,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let session = app_state.0.session;

    let field = RwSignal::new({
        let mut f = EditableField::new(value.get_untracked(), multiline);
        f.set_disabled(disabled);
        f
    });
    let mode = Memo::new(move |_| field.with(|f| f.mode()));

    Effect::new(move |_| {
        let v = value.get();
        field.update(|f| f.sync_value(&v));
    });

    let container_ref: NodeRef<html::Div> = NodeRef::new();
    let input_ref: NodeRef<html::Input> = NodeRef::new();
    let textarea_ref: NodeRef<html::Textarea> = NodeRef::new();

    // Focus the editor once it is mounted, caret at the end.
    Effect::new(move |_| {
        if mode.get() != FieldMode::Editing {
            return;
        }
        if let Some(el) = input_ref.get() {
            let _ = el.focus();
            let len = el.value().encode_utf16().count() as u32;
            let _ = el.set_selection_range(len, len);
        }
        if let Some(el) = textarea_ref.get() {
            let _ = el.focus();
            let len = el.value().encode_utf16().count() as u32;
            let _ = el.set_selection_range(len, len);
        }
    });

    // Click outside commits.
    let outside_save = on_save.clone();
    let handle = window_event_listener(ev::mousedown, move |e: web_sys::MouseEvent| {
        if field.try_with_untracked(|f| f.mode()) != Some(FieldMode::Editing) {
            return;
        }
        let Some(container) = container_ref.get_untracked() else {
            return;
        };
        let target = e.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok());
        if !container.contains(target.as_ref()) {
            commit(field, &outside_save);
        }
    });
    on_cleanup(move || handle.remove());

    let begin = move |e: web_sys::MouseEvent| {
        let started = field
            .try_update(|f| f.begin_edit(session.admin_mode_untracked()))
            .unwrap_or(false);
        if started {
            e.prevent_default();
            e.stop_propagation();
        }
    };

    let key_save = on_save.clone();
    let on_key = move |e: web_sys::KeyboardEvent| {
        let key = e.key();
        let input = KeyInput {
            key: &key,
            ctrl_or_meta: e.ctrl_key() || e.meta_key(),
            shift: e.shift_key(),
        };
        match field.with_untracked(|f| f.key(&input)) {
            Some(FieldCommand::Commit) => {
                e.prevent_default();
                commit(field, &key_save);
            }
            Some(FieldCommand::Cancel) => {
                e.prevent_default();
                field.update(|f| f.cancel());
            }
            None => {}
        }
    };

    let on_input = move |e: web_sys::Event| {
        let v = event_target_value(&e);
        field.update(|f| f.set_buffer(v));
    };

    let placeholder = placeholder.unwrap_or_else(|| "Click to add text".to_string());
    let edit_class = format!(
        "w-full rounded-md border-2 border-primary bg-transparent px-2 py-1 outline-none {class}"
    );
    let view_class = class.clone();
    let button_save = on_save.clone();

    view! {
        <div node_ref=container_ref class="relative">
            <Show
                when=move || mode.get() != FieldMode::Viewing
                fallback=move || {
                    let view_class = view_class.clone();
                    let placeholder = placeholder.clone();
                    view! {
                        <span
                            class=move || {
                                let editable = session.admin_mode() && !disabled;
                                format!(
                                    "group relative inline-block rounded transition-colors {} {} {}",
                                    if editable { "cursor-pointer hover:bg-muted/40 ring-offset-2 hover:ring-1 hover:ring-primary/40" } else { "" },
                                    if multiline { "whitespace-pre-line" } else { "" },
                                    view_class,
                                )
                            }
                            on:click=begin
                        >
                            {move || {
                                let v = value.get();
                                if v.is_empty() {
                                    view! { <span class="italic text-muted-foreground">{placeholder.clone()}</span> }.into_any()
                                } else {
                                    view! { <span>{v}</span> }.into_any()
                                }
                            }}
                        </span>
                    }
                }
            >
                {
                    let edit_class = edit_class.clone();
                    let button_save = button_save.clone();
                    let on_key = on_key.clone();
                    move || {
                        let saving = mode.get() == FieldMode::Saving;
                        let editor = if multiline {
                            view! {
                                <textarea
                                    node_ref=textarea_ref
                                    class=format!("{edit_class} min-h-[120px] resize-y")
                                    rows=6
                                    prop:value=move || field.with(|f| f.buffer().to_string())
                                    disabled=saving
                                    on:input=on_input
                                    on:keydown=on_key.clone()
                                ></textarea>
                            }
                            .into_any()
                        } else {
                            view! {
                                <input
                                    node_ref=input_ref
                                    type="text"
                                    class=edit_class.clone()
                                    prop:value=move || field.with(|f| f.buffer().to_string())
                                    disabled=saving
                                    on:input=on_input
                                    on:keydown=on_key.clone()
                                />
                            }
                            .into_any()
                        };

                        let save = button_save.clone();
                        view! {
                            {editor}
                            <div class="mt-1 flex items-center gap-1 text-xs">
                                <button
                                    type="button"
                                    class="rounded px-2 py-1 text-green-700 hover:bg-green-100 disabled:opacity-50"
                                    title=if multiline { "Save (Ctrl+Enter)" } else { "Save (Enter)" }
                                    disabled=saving
                                    on:click=move |_| commit(field, &save)
                                >
                                    {if saving { "Saving..." } else { "Save" }}
                                </button>
                                <Show when=move || on_temp_save.is_some()>
                                    <button
                                        type="button"
                                        class="rounded px-2 py-1 text-amber-700 hover:bg-amber-100 disabled:opacity-50"
                                        title="Keep as a draft without publishing"
                                        disabled=saving
                                        on:click=move |_| {
                                            let draft = field.try_update(|f| f.temp_save()).flatten();
                                            if let (Some(v), Some(cb)) = (draft, on_temp_save) {
                                                cb.run(v);
                                            }
                                        }
                                    >
                                        "Draft"
                                    </button>
                                </Show>
                                <button
                                    type="button"
                                    class="rounded px-2 py-1 text-red-700 hover:bg-red-100 disabled:opacity-50"
                                    title="Cancel (Esc)"
                                    disabled=saving
                                    on:click=move |_| field.update(|f| f.cancel())
                                >
                                    "Cancel"
                                </button>
                            </div>
                        }
                    }
                }
            </Show>
        </div>
    }
}
