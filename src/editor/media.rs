use crate::api::{validate_upload, MediaStore, UploadPolicy};
use crate::models::MediaType;
use crate::state::AppContext;
use crate::util::{alert, confirm, object_url, read_file, revoke_object_url};
use futures::future::LocalBoxFuture;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;
use std::sync::Arc;

/// Stores an uploaded URL (empty to clear the slot); resolves to whether it stuck.
pub(crate) type MediaSaveFn =
    Arc<dyn Fn(String, MediaType) -> LocalBoxFuture<'static, bool> + Send + Sync>;

pub(crate) fn media_save_fn<F, Fut>(f: F) -> MediaSaveFn
where
    F: Fn(String, MediaType) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + 'static,
{
    Arc::new(move |url, kind| Box::pin(f(url, kind)))
}

/// Clearing a slot stores an empty image URL.
pub(crate) async fn clear_media(save: &MediaSaveFn) -> bool {
    save(String::new(), MediaType::Image).await
}

/// Image or video slot. In admin mode a click opens the file picker; the
/// file is checked, previewed, uploaded, and then handed to `on_save`.
#[component]
pub(crate) fn EditableMedia(
    #[prop(into)] url: Signal<String>,
    #[prop(into)] media_type: Signal<MediaType>,
    on_save: MediaSaveFn,
    /// Storage folder for new uploads.
    #[prop(into)]
    folder: String,
    #[prop(optional)] images_only: bool,
    #[prop(optional, into)] label: String,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let session = app_state.0.session;
    let api_client = app_state.0.api_client;

    let uploading = RwSignal::new(false);
    let preview: RwSignal<Option<(String, MediaType)>> = RwSignal::new(None);
    let file_input: NodeRef<html::Input> = NodeRef::new();

    let policy = if images_only {
        UploadPolicy::images_only()
    } else {
        UploadPolicy::default()
    };
    let accept = if images_only { "image/*" } else { "image/*,video/*" };

    let clear_preview = move || {
        if let Some((local, _)) = preview.get_untracked() {
            revoke_object_url(&local);
        }
        preview.set(None);
    };

    let upload_save = on_save.clone();
    let on_pick = move |_: web_sys::Event| {
        let Some(input) = file_input.get_untracked() else {
            return;
        };
        let Some(file) = input.files().and_then(|l| l.get(0)) else {
            return;
        };
        // Picking the same file twice still fires `change`.
        input.set_value("");

        let folder = folder.clone();
        let save = upload_save.clone();
        spawn_local(async move {
            let Some(upload) = read_file(&file).await else {
                alert("Could not read the selected file.");
                return;
            };
            let kind = match validate_upload(&upload, &policy) {
                Ok(kind) => kind,
                Err(e) => {
                    alert(&e.user_message());
                    return;
                }
            };

            if let Some(local) = object_url(&file) {
                preview.set(Some((local, kind)));
            }
            uploading.set(true);

            let client = api_client.get_untracked();
            match client.upload_file(&upload, &folder, &policy).await {
                Ok(public_url) => {
                    if !save(public_url, kind).await {
                        alert("The file was uploaded but could not be attached. Please try again.");
                    }
                }
                Err(e) => {
                    tracing::error!("upload of {} failed: {e}", upload.name);
                    alert(&e.into_upload_error().user_message());
                }
            }

            uploading.set(false);
            clear_preview();
        });
    };

    let remove_save = on_save.clone();
    let on_remove = Callback::new(move |e: web_sys::MouseEvent| {
        e.stop_propagation();
        if !confirm("Remove this media?") {
            return;
        }
        let save = remove_save.clone();
        spawn_local(async move {
            uploading.set(true);
            if !clear_media(&save).await {
                alert("Removing the media failed. Please try again.");
            }
            uploading.set(false);
        });
    });

    let shown = move || {
        preview.get().or_else(|| {
            let u = url.get();
            (!u.trim().is_empty()).then(|| (u, media_type.get()))
        })
    };

    view! {
        <div class=format!("relative overflow-hidden rounded-lg border border-border bg-muted/30 {class}")>
            {move || match shown() {
                Some((src, MediaType::Video)) => view! {
                    <video src=src class="h-full w-full object-cover" controls=true muted=true playsinline=true></video>
                }.into_any(),
                Some((src, MediaType::Image)) => view! {
                    <img src=src alt=label.clone() class="h-full w-full object-cover" loading="lazy" />
                }.into_any(),
                None => view! {
                    <div class="flex h-full min-h-[120px] w-full items-center justify-center text-xs text-muted-foreground">
                        {if label.is_empty() { "No media".to_string() } else { label.clone() }}
                    </div>
                }.into_any(),
            }}

            <Show when=move || session.admin_mode()>
                <input
                    node_ref=file_input
                    type="file"
                    class="hidden"
                    accept=accept
                    on:change=on_pick.clone()
                />
                <div class="absolute inset-x-0 bottom-0 flex justify-end gap-1 bg-black/50 p-1 text-xs text-white">
                    <button
                        type="button"
                        class="rounded px-2 py-1 hover:bg-white/20 disabled:opacity-50"
                        disabled=move || uploading.get()
                        on:click=move |_| {
                            if let Some(input) = file_input.get_untracked() {
                                input.click();
                            }
                        }
                    >
                        {move || if uploading.get() { "Uploading..." } else { "Replace" }}
                    </button>
                    <Show when=move || !url.get().trim().is_empty()>
                        <button
                            type="button"
                            class="rounded px-2 py-1 hover:bg-red-500/60 disabled:opacity-50"
                            disabled=move || uploading.get()
                            on:click=move |e| on_remove.run(e)
                        >
                            "Remove"
                        </button>
                    </Show>
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::sync::Mutex;

    #[test]
    fn test_clear_media_sends_empty_url_each_time() {
        let seen: Arc<Mutex<Vec<(String, MediaType)>>> = Arc::default();
        let sink = seen.clone();
        let save = media_save_fn(move |url: String, kind: MediaType| {
            let sink = sink.clone();
            async move {
                if let Ok(mut calls) = sink.lock() {
                    calls.push((url, kind));
                }
                true
            }
        });

        // The remove handler is re-run from every render of the overlay.
        assert!(block_on(clear_media(&save)));
        assert!(block_on(clear_media(&save)));

        let calls = seen.lock().map(|c| c.clone()).unwrap_or_default();
        assert_eq!(
            calls,
            vec![(String::new(), MediaType::Image), (String::new(), MediaType::Image)]
        );
    }
}
