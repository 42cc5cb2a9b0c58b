use crate::api::{MediaStore, UploadPolicy};
use crate::components::ui::{Button, ButtonSize, ButtonVariant, ErrorAlert, Input, PageSpinner, Spinner};
use crate::models::{filter_media, FileKind, MediaFile};
use crate::pages::projects::tab_class;
use crate::state::{AppContext, AppState};
use crate::util::{alert, confirm, copy_input_text, display_file_name, format_file_size, read_file};
use icons::Check;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashSet;
use strum::IntoEnumIterator;

const UPLOAD_FOLDER: &str = "uploads";

fn kind_label(kind: Option<FileKind>) -> &'static str {
    match kind {
        None => "All",
        Some(FileKind::Image) => "Images",
        Some(FileKind::Video) => "Videos",
        Some(FileKind::Document) => "Documents",
        Some(FileKind::Other) => "Other",
    }
}

#[derive(Clone, Copy)]
struct Library {
    app: AppState,
    files: RwSignal<Vec<MediaFile>>,
    selected: RwSignal<HashSet<String>>,
    error: RwSignal<Option<String>>,
    loaded: RwSignal<bool>,
    busy: RwSignal<bool>,
}

impl Library {
    fn load(self) {
        spawn_local(async move {
            match self.app.client().list_files().await {
                Ok(files) => {
                    // Drop selections for files that are gone.
                    self.selected.update(|s| s.retain(|p| files.iter().any(|f| &f.file_path == p)));
                    self.files.set(files);
                    self.error.set(None);
                }
                Err(e) => {
                    tracing::error!("listing media failed: {e}");
                    self.error.set(Some(e.user_message()));
                }
            }
            self.loaded.set(true);
        });
    }

    fn toggle(&self, path: &str) {
        self.selected.update(|s| {
            if !s.remove(path) {
                s.insert(path.to_string());
            }
        });
    }

    fn upload(self, file: web_sys::File) {
        self.busy.set(true);
        spawn_local(async move {
            match read_file(&file).await {
                None => alert("Could not read the selected file."),
                Some(upload) => {
                    let client = self.app.client();
                    match client.upload_file(&upload, UPLOAD_FOLDER, &UploadPolicy::default()).await {
                        Ok(url) => {
                            tracing::info!("uploaded {url}");
                            self.load();
                        }
                        Err(e) => alert(&e.into_upload_error().user_message()),
                    }
                }
            }
            self.busy.set(false);
        });
    }

    fn delete_selected(self) {
        let paths: Vec<String> = self.selected.with_untracked(|s| s.iter().cloned().collect());
        if paths.is_empty() {
            return;
        }
        let prompt = format!(
            "Delete {} file{}? Projects that use them will show broken media.",
            paths.len(),
            if paths.len() == 1 { "" } else { "s" }
        );
        if !confirm(&prompt) {
            return;
        }
        self.busy.set(true);
        spawn_local(async move {
            match self.app.client().delete_files(&paths).await {
                Ok(()) => {
                    tracing::info!("deleted {} media files", paths.len());
                    self.selected.set(HashSet::new());
                    self.load();
                }
                Err(e) => {
                    tracing::error!("deleting media failed: {e}");
                    alert(&format!("Deleting failed. {}", e.user_message()));
                }
            }
            self.busy.set(false);
        });
    }
}

#[component]
pub(crate) fn AdminMediaPage() -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let library = Library {
        app,
        files: RwSignal::new(Vec::new()),
        selected: RwSignal::new(HashSet::new()),
        error: RwSignal::new(None),
        loaded: RwSignal::new(false),
        busy: RwSignal::new(false),
    };
    library.load();

    let query = RwSignal::new(String::new());
    let kind: RwSignal<Option<FileKind>> = RwSignal::new(None);
    let file_input: NodeRef<html::Input> = NodeRef::new();

    let visible = Memo::new(move |_| {
        library.files.with(|files| {
            query.with(|q| {
                filter_media(files, q, kind.get())
                    .into_iter()
                    .cloned()
                    .collect::<Vec<_>>()
            })
        })
    });

    let on_pick = move |_: web_sys::Event| {
        let Some(input) = file_input.get_untracked() else {
            return;
        };
        let Some(file) = input.files().and_then(|l| l.get(0)) else {
            return;
        };
        input.set_value("");
        library.upload(file);
    };

    let filters = std::iter::once(None).chain(FileKind::iter().map(Some));

    view! {
        <div class="mx-auto w-full max-w-6xl px-6 py-10">
            <div class="mb-6 flex flex-wrap items-center justify-between gap-4">
                <h1 class="text-2xl font-bold tracking-tight">"Media library"</h1>
                <div class="flex gap-2">
                    <Button
                        variant=ButtonVariant::Destructive
                        size=ButtonSize::Sm
                        attr:disabled=move || library.busy.get() || library.selected.with(HashSet::is_empty)
                        on:click=move |_| library.delete_selected()
                    >
                        {move || format!("Delete selected ({})", library.selected.with(HashSet::len))}
                    </Button>
                    <Button
                        size=ButtonSize::Sm
                        attr:disabled=move || library.busy.get()
                        on:click=move |_| {
                            if let Some(input) = file_input.get_untracked() {
                                input.click();
                            }
                        }
                    >
                        <Show when=move || library.busy.get() fallback=|| ().into_view()>
                            <Spinner />
                        </Show>
                        "Upload"
                    </Button>
                    <input
                        node_ref=file_input
                        type="file"
                        accept="image/*,video/*"
                        class="hidden"
                        on:change=on_pick
                    />
                </div>
            </div>

            <div class="mb-4 flex flex-wrap items-center gap-3">
                <Input class="max-w-xs" placeholder="Search by file name" bind_value=query />
                <div class="flex gap-2" role="tablist">
                    {filters.map(|k| view! {
                        <button
                            type="button"
                            role="tab"
                            class=move || tab_class(kind.get() == k)
                            on:click=move |_| kind.set(k)
                        >
                            {kind_label(k)}
                        </button>
                    }).collect_view()}
                </div>
            </div>

            <ErrorAlert message=library.error on_retry=Callback::new(move |_| library.load()) />

            <Show when=move || library.loaded.get() fallback=|| view! { <PageSpinner /> }>
                <Show
                    when=move || !visible.with(Vec::is_empty)
                    fallback=|| view! {
                        <div class="rounded-xl border border-dashed py-16 text-center text-sm text-muted-foreground">
                            "No files match."
                        </div>
                    }
                >
                    <ul class="grid gap-4 sm:grid-cols-2 lg:grid-cols-4">
                        <For
                            each=move || visible.get()
                            key=|f| f.id.clone()
                            children=move |file| view! { <MediaTile file=file library=library /> }
                        />
                    </ul>
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn MediaTile(file: MediaFile, library: Library) -> impl IntoView {
    let url = library.app.client().public_url(&file.file_path);
    let name = display_file_name(&file.file_name).to_string();
    let size = format_file_size(file.file_size);
    let path = file.file_path.clone();
    let path_selected = path.clone();
    let url_input: NodeRef<html::Input> = NodeRef::new();
    let copied = RwSignal::new(false);

    let is_selected = move || library.selected.with(|s| s.contains(&path_selected));
    let checked = is_selected.clone();

    let preview = match file.kind() {
        FileKind::Image => view! {
            <img src=url.clone() alt=name.clone() class="h-full w-full object-cover" loading="lazy" />
        }
        .into_any(),
        FileKind::Video => view! {
            <video src=url.clone() class="h-full w-full object-cover" muted=true preload="metadata"></video>
        }
        .into_any(),
        other => view! {
            <div class="flex h-full items-center justify-center text-xs uppercase text-muted-foreground">
                {other.to_string()}
            </div>
        }
        .into_any(),
    };

    let on_copy = move |_: web_sys::MouseEvent| {
        let Some(input) = url_input.get_untracked() else {
            return;
        };
        if copy_input_text(&input) {
            copied.set(true);
        } else {
            alert("Copy failed. Select the address and copy it manually.");
        }
    };

    view! {
        <li class=move || format!(
            "flex flex-col overflow-hidden rounded-xl border bg-card {}",
            if is_selected() { "ring-2 ring-primary" } else { "" },
        )>
            <label class="relative block aspect-video cursor-pointer bg-muted">
                {preview}
                <input
                    type="checkbox"
                    class="absolute left-2 top-2 size-4"
                    prop:checked=checked
                    on:change=move |_| library.toggle(&path)
                />
            </label>
            <div class="flex flex-col gap-2 p-3 text-xs">
                <div class="flex items-center justify-between gap-2">
                    <span class="truncate font-medium" title=name.clone()>{name.clone()}</span>
                    <span class="shrink-0 text-muted-foreground">{size}</span>
                </div>
                <div class="flex gap-1">
                    <input
                        node_ref=url_input
                        readonly=true
                        value=url
                        class="min-w-0 flex-1 rounded border bg-muted px-2 py-1"
                        on:focus=move |_| {
                            if let Some(input) = url_input.get_untracked() {
                                input.select();
                            }
                        }
                    />
                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=on_copy>
                        <Show when=move || copied.get() fallback=|| "Copy">
                            <Check class="size-4" />
                        </Show>
                    </Button>
                </div>
            </div>
        </li>
    }
}
