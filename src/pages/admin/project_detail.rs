use crate::api::ProjectStore;
use crate::components::ui::{Card, CardContent, CardHeader, CardTitle, ErrorAlert, PageSpinner};
use crate::editor::{media_save_fn, save_fn, EditableMedia, EditableText};
use crate::models::{parse_list, MediaSlotId, MediaType, Project, ProjectCategory, ProjectPatch, ProjectTextField};
use crate::pages::projects::tab_class;
use crate::state::{AppContext, AppState, ProjectListController};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;
use strum::IntoEnumIterator;

fn field_label(field: ProjectTextField) -> &'static str {
    match field {
        ProjectTextField::Title => "Title",
        ProjectTextField::Description => "Description",
        ProjectTextField::DescriptionCard => "Card description",
        ProjectTextField::DescriptionDetailTop => "Detail headline",
        ProjectTextField::DescriptionDetailBottom => "Detail body",
        ProjectTextField::SectionTitleLine1 => "Section title, line 1",
        ProjectTextField::SectionTitleLine2 => "Section title, line 2",
        ProjectTextField::DevelopmentStatus => "Status",
        ProjectTextField::GithubUrl => "GitHub URL",
        ProjectTextField::DemoUrl => "Demo URL",
    }
}

/// The edited project lives as a one-element list so the list controller's
/// optimistic update path can be reused as is.
#[derive(Clone, Copy)]
struct DetailHandles {
    app: AppState,
    items: RwSignal<Vec<Project>>,
    error: RwSignal<Option<String>>,
}

impl DetailHandles {
    fn read<T: Default>(&self, f: impl FnOnce(&Project) -> T) -> T {
        self.items.with(|l| l.first().map(f).unwrap_or_default())
    }

    async fn save(self, id: String, patch: ProjectPatch) -> bool {
        let category = self
            .items
            .with_untracked(|l| l.first().map(|p| p.category))
            .unwrap_or_default();
        let controller = ProjectListController::new(self.app.client(), category, self.items, self.error);
        let ok = controller.update(&id, &patch).await;
        if ok {
            self.app.projects_cache.update(|c| c.clear());
        }
        ok
    }
}

#[component]
pub(crate) fn AdminProjectDetailPage() -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let params = use_params_map();
    let handles = DetailHandles {
        app,
        items: RwSignal::new(Vec::new()),
        error: RwSignal::new(None),
    };
    let loaded = RwSignal::new(false);

    let load = move || {
        let Some(id) = params.with_untracked(|p| p.get("id")) else {
            loaded.set(true);
            return;
        };
        spawn_local(async move {
            match ProjectStore::get(&app.client(), &id).await {
                Ok(project) => {
                    handles.items.set(vec![project]);
                    handles.error.set(None);
                }
                Err(e) => {
                    tracing::error!("loading project {id} failed: {e}");
                    handles.error.set(Some(e.user_message()));
                }
            }
            loaded.set(true);
        });
    };
    load();

    // Only changes when a different project is loaded, so edits don't remount the editor.
    let current_id = Memo::new(move |_| handles.items.with(|l| l.first().map(|p| p.id.clone())));

    view! {
        <div class="mx-auto w-full max-w-4xl px-6 py-10">
            <a
                href=move || format!("/admin/projects?tab={}", handles.read(|p| p.category))
                class="mb-6 inline-block text-sm text-muted-foreground hover:text-foreground"
            >
                "← All projects"
            </a>

            <ErrorAlert message=handles.error on_retry=Callback::new(move |_| load()) />

            <Show when=move || loaded.get() fallback=|| view! { <PageSpinner /> }>
                {move || match current_id.get() {
                    Some(id) => view! { <ProjectEditor id=id handles=handles /> }.into_any(),
                    None => view! {
                        <p class="py-16 text-center text-sm text-muted-foreground">"Project not found."</p>
                    }.into_any(),
                }}
            </Show>
        </div>
    }
}

#[component]
fn ProjectEditor(id: String, handles: DetailHandles) -> impl IntoView {
    let folder = format!("projects/{id}");

    let text_rows = ProjectTextField::iter()
        .map(|field| {
            let save_id = id.clone();
            let on_save = save_fn(move |v: String| {
                handles.save(save_id.clone(), ProjectPatch::new().text(field, &v))
            });
            view! {
                <div class="grid gap-1 sm:grid-cols-[11rem_1fr] sm:items-start">
                    <span class="pt-1 text-xs font-medium uppercase tracking-wide text-muted-foreground">
                        {field_label(field)}
                    </span>
                    <EditableText
                        value=Signal::derive(move || handles.read(|p| p.text(field)))
                        on_save=on_save
                        multiline=field.is_multiline()
                        placeholder="Click to edit"
                        class="min-h-7 rounded px-1"
                    />
                </div>
            }
        })
        .collect_view();

    let stack_id = id.clone();
    let save_stack = save_fn(move |v: String| {
        handles.save(stack_id.clone(), ProjectPatch::new().tech_stack(parse_list(&v)))
    });
    let features_id = id.clone();
    let save_features = save_fn(move |v: String| {
        handles.save(features_id.clone(), ProjectPatch::new().features(parse_list(&v)))
    });

    let cover_id = id.clone();
    let save_cover = media_save_fn(move |url: String, _kind: MediaType| {
        handles.save(cover_id.clone(), ProjectPatch::new().image_url(&url))
    });

    let slots = MediaSlotId::iter()
        .map(|slot| {
            let slot_id = id.clone();
            let on_save = media_save_fn(move |url: String, kind: MediaType| {
                let value = (!url.trim().is_empty()).then_some((url.as_str(), kind));
                let patch = ProjectPatch::new().media(slot, value);
                handles.save(slot_id.clone(), patch)
            });
            view! {
                <div class="flex flex-col gap-1">
                    <span class="text-xs text-muted-foreground">{slot.label()}</span>
                    <EditableMedia
                        url=Signal::derive(move || {
                            handles.read(|p| p.media.get(slot).map(|m| m.url.clone()).unwrap_or_default())
                        })
                        media_type=Signal::derive(move || {
                            handles.read(|p| p.media.get(slot).map(|m| m.media_type).unwrap_or_default())
                        })
                        on_save=on_save
                        folder=folder.clone()
                        label=slot.label()
                        class="aspect-video"
                    />
                </div>
            }
        })
        .collect_view();

    let category_id = StoredValue::new(id.clone());
    let set_category = move |c: ProjectCategory| {
        if handles.items.with_untracked(|l| l.first().map(|p| p.category)) == Some(c) {
            return;
        }
        let id = category_id.get_value();
        spawn_local(async move {
            handles.save(id, ProjectPatch::new().category(c)).await;
        });
    };

    view! {
        <div class="flex flex-col gap-6">
            <div class="flex items-center justify-between gap-4">
                <h1 class="truncate text-2xl font-bold tracking-tight">
                    {move || handles.read(|p| p.title.clone())}
                </h1>
                <a
                    href=format!("/projects/{id}")
                    target="_blank"
                    class="shrink-0 text-sm text-muted-foreground hover:text-foreground"
                >
                    "View public page"
                </a>
            </div>

            <Card>
                <CardHeader><CardTitle>"Category"</CardTitle></CardHeader>
                <CardContent>
                    <div class="flex gap-2" role="radiogroup">
                        {ProjectCategory::iter().map(|c| view! {
                            <button
                                type="button"
                                role="radio"
                                class=move || tab_class(handles.read(|p| p.category) == c)
                                on:click=move |_| set_category(c)
                            >
                                {c.label()}
                            </button>
                        }).collect_view()}
                    </div>
                </CardContent>
            </Card>

            <Card>
                <CardHeader><CardTitle>"Text"</CardTitle></CardHeader>
                <CardContent class="flex flex-col gap-4">{text_rows}</CardContent>
            </Card>

            <Card>
                <CardHeader><CardTitle>"Tech stack and features"</CardTitle></CardHeader>
                <CardContent class="grid gap-6 sm:grid-cols-2">
                    <div class="flex flex-col gap-1">
                        <span class="text-xs text-muted-foreground">"Tech stack, one per line"</span>
                        <EditableText
                            value=Signal::derive(move || handles.read(|p| p.tech_stack.join("\n")))
                            on_save=save_stack
                            multiline=true
                            placeholder="Click to edit"
                            class="min-h-16 whitespace-pre-line rounded px-1"
                        />
                    </div>
                    <div class="flex flex-col gap-1">
                        <span class="text-xs text-muted-foreground">"Features, one per line"</span>
                        <EditableText
                            value=Signal::derive(move || handles.read(|p| p.features.join("\n")))
                            on_save=save_features
                            multiline=true
                            placeholder="Click to edit"
                            class="min-h-16 whitespace-pre-line rounded px-1"
                        />
                    </div>
                </CardContent>
            </Card>

            <Card>
                <CardHeader><CardTitle>"Media"</CardTitle></CardHeader>
                <CardContent class="flex flex-col gap-6">
                    <div class="flex flex-col gap-1">
                        <span class="text-xs text-muted-foreground">"Cover image"</span>
                        <EditableMedia
                            url=Signal::derive(move || handles.read(|p| p.image_url.clone().unwrap_or_default()))
                            media_type=MediaType::Image
                            on_save=save_cover
                            folder=folder.clone()
                            images_only=true
                            label="Cover image"
                            class="aspect-video max-w-md"
                        />
                    </div>
                    <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">{slots}</div>
                </CardContent>
            </Card>
        </div>
    }
}
