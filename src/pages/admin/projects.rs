use crate::api::{ApiClient, ProjectStore};
use crate::components::ui::{Button, ButtonSize, ButtonVariant, ErrorAlert, PageSpinner, Spinner};
use crate::models::{Project, ProjectCategory};
use crate::pages::projects::{cover_media, tab_class, MediaView};
use crate::state::{exclusive, AppContext, AppState, ProjectListController, ReorderCoordinator, ReorderOutcome};
use crate::util::{alert, confirm};
use icons::X;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_query_map};
use strum::IntoEnumIterator;

type Items = RwSignal<Vec<Project>>;
type ErrorSlot = RwSignal<Option<String>>;

#[derive(Clone, Copy)]
struct ListHandles {
    app: AppState,
    category: ProjectCategory,
    items: Items,
    error: ErrorSlot,
    loaded: RwSignal<bool>,
    reordering: RwSignal<bool>,
    busy: RwSignal<bool>,
}

impl ListHandles {
    fn controller(&self) -> ProjectListController<ApiClient, Items, ErrorSlot> {
        ProjectListController::new(self.app.client(), self.category, self.items, self.error)
    }

    fn coordinator(&self) -> ReorderCoordinator<ApiClient, Items, RwSignal<bool>> {
        ReorderCoordinator::new(self.app.client(), self.items, self.reordering)
    }

    /// Public pages cache these lists; drop them after any write.
    fn invalidate_public(&self) {
        self.app.projects_cache.update(|c| c.clear());
    }

    fn load(self) {
        spawn_local(async move {
            self.controller().refetch().await;
            self.loaded.set(true);
        });
    }

    fn refresh(self) {
        spawn_local(async move {
            let client = self.app.client();
            match ProjectStore::list_by_category(&client, self.category).await {
                Ok(list) => {
                    self.coordinator().sync_from(list);
                    self.error.set(None);
                }
                Err(e) => {
                    tracing::error!("refreshing {} projects failed: {e}", self.category);
                    self.error.set(Some(e.user_message()));
                }
            }
        });
    }

    fn add(self) {
        spawn_local(async move {
            let created = exclusive(&self.busy, self.controller().create()).await.flatten();
            if created.is_some() {
                self.invalidate_public();
            }
        });
    }

    /// Shares `busy` with `add`, so a double click prompts once.
    fn delete(self, id: String, title: String) {
        spawn_local(async move {
            let prompt = format!("Delete \"{title}\"? This cannot be undone.");
            let controller = self.controller();
            let outcome = exclusive(&self.busy, controller.delete(&id, || confirm(&prompt))).await;
            match outcome {
                Some(Ok(true)) => self.invalidate_public(),
                Some(Ok(false)) | None => {}
                Some(Err(e)) => alert(&format!("Deleting the project failed. {}", e.user_message())),
            }
        });
    }

    fn reorder(self, moved: String, target: String) {
        spawn_local(async move {
            match self.coordinator().handle_reorder(&moved, &target).await {
                ReorderOutcome::Committed => {
                    self.error.set(None);
                    self.invalidate_public();
                }
                ReorderOutcome::RolledBack(e) => {
                    self.error.set(Some(format!("The new order was not saved. {}", e.user_message())));
                }
                ReorderOutcome::Ignored => {}
            }
        });
    }
}

#[component]
pub(crate) fn AdminProjectsPage() -> impl IntoView {
    let query = use_query_map();
    let navigate = StoredValue::new(use_navigate());
    let tab = Memo::new(move |_| ProjectCategory::from_query(query.with(|q| q.get("tab")).as_deref()));

    view! {
        <div class="mx-auto w-full max-w-5xl px-6 py-10">
            <div class="mb-6 flex items-center justify-between">
                <h1 class="text-2xl font-bold tracking-tight">"Projects"</h1>
                <div class="flex gap-2" role="tablist">
                    {ProjectCategory::iter().map(|c| view! {
                        <button
                            type="button"
                            role="tab"
                            class=move || tab_class(tab.get() == c)
                            on:click=move |_| {
                                navigate.with_value(|nav| nav(&format!("/admin/projects?tab={c}"), Default::default()));
                            }
                        >
                            {c.label()}
                        </button>
                    }).collect_view()}
                </div>
            </div>

            // Remount per tab so each category gets its own list state.
            {move || {
                let category = tab.get();
                view! { <AdminProjectList category=category /> }
            }}
        </div>
    }
}

#[component]
fn AdminProjectList(category: ProjectCategory) -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let list = ListHandles {
        app,
        category,
        items: RwSignal::new(Vec::new()),
        error: RwSignal::new(None),
        loaded: RwSignal::new(false),
        reordering: RwSignal::new(false),
        busy: RwSignal::new(false),
    };
    list.load();

    let dragging: RwSignal<Option<String>> = RwSignal::new(None);
    let drop_target: RwSignal<Option<String>> = RwSignal::new(None);

    view! {
        <div class="mb-4 flex items-center justify-between text-sm">
            <span class="text-muted-foreground">
                {move || if list.reordering.get() { "Saving order..." } else { "Drag cards to reorder." }}
            </span>
            <div class="flex gap-2">
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    attr:disabled=move || list.reordering.get()
                    on:click=move |_| list.refresh()
                >
                    "Refresh"
                </Button>
                <Button size=ButtonSize::Sm attr:disabled=move || list.busy.get() on:click=move |_| list.add()>
                    <Show when=move || list.busy.get() fallback=|| ().into_view()>
                        <Spinner />
                    </Show>
                    "Add project"
                </Button>
            </div>
        </div>

        <ErrorAlert message=list.error on_retry=Callback::new(move |_| list.load()) />

        <Show when=move || list.loaded.get() fallback=|| view! { <PageSpinner /> }>
            <Show
                when=move || !list.items.with(Vec::is_empty)
                fallback=|| view! {
                    <div class="rounded-xl border border-dashed py-16 text-center text-sm text-muted-foreground">
                        "No projects in this category yet."
                    </div>
                }
            >
                <ul class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">
                    <For
                        each=move || list.items.get()
                        key=|p| (p.id.clone(), p.updated_at.clone(), p.title.clone())
                        children=move |project| {
                            let id = project.id.clone();
                            let title = project.title.clone();
                            let cover = cover_media(&project);
                            let href = format!("/admin/projects/{}", project.id);

                            let id_drag = id.clone();
                            let id_over = id.clone();
                            let id_drop = id.clone();
                            let id_class = id.clone();
                            let id_delete = id.clone();
                            let title_delete = title.clone();

                            view! {
                                <li
                                    draggable="true"
                                    class=move || {
                                        let over = drop_target.with(|t| t.as_deref() == Some(id_class.as_str()));
                                        let dragged = dragging.with(|d| d.as_deref() == Some(id_class.as_str()));
                                        format!(
                                            "group relative flex cursor-grab flex-col overflow-hidden rounded-xl border bg-card transition {} {}",
                                            if over { "ring-2 ring-primary" } else { "" },
                                            if dragged { "opacity-50" } else { "" },
                                        )
                                    }
                                    on:dragstart=move |ev: web_sys::DragEvent| {
                                        if let Some(dt) = ev.data_transfer() {
                                            let _ = dt.set_data("text/plain", &id_drag);
                                            dt.set_effect_allowed("move");
                                        }
                                        dragging.set(Some(id_drag.clone()));
                                    }
                                    on:dragover=move |ev: web_sys::DragEvent| {
                                        ev.prevent_default();
                                        if drop_target.with_untracked(|t| t.as_deref() != Some(id_over.as_str())) {
                                            drop_target.set(Some(id_over.clone()));
                                        }
                                    }
                                    on:drop=move |ev: web_sys::DragEvent| {
                                        ev.prevent_default();
                                        let moved = dragging.get_untracked().or_else(|| {
                                            ev.data_transfer().and_then(|dt| dt.get_data("text/plain").ok())
                                        });
                                        dragging.set(None);
                                        drop_target.set(None);
                                        if let Some(moved) = moved {
                                            list.reorder(moved, id_drop.clone());
                                        }
                                    }
                                    on:dragend=move |_| {
                                        dragging.set(None);
                                        drop_target.set(None);
                                    }
                                >
                                    <div class="aspect-video w-full bg-muted">
                                        {cover.map(|(url, kind)| view! {
                                            <MediaView url=url media_type=kind class="h-full w-full object-cover" />
                                        })}
                                    </div>
                                    <div class="flex flex-col gap-1 p-4">
                                        <a href=href class="font-semibold hover:underline">{title}</a>
                                        <span class="text-xs text-muted-foreground">{project.development_status.clone()}</span>
                                    </div>
                                    <Button
                                        variant=ButtonVariant::Destructive
                                        size=ButtonSize::Icon
                                        class="absolute right-2 top-2 hidden size-8 group-hover:inline-flex"
                                        attr:title="Delete project"
                                        attr:disabled=move || list.busy.get()
                                        on:click=move |ev: web_sys::MouseEvent| {
                                            ev.stop_propagation();
                                            list.delete(id_delete.clone(), title_delete.clone());
                                        }
                                    >
                                        <X class="size-4" />
                                    </Button>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>
        </Show>
    }
}
