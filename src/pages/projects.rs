use crate::api::ProjectStore;
use crate::components::ui::{ErrorAlert, PageSpinner};
use crate::models::{MediaType, Project, ProjectCategory};
use crate::state::{AppContext, AppState};
use crate::util::now_ms;
use icons::ChevronRight;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map, use_query_map};
use strum::IntoEnumIterator;

fn refresh_category(app: AppState, category: ProjectCategory, error: RwSignal<Option<String>>, force: bool) {
    let cached = app.projects_cache.with_untracked(|c| !c.is_stale(category, now_ms()));
    if cached && !force {
        return;
    }

    spawn_local(async move {
        let client = app.client();
        match ProjectStore::list_by_category(&client, category).await {
            Ok(list) => {
                tracing::debug!("fetched {} {category} projects", list.len());
                app.projects_cache.update(|c| c.put(category, list, now_ms()));
                error.set(None);
            }
            Err(e) => {
                tracing::error!("loading {category} projects failed: {e}");
                error.set(Some(e.user_message()));
            }
        }
    });
}

/// Public project list for the category in `category`, painted from the
/// cache and refreshed when stale.
pub(crate) fn use_category_projects(
    category: Signal<ProjectCategory>,
) -> (Signal<Option<Vec<Project>>>, RwSignal<Option<String>>, Callback<()>) {
    let app = expect_context::<AppContext>().0;
    let error = RwSignal::new(None);

    Effect::new(move |_| refresh_category(app, category.get(), error, false));

    let projects = Signal::derive(move || {
        let cat = category.get();
        app.projects_cache.with(|c| c.get(cat).map(<[Project]>::to_vec))
    });
    let retry = Callback::new(move |_| refresh_category(app, category.get_untracked(), error, true));

    (projects, error, retry)
}

#[component]
pub(crate) fn MediaView(
    #[prop(into)] url: String,
    media_type: MediaType,
    #[prop(optional, into)] alt: String,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    match media_type {
        MediaType::Video => view! {
            <video src=url class=class autoplay=true loop=true muted=true playsinline=true></video>
        }
        .into_any(),
        MediaType::Image => view! { <img src=url alt=alt class=class loading="lazy" /> }.into_any(),
    }
}

/// Cover media for a card: the primary image, else the first filled slot.
pub(crate) fn cover_media(project: &Project) -> Option<(String, MediaType)> {
    project
        .image_url
        .clone()
        .map(|u| (u, MediaType::Image))
        .or_else(|| {
            project
                .media
                .iter_filled()
                .next()
                .map(|(_, s)| (s.url.clone(), s.media_type))
        })
}

#[component]
pub(crate) fn ProjectCard(project: Project, #[prop(into)] href: String) -> impl IntoView {
    let cover = cover_media(&project);
    let title = project.title.clone();
    let tech: Vec<String> = project.tech_stack.iter().take(4).cloned().collect();

    view! {
        <a
            href=href
            class="group flex flex-col overflow-hidden rounded-xl border border-border bg-card transition-shadow hover:shadow-lg"
        >
            <div class="aspect-video w-full overflow-hidden bg-muted">
                {cover.map(|(url, kind)| view! {
                    <MediaView
                        url=url
                        media_type=kind
                        alt=title.clone()
                        class="h-full w-full object-cover transition-transform group-hover:scale-105"
                    />
                })}
            </div>
            <div class="flex flex-1 flex-col gap-2 p-5">
                <h3 class="text-lg font-semibold">{project.title.clone()}</h3>
                <p class="line-clamp-3 text-sm text-muted-foreground">{project.card_text().to_string()}</p>
                <div class="mt-auto flex flex-wrap gap-1 pt-2">
                    {tech.into_iter().map(|t| view! {
                        <span class="rounded-full bg-muted px-2 py-0.5 text-xs">{t}</span>
                    }).collect_view()}
                </div>
            </div>
        </a>
    }
}

#[component]
pub(crate) fn ProjectGrid(#[prop(into)] category: Signal<ProjectCategory>) -> impl IntoView {
    let (projects, error, retry) = use_category_projects(category);

    view! {
        <ErrorAlert message=error on_retry=retry />
        {move || match projects.get() {
            None if error.get().is_none() => view! { <PageSpinner /> }.into_any(),
            None => ().into_any(),
            Some(list) if list.is_empty() => view! {
                <div class="py-12 text-center text-sm text-muted-foreground">"No projects yet."</div>
            }.into_any(),
            Some(list) => view! {
                <div class="grid gap-6 sm:grid-cols-2 lg:grid-cols-3">
                    {list.into_iter().map(|p| {
                        let href = format!("/projects/{}", p.id);
                        view! { <ProjectCard project=p href=href /> }
                    }).collect_view()}
                </div>
            }.into_any(),
        }}
    }
}

pub(crate) fn tab_class(active: bool) -> &'static str {
    if active {
        "rounded-full bg-primary px-4 py-1.5 text-sm font-medium text-primary-foreground"
    } else {
        "rounded-full border px-4 py-1.5 text-sm text-muted-foreground hover:text-foreground"
    }
}

#[component]
pub(crate) fn ProjectsPage() -> impl IntoView {
    let query = use_query_map();
    let navigate = StoredValue::new(use_navigate());

    // Read straight from the URL so a shared or restored link never shows
    // the default tab first.
    let tab = Memo::new(move |_| ProjectCategory::from_query(query.with(|q| q.get("tab")).as_deref()));

    view! {
        <div class="mx-auto w-full max-w-6xl px-6 py-16">
            <h1 class="mb-8 text-4xl font-black tracking-tight">"Projects"</h1>

            <div class="mb-8 flex gap-2" role="tablist">
                {ProjectCategory::iter().map(|c| view! {
                    <button
                        type="button"
                        role="tab"
                        class=move || tab_class(tab.get() == c)
                        aria-selected=move || (tab.get() == c).to_string()
                        on:click=move |_| {
                            navigate.with_value(|nav| nav(&format!("/projects?tab={c}"), Default::default()));
                        }
                    >
                        {c.label()}
                    </button>
                }).collect_view()}
            </div>

            <ProjectGrid category=tab />
        </div>
    }
}

#[component]
pub(crate) fn ProjectDetailPage() -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let params = use_params_map();
    let project_id = Memo::new(move |_| params.with(|p| p.get("id")).unwrap_or_default());

    let project: RwSignal<Option<Project>> = RwSignal::new(None);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let load = move || {
        let id = project_id.get_untracked();
        // Paint from a cached list while the row is fetched.
        let cached = app.projects_cache.with_untracked(|c| {
            ProjectCategory::iter()
                .filter_map(|cat| c.get(cat))
                .flat_map(|l| l.iter())
                .find(|p| p.id == id)
                .cloned()
        });
        if cached.is_some() {
            project.set(cached);
        }

        spawn_local(async move {
            match app.client().get(&id).await {
                Ok(p) => {
                    project.set(Some(p));
                    error.set(None);
                }
                Err(e) => {
                    tracing::error!("loading project {id} failed: {e}");
                    error.set(Some(e.user_message()));
                }
            }
        });
    };

    Effect::new(move |_| {
        project_id.track();
        load();
    });

    view! {
        <div class="mx-auto w-full max-w-4xl px-6 py-16">
            <a
                href=move || project.with(|p| p.as_ref().map(|p| format!("/projects?tab={}", p.category)).unwrap_or_else(|| "/projects".to_string()))
                class="mb-8 inline-block text-sm text-muted-foreground hover:text-foreground"
            >
                "Back to projects"
            </a>

            <ErrorAlert message=error on_retry=Callback::new(move |_| load()) />

            {move || match project.get() {
                None if error.get().is_none() => view! { <PageSpinner /> }.into_any(),
                None => ().into_any(),
                Some(p) => view! { <ProjectDetail project=p /> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn ProjectDetail(project: Project) -> impl IntoView {
    let cover = cover_media(&project);
    let screenshots: Vec<(String, MediaType)> = project
        .media
        .screenshots()
        .map(|(_, s)| (s.url.clone(), s.media_type))
        .collect();
    let thumbnails: Vec<(String, MediaType)> = project
        .media
        .thumbnails()
        .map(|(_, s)| (s.url.clone(), s.media_type))
        .collect();
    let title = project.title.clone();

    view! {
        <article class="flex flex-col gap-10">
            <header class="flex flex-col gap-3">
                <span class="text-xs uppercase tracking-widest text-muted-foreground">
                    {project.category.label()} " / " {project.development_status.clone()}
                </span>
                <h1 class="text-4xl font-black tracking-tight">{project.title.clone()}</h1>
                <p class="whitespace-pre-line text-lg text-muted-foreground">{project.description_detail_top.clone()}</p>
            </header>

            {cover.map(|(url, kind)| view! {
                <MediaView url=url media_type=kind alt=title.clone() class="w-full rounded-xl" />
            })}

            <p class="whitespace-pre-line leading-relaxed">{project.description.clone()}</p>

            <Show when={
                let empty = screenshots.is_empty();
                move || !empty
            }>
                <div class="grid gap-4 sm:grid-cols-3">
                    {screenshots.clone().into_iter().map(|(url, kind)| view! {
                        <MediaView url=url media_type=kind class="w-full rounded-lg" />
                    }).collect_view()}
                </div>
            </Show>

            <div class="grid gap-8 sm:grid-cols-2">
                <section>
                    <h2 class="mb-3 text-sm font-semibold uppercase tracking-widest">"Features"</h2>
                    <ul class="list-disc space-y-1 pl-5 text-sm">
                        {project.features.iter().cloned().map(|f| view! { <li>{f}</li> }).collect_view()}
                    </ul>
                </section>
                <section>
                    <h2 class="mb-3 text-sm font-semibold uppercase tracking-widest">"Tech stack"</h2>
                    <div class="flex flex-wrap gap-2">
                        {project.tech_stack.iter().cloned().map(|t| view! {
                            <span class="rounded-full border px-3 py-1 text-xs">{t}</span>
                        }).collect_view()}
                    </div>
                </section>
            </div>

            <div class="grid gap-4 sm:grid-cols-4">
                {thumbnails.into_iter().map(|(url, kind)| view! {
                    <MediaView url=url media_type=kind class="aspect-square w-full rounded-lg object-cover" />
                }).collect_view()}
            </div>

            <p class="whitespace-pre-line leading-relaxed text-muted-foreground">{project.description_detail_bottom.clone()}</p>

            <div class="flex gap-3">
                {project.demo_url.clone().map(|url| view! {
                    <a href=url target="_blank" rel="noopener" class="inline-flex items-center gap-1 text-sm font-medium underline-offset-4 hover:underline">
                        "Live demo" <ChevronRight class="size-4" />
                    </a>
                })}
                {project.github_url.clone().map(|url| view! {
                    <a href=url target="_blank" rel="noopener" class="inline-flex items-center gap-1 text-sm font-medium underline-offset-4 hover:underline">
                        "Source" <ChevronRight class="size-4" />
                    </a>
                })}
            </div>
        </article>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{test_project, MediaSlotId};

    #[test]
    fn test_cover_prefers_primary_image() {
        let mut p = test_project("p1", ProjectCategory::Vibe, Some(0));
        p.image_url = Some("https://cdn/cover.png".to_string());
        p.media.set(MediaSlotId::Screenshot1, "https://cdn/s1.mp4", MediaType::Video);
        assert_eq!(
            cover_media(&p),
            Some(("https://cdn/cover.png".to_string(), MediaType::Image))
        );
    }

    #[test]
    fn test_cover_falls_back_to_first_slot() {
        let mut p = test_project("p1", ProjectCategory::Vibe, Some(0));
        p.image_url = None;
        p.media.set(MediaSlotId::Thumbnail1, "https://cdn/t1.png", MediaType::Image);
        p.media.set(MediaSlotId::Screenshot2, "https://cdn/s2.mp4", MediaType::Video);
        assert_eq!(
            cover_media(&p),
            Some(("https://cdn/s2.mp4".to_string(), MediaType::Video))
        );
    }
}
