use crate::api::ApiClient;
use crate::components::ui::ErrorAlert;
use crate::content::ContentHelper;
use crate::editor::{save_fn, EditableText};
use crate::models::ContentEntry;
use crate::state::{AppContext, AppState};
use crate::util::now_ms;
use leptos::prelude::*;
use leptos::task::spawn_local;

type SectionHelper =
    ContentHelper<ApiClient, RwSignal<Vec<ContentEntry>>, RwSignal<Option<String>>>;

/// One home-page section's stored content, shared with the `ContentText`s inside it.
#[derive(Clone, Copy)]
pub(crate) struct SectionContext {
    section: &'static str,
    entries: RwSignal<Vec<ContentEntry>>,
    error: RwSignal<Option<String>>,
}

impl SectionContext {
    fn helper(&self, app: &AppState) -> SectionHelper {
        ContentHelper::new(app.client(), self.section, self.entries, self.error)
    }

    fn refetch(self, app: AppState) {
        spawn_local(async move {
            self.helper(&app).refetch().await;
        });
    }
}

/// Loads a section's content and provides it to nested `ContentText`s.
#[component]
pub(crate) fn ContentSection(
    section: &'static str,
    #[prop(optional, into)] class: String,
    #[prop(optional, into)] id: String,
    children: Children,
) -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let ctx = SectionContext {
        section,
        entries: RwSignal::new(Vec::new()),
        error: RwSignal::new(None),
    };
    provide_context(ctx);

    // Runs on mount and again after drafts are flushed elsewhere.
    Effect::new(move |_| {
        app.content_revision.track();
        ctx.refetch(app);
    });

    view! {
        <section id=id class=class>
            <ErrorAlert
                message=ctx.error
                on_retry=Callback::new(move |_| ctx.refetch(app))
            />
            {children()}
        </section>
    }
}

/// Site copy that falls back to `default` until first saved, editable in admin mode.
#[component]
pub(crate) fn ContentText(
    #[prop(into)] field: String,
    #[prop(into)] default: String,
    #[prop(optional)] multiline: bool,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let ctx = expect_context::<SectionContext>();
    let section = ctx.section;

    let value = Signal::derive({
        let field = field.clone();
        move || {
            let stored = ctx.helper(&app).value_or(&field, &default);
            if app.session.admin_mode() {
                app.drafts.with(|d| d.value_or(section, &field, &stored))
            } else {
                stored
            }
        }
    });

    let save_field = field.clone();
    let on_save = save_fn(move |v: String| {
        let helper = ctx.helper(&app);
        let field = save_field.clone();
        async move {
            let ok = helper.update(&field, &v).await;
            if ok {
                app.update_drafts(|d| {
                    d.mark_synced(section, &field, now_ms());
                    d.prune();
                });
            }
            ok
        }
    });

    let on_temp_save = Callback::new(move |v: String| {
        app.update_drafts(|d| d.touch(section, &field, &v, now_ms()));
    });

    view! {
        <EditableText
            value=value
            on_save=on_save
            on_temp_save=on_temp_save
            multiline=multiline
            class=class
        />
    }
}
