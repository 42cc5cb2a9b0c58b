use crate::api::{ApiErrorKind, AuthUser};
use crate::components::ui::{Button, ButtonSize, ButtonVariant, PageSpinner};
use crate::state::{AppContext, AppState};
use crate::storage::{load_json_from_storage, USER_KEY};
use crate::util::confirm;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

const LEAVE_ADMIN_PROMPT: &str =
    "Log out of admin mode? Unsaved drafts stay on this device.";

/// Asks before ending the session, then drops back to the public site.
pub(crate) fn confirm_logout(app: AppState) -> bool {
    let prompt = if app.drafts.with_untracked(|d| d.has_unsaved()) {
        "You have unsaved drafts. Log out anyway? They stay on this device."
    } else {
        LEAVE_ADMIN_PROMPT
    };
    if !confirm(prompt) {
        return false;
    }
    app.logout();
    app.projects_cache.update(|c| c.clear());
    true
}

#[component]
pub(crate) fn SiteHeader() -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let session = app.session;
    let navigate = StoredValue::new(use_navigate());

    view! {
        <header class="sticky top-0 z-40 border-b border-border bg-background/80 backdrop-blur">
            <nav class="mx-auto flex h-14 w-full max-w-6xl items-center justify-between px-6 text-sm">
                <a href="/" class="font-black tracking-tight">"PORTFOLIO"</a>
                <div class="flex items-center gap-4">
                    <a href="/#about" class="text-muted-foreground hover:text-foreground">"About"</a>
                    <a href="/projects" class="text-muted-foreground hover:text-foreground">"Projects"</a>
                    <a href="/#contact" class="text-muted-foreground hover:text-foreground">"Contact"</a>

                    <Show when=move || session.is_authenticated()>
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            on:click=move |_| session.toggle_admin_mode()
                        >
                            {move || if session.admin_mode() { "Exit edit mode" } else { "Edit mode" }}
                        </Button>
                        <a href="/admin" class="text-muted-foreground hover:text-foreground">"Dashboard"</a>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            on:click=move |_| {
                                if confirm_logout(app) {
                                    navigate.with_value(|nav| nav("/", Default::default()));
                                }
                            }
                        >
                            "Log out"
                        </Button>
                    </Show>
                </div>
            </nav>
        </header>
    }
}

#[component]
pub(crate) fn AdminNav() -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());
    let email = load_json_from_storage::<AuthUser>(USER_KEY)
        .and_then(|u| u.email)
        .unwrap_or_default();

    let links = [
        ("/admin", "Home content"),
        ("/admin/projects", "Projects"),
        ("/admin/media", "Media"),
        ("/admin/settings", "Settings"),
    ];

    view! {
        <aside class="flex w-full flex-col gap-1 border-b p-4 text-sm md:h-screen md:w-56 md:border-b-0 md:border-r">
            <div class="mb-4 px-2">
                <div class="font-black tracking-tight">"Admin"</div>
                <div class="truncate text-xs text-muted-foreground">{email}</div>
            </div>
            {links.into_iter().map(|(href, label)| view! {
                <a href=href class="rounded-md px-2 py-1.5 hover:bg-accent">{label}</a>
            }).collect_view()}
            <div class="mt-auto flex flex-col gap-1 pt-6">
                <a href="/" class="rounded-md px-2 py-1.5 text-muted-foreground hover:bg-accent">"View site"</a>
                <button
                    type="button"
                    class="rounded-md px-2 py-1.5 text-left text-destructive hover:bg-accent"
                    on:click=move |_| {
                        if confirm_logout(app) {
                            navigate.with_value(|nav| nav("/", Default::default()));
                        }
                    }
                >
                    "Log out"
                </button>
            </div>
        </aside>
    }
}

/// Admin pages render only for a live session. A rejected token logs out
/// and sends the visitor to the login page.
#[component]
pub(crate) fn AdminGuard(children: ChildrenFn) -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let session = app.session;
    let navigate = StoredValue::new(use_navigate());
    let verified = RwSignal::new(false);

    let to_login = move || navigate.with_value(|nav| nav("/admin/login", Default::default()));

    if !session.is_authenticated() {
        to_login();
    } else {
        spawn_local(async move {
            match app.client().current_user().await {
                Ok(user) => {
                    tracing::debug!("session ok for {}", user.id);
                    session.set_admin_mode(true);
                    verified.set(true);
                }
                Err(e) if e.kind == ApiErrorKind::Unauthorized => {
                    tracing::warn!("stored session rejected: {e}");
                    app.logout();
                    to_login();
                }
                Err(e) => {
                    // Offline or flaky backend: keep the session, writes will report.
                    tracing::warn!("could not verify session: {e}");
                    verified.set(true);
                }
            }
        });
    }

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=move || verified.get() && session.is_authenticated() fallback=|| view! { <PageSpinner /> }>
            <div class="flex min-h-screen flex-col md:flex-row">
                <AdminNav />
                <main class="min-w-0 flex-1">{move || children.with_value(|c| c())}</main>
            </div>
        </Show>
    }
}
