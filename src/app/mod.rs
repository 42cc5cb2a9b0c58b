use crate::pages::{
    AdminDashboardPage, AdminGuard, AdminLoginPage, AdminMediaPage, AdminProjectDetailPage,
    AdminProjectsPage, AdminSettingsPage, HomePage, ProjectDetailPage, ProjectsPage, SiteHeader,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

/// Resolves optional schema columns once per page load when config left them open.
fn probe_capabilities(app: AppState) {
    let client = app.client();
    if !client.capabilities.needs_probe() {
        return;
    }
    spawn_local(async move {
        client.capabilities.probe(&client).await;
    });
}

#[component]
fn PublicLayout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-background text-foreground">
            <SiteHeader />
            <main>{children()}</main>
        </div>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <PublicLayout>
            <div class="mx-auto flex max-w-md flex-col items-center gap-4 px-6 py-32 text-center">
                <h1 class="text-4xl font-black">"404"</h1>
                <p class="text-sm text-muted-foreground">"This page does not exist."</p>
                <a href="/" class="text-sm underline">"Back to the home page"</a>
            </div>
        </PublicLayout>
    }
}

#[component]
pub fn App() -> impl IntoView {
    let app = AppState::new();
    provide_context(AppContext(app));
    probe_capabilities(app);

    // Router hooks need a <Router> context; CSR needs the `csr` feature on `leptos`.
    view! {
        <Router>
            <Routes fallback=|| view! { <NotFound /> }>
                <Route path=path!("") view=|| view! { <PublicLayout><HomePage /></PublicLayout> } />
                <Route path=path!("projects") view=|| view! { <PublicLayout><ProjectsPage /></PublicLayout> } />
                <Route path=path!("projects/:id") view=|| view! { <PublicLayout><ProjectDetailPage /></PublicLayout> } />

                <Route path=path!("admin/login") view=AdminLoginPage />
                <Route path=path!("admin") view=move || view! {
                    <AdminGuard>
                        <AdminDashboardPage />
                    </AdminGuard>
                } />
                <Route path=path!("admin/projects") view=move || view! {
                    <AdminGuard>
                        <AdminProjectsPage />
                    </AdminGuard>
                } />
                <Route path=path!("admin/projects/:id") view=move || view! {
                    <AdminGuard>
                        <AdminProjectDetailPage />
                    </AdminGuard>
                } />
                <Route path=path!("admin/settings") view=move || view! {
                    <AdminGuard>
                        <AdminSettingsPage />
                    </AdminGuard>
                } />
                <Route path=path!("admin/media") view=move || view! {
                    <AdminGuard>
                        <AdminMediaPage />
                    </AdminGuard>
                } />
            </Routes>
        </Router>
    }
}
