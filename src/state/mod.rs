pub(crate) mod optimistic;
mod projects;
mod reorder;
mod session;

pub(crate) use optimistic::{exclusive, optimistic, LocalState};
pub(crate) use projects::ProjectListController;
pub(crate) use reorder::{ReorderCoordinator, ReorderOutcome};
pub(crate) use session::AdminSession;

use crate::api::ApiClient;
use crate::cache::ProjectsCache;
use crate::drafts::ContentDrafts;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub session: AdminSession,

    /// Public project lists, per category.
    pub projects_cache: RwSignal<ProjectsCache>,

    /// Temp-saved content edits, mirrored to localStorage.
    pub drafts: RwSignal<ContentDrafts>,

    /// Bumped when stored content changed behind the mounted sections' back.
    pub content_revision: RwSignal<u32>,
}

impl AppState {
    pub fn new() -> Self {
        let stored_client = ApiClient::load_from_storage();
        let session = AdminSession::restore(stored_client.is_authenticated());

        Self {
            api_client: RwSignal::new(stored_client),
            session,
            projects_cache: RwSignal::new(ProjectsCache::default()),
            drafts: RwSignal::new(ContentDrafts::load()),
            content_revision: RwSignal::new(0),
        }
    }

    /// Snapshot of the client for one request chain.
    pub fn client(&self) -> ApiClient {
        self.api_client.get_untracked()
    }

    pub fn update_drafts(&self, f: impl FnOnce(&mut ContentDrafts)) {
        self.drafts.update(|d| {
            f(d);
            d.save();
        });
    }

    /// Clears the token and leaves admin mode.
    pub fn logout(&self) {
        self.api_client.update(|c| c.logout());
        self.session.logout();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
