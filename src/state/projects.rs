use super::optimistic::{optimistic, LocalState};
use crate::api::{ApiResult, ProjectStore};
use crate::models::{NewProject, Project, ProjectCategory, ProjectPatch};

/// Admin-side project list for one category: fetch, add, edit, delete.
///
/// Write failures are reported through `error` and a `false`/`None` return,
/// except `delete`, which hands the error back so the caller keeps the card.
pub(crate) struct ProjectListController<S, L, E> {
    store: S,
    category: ProjectCategory,
    items: L,
    error: E,
}

impl<S, L, E> ProjectListController<S, L, E>
where
    S: ProjectStore,
    L: LocalState<Vec<Project>>,
    E: LocalState<Option<String>>,
{
    pub fn new(store: S, category: ProjectCategory, items: L, error: E) -> Self {
        Self {
            store,
            category,
            items,
            error,
        }
    }

    pub async fn refetch(&self) -> bool {
        match self.store.list_by_category(self.category).await {
            Ok(list) => {
                self.items.replace(list);
                self.error.replace(None);
                true
            }
            Err(e) => {
                tracing::error!("loading {} projects failed: {e}", self.category);
                self.error.replace(Some(e.user_message()));
                false
            }
        }
    }

    /// Adds a placeholder project at the end of the list.
    pub async fn create(&self) -> Option<Project> {
        let mut new = NewProject::placeholder(self.category);
        new.order_index = Some(self.items.snapshot().len() as i64);

        match self.store.create(&new).await {
            Ok(project) => {
                let mut list = self.items.snapshot();
                list.push(project.clone());
                self.items.replace(list);
                self.error.replace(None);
                tracing::info!("created project {}", project.id);
                Some(project)
            }
            Err(e) => {
                tracing::error!("creating project failed: {e}");
                self.error.replace(Some(e.user_message()));
                None
            }
        }
    }

    pub async fn update(&self, id: &str, patch: &ProjectPatch) -> bool {
        let next: Vec<Project> = self
            .items
            .snapshot()
            .into_iter()
            .map(|p| {
                if p.id == id {
                    p.with_patch(patch).unwrap_or(p)
                } else {
                    p
                }
            })
            .collect();

        match optimistic(&self.items, next, self.store.update(id, patch)).await {
            Ok(_) => {
                self.error.replace(None);
                true
            }
            Err(e) => {
                tracing::error!("updating project {id} failed: {e}");
                self.error.replace(Some(e.user_message()));
                false
            }
        }
    }

    /// Nothing is sent unless `confirm` says yes. `Ok(false)` means cancelled.
    pub async fn delete(&self, id: &str, confirm: impl FnOnce() -> bool) -> ApiResult<bool> {
        if !confirm() {
            return Ok(false);
        }

        if let Err(e) = self.store.delete(id).await {
            tracing::error!("deleting project {id} failed: {e}");
            return Err(e);
        }

        let mut list = self.items.snapshot();
        list.retain(|p| p.id != id);
        self.items.replace(list);
        tracing::info!("deleted project {id}");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryStore;
    use crate::api::ApiErrorKind;
    use crate::models::{test_project, ProjectTextField};
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Controller =
        ProjectListController<MemoryStore, Rc<RefCell<Vec<Project>>>, Rc<RefCell<Option<String>>>>;

    fn setup() -> (MemoryStore, Controller) {
        let store = MemoryStore::with_projects(vec![
            test_project("1", ProjectCategory::Vibe, Some(2)),
            test_project("2", ProjectCategory::Automation, Some(0)),
            test_project("3", ProjectCategory::Vibe, Some(1)),
        ]);
        let controller = ProjectListController::new(
            store.clone(),
            ProjectCategory::Vibe,
            Rc::new(RefCell::new(vec![])),
            Rc::new(RefCell::new(None)),
        );
        (store, controller)
    }

    fn ids(c: &Controller) -> Vec<String> {
        c.items.snapshot().into_iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_refetch_orders_category() {
        let (_store, c) = setup();
        assert!(block_on(c.refetch()));
        assert_eq!(ids(&c), vec!["3", "1"]);
    }

    #[test]
    fn test_cancelled_delete_sends_nothing() {
        let (store, c) = setup();
        block_on(c.refetch());

        let out = block_on(c.delete("1", || false));
        assert_eq!(out.ok(), Some(false));
        assert!(!store.calls().iter().any(|call| call.starts_with("projects.delete")));
        assert_eq!(ids(&c), vec!["3", "1"]);
        assert_eq!(store.projects().len(), 3);
    }

    #[test]
    fn test_confirmed_delete_removes_card() {
        let (store, c) = setup();
        block_on(c.refetch());

        assert_eq!(block_on(c.delete("1", || true)).ok(), Some(true));
        assert_eq!(ids(&c), vec!["3"]);
        assert_eq!(store.projects().len(), 2);
    }

    #[test]
    fn test_delete_failure_is_returned_and_card_kept() {
        let (store, c) = setup();
        block_on(c.refetch());
        store.fail_writes(Some(ApiErrorKind::Http(500)));

        let out = block_on(c.delete("1", || true));
        assert!(out.is_err());
        assert_eq!(ids(&c), vec!["3", "1"]);
    }

    #[test]
    fn test_delete_unknown_id_is_not_found() {
        let (_store, c) = setup();
        let out = block_on(c.delete("nope", || true));
        assert_eq!(out.map_err(|e| e.kind), Err(ApiErrorKind::NotFound));
    }

    #[test]
    fn test_create_appends_placeholder() {
        let (_store, c) = setup();
        block_on(c.refetch());

        let created = block_on(c.create()).expect("create should succeed");
        assert_eq!(created.title, "New project");
        assert_eq!(created.order_index, Some(2));
        assert_eq!(ids(&c).last(), Some(&created.id));
    }

    #[test]
    fn test_failed_update_reverts_and_sets_error() {
        let (store, c) = setup();
        block_on(c.refetch());
        store.fail_writes(Some(ApiErrorKind::Network));

        let patch = ProjectPatch::new().text(ProjectTextField::Title, "Renamed");
        assert!(!block_on(c.update("3", &patch)));
        assert_eq!(c.items.snapshot()[0].title, "Project 3");
        assert!(c.error.snapshot().is_some());
    }
}
