//! In-memory stores for exercising controllers without a backend.

use super::projects::{apply_order, list_in_display_order, ORDER_DISPLAY};
use super::{ApiError, ApiErrorKind, ApiResult, ContentStore, ProjectStore, SchemaCapabilities};
use crate::models::{
    sort_for_display, ContentEntry, ContentType, NewProject, OrderEntry, Project, ProjectCategory,
    ProjectPatch,
};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct Inner {
    content: RefCell<Vec<ContentEntry>>,
    projects: RefCell<Vec<Project>>,
    calls: RefCell<Vec<String>>,
    fail_writes: Cell<Option<ApiErrorKind>>,
    order_calls: RefCell<Vec<Vec<OrderEntry>>>,
    watched: RefCell<Option<Rc<RefCell<Vec<Project>>>>>,
    seen_during_order: RefCell<Vec<Vec<String>>>,
    next_id: Cell<u32>,
}

/// Clones share state, so a test can keep a handle after handing one off.
#[derive(Clone)]
pub(crate) struct MemoryStore {
    inner: Rc<Inner>,
    capabilities: SchemaCapabilities,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            inner: Rc::default(),
            capabilities: SchemaCapabilities::new(true),
        }
    }
}

impl MemoryStore {
    pub fn with_projects(projects: Vec<Project>) -> Self {
        let store = Self::default();
        *store.inner.projects.borrow_mut() = projects;
        store
    }

    pub fn with_content(entries: Vec<ContentEntry>) -> Self {
        let store = Self::default();
        *store.inner.content.borrow_mut() = entries;
        store
    }

    pub fn without_order_index(mut self) -> Self {
        self.capabilities = SchemaCapabilities::new(false);
        self
    }

    /// Every later write fails with `kind` until cleared with `None`.
    pub fn fail_writes(&self, kind: Option<ApiErrorKind>) {
        self.inner.fail_writes.set(kind);
    }

    /// Record the ids of `list` whenever `update_order` runs.
    pub fn watch(&self, list: Rc<RefCell<Vec<Project>>>) {
        *self.inner.watched.borrow_mut() = Some(list);
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.borrow().clone()
    }

    pub fn content(&self) -> Vec<ContentEntry> {
        self.inner.content.borrow().clone()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.inner.projects.borrow().clone()
    }

    pub fn order_calls(&self) -> Vec<Vec<OrderEntry>> {
        self.inner.order_calls.borrow().clone()
    }

    pub fn seen_during_order(&self) -> Vec<Vec<String>> {
        self.inner.seen_during_order.borrow().clone()
    }

    fn record(&self, call: String) {
        self.inner.calls.borrow_mut().push(call);
    }

    fn write_guard(&self) -> ApiResult<()> {
        match self.inner.fail_writes.get() {
            Some(kind) => Err(ApiError::new(kind, "injected failure")),
            None => Ok(()),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.inner.next_id.get() + 1;
        self.inner.next_id.set(n);
        format!("{prefix}{n}")
    }
}

#[async_trait(?Send)]
impl ContentStore for MemoryStore {
    async fn list_all(&self) -> ApiResult<Vec<ContentEntry>> {
        let mut all = self.content();
        all.sort_by(|a, b| (&a.section, &a.field).cmp(&(&b.section, &b.field)));
        Ok(all)
    }

    async fn list_by_section(&self, section: &str) -> ApiResult<Vec<ContentEntry>> {
        self.record(format!("content.list:{section}"));
        let mut rows: Vec<ContentEntry> = self
            .content()
            .into_iter()
            .filter(|e| e.section == section)
            .collect();
        rows.sort_by(|a, b| a.field.cmp(&b.field));
        Ok(rows)
    }

    async fn update(&self, id: &str, content: &str) -> ApiResult<()> {
        self.record(format!("content.update:{id}"));
        self.write_guard()?;
        let mut rows = self.inner.content.borrow_mut();
        let row = rows
            .iter_mut()
            .find(|e| e.id.as_deref() == Some(id))
            .ok_or_else(|| ApiError::not_found(&format!("Content {id}")))?;
        row.content = content.to_string();
        Ok(())
    }

    async fn create(
        &self,
        section: &str,
        field: &str,
        content: &str,
        content_type: ContentType,
    ) -> ApiResult<ContentEntry> {
        self.record(format!("content.create:{section}.{field}"));
        self.write_guard()?;
        if self
            .content()
            .iter()
            .any(|e| e.section == section && e.field == field)
        {
            return Err(ApiError::new(ApiErrorKind::Conflict, "duplicate key"));
        }
        let entry = ContentEntry {
            id: Some(self.next_id("c")),
            section: section.to_string(),
            field: field.to_string(),
            content: content.to_string(),
            content_type,
            created_at: None,
            updated_at: None,
        };
        self.inner.content.borrow_mut().push(entry.clone());
        Ok(entry)
    }
}

#[async_trait(?Send)]
impl ProjectStore for MemoryStore {
    async fn list(&self) -> ApiResult<Vec<Project>> {
        let mut all = self.projects();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn list_by_category(&self, category: ProjectCategory) -> ApiResult<Vec<Project>> {
        self.record(format!("projects.list:{category}"));
        list_in_display_order(&self.capabilities, category, |order| async move {
            let mut rows: Vec<Project> = self
                .projects()
                .into_iter()
                .filter(|p| p.category == category)
                .collect();
            if order == ORDER_DISPLAY {
                sort_for_display(&mut rows);
            } else {
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            Ok(rows)
        })
        .await
    }

    async fn get(&self, id: &str) -> ApiResult<Project> {
        self.projects()
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::not_found(&format!("Project {id}")))
    }

    async fn update(&self, id: &str, patch: &ProjectPatch) -> ApiResult<Project> {
        self.record(format!("projects.update:{id}"));
        self.write_guard()?;
        let mut rows = self.inner.projects.borrow_mut();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::not_found(&format!("Project {id}")))?;
        *row = row.with_patch(patch).map_err(ApiError::parse)?;
        Ok(row.clone())
    }

    async fn create(&self, project: &NewProject) -> ApiResult<Project> {
        self.record("projects.create".to_string());
        self.write_guard()?;
        let value = serde_json::json!({
            "id": self.next_id("p"),
            "title": project.title,
            "description": project.description,
            "category": project.category,
            "tech_stack": project.tech_stack,
            "features": project.features,
            "development_status": project.development_status,
            "order_index": project.order_index,
            "created_at": "2030-01-01T00:00:00Z",
            "updated_at": "2030-01-01T00:00:00Z",
        });
        let created: Project = serde_json::from_value(value).map_err(ApiError::parse)?;
        self.inner.projects.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        ProjectStore::get(self, id).await?;
        self.record(format!("projects.delete:{id}"));
        self.write_guard()?;
        self.inner.projects.borrow_mut().retain(|p| p.id != id);
        Ok(())
    }

    async fn update_order(&self, entries: &[OrderEntry]) -> ApiResult<()> {
        self.inner.order_calls.borrow_mut().push(entries.to_vec());
        if let Some(list) = self.inner.watched.borrow().as_ref() {
            let ids = list.borrow().iter().map(|p| p.id.clone()).collect();
            self.inner.seen_during_order.borrow_mut().push(ids);
        }

        apply_order(&self.capabilities, entries, |entry| async move {
            let patch = ProjectPatch::new().order_index(entry.order_index);
            ProjectStore::update(self, &entry.id, &patch).await.map(|_| ())
        })
        .await
    }
}
