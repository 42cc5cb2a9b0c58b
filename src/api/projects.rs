use super::{eq, ApiClient, ApiError, ApiErrorKind, ApiResult, SchemaCapabilities};
use crate::models::{NewProject, OrderEntry, Project, ProjectCategory, ProjectPatch};
use crate::util::now_iso;
use async_trait::async_trait;
use std::future::Future;

const TABLE: &str = "projects";
pub(crate) const ORDER_DISPLAY: &str = "order_index.asc.nullslast,created_at.desc";
pub(crate) const ORDER_NEWEST: &str = "created_at.desc";

#[async_trait(?Send)]
pub(crate) trait ProjectStore {
    /// Every project, newest first.
    async fn list(&self) -> ApiResult<Vec<Project>>;

    /// One category in display order: `order_index` ascending with nulls
    /// last, then newest first. Falls back to newest first when the schema
    /// has no `order_index`.
    async fn list_by_category(&self, category: ProjectCategory) -> ApiResult<Vec<Project>>;

    async fn get(&self, id: &str) -> ApiResult<Project>;

    /// Partial update; `NotFound` when no row has this id.
    async fn update(&self, id: &str, patch: &ProjectPatch) -> ApiResult<Project>;

    async fn create(&self, project: &NewProject) -> ApiResult<Project>;

    /// `NotFound` is checked with a read before deleting.
    async fn delete(&self, id: &str) -> ApiResult<()>;

    /// Applies each entry as its own update, in order. Not transactional:
    /// entries before a failing one stay committed. A schema without
    /// `order_index` makes this a successful no-op.
    async fn update_order(&self, entries: &[OrderEntry]) -> ApiResult<()>;
}

impl ApiClient {
    async fn select_projects(&self, filter: Option<(&str, String)>, order: &str) -> ApiResult<Vec<Project>> {
        let mut query: Vec<(&str, String)> = Vec::with_capacity(3);
        if let Some(f) = filter {
            query.push(f);
        }
        query.push(("select", "*".to_string()));
        query.push(("order", order.to_string()));
        self.rest_select(TABLE, &query, "List projects").await
    }
}

#[async_trait(?Send)]
impl ProjectStore for ApiClient {
    async fn list(&self) -> ApiResult<Vec<Project>> {
        self.select_projects(None, ORDER_NEWEST).await
    }

    async fn list_by_category(&self, category: ProjectCategory) -> ApiResult<Vec<Project>> {
        list_in_display_order(&self.capabilities, category, |order| {
            self.select_projects(Some(("category", eq(category.as_ref()))), order)
        })
        .await
    }

    async fn get(&self, id: &str) -> ApiResult<Project> {
        let query = [
            ("id", eq(id)),
            ("select", "*".to_string()),
            ("limit", "1".to_string()),
        ];
        let rows: Vec<Project> = self.rest_select(TABLE, &query, "Get project").await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found(&format!("Project {id}")))
    }

    async fn update(&self, id: &str, patch: &ProjectPatch) -> ApiResult<Project> {
        let patch = patch.clone().updated_at(&now_iso());
        let rows: Vec<Project> = self
            .rest_update(TABLE, &[("id", eq(id))], &patch, "Update project")
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found(&format!("Project {id}")))
    }

    async fn create(&self, project: &NewProject) -> ApiResult<Project> {
        let rows: Vec<Project> = self
            .rest_insert(TABLE, &[], project, None, "Create project")
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ApiError::parse("Create project returned no row"))
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        self.get(id).await?;
        self.rest_delete(TABLE, &[("id", eq(id))], "Delete project").await
    }

    async fn update_order(&self, entries: &[OrderEntry]) -> ApiResult<()> {
        apply_order(&self.capabilities, entries, |entry| async move {
            let patch = ProjectPatch::new().order_index(entry.order_index);
            self.update(&entry.id, &patch).await.map(|_| ())
        })
        .await
    }
}

/// Category listing with the missing-column fallback: without `order_index`
/// the rows come back newest first and a warning is logged instead of an error.
/// A `42703` from the ordered select downgrades the capability and re-selects.
pub(crate) async fn list_in_display_order<F, Fut>(
    capabilities: &SchemaCapabilities,
    category: ProjectCategory,
    mut select: F,
) -> ApiResult<Vec<Project>>
where
    F: FnMut(&'static str) -> Fut,
    Fut: Future<Output = ApiResult<Vec<Project>>>,
{
    if !capabilities.has_order_index() {
        tracing::warn!("listing {category} projects newest first: order_index unavailable");
        return select(ORDER_NEWEST).await;
    }

    match select(ORDER_DISPLAY).await {
        Err(e) if e.kind == ApiErrorKind::UndefinedColumn => {
            capabilities.downgrade_order_index();
            tracing::warn!("listing {category} projects newest first: {e}");
            select(ORDER_NEWEST).await
        }
        other => other,
    }
}

/// Sequential order writes with the missing-column shim: once the schema is
/// known to lack `order_index`, the whole batch is a successful no-op.
pub(crate) async fn apply_order<F, Fut>(
    capabilities: &SchemaCapabilities,
    entries: &[OrderEntry],
    mut update: F,
) -> ApiResult<()>
where
    F: FnMut(OrderEntry) -> Fut,
    Fut: Future<Output = ApiResult<()>>,
{
    if !capabilities.has_order_index() {
        tracing::warn!("skipping order update for {} projects: order_index unavailable", entries.len());
        return Ok(());
    }

    for entry in entries {
        match update(entry.clone()).await {
            Ok(()) => {}
            Err(e) if e.kind == ApiErrorKind::UndefinedColumn => {
                capabilities.downgrade_order_index();
                tracing::warn!("order update treated as done: {e}");
                return Ok(());
            }
            Err(e) => {
                tracing::error!("order update stopped at {}: {e}", entry.id);
                return Err(e);
            }
        }
    }
    Ok(())
}
