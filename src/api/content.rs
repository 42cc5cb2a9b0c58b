use super::{eq, ApiClient, ApiError, ApiErrorKind, ApiResult};
use crate::models::{ContentEntry, ContentType};
use crate::util::now_iso;
use async_trait::async_trait;
use serde::Serialize;

const TABLE: &str = "portfolio_content";

/// Section/field keyed site copy.
#[async_trait(?Send)]
pub(crate) trait ContentStore {
    /// All entries, ordered by section.
    async fn list_all(&self) -> ApiResult<Vec<ContentEntry>>;

    /// One section's entries, ordered by field.
    async fn list_by_section(&self, section: &str) -> ApiResult<Vec<ContentEntry>>;

    /// Overwrites `content`; `NotFound` when no row has this id.
    async fn update(&self, id: &str, content: &str) -> ApiResult<()>;

    /// `Conflict` when `(section, field)` already exists.
    async fn create(
        &self,
        section: &str,
        field: &str,
        content: &str,
        content_type: ContentType,
    ) -> ApiResult<ContentEntry>;
}

#[derive(Serialize)]
struct ContentUpdate<'a> {
    content: &'a str,
    updated_at: String,
}

#[derive(Serialize)]
struct ContentInsert<'a> {
    section: &'a str,
    field: &'a str,
    content: &'a str,
    content_type: ContentType,
}

#[async_trait(?Send)]
impl ContentStore for ApiClient {
    async fn list_all(&self) -> ApiResult<Vec<ContentEntry>> {
        let query = [
            ("select", "*".to_string()),
            ("order", "section.asc,field.asc".to_string()),
        ];
        self.rest_select(TABLE, &query, "List content").await
    }

    async fn list_by_section(&self, section: &str) -> ApiResult<Vec<ContentEntry>> {
        let query = [
            ("section", eq(section)),
            ("select", "*".to_string()),
            ("order", "field.asc".to_string()),
        ];
        self.rest_select(TABLE, &query, "List section content").await
    }

    async fn update(&self, id: &str, content: &str) -> ApiResult<()> {
        let body = ContentUpdate {
            content,
            updated_at: now_iso(),
        };
        let rows: Vec<ContentEntry> = self
            .rest_update(TABLE, &[("id", eq(id))], &body, "Update content")
            .await?;
        if rows.is_empty() {
            return Err(ApiError::not_found(&format!("Content {id}")));
        }
        Ok(())
    }

    async fn create(
        &self,
        section: &str,
        field: &str,
        content: &str,
        content_type: ContentType,
    ) -> ApiResult<ContentEntry> {
        let body = ContentInsert {
            section,
            field,
            content,
            content_type,
        };
        let rows: Vec<ContentEntry> = self
            .rest_insert(TABLE, &[], &body, None, "Create content")
            .await
            .map_err(|e| match e.kind {
                ApiErrorKind::Conflict => ApiError::new(
                    ApiErrorKind::Conflict,
                    format!("{section}.{field} already exists: {}", e.message),
                ),
                _ => e,
            })?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ApiError::parse("Create content returned no row"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryStore;
    use futures::executor::block_on;

    fn row(id: &str, section: &str, field: &str) -> ContentEntry {
        ContentEntry {
            id: Some(id.to_string()),
            section: section.to_string(),
            field: field.to_string(),
            content: format!("{section}.{field}"),
            content_type: ContentType::Text,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_list_all_groups_by_section() {
        let store = MemoryStore::with_content(vec![
            row("1", "hero", "title"),
            row("2", "about", "body"),
            row("3", "contact", "email"),
            row("4", "about", "heading"),
        ]);
        let all = block_on(ContentStore::list_all(&store)).unwrap();
        let keys: Vec<String> = all.iter().map(|e| format!("{}.{}", e.section, e.field)).collect();
        assert_eq!(keys, vec!["about.body", "about.heading", "contact.email", "hero.title"]);
    }

    #[test]
    fn test_list_by_section_only_returns_that_section() {
        let store = MemoryStore::with_content(vec![
            row("1", "hero", "title"),
            row("2", "about", "body"),
            row("3", "hero", "subtitle"),
        ]);
        let hero = block_on(ContentStore::list_by_section(&store, "hero")).unwrap();
        let fields: Vec<&str> = hero.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["subtitle", "title"]);
    }
}
