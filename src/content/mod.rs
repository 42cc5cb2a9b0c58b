use crate::api::{ApiErrorKind, ContentStore};
use crate::drafts::PendingDraft;
use crate::models::{ContentEntry, ContentType};
use crate::state::LocalState;
use crate::state::optimistic;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Read and write one section's site copy without caring whether a field
/// has been stored before.
pub(crate) struct ContentHelper<S, L, E> {
    store: S,
    section: String,
    entries: L,
    error: E,
}

impl<S, L, E> ContentHelper<S, L, E>
where
    S: ContentStore,
    L: LocalState<Vec<ContentEntry>>,
    E: LocalState<Option<String>>,
{
    pub fn new(store: S, section: impl Into<String>, entries: L, error: E) -> Self {
        Self {
            store,
            section: section.into(),
            entries,
            error,
        }
    }

    fn find<R>(&self, field: &str, f: impl FnOnce(Option<&ContentEntry>) -> R) -> R {
        self.entries
            .read_with(|list| f(list.iter().find(|e| e.field == field)))
    }

    /// Stored content, or empty.
    pub fn value(&self, field: &str) -> String {
        self.find(field, |e| e.map(|e| e.content.clone()).unwrap_or_default())
    }

    /// Stored row id, or empty when the field has never been saved.
    pub fn id(&self, field: &str) -> String {
        self.find(field, |e| e.and_then(|e| e.id.clone()).unwrap_or_default())
    }

    /// `default` only while no row exists; a stored value always wins, even
    /// an empty one.
    pub fn value_or(&self, field: &str, default: &str) -> String {
        self.find(field, |e| match e {
            Some(e) => e.content.clone(),
            None => default.to_string(),
        })
    }

    pub fn error(&self) -> Option<String> {
        self.error.read_with(Clone::clone)
    }

    pub async fn refetch(&self) -> bool {
        match self.store.list_by_section(&self.section).await {
            Ok(list) => {
                self.entries.replace(list);
                self.error.replace(None);
                true
            }
            Err(e) => {
                tracing::error!("loading {} content failed: {e}", self.section);
                self.error.replace(Some(e.user_message()));
                false
            }
        }
    }

    /// Updates the stored row, or creates it when there is none yet.
    pub async fn update(&self, field: &str, value: &str) -> bool {
        let id = self.id(field);
        if id.is_empty() {
            return self.create(field, value).await;
        }

        let next: Vec<ContentEntry> = self
            .entries
            .snapshot()
            .into_iter()
            .map(|mut e| {
                if e.field == field {
                    e.content = value.to_string();
                }
                e
            })
            .collect();

        match optimistic(&self.entries, next, self.store.update(&id, value)).await {
            Ok(()) => {
                self.error.replace(None);
                true
            }
            Err(e) => {
                tracing::error!("saving {}.{field} failed: {e}", self.section);
                self.error.replace(Some(e.user_message()));
                false
            }
        }
    }

    async fn create(&self, field: &str, value: &str) -> bool {
        match self
            .store
            .create(&self.section, field, value, ContentType::Text)
            .await
        {
            Ok(entry) => {
                let mut list = self.entries.snapshot();
                list.push(entry);
                self.entries.replace(list);
                self.refetch().await;
                true
            }
            Err(e) => {
                tracing::error!("creating {}.{field} failed: {e}", self.section);
                if e.kind == ApiErrorKind::Conflict {
                    // Someone else created it first; pick up their row id.
                    self.refetch().await;
                }
                self.error.replace(Some(e.user_message()));
                false
            }
        }
    }
}

/// Pushes temp-saved drafts through a helper per section. Returns the
/// drafts that were stored.
pub(crate) async fn save_drafts<S>(store: S, pending: Vec<PendingDraft>) -> Vec<PendingDraft>
where
    S: ContentStore + Clone,
{
    let mut by_section: BTreeMap<String, Vec<PendingDraft>> = BTreeMap::new();
    for d in pending {
        by_section.entry(d.section.clone()).or_default().push(d);
    }

    let mut saved = Vec::new();
    for (section, drafts) in by_section {
        let helper = ContentHelper::new(
            store.clone(),
            section,
            Rc::new(RefCell::new(Vec::new())),
            Rc::new(RefCell::new(None)),
        );
        if !helper.refetch().await {
            continue;
        }
        for d in drafts {
            if helper.update(&d.field, &d.value).await {
                saved.push(d);
            }
        }
    }
    tracing::info!("saved {} draft(s)", saved.len());
    saved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryStore;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Helper =
        ContentHelper<MemoryStore, Rc<RefCell<Vec<ContentEntry>>>, Rc<RefCell<Option<String>>>>;

    fn entry(id: &str, field: &str, content: &str) -> ContentEntry {
        ContentEntry {
            id: Some(id.to_string()),
            section: "hero".to_string(),
            field: field.to_string(),
            content: content.to_string(),
            content_type: ContentType::Text,
            created_at: None,
            updated_at: None,
        }
    }

    fn helper(store: &MemoryStore) -> Helper {
        let h = ContentHelper::new(
            store.clone(),
            "hero",
            Rc::new(RefCell::new(vec![])),
            Rc::new(RefCell::new(None)),
        );
        block_on(h.refetch());
        h
    }

    #[test]
    fn test_fallback_law() {
        let store = MemoryStore::default();
        let h = helper(&store);
        assert_eq!(h.value_or("title", "CREATIVE"), "CREATIVE");
        assert_eq!(h.value("title"), "");
        assert_eq!(h.id("title"), "");

        // Saving the default text itself still makes the stored row win.
        assert!(block_on(h.update("title", "CREATIVE")));
        assert_eq!(h.value_or("title", "something else"), "CREATIVE");

        assert!(block_on(h.update("title", "")));
        assert_eq!(h.value_or("title", "CREATIVE"), "");
    }

    #[test]
    fn test_two_updates_create_one_row() {
        let store = MemoryStore::default();
        let h = helper(&store);

        assert!(block_on(h.update("subtitle", "first")));
        assert!(!h.id("subtitle").is_empty());
        assert!(block_on(h.update("subtitle", "second")));

        let creates = store
            .calls()
            .iter()
            .filter(|c| c.starts_with("content.create"))
            .count();
        assert_eq!(creates, 1);
        assert_eq!(store.content().len(), 1);
        assert_eq!(store.content()[0].content, "second");
    }

    #[test]
    fn test_existing_row_is_updated_in_place() {
        let store = MemoryStore::with_content(vec![entry("c9", "title", "old")]);
        let h = helper(&store);

        assert!(block_on(h.update("title", "new")));
        assert_eq!(h.value("title"), "new");
        assert!(store.calls().contains(&"content.update:c9".to_string()));
    }

    #[test]
    fn test_failed_update_reverts_and_reports() {
        let store = MemoryStore::with_content(vec![entry("c9", "title", "old")]);
        let h = helper(&store);
        store.fail_writes(Some(ApiErrorKind::Network));

        assert!(!block_on(h.update("title", "new")));
        assert_eq!(h.value("title"), "old");
        assert!(h.error().is_some());
    }

    fn draft(section: &str, field: &str, value: &str) -> PendingDraft {
        PendingDraft {
            section: section.to_string(),
            field: field.to_string(),
            value: value.to_string(),
            updated_ms: 7,
        }
    }

    #[test]
    fn test_save_drafts_updates_or_creates() {
        let store = MemoryStore::with_content(vec![entry("c1", "title", "old")]);
        let saved = block_on(save_drafts(
            store.clone(),
            vec![draft("hero", "title", "new"), draft("contact", "email", "a@b.c")],
        ));

        assert_eq!(saved.len(), 2);
        let calls = store.calls();
        assert!(calls.contains(&"content.update:c1".to_string()));
        assert!(calls.contains(&"content.create:contact.email".to_string()));
    }

    #[test]
    fn test_save_drafts_skips_failures() {
        let store = MemoryStore::with_content(vec![entry("c1", "title", "old")]);
        store.fail_writes(Some(ApiErrorKind::Http(503)));
        let saved = block_on(save_drafts(store.clone(), vec![draft("hero", "title", "new")]));
        assert!(saved.is_empty());
        assert_eq!(store.content()[0].content, "old");
    }

    #[test]
    fn test_failed_create_returns_false() {
        let store = MemoryStore::default();
        let h = helper(&store);
        store.fail_writes(Some(ApiErrorKind::Http(500)));

        assert!(!block_on(h.update("title", "x")));
        assert_eq!(h.value_or("title", "fallback"), "fallback");
    }
}
