use crate::storage::{load_json_from_storage, save_json_to_storage, DRAFTS_KEY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FieldDraft {
    pub value: String,
    pub updated_ms: i64,
    pub synced_ms: i64,
}

impl FieldDraft {
    pub fn is_dirty(&self) -> bool {
        self.updated_ms > self.synced_ms
    }
}

/// A draft waiting for "Save all".
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PendingDraft {
    pub section: String,
    pub field: String,
    pub value: String,
    pub updated_ms: i64,
}

/// Temp-saved content edits keyed by `section.field`. Local only; "Save all"
/// pushes them through the content helper and marks them synced.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ContentDrafts {
    #[serde(default)]
    fields: BTreeMap<String, FieldDraft>,
}

fn key(section: &str, field: &str) -> String {
    format!("{section}.{field}")
}

impl ContentDrafts {
    pub fn load() -> Self {
        load_json_from_storage(DRAFTS_KEY).unwrap_or_default()
    }

    pub fn save(&self) {
        save_json_to_storage(DRAFTS_KEY, self);
    }

    pub fn touch(&mut self, section: &str, field: &str, value: &str, now_ms: i64) {
        if section.trim().is_empty() || field.trim().is_empty() {
            return;
        }
        let d = self.fields.entry(key(section, field)).or_default();
        d.value = value.to_string();
        d.updated_ms = now_ms;
        // synced_ms is left alone until the value is actually stored.
    }

    pub fn mark_synced(&mut self, section: &str, field: &str, synced_ms: i64) {
        if let Some(d) = self.fields.get_mut(&key(section, field)) {
            d.synced_ms = d.synced_ms.max(synced_ms);
        }
    }

    /// The draft while it is newer than the last sync, else the stored value.
    pub fn value_or(&self, section: &str, field: &str, stored: &str) -> String {
        match self.fields.get(&key(section, field)) {
            Some(d) if d.is_dirty() => d.value.clone(),
            _ => stored.to_string(),
        }
    }

    pub fn has_unsaved(&self) -> bool {
        self.fields.values().any(FieldDraft::is_dirty)
    }

    pub fn pending(&self) -> Vec<PendingDraft> {
        self.fields
            .iter()
            .filter(|(_, d)| d.is_dirty())
            .filter_map(|(k, d)| {
                let (section, field) = k.split_once('.')?;
                Some(PendingDraft {
                    section: section.to_string(),
                    field: field.to_string(),
                    value: d.value.clone(),
                    updated_ms: d.updated_ms,
                })
            })
            .collect()
    }

    /// Drops drafts that are fully synced.
    pub fn prune(&mut self) {
        self.fields.retain(|_, d| d.is_dirty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirty_draft_overrides_stored_value() {
        let mut drafts = ContentDrafts::default();
        drafts.touch("hero", "title", "Draft title", 10);

        assert!(drafts.has_unsaved());
        assert_eq!(drafts.value_or("hero", "title", "Stored"), "Draft title");
        assert_eq!(drafts.value_or("hero", "subtitle", "Stored"), "Stored");
    }

    #[test]
    fn test_synced_draft_yields_to_stored_value() {
        let mut drafts = ContentDrafts::default();
        drafts.touch("about", "bio", "v1", 10);
        drafts.mark_synced("about", "bio", 10);

        assert!(!drafts.has_unsaved());
        assert_eq!(drafts.value_or("about", "bio", "server"), "server");

        // A later edit is dirty again.
        drafts.touch("about", "bio", "v2", 11);
        assert_eq!(drafts.value_or("about", "bio", "server"), "v2");
    }

    #[test]
    fn test_mark_synced_never_moves_backwards() {
        let mut drafts = ContentDrafts::default();
        drafts.touch("hero", "title", "x", 5);
        drafts.mark_synced("hero", "title", 9);
        drafts.mark_synced("hero", "title", 3);
        drafts.touch("hero", "title", "y", 8);
        assert!(!drafts.has_unsaved());
    }

    #[test]
    fn test_pending_and_prune() {
        let mut drafts = ContentDrafts::default();
        drafts.touch("hero", "title", "a", 1);
        drafts.touch("contact", "email", "me@example.com", 2);
        drafts.mark_synced("hero", "title", 1);

        let pending = drafts.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].section, "contact");
        assert_eq!(pending[0].field, "email");

        drafts.prune();
        assert_eq!(drafts.pending().len(), 1);
        assert_eq!(drafts.value_or("hero", "title", "stored"), "stored");
    }

    #[test]
    fn test_blank_keys_ignored() {
        let mut drafts = ContentDrafts::default();
        drafts.touch(" ", "title", "a", 1);
        assert!(!drafts.has_unsaved());
    }
}
