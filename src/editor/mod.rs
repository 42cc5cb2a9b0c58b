mod media;
mod text;

pub(crate) use media::{media_save_fn, EditableMedia};
pub(crate) use text::{save_fn, EditableText};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum FieldMode {
    #[default]
    Viewing,
    Editing,
    Saving,
}

/// The parts of a key press the field cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct KeyInput<'a> {
    pub key: &'a str,
    /// Ctrl on most platforms, Cmd on macOS.
    pub ctrl_or_meta: bool,
    pub shift: bool,
}

#[cfg(test)]
impl<'a> KeyInput<'a> {
    pub fn plain(key: &'a str) -> Self {
        Self {
            key,
            ctrl_or_meta: false,
            shift: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FieldCommand {
    Commit,
    Cancel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CommitPlan {
    /// Nothing changed; back to viewing without a request.
    Skip,
    /// Send this trimmed value, then call `finish_save`.
    Persist(String),
}

/// Click-to-edit state for one text value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct EditableField {
    mode: FieldMode,
    original: String,
    buffer: String,
    pending: Option<String>,
    multiline: bool,
    disabled: bool,
}

impl EditableField {
    pub fn new(value: impl Into<String>, multiline: bool) -> Self {
        let original = value.into();
        Self {
            buffer: original.clone(),
            original,
            multiline,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> FieldMode {
        self.mode
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    #[cfg(test)]
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Enters editing only in admin mode on an enabled field.
    pub fn begin_edit(&mut self, admin_mode: bool) -> bool {
        if self.mode != FieldMode::Viewing || !admin_mode || self.disabled {
            return false;
        }
        self.buffer = self.original.clone();
        self.mode = FieldMode::Editing;
        true
    }

    pub fn set_buffer(&mut self, value: impl Into<String>) {
        if self.mode == FieldMode::Editing {
            self.buffer = value.into();
        }
    }

    /// Enter commits single-line fields, Ctrl/Cmd+Enter commits multiline
    /// ones, Escape cancels.
    pub fn key(&self, input: &KeyInput) -> Option<FieldCommand> {
        if self.mode != FieldMode::Editing {
            return None;
        }
        match input.key {
            "Escape" => Some(FieldCommand::Cancel),
            "Enter" if self.multiline && input.ctrl_or_meta => Some(FieldCommand::Commit),
            "Enter" if !self.multiline && !input.shift => Some(FieldCommand::Commit),
            _ => None,
        }
    }

    pub fn commit(&mut self) -> CommitPlan {
        if self.mode != FieldMode::Editing {
            return CommitPlan::Skip;
        }

        let next = self.buffer.trim().to_string();
        if next == self.original.trim() {
            self.buffer = self.original.clone();
            self.mode = FieldMode::Viewing;
            return CommitPlan::Skip;
        }

        self.pending = Some(next.clone());
        self.mode = FieldMode::Saving;
        CommitPlan::Persist(next)
    }

    /// Ends a save started by `commit`. A failed save puts the original back.
    pub fn finish_save(&mut self, ok: bool) {
        if self.mode != FieldMode::Saving {
            return;
        }
        let pending = self.pending.take();
        if ok {
            if let Some(v) = pending {
                self.original = v;
            }
        }
        self.buffer = self.original.clone();
        self.mode = FieldMode::Viewing;
    }

    pub fn cancel(&mut self) {
        if self.mode == FieldMode::Editing {
            self.buffer = self.original.clone();
            self.mode = FieldMode::Viewing;
        }
    }

    /// Local-only save: hands back the trimmed buffer when it differs and
    /// leaves editing. The stored value is untouched.
    pub fn temp_save(&mut self) -> Option<String> {
        if self.mode != FieldMode::Editing {
            return None;
        }
        let next = self.buffer.trim().to_string();
        self.mode = FieldMode::Viewing;
        if next == self.original.trim() {
            self.buffer = self.original.clone();
            None
        } else {
            Some(next)
        }
    }

    /// The outside value changed (refetch, another field's save).
    pub fn sync_value(&mut self, value: &str) {
        if self.original == value {
            return;
        }
        self.original = value.to_string();
        if self.mode == FieldMode::Viewing {
            self.buffer = self.original.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing(value: &str, multiline: bool) -> EditableField {
        let mut f = EditableField::new(value, multiline);
        assert!(f.begin_edit(true));
        f
    }

    #[test]
    fn test_edit_requires_admin_mode_and_enabled() {
        let mut f = EditableField::new("Hello", false);
        assert!(!f.begin_edit(false));
        assert_eq!(f.mode(), FieldMode::Viewing);

        f.set_disabled(true);
        assert!(!f.begin_edit(true));

        f.set_disabled(false);
        assert!(f.begin_edit(true));
        assert_eq!(f.buffer(), "Hello");
    }

    #[test]
    fn test_unchanged_commit_skips_request() {
        let mut f = editing("Hello", false);
        f.set_buffer("  Hello \n");
        assert_eq!(f.commit(), CommitPlan::Skip);
        assert_eq!(f.mode(), FieldMode::Viewing);
    }

    #[test]
    fn test_commit_persists_trimmed_value() {
        let mut f = editing("Hello", false);
        f.set_buffer(" Hi there ");
        assert_eq!(f.commit(), CommitPlan::Persist("Hi there".to_string()));
        assert_eq!(f.mode(), FieldMode::Saving);

        // No second edit while saving.
        assert!(!f.begin_edit(true));

        f.finish_save(true);
        assert_eq!(f.mode(), FieldMode::Viewing);
        assert_eq!(f.original(), "Hi there");
    }

    #[test]
    fn test_failed_save_reverts_buffer() {
        let mut f = editing("Hello", false);
        f.set_buffer("Broken");
        f.commit();
        f.finish_save(false);
        assert_eq!(f.mode(), FieldMode::Viewing);
        assert_eq!(f.buffer(), "Hello");
        assert_eq!(f.original(), "Hello");
    }

    #[test]
    fn test_escape_cancels_without_commit() {
        let mut f = editing("Hello", false);
        f.set_buffer("Draft");
        assert_eq!(f.key(&KeyInput::plain("Escape")), Some(FieldCommand::Cancel));
        f.cancel();
        assert_eq!(f.mode(), FieldMode::Viewing);
        assert_eq!(f.buffer(), "Hello");
    }

    #[test]
    fn test_enter_rules() {
        let single = editing("a", false);
        assert_eq!(single.key(&KeyInput::plain("Enter")), Some(FieldCommand::Commit));

        let multi = editing("a", true);
        assert_eq!(multi.key(&KeyInput::plain("Enter")), None);
        let ctrl_enter = KeyInput {
            key: "Enter",
            ctrl_or_meta: true,
            shift: false,
        };
        assert_eq!(multi.key(&ctrl_enter), Some(FieldCommand::Commit));

        let viewing = EditableField::new("a", false);
        assert_eq!(viewing.key(&KeyInput::plain("Enter")), None);
    }

    #[test]
    fn test_temp_save_keeps_original() {
        let mut f = editing("Hello", true);
        f.set_buffer("Hello, world ");
        assert_eq!(f.temp_save(), Some("Hello, world".to_string()));
        assert_eq!(f.mode(), FieldMode::Viewing);
        assert_eq!(f.original(), "Hello");

        let mut same = editing("Hello", true);
        assert_eq!(same.temp_save(), None);
    }

    #[test]
    fn test_sync_value_reseeds_only_while_viewing() {
        let mut f = EditableField::new("a", false);
        f.sync_value("b");
        assert_eq!(f.buffer(), "b");

        f.begin_edit(true);
        f.set_buffer("typing");
        f.sync_value("c");
        assert_eq!(f.buffer(), "typing");
        assert_eq!(f.original(), "c");
    }
}
