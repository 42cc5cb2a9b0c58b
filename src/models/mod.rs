mod media;
mod project;
mod settings;

pub(crate) use media::{MediaSlotId, MediaType};
pub(crate) use project::{
    parse_list, sort_for_display, NewProject, OrderEntry, Project, ProjectCategory, ProjectPatch,
    ProjectTextField,
};

pub(crate) use settings::{changed_keys, resolve_values, settings_in, SettingDef, SettingKind, SettingTab};

#[cfg(test)]
pub(crate) use project::test_project;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ContentType {
    #[default]
    Text,
    Image,
    Json,
}

/// One editable piece of site copy, keyed by `(section, field)`.
///
/// `id` stays `None` until the backend has stored the row.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct ContentEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub section: String,
    pub field: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct SiteSetting {
    pub setting_key: String,
    #[serde(default)]
    pub setting_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum FileKind {
    Image,
    Video,
    Document,
    Other,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime == "application/pdf"
            || mime.starts_with("text/")
            || mime.contains("document")
            || mime.contains("msword")
        {
            Self::Document
        } else {
            Self::Other
        }
    }
}

/// A blob in the media bucket. Projects reference these only by URL.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct MediaFile {
    pub id: String,
    pub file_name: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: u64,
    pub created_at: String,
}

impl MediaFile {
    pub fn kind(&self) -> FileKind {
        FileKind::from_mime(&self.file_type)
    }
}

/// Media library view: case-insensitive name search plus an optional kind filter.
pub(crate) fn filter_media<'a>(
    files: &'a [MediaFile],
    query: &str,
    kind: Option<FileKind>,
) -> Vec<&'a MediaFile> {
    let needle = query.trim().to_lowercase();
    files
        .iter()
        .filter(|f| kind.map_or(true, |k| f.kind() == k))
        .filter(|f| needle.is_empty() || f.file_name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_entry_contract_deserialize() {
        let json = r#"{
            "id": "c0ffee",
            "section": "hero",
            "field": "title_line1",
            "content": "CREATIVE",
            "content_type": "text",
            "created_at": "2025-01-20T00:00:00Z",
            "updated_at": "2025-01-21T00:00:00Z"
        }"#;
        let entry: ContentEntry = serde_json::from_str(json).expect("content row should parse");
        assert_eq!(entry.id.as_deref(), Some("c0ffee"));
        assert_eq!(entry.content_type, ContentType::Text);
    }

    #[test]
    fn test_unsaved_content_entry_omits_id() {
        let entry = ContentEntry {
            id: None,
            section: "hero".to_string(),
            field: "subtitle".to_string(),
            content: "hi".to_string(),
            content_type: ContentType::Json,
            created_at: None,
            updated_at: None,
        };
        let v = serde_json::to_value(&entry).expect("should serialize");
        assert!(v.get("id").is_none());
        assert_eq!(v["content_type"], "json");
    }

    #[test]
    fn test_file_kind_from_mime() {
        assert_eq!(FileKind::from_mime("image/png"), FileKind::Image);
        assert_eq!(FileKind::from_mime("video/mp4"), FileKind::Video);
        assert_eq!(FileKind::from_mime("application/pdf"), FileKind::Document);
        assert_eq!(FileKind::from_mime("application/zip"), FileKind::Other);
    }

    fn media_file(name: &str, mime: &str) -> MediaFile {
        MediaFile {
            id: name.to_string(),
            file_name: name.to_string(),
            file_path: format!("uploads/{name}"),
            file_type: mime.to_string(),
            file_size: 1024,
            created_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_filter_media_by_name_and_kind() {
        let files = vec![
            media_file("Hero-Shot.png", "image/png"),
            media_file("demo.mp4", "video/mp4"),
            media_file("resume.pdf", "application/pdf"),
            media_file("hero.mov", "video/quicktime"),
        ];

        let names = |xs: Vec<&MediaFile>| xs.into_iter().map(|f| f.file_name.clone()).collect::<Vec<_>>();

        assert_eq!(filter_media(&files, "", None).len(), 4);
        assert_eq!(names(filter_media(&files, " HERO ", None)), vec!["Hero-Shot.png", "hero.mov"]);
        assert_eq!(names(filter_media(&files, "hero", Some(FileKind::Video))), vec!["hero.mov"]);
        assert_eq!(names(filter_media(&files, "", Some(FileKind::Document))), vec!["resume.pdf"]);
        assert!(filter_media(&files, "nothing", None).is_empty());
    }
}
