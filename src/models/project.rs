use super::media::{MediaSlotId, MediaSlots, MediaType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ProjectCategory {
    #[default]
    Vibe,
    Automation,
}

impl ProjectCategory {
    /// Tab selection from the `?tab=` query value. Anything but `automation` is `vibe`.
    pub fn from_query(tab: Option<&str>) -> Self {
        match tab.map(str::trim) {
            Some(t) => Self::from_str(t).unwrap_or_default(),
            None => Self::default(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Vibe => "Vibe coding",
            Self::Automation => "Automation",
        }
    }
}

/// Editable text columns of a project row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter)]
pub(crate) enum ProjectTextField {
    Title,
    Description,
    DescriptionCard,
    DescriptionDetailTop,
    DescriptionDetailBottom,
    SectionTitleLine1,
    SectionTitleLine2,
    DevelopmentStatus,
    GithubUrl,
    DemoUrl,
}

impl ProjectTextField {
    pub fn column(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::DescriptionCard => "description_card",
            Self::DescriptionDetailTop => "description_detail_top",
            Self::DescriptionDetailBottom => "description_detail_bottom",
            Self::SectionTitleLine1 => "section_title_line1",
            Self::SectionTitleLine2 => "section_title_line2",
            Self::DevelopmentStatus => "development_status",
            Self::GithubUrl => "github_url",
            Self::DemoUrl => "demo_url",
        }
    }

    pub fn is_multiline(self) -> bool {
        matches!(
            self,
            Self::Description | Self::DescriptionCard | Self::DescriptionDetailBottom
        )
    }
}

/// Flat row shape as stored by the backend. Media slots live in `columns`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
struct ProjectRow {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    description_card: Option<String>,
    #[serde(default)]
    description_detail_top: Option<String>,
    #[serde(default)]
    description_detail_bottom: Option<String>,
    #[serde(default)]
    section_title_line1: Option<String>,
    #[serde(default)]
    section_title_line2: Option<String>,
    #[serde(default)]
    category: ProjectCategory,
    #[serde(default)]
    tech_stack: Option<Vec<String>>,
    #[serde(default)]
    features: Option<Vec<String>>,
    #[serde(default)]
    development_status: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    github_url: Option<String>,
    #[serde(default)]
    demo_url: Option<String>,
    #[serde(default)]
    order_index: Option<i64>,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,

    #[serde(flatten)]
    columns: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(from = "ProjectRow", into = "ProjectRow")]
pub(crate) struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub description_card: String,
    pub description_detail_top: String,
    pub description_detail_bottom: String,
    pub section_title_line1: String,
    pub section_title_line2: String,
    pub category: ProjectCategory,
    pub tech_stack: Vec<String>,
    pub features: Vec<String>,
    pub development_status: String,
    pub image_url: Option<String>,
    pub media: MediaSlots,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub order_index: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        let mut media = MediaSlots::default();
        for id in MediaSlotId::iter() {
            let url = row
                .columns
                .get(&id.url_column())
                .and_then(Value::as_str)
                .unwrap_or_default();
            let media_type = row
                .columns
                .get(&id.type_column())
                .and_then(Value::as_str)
                .and_then(|t| MediaType::from_str(t).ok())
                .unwrap_or_default();
            media.set(id, url, media_type);
        }

        Self {
            id: row.id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            description_card: row.description_card.unwrap_or_default(),
            description_detail_top: row.description_detail_top.unwrap_or_default(),
            description_detail_bottom: row.description_detail_bottom.unwrap_or_default(),
            section_title_line1: row.section_title_line1.unwrap_or_default(),
            section_title_line2: row.section_title_line2.unwrap_or_default(),
            category: row.category,
            tech_stack: row.tech_stack.unwrap_or_default(),
            features: row.features.unwrap_or_default(),
            development_status: row.development_status.unwrap_or_default(),
            image_url: non_empty(row.image_url),
            media,
            github_url: non_empty(row.github_url),
            demo_url: non_empty(row.demo_url),
            order_index: row.order_index,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<Project> for ProjectRow {
    fn from(p: Project) -> Self {
        let mut columns = Map::new();
        for id in MediaSlotId::iter() {
            let (url, media_type) = match p.media.get(id) {
                Some(slot) => (
                    Value::String(slot.url.clone()),
                    Value::String(slot.media_type.to_string()),
                ),
                None => (Value::Null, Value::Null),
            };
            columns.insert(id.url_column(), url);
            columns.insert(id.type_column(), media_type);
        }

        Self {
            id: p.id,
            title: p.title,
            description: Some(p.description),
            description_card: Some(p.description_card),
            description_detail_top: Some(p.description_detail_top),
            description_detail_bottom: Some(p.description_detail_bottom),
            section_title_line1: Some(p.section_title_line1),
            section_title_line2: Some(p.section_title_line2),
            category: p.category,
            tech_stack: Some(p.tech_stack),
            features: Some(p.features),
            development_status: Some(p.development_status),
            image_url: p.image_url,
            github_url: p.github_url,
            demo_url: p.demo_url,
            order_index: p.order_index,
            created_at: p.created_at,
            updated_at: p.updated_at,
            columns,
        }
    }
}

impl Project {
    pub fn text(&self, field: ProjectTextField) -> String {
        match field {
            ProjectTextField::Title => self.title.clone(),
            ProjectTextField::Description => self.description.clone(),
            ProjectTextField::DescriptionCard => self.description_card.clone(),
            ProjectTextField::DescriptionDetailTop => self.description_detail_top.clone(),
            ProjectTextField::DescriptionDetailBottom => self.description_detail_bottom.clone(),
            ProjectTextField::SectionTitleLine1 => self.section_title_line1.clone(),
            ProjectTextField::SectionTitleLine2 => self.section_title_line2.clone(),
            ProjectTextField::DevelopmentStatus => self.development_status.clone(),
            ProjectTextField::GithubUrl => self.github_url.clone().unwrap_or_default(),
            ProjectTextField::DemoUrl => self.demo_url.clone().unwrap_or_default(),
        }
    }

    /// Card copy falls back to the plain description.
    pub fn card_text(&self) -> &str {
        if self.description_card.trim().is_empty() {
            &self.description
        } else {
            &self.description_card
        }
    }

    /// Returns a copy with `patch` merged over this project's row.
    pub fn with_patch(&self, patch: &ProjectPatch) -> Result<Project, serde_json::Error> {
        let mut row = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut row {
            for (k, v) in patch.fields.iter() {
                map.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(row)
    }
}

/// Display order within one category: `order_index` ascending with nulls last,
/// ties broken by newest `created_at` first.
pub(crate) fn sort_for_display(projects: &mut [Project]) {
    projects.sort_by(|a, b| {
        let by_index = match (a.order_index, b.order_index) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_index.then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// One entry per non-blank line, for editing `tech_stack` and `features` as text.
pub(crate) fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Partial update body. Only the columns set here are sent.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub(crate) struct ProjectPatch {
    fields: Map<String, Value>,
}

impl ProjectPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, field: ProjectTextField, value: &str) -> Self {
        let v = match field {
            // Link columns are nullable; an empty edit clears them.
            ProjectTextField::GithubUrl | ProjectTextField::DemoUrl if value.trim().is_empty() => {
                Value::Null
            }
            _ => Value::String(value.to_string()),
        };
        self.fields.insert(field.column().to_string(), v);
        self
    }

    pub fn category(mut self, category: ProjectCategory) -> Self {
        self.fields
            .insert("category".to_string(), Value::String(category.to_string()));
        self
    }

    pub fn tech_stack(mut self, items: Vec<String>) -> Self {
        self.fields.insert("tech_stack".to_string(), Value::from(items));
        self
    }

    pub fn features(mut self, items: Vec<String>) -> Self {
        self.fields.insert("features".to_string(), Value::from(items));
        self
    }

    pub fn image_url(mut self, url: &str) -> Self {
        let v = if url.trim().is_empty() {
            Value::Null
        } else {
            Value::String(url.to_string())
        };
        self.fields.insert("image_url".to_string(), v);
        self
    }

    pub fn media(mut self, slot: MediaSlotId, value: Option<(&str, MediaType)>) -> Self {
        let (url, media_type) = match value {
            Some((url, t)) => (Value::String(url.to_string()), Value::String(t.to_string())),
            None => (Value::Null, Value::Null),
        };
        self.fields.insert(slot.url_column(), url);
        self.fields.insert(slot.type_column(), media_type);
        self
    }

    pub fn order_index(mut self, index: i64) -> Self {
        self.fields
            .insert("order_index".to_string(), Value::from(index));
        self
    }

    pub fn updated_at(mut self, ts: &str) -> Self {
        self.fields
            .insert("updated_at".to_string(), Value::String(ts.to_string()));
        self
    }

    #[cfg(test)]
    pub fn touches(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }
}

/// Insert body for "add project". Server assigns id and timestamps.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct NewProject {
    pub title: String,
    pub description: String,
    pub category: ProjectCategory,
    pub tech_stack: Vec<String>,
    pub features: Vec<String>,
    pub development_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl NewProject {
    pub fn placeholder(category: ProjectCategory) -> Self {
        Self {
            title: "New project".to_string(),
            description: "Describe the project".to_string(),
            category,
            tech_stack: vec![],
            features: vec![],
            development_status: "draft".to_string(),
            order_index: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct OrderEntry {
    pub id: String,
    pub order_index: i64,
}

#[cfg(test)]
pub(crate) fn test_project(id: &str, category: ProjectCategory, order_index: Option<i64>) -> Project {
    Project {
        id: id.to_string(),
        title: format!("Project {id}"),
        description: String::new(),
        description_card: String::new(),
        description_detail_top: String::new(),
        description_detail_bottom: String::new(),
        section_title_line1: String::new(),
        section_title_line2: String::new(),
        category,
        tech_stack: vec![],
        features: vec![],
        development_status: "draft".to_string(),
        image_url: None,
        media: MediaSlots::default(),
        github_url: None,
        demo_url: None,
        order_index,
        created_at: format!("2025-01-{:02}T00:00:00Z", id.len()),
        updated_at: String::new(),
    }
}
