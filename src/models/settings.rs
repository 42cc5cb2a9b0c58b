use super::SiteSetting;
use std::collections::BTreeMap;
use strum::{Display, EnumIter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum SettingTab {
    General,
    Display,
    Social,
    Advanced,
}

impl SettingTab {
    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Display => "Display",
            Self::Social => "Social",
            Self::Advanced => "Advanced",
        }
    }
}

/// How a setting is edited. Values are always stored as strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SettingKind {
    Text,
    LongText,
    Email,
    Url,
    Color,
    Toggle,
    Number,
}

impl SettingKind {
    pub fn input_type(self) -> &'static str {
        match self {
            Self::Text | Self::LongText => "text",
            Self::Email => "email",
            Self::Url => "url",
            Self::Color => "color",
            Self::Toggle => "checkbox",
            Self::Number => "number",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SettingDef {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: SettingKind,
    pub tab: SettingTab,
    pub default: &'static str,
    pub hint: Option<&'static str>,
}

const fn def(
    tab: SettingTab,
    key: &'static str,
    label: &'static str,
    kind: SettingKind,
    default: &'static str,
) -> SettingDef {
    SettingDef {
        key,
        label,
        kind,
        tab,
        default,
        hint: None,
    }
}

const SETTINGS: [SettingDef; 10] = [
    def(SettingTab::General, "site_title", "Site title", SettingKind::Text, "Portfolio"),
    def(
        SettingTab::General,
        "site_description",
        "Site description",
        SettingKind::LongText,
        "Turning creative ideas into working products.",
    ),
    def(SettingTab::General, "contact_email", "Contact email", SettingKind::Email, "contact@example.com"),
    def(SettingTab::Display, "theme_color", "Theme color", SettingKind::Color, "#3B82F6"),
    def(SettingTab::Display, "enable_dark_mode", "Dark mode support", SettingKind::Toggle, "true"),
    def(SettingTab::Display, "projects_per_page", "Projects per page", SettingKind::Number, "6"),
    def(SettingTab::Display, "show_projects", "Show projects section", SettingKind::Toggle, "true"),
    def(SettingTab::Social, "github_profile", "GitHub profile", SettingKind::Url, ""),
    def(SettingTab::Social, "linkedin_profile", "LinkedIn profile", SettingKind::Url, ""),
    SettingDef {
        hint: Some("e.g. G-XXXXXXXXXX"),
        ..def(SettingTab::Advanced, "google_analytics_id", "Google Analytics ID", SettingKind::Text, "")
    },
];

pub(crate) fn settings_in(tab: SettingTab) -> impl Iterator<Item = &'static SettingDef> {
    SETTINGS.iter().filter(move |d| d.tab == tab)
}

/// Working values for every known setting: stored rows win over defaults,
/// unknown stored keys are ignored.
pub(crate) fn resolve_values(stored: &[SiteSetting]) -> BTreeMap<&'static str, String> {
    SETTINGS
        .iter()
        .map(|d| {
            let value = stored
                .iter()
                .find(|s| s.setting_key == d.key)
                .map(|s| s.setting_value.clone())
                .unwrap_or_else(|| d.default.to_string());
            (d.key, value)
        })
        .collect()
}

/// Keys whose edited value differs from the saved baseline, in table order.
pub(crate) fn changed_keys(
    baseline: &BTreeMap<&'static str, String>,
    edited: &BTreeMap<&'static str, String>,
) -> Vec<&'static str> {
    SETTINGS
        .iter()
        .map(|d| d.key)
        .filter(|k| baseline.get(k) != edited.get(k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn stored(key: &str, value: &str) -> SiteSetting {
        SiteSetting {
            setting_key: key.to_string(),
            setting_value: value.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_every_tab_has_settings_and_keys_are_unique() {
        for tab in SettingTab::iter() {
            assert!(settings_in(tab).next().is_some(), "{tab} is empty");
        }
        let mut keys: Vec<&str> = SETTINGS.iter().map(|d| d.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), SETTINGS.len());
    }

    #[test]
    fn test_resolve_values_prefers_stored() {
        let values = resolve_values(&[stored("theme_color", "#000000"), stored("unknown", "x")]);
        assert_eq!(values.get("theme_color").map(String::as_str), Some("#000000"));
        assert_eq!(values.get("projects_per_page").map(String::as_str), Some("6"));
        assert!(!values.contains_key("unknown"));
        assert_eq!(values.len(), SETTINGS.len());
    }

    #[test]
    fn test_changed_keys_in_table_order() {
        let baseline = resolve_values(&[]);
        let mut edited = baseline.clone();
        edited.insert("show_projects", "false".to_string());
        edited.insert("site_title", "New".to_string());
        assert_eq!(changed_keys(&baseline, &edited), vec!["site_title", "show_projects"]);
        assert!(changed_keys(&baseline, &baseline).is_empty());
    }
}
