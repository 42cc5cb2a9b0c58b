use super::{ApiClient, ApiResult};
use crate::models::SiteSetting;
use crate::util::now_iso;
use async_trait::async_trait;
use serde::Serialize;

const TABLE: &str = "site_settings";

#[async_trait(?Send)]
pub(crate) trait SettingsStore {
    async fn list_settings(&self) -> ApiResult<Vec<SiteSetting>>;

    /// Insert or overwrite by `setting_key`.
    async fn upsert_setting(&self, key: &str, value: &str) -> ApiResult<()>;
}

#[derive(Serialize)]
struct SettingUpsert<'a> {
    setting_key: &'a str,
    setting_value: &'a str,
    updated_at: String,
}

#[async_trait(?Send)]
impl SettingsStore for ApiClient {
    async fn list_settings(&self) -> ApiResult<Vec<SiteSetting>> {
        let query = [
            ("select", "setting_key,setting_value,description".to_string()),
            ("order", "setting_key.asc".to_string()),
        ];
        self.rest_select(TABLE, &query, "List settings").await
    }

    async fn upsert_setting(&self, key: &str, value: &str) -> ApiResult<()> {
        let body = SettingUpsert {
            setting_key: key,
            setting_value: value,
            updated_at: now_iso(),
        };
        let _: Vec<SiteSetting> = self
            .rest_insert(
                TABLE,
                &[("on_conflict", "setting_key".to_string())],
                &body,
                Some("resolution=merge-duplicates"),
                "Save setting",
            )
            .await?;
        Ok(())
    }
}
