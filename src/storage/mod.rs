use serde::{Deserialize, Serialize};

pub(crate) const TOKEN_KEY: &str = "folio_token";
pub(crate) const USER_KEY: &str = "folio_user";
pub(crate) const ADMIN_MODE_KEY: &str = "folio_admin_mode";
pub(crate) const DRAFTS_KEY: &str = "folio_content_drafts";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_string(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

pub(crate) fn save_string(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(key, value);
    }
}

pub(crate) fn remove(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

pub(crate) fn load_flag(key: &str) -> bool {
    load_string(key)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false)
}

pub(crate) fn save_flag(key: &str, value: bool) {
    save_string(key, if value { "1" } else { "0" });
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let json = load_string(key)?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        save_string(key, &json);
    }
}
