mod api;
mod app;
mod cache;
mod components;
mod content;
mod drafts;
mod editor;
mod logging;
mod models;
mod pages;
mod state;
mod storage;
mod util;

use crate::api::EnvConfig;
use crate::app::App;
use leptos::prelude::*;

#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Browser-only: these touch localStorage.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::api::{ApiClient, AuthUser};
    use crate::drafts::ContentDrafts;
    use crate::storage::{load_json_from_storage, remove, save_json_to_storage, DRAFTS_KEY, USER_KEY};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_session_token_persists_until_sign_out() {
        ApiClient::clear_storage();
        let mut signed_out = ApiClient::load_from_storage();
        assert!(!signed_out.is_authenticated());

        signed_out.set_token("session-1".to_string());
        signed_out.save_to_storage();
        let restored = ApiClient::load_from_storage();
        assert!(restored.is_authenticated());
        assert_eq!(restored.token.as_deref(), Some("session-1"));

        ApiClient::clear_storage();
        assert!(ApiClient::load_from_storage().token.is_none());
    }

    #[wasm_bindgen_test]
    fn test_signed_in_user_is_cleared_with_session() {
        let user = AuthUser {
            id: "u-1".to_string(),
            email: Some("admin@example.com".to_string()),
        };
        save_json_to_storage(USER_KEY, &user);
        let loaded: AuthUser = load_json_from_storage(USER_KEY).expect("should load user from localStorage");
        assert_eq!(loaded.email.as_deref(), Some("admin@example.com"));
        ApiClient::clear_storage();
        assert!(load_json_from_storage::<AuthUser>(USER_KEY).is_none());
    }

    #[wasm_bindgen_test]
    fn test_drafts_survive_reload() {
        remove(DRAFTS_KEY);
        let mut drafts = ContentDrafts::load();
        drafts.touch("hero", "subtitle", "draft", 10);
        drafts.save();

        let reloaded = ContentDrafts::load();
        assert_eq!(reloaded.value_or("hero", "subtitle", "stored"), "draft");
        assert!(reloaded.has_unsaved());

        remove(DRAFTS_KEY);
        assert!(!ContentDrafts::load().has_unsaved());
    }
}

// Test builds get their entry point from wasm-bindgen-test.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init(&EnvConfig::new());
    mount_to_body(App);
}
