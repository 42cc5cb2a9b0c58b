mod capabilities;
mod content;
mod error;
mod media;
#[cfg(test)]
pub(crate) mod memory;
mod projects;
mod retry;
mod settings;

pub(crate) use capabilities::SchemaCapabilities;
pub(crate) use content::ContentStore;
pub(crate) use error::{ApiError, ApiErrorKind, ApiResult};
pub(crate) use media::{validate_upload, MediaStore, UploadFile, UploadPolicy};
pub(crate) use projects::ProjectStore;
pub(crate) use retry::{retry_with_backoff, sleep, RetryPolicy};
pub(crate) use settings::SettingsStore;

use crate::storage::{self, TOKEN_KEY, USER_KEY};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const DEFAULT_SUPABASE_URL: &str = "http://localhost:54321";
const DEFAULT_BUCKET: &str = "portfolio-images";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct EnvConfig {
    pub supabase_url: String,
    pub anon_key: String,
    pub storage_bucket: String,
    /// Deployed schema revision; `None` means probe the backend.
    pub schema_version: Option<u32>,
    pub log_level: Option<String>,
}

impl EnvConfig {
    pub fn new() -> Self {
        Self::from_lookup(read_window_env)
    }

    /// Keys are accepted in both `SUPABASE_URL` and `supabase_url` spellings.
    pub(crate) fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |upper: &str| {
            get(upper)
                .or_else(|| get(&upper.to_ascii_lowercase()))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            supabase_url: lookup("SUPABASE_URL")
                .unwrap_or_else(|| DEFAULT_SUPABASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            anon_key: lookup("SUPABASE_ANON_KEY").unwrap_or_default(),
            storage_bucket: lookup("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            schema_version: lookup("SCHEMA_VERSION").and_then(|v| v.parse().ok()),
            log_level: lookup("LOG_LEVEL"),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads one key from `window.ENV`, injected by `index.html` at deploy time.
fn read_window_env(key: &str) -> Option<String> {
    let env = web_sys::window()?.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }
    let v = js_sys::Reflect::get(&env, &key.into()).ok()?;
    v.as_string().or_else(|| v.as_f64().map(|n| n.to_string()))
}

/// PostgREST equality filter value.
pub(crate) fn eq(value: &str) -> String {
    format!("eq.{}", urlencoding::encode(value))
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

#[derive(Serialize, Clone, Debug)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) config: EnvConfig,
    pub(crate) token: Option<String>,
    pub(crate) capabilities: SchemaCapabilities,
}

impl ApiClient {
    pub fn new(config: EnvConfig) -> Self {
        let capabilities = SchemaCapabilities::from_config(&config);
        Self {
            config,
            token: None,
            capabilities,
        }
    }

    pub fn load_from_storage() -> Self {
        let mut client = Self::new(EnvConfig::new());
        client.token = storage::load_string(TOKEN_KEY);
        client
    }

    pub fn save_to_storage(&self) {
        if let Some(token) = &self.token {
            storage::save_string(TOKEN_KEY, token);
        }
    }

    pub fn clear_storage() {
        storage::remove(TOKEN_KEY);
        storage::remove(USER_KEY);
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn logout(&mut self) {
        self.token = None;
        Self::clear_storage();
    }

    /// Password sign-in against the backend auth service.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.config.supabase_url);
        let req = reqwest::Client::new()
            .post(url)
            .header("apikey", &self.config.anon_key)
            .json(&PasswordGrant { email, password });
        let res = Self::send(req, "Sign in").await?;
        Self::read_json(res).await
    }

    /// Confirms the stored token is still accepted.
    pub async fn current_user(&self) -> ApiResult<AuthUser> {
        let url = format!("{}/auth/v1/user", self.config.supabase_url);
        let req = self.with_auth_headers(reqwest::Client::new().get(url));
        let res = Self::send(req, "Check session").await?;
        Self::read_json(res).await
    }

    fn with_auth_headers(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = self.token.as_deref().unwrap_or(&self.config.anon_key);
        req.header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {bearer}"))
    }

    pub(crate) fn rest_url(&self, table: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}/rest/v1/{}", self.config.supabase_url, table);
        if !query.is_empty() {
            let qs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            url.push('?');
            url.push_str(&qs.join("&"));
        }
        url
    }

    pub(crate) fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.with_auth_headers(reqwest::Client::new().request(method, url))
    }

    pub(crate) async fn send(req: RequestBuilder, ctx: &str) -> ApiResult<Response> {
        let res = req.send().await.map_err(ApiError::network)?;
        if res.status().is_success() {
            Ok(res)
        } else {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, &body, ctx))
        }
    }

    pub(crate) async fn read_json<T: DeserializeOwned>(res: Response) -> ApiResult<T> {
        let text = res.text().await.map_err(ApiError::network)?;
        serde_json::from_str(&text).map_err(ApiError::parse)
    }

    pub(crate) async fn rest_select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        ctx: &str,
    ) -> ApiResult<Vec<T>> {
        let req = self.request(Method::GET, self.rest_url(table, query));
        let res = Self::send(req, ctx).await?;
        Self::read_json(res).await
    }

    /// POST returning the stored rows. `prefer` is appended to `return=representation`.
    pub(crate) async fn rest_insert<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: &B,
        prefer: Option<&str>,
        ctx: &str,
    ) -> ApiResult<Vec<T>> {
        let prefer = match prefer {
            Some(p) => format!("return=representation,{p}"),
            None => "return=representation".to_string(),
        };
        let req = self
            .request(Method::POST, self.rest_url(table, query))
            .header("Prefer", prefer)
            .json(body);
        let res = Self::send(req, ctx).await?;
        Self::read_json(res).await
    }

    /// PATCH returning the affected rows; an empty vec means nothing matched.
    pub(crate) async fn rest_update<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: &B,
        ctx: &str,
    ) -> ApiResult<Vec<T>> {
        let req = self
            .request(Method::PATCH, self.rest_url(table, query))
            .header("Prefer", "return=representation")
            .json(body);
        let res = Self::send(req, ctx).await?;
        Self::read_json(res).await
    }

    pub(crate) async fn rest_delete(&self, table: &str, query: &[(&str, String)], ctx: &str) -> ApiResult<()> {
        let req = self.request(Method::DELETE, self.rest_url(table, query));
        Self::send(req, ctx).await?;
        Ok(())
    }

    pub(crate) fn storage_url(&self, path: &str) -> String {
        format!("{}/storage/v1/{}", self.config.supabase_url, path)
    }

    /// Storage URL for `bucket/object_path`, each path segment percent-encoded.
    pub(crate) fn object_url(&self, scope: &str, object_path: &str) -> String {
        self.storage_url(&format!(
            "{scope}/{}/{}",
            self.config.storage_bucket,
            encode_path(object_path)
        ))
    }

    pub(crate) fn public_url(&self, object_path: &str) -> String {
        self.object_url("object/public", object_path)
    }
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> EnvConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfig::from_lookup(|k| map.get(k).cloned())
    }

    fn client() -> ApiClient {
        ApiClient::new(config_from(&[
            ("SUPABASE_URL", "https://demo.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
    }

    #[test]
    fn test_env_config_defaults() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.supabase_url, DEFAULT_SUPABASE_URL);
        assert_eq!(cfg.storage_bucket, "portfolio-images");
        assert_eq!(cfg.schema_version, None);
        assert!(cfg.anon_key.is_empty());
    }

    #[test]
    fn test_env_config_accepts_lowercase_keys_and_trims_slash() {
        let cfg = config_from(&[
            ("supabase_url", "https://demo.supabase.co/"),
            ("STORAGE_BUCKET", "media"),
            ("schema_version", "2"),
            ("LOG_LEVEL", "warn"),
        ]);
        assert_eq!(cfg.supabase_url, "https://demo.supabase.co");
        assert_eq!(cfg.storage_bucket, "media");
        assert_eq!(cfg.schema_version, Some(2));
        assert_eq!(cfg.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn test_rest_url_with_filters() {
        let url = client().rest_url(
            "portfolio_content",
            &[("section", eq("hero")), ("select", "*".to_string())],
        );
        assert_eq!(
            url,
            "https://demo.supabase.co/rest/v1/portfolio_content?section=eq.hero&select=*"
        );
    }

    #[test]
    fn test_eq_encodes_value() {
        assert_eq!(eq("work process"), "eq.work%20process");
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            client().public_url("projects/1700000000000-shot.png"),
            "https://demo.supabase.co/storage/v1/object/public/portfolio-images/projects/1700000000000-shot.png"
        );
    }

    #[test]
    fn test_public_url_encodes_each_segment() {
        assert_eq!(
            client().public_url("projects/5-my shot#1.png"),
            "https://demo.supabase.co/storage/v1/object/public/portfolio-images/projects/5-my%20shot%231.png"
        );
        assert_eq!(
            client().object_url("object", "uploads/a?b.png"),
            "https://demo.supabase.co/storage/v1/object/portfolio-images/uploads/a%3Fb.png"
        );
    }

    #[test]
    fn test_auth_response_contract() {
        let json = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r",
            "user": {"id": "u1", "email": "me@example.com"}
        }"#;
        let res: AuthResponse = serde_json::from_str(json).expect("auth response should parse");
        assert_eq!(res.access_token, "jwt");
        assert_eq!(res.user.email.as_deref(), Some("me@example.com"));
    }
}
