use serde::Deserialize;
use strum::Display;

/// Structured error body returned by the REST and storage endpoints.
#[derive(Deserialize, Clone, Debug, Default)]
struct BackendErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
    // Storage API uses `error` / `statusCode` instead.
    #[serde(default)]
    error: Option<String>,
}

/// Postgres `undefined_column`.
const PG_UNDEFINED_COLUMN: &str = "42703";
/// Postgres `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgREST "no rows" on a single-object request.
const PGRST_NO_ROWS: &str = "PGRST116";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub(crate) enum UploadErrorKind {
    Timeout,
    TooLarge,
    Auth,
    Generic,
}

impl UploadErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::Timeout => "The upload timed out. Check your connection and try again.",
            Self::TooLarge => "The file is larger than the server accepts.",
            Self::Auth => "You are not allowed to upload files. Please sign in again.",
            Self::Generic => "The upload failed. Please try again.",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Network,
    Unauthorized,
    NotFound,
    Conflict,
    /// The backend schema lacks a column the request referenced.
    UndefinedColumn,
    Validation,
    Http(u16),
    Parse,
    Upload(UploadErrorKind),
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub(crate) fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn network(e: reqwest::Error) -> Self {
        Self::new(ApiErrorKind::Network, e.to_string())
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self::new(ApiErrorKind::Parse, e.to_string())
    }

    pub(crate) fn not_found(ctx: &str) -> Self {
        Self::new(ApiErrorKind::NotFound, format!("{ctx}: not found"))
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    /// Classify a non-success response by status and structured error code.
    pub(crate) fn from_response(status: u16, body: &str, ctx: &str) -> Self {
        let parsed: BackendErrorBody = serde_json::from_str(body).unwrap_or_default();
        let code = parsed.code.as_deref().unwrap_or_default();

        let kind = match (status, code) {
            (_, PG_UNDEFINED_COLUMN) => ApiErrorKind::UndefinedColumn,
            (_, PG_UNIQUE_VIOLATION) | (409, _) => ApiErrorKind::Conflict,
            (_, PGRST_NO_ROWS) | (404, _) => ApiErrorKind::NotFound,
            (401 | 403, _) => ApiErrorKind::Unauthorized,
            _ => ApiErrorKind::Http(status),
        };

        let mut detail = parsed
            .message
            .or(parsed.error)
            .unwrap_or_else(|| body.trim().to_string());
        if let Some(d) = parsed.details.filter(|d| !d.trim().is_empty()) {
            detail = format!("{detail} ({d})");
        }
        if let Some(h) = parsed.hint.filter(|h| !h.trim().is_empty()) {
            detail = format!("{detail} [hint: {h}]");
        }

        Self::new(kind, format!("{ctx} ({status}): {detail}"))
    }

    pub(crate) fn status(&self) -> Option<u16> {
        match self.kind {
            ApiErrorKind::Http(s) => Some(s),
            ApiErrorKind::Unauthorized => Some(401),
            ApiErrorKind::NotFound => Some(404),
            ApiErrorKind::Conflict => Some(409),
            _ => None,
        }
    }

    /// Worth retrying: the same request may succeed a moment later.
    pub(crate) fn is_transient(&self) -> bool {
        match self.kind {
            ApiErrorKind::Network => true,
            ApiErrorKind::Http(s) => s == 408 || s == 429 || (500..=599).contains(&s),
            _ => false,
        }
    }

    pub(crate) fn upload_kind(&self) -> UploadErrorKind {
        match (&self.kind, self.status()) {
            (ApiErrorKind::Upload(k), _) => *k,
            (_, Some(408 | 504)) => UploadErrorKind::Timeout,
            (_, Some(413)) => UploadErrorKind::TooLarge,
            (ApiErrorKind::Unauthorized, _) | (_, Some(401 | 403)) => UploadErrorKind::Auth,
            _ => UploadErrorKind::Generic,
        }
    }

    /// Re-tag a terminal upload failure with its user-facing class.
    pub(crate) fn into_upload_error(self) -> Self {
        if matches!(self.kind, ApiErrorKind::Validation | ApiErrorKind::Upload(_)) {
            return self;
        }
        let kind = self.upload_kind();
        Self::new(ApiErrorKind::Upload(kind), self.message)
    }

    pub(crate) fn category(&self) -> ErrorCategory {
        match &self.kind {
            ApiErrorKind::Network => ErrorCategory::Network,
            ApiErrorKind::Validation | ApiErrorKind::Conflict => ErrorCategory::Validation,
            ApiErrorKind::Unauthorized => ErrorCategory::Permission,
            ApiErrorKind::NotFound => ErrorCategory::NotFound,
            ApiErrorKind::UndefinedColumn => ErrorCategory::Server,
            ApiErrorKind::Http(400 | 422) => ErrorCategory::Validation,
            ApiErrorKind::Http(s) if (500..=599).contains(s) => ErrorCategory::Server,
            ApiErrorKind::Http(_) | ApiErrorKind::Parse => ErrorCategory::Unknown,
            ApiErrorKind::Upload(UploadErrorKind::Timeout) => ErrorCategory::Network,
            ApiErrorKind::Upload(UploadErrorKind::TooLarge) => ErrorCategory::Validation,
            ApiErrorKind::Upload(UploadErrorKind::Auth) => ErrorCategory::Permission,
            ApiErrorKind::Upload(UploadErrorKind::Generic) => ErrorCategory::Unknown,
        }
    }

    /// Fixed message for the error class; debug builds append the raw message.
    pub(crate) fn user_message(&self) -> String {
        let base = match &self.kind {
            ApiErrorKind::Upload(k) => k.message(),
            ApiErrorKind::Validation => return self.message.clone(),
            _ => self.category().message(),
        };

        if cfg!(debug_assertions) && !self.message.is_empty() {
            format!("{base} (details: {})", self.message)
        } else {
            base.to_string()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub(crate) enum ErrorCategory {
    Network,
    Validation,
    Permission,
    NotFound,
    Server,
    Unknown,
}

impl ErrorCategory {
    pub fn message(self) -> &'static str {
        match self {
            Self::Network => "Please check your network connection.",
            Self::Validation => "Please check what you entered and try again.",
            Self::Permission => "You do not have permission to do that.",
            Self::NotFound => "The requested item could not be found.",
            Self::Server => "The server ran into a problem. Please try again shortly.",
            Self::Unknown => "Something went wrong.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_column_code_wins_over_status() {
        let body = r#"{"code":"42703","message":"column projects.order_index does not exist","details":null,"hint":null}"#;
        let e = ApiError::from_response(400, body, "List projects");
        assert_eq!(e.kind, ApiErrorKind::UndefinedColumn);
        assert!(e.message.contains("order_index"));
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let body = r#"{"code":"23505","message":"duplicate key value violates unique constraint","details":"Key (section, field)=(hero, title) already exists.","hint":null}"#;
        let e = ApiError::from_response(409, body, "Create content");
        assert_eq!(e.kind, ApiErrorKind::Conflict);
        assert!(e.message.contains("(hero, title)"));
        assert_eq!(e.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(ApiError::from_response(401, "", "x").kind, ApiErrorKind::Unauthorized);
        assert_eq!(ApiError::from_response(404, "", "x").kind, ApiErrorKind::NotFound);
        assert_eq!(ApiError::from_response(503, "oops", "x").kind, ApiErrorKind::Http(503));
        assert_eq!(
            ApiError::from_response(503, "oops", "x").category(),
            ErrorCategory::Server
        );
    }

    #[test]
    fn test_storage_error_body_message() {
        let body = r#"{"statusCode":"413","error":"Payload too large","message":"The object exceeded the maximum allowed size"}"#;
        let e = ApiError::from_response(413, body, "Upload");
        assert_eq!(e.kind, ApiErrorKind::Http(413));
        assert_eq!(e.upload_kind(), UploadErrorKind::TooLarge);
        assert!(!e.is_transient());
    }

    #[test]
    fn test_transient_classes() {
        assert!(ApiError::new(ApiErrorKind::Network, "offline").is_transient());
        assert!(ApiError::new(ApiErrorKind::Http(504), "gateway").is_transient());
        assert!(ApiError::new(ApiErrorKind::Http(429), "slow down").is_transient());
        assert!(!ApiError::new(ApiErrorKind::Unauthorized, "no").is_transient());
    }

    #[test]
    fn test_upload_classification() {
        let timeout = ApiError::new(ApiErrorKind::Http(504), "gateway").into_upload_error();
        assert_eq!(timeout.kind, ApiErrorKind::Upload(UploadErrorKind::Timeout));

        let auth = ApiError::new(ApiErrorKind::Unauthorized, "jwt expired").into_upload_error();
        assert_eq!(auth.kind, ApiErrorKind::Upload(UploadErrorKind::Auth));

        let other = ApiError::new(ApiErrorKind::Network, "reset").into_upload_error();
        assert_eq!(other.kind, ApiErrorKind::Upload(UploadErrorKind::Generic));

        let rejected = ApiError::validation("Files must be 10 MB or smaller.").into_upload_error();
        assert_eq!(rejected.kind, ApiErrorKind::Validation);
    }

    #[test]
    fn test_user_message_uses_fixed_text() {
        let e = ApiError::new(ApiErrorKind::NotFound, "Project p9: not found");
        assert!(e.user_message().starts_with(ErrorCategory::NotFound.message()));

        let v = ApiError::validation("Only image or video files can be uploaded.");
        assert_eq!(v.user_message(), "Only image or video files can be uploaded.");
    }
}
