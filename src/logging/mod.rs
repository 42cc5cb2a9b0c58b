//! Routes `tracing` events to the browser console.

use crate::api::EnvConfig;
use std::fmt::Write as _;
use std::str::FromStr;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Debug builds log everything down to DEBUG, release builds only errors.
pub(crate) fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::ERROR
    }
}

/// `LOG_LEVEL` wins when it names a level; anything else falls back.
pub(crate) fn resolve_level(configured: Option<&str>) -> LevelFilter {
    configured
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or_else(default_level)
}

pub(crate) fn init(config: &EnvConfig) {
    let level = resolve_level(config.log_level.as_deref());
    let installed = tracing_subscriber::registry()
        .with(ConsoleLayer.with_filter(level))
        .try_init();
    if installed.is_ok() {
        tracing::debug!("logging at {level}");
    }
}

/// Collects an event's message and fields into one line.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

pub(crate) fn format_line(level: &Level, target: &str, message: &str, fields: &str) -> String {
    format!("{:>5} {target}: {message}{fields}", level.as_str())
}

struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let line = format_line(meta.level(), meta.target(), &visitor.message, &visitor.fields);
        let line = wasm_bindgen::JsValue::from_str(&line);
        match *meta.level() {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_override() {
        assert_eq!(resolve_level(Some("warn")), LevelFilter::WARN);
        assert_eq!(resolve_level(Some(" TRACE ")), LevelFilter::TRACE);
        assert_eq!(resolve_level(Some("off")), LevelFilter::OFF);
    }

    #[test]
    fn test_unknown_level_falls_back() {
        assert_eq!(resolve_level(Some("loud")), default_level());
        assert_eq!(resolve_level(None), default_level());
    }

    #[test]
    fn test_line_format() {
        assert_eq!(
            format_line(&Level::WARN, "folio_admin::api", "order_index missing", " table=projects"),
            " WARN folio_admin::api: order_index missing table=projects"
        );
    }
}
