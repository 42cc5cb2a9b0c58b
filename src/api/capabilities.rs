use super::{ApiClient, ApiErrorKind, EnvConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// First schema revision that carries `projects.order_index`.
pub(crate) const ORDER_INDEX_SCHEMA_VERSION: u32 = 2;

/// What the deployed backend schema supports.
///
/// Shared by every clone of the client, so a downgrade observed by one request
/// applies to all later ones.
#[derive(Clone, Debug)]
pub(crate) struct SchemaCapabilities {
    order_index: Arc<AtomicBool>,
    resolved: Arc<AtomicBool>,
}

impl SchemaCapabilities {
    pub fn new(order_index: bool) -> Self {
        Self {
            order_index: Arc::new(AtomicBool::new(order_index)),
            resolved: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Without a configured schema version the current schema is assumed until probed.
    pub fn from_config(config: &EnvConfig) -> Self {
        match config.schema_version {
            Some(v) => Self::new(v >= ORDER_INDEX_SCHEMA_VERSION),
            None => {
                let caps = Self::new(true);
                caps.resolved.store(false, Ordering::Relaxed);
                caps
            }
        }
    }

    pub fn has_order_index(&self) -> bool {
        self.order_index.load(Ordering::Relaxed)
    }

    pub fn needs_probe(&self) -> bool {
        !self.resolved.load(Ordering::Relaxed)
    }

    /// Returns true when this call flipped the flag.
    pub fn downgrade_order_index(&self) -> bool {
        self.resolved.store(true, Ordering::Relaxed);
        let was = self.order_index.swap(false, Ordering::Relaxed);
        if was {
            tracing::warn!(
                "projects.order_index is missing from the backend schema; ordering falls back to created_at"
            );
        }
        was
    }

    /// One cheap request to learn whether `order_index` exists.
    pub async fn probe(&self, client: &ApiClient) {
        if !self.needs_probe() {
            return;
        }

        let query = [("select", "order_index".to_string()), ("limit", "1".to_string())];
        match client
            .rest_select::<serde_json::Value>("projects", &query, "Probe schema")
            .await
        {
            Ok(_) => {
                self.order_index.store(true, Ordering::Relaxed);
                self.resolved.store(true, Ordering::Relaxed);
                tracing::debug!("schema probe: order_index present");
            }
            Err(e) if e.kind == ApiErrorKind::UndefinedColumn => {
                self.downgrade_order_index();
            }
            Err(e) => {
                // Leave unresolved so the next start probes again.
                tracing::warn!("schema probe failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(schema_version: Option<u32>) -> EnvConfig {
        let mut cfg = EnvConfig::from_lookup(|_| None);
        cfg.schema_version = schema_version;
        cfg
    }

    #[test]
    fn test_resolved_from_schema_version() {
        let old = SchemaCapabilities::from_config(&config(Some(1)));
        assert!(!old.has_order_index());
        assert!(!old.needs_probe());

        let current = SchemaCapabilities::from_config(&config(Some(2)));
        assert!(current.has_order_index());
    }

    #[test]
    fn test_unconfigured_assumes_current_until_probed() {
        let caps = SchemaCapabilities::from_config(&config(None));
        assert!(caps.has_order_index());
        assert!(caps.needs_probe());
    }

    #[test]
    fn test_downgrade_is_shared_between_clones() {
        let caps = SchemaCapabilities::new(true);
        let other = caps.clone();
        assert!(other.downgrade_order_index());
        assert!(!caps.has_order_index());
        assert!(!caps.downgrade_order_index());
    }
}
