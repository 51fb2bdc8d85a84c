use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{NotifierError, Result};
use crate::notifications::{IconId, FALLBACK_ICON_ID};

/// Startup-time settings shared by every notification the adapter posts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Small icon resource; `0` means "not set".
    pub icon_id: IconId,
    /// Symbolic action fired on tap instead of relaunching the app.
    pub intent_action: Option<String>,
}

impl NotifierConfig {
    pub fn from_env() -> Result<Self> {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Apply `NOTIFIER_ICON_ID` / `NOTIFIER_INTENT_ACTION` as found by `lookup`
    /// on top of `self`.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup("NOTIFIER_ICON_ID") {
            self.icon_id = raw.trim().parse().map_err(|_| NotifierError::Config {
                key: "NOTIFIER_ICON_ID".into(),
                message: format!("`{raw}` is not an integer resource id"),
            })?;
        }
        if let Some(action) = lookup("NOTIFIER_INTENT_ACTION") {
            self.intent_action = Some(action);
        }
        Ok(self)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw).map_err(|err| NotifierError::Config {
            key: path.display().to_string(),
            message: err.to_string(),
        })?;
        info!(path = %path.display(), "loaded notifier config");
        Ok(config)
    }

    pub fn with_icon(mut self, icon_id: IconId) -> Self {
        self.icon_id = icon_id;
        self
    }

    pub fn with_intent_action(mut self, action: impl Into<String>) -> Self {
        self.intent_action = Some(action.into());
        self
    }

    pub fn resolved_icon(&self) -> IconId {
        if self.icon_id != 0 {
            self.icon_id
        } else {
            FALLBACK_ICON_ID
        }
    }

    /// Configured tap action; an empty string counts as unset.
    pub fn tap_action(&self) -> Option<&str> {
        self.intent_action
            .as_deref()
            .filter(|action| !action.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn unset_icon_falls_back() {
        assert_eq!(NotifierConfig::default().resolved_icon(), FALLBACK_ICON_ID);
        assert_eq!(NotifierConfig::default().with_icon(17).resolved_icon(), 17);
    }

    #[test]
    fn empty_action_counts_as_unset() {
        let config = NotifierConfig::default().with_intent_action("");
        assert_eq!(config.tap_action(), None);
        let config = config.with_intent_action("com.example.OPEN_REMINDER");
        assert_eq!(config.tap_action(), Some("com.example.OPEN_REMINDER"));
    }

    #[test]
    fn loads_partial_json_config() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("notifier.json");
        fs::write(&path, r#"{ "icon_id": 99 }"#).expect("write config");

        let config = NotifierConfig::load(&path).expect("load config");
        assert_eq!(config.icon_id, 99);
        assert_eq!(config.intent_action, None);
    }

    #[test]
    fn rejects_malformed_config_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("notifier.json");
        fs::write(&path, "icon_id = 3").expect("write config");

        let err = NotifierConfig::load(&path).unwrap_err();
        assert!(matches!(err, NotifierError::Config { .. }));
    }

    #[test]
    fn overlay_replaces_loaded_values() {
        let base = NotifierConfig::default().with_icon(5);
        let config = base
            .overlay(|key| match key {
                "NOTIFIER_INTENT_ACTION" => Some("com.example.OPEN".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.icon_id, 5);
        assert_eq!(config.tap_action(), Some("com.example.OPEN"));
    }

    #[test]
    fn overlay_rejects_non_numeric_icon() {
        let err = NotifierConfig::default()
            .overlay(|key| (key == "NOTIFIER_ICON_ID").then(|| "not-a-number".to_string()))
            .unwrap_err();
        assert!(
            matches!(err, NotifierError::Config { ref key, .. } if key == "NOTIFIER_ICON_ID")
        );
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let dir = tempdir().expect("tempdir");
        let err = NotifierConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, NotifierError::Io(_)));
    }
}
