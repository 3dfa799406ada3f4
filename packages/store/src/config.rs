//! # App configuration: `budgeking.toml`
//!
//! Names the collections the screens read and write, and the handful of
//! behavioural switches that are not hard-coded.
//!
//! ## Structure
//!
//! ```toml
//! [collections]
//! users = "users"
//! user_lookup = "userLookup"
//! inactive_goals = "inactive goals"
//!
//! [goal_history]
//! refresh_on_focus = false   # true: resubscribe every time the screen regains focus
//!
//! [budget]
//! default_period = "This Month"
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`AppConfig`] | Top-level config. TOML (de)serialisation, the canonical filename, and a lenient loader. |
//! | [`CollectionsConfig`] | Collection names in the managed database. |
//! | [`GoalHistoryConfig`] | Focus behaviour of the goal history screen. |
//! | [`BudgetConfig`] | Defaults written into new user profiles. |
//!
//! Every section and field has a serde default, so a missing or partial file is
//! equivalent to the default configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `budgeking.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub collections: CollectionsConfig,
    #[serde(default)]
    pub goal_history: GoalHistoryConfig,
    #[serde(default)]
    pub budget: BudgetConfig,
}

/// Collection names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionsConfig {
    #[serde(default = "default_users")]
    pub users: String,
    #[serde(default = "default_user_lookup")]
    pub user_lookup: String,
    #[serde(default = "default_inactive_goals")]
    pub inactive_goals: String,
}

fn default_users() -> String {
    "users".to_string()
}

fn default_user_lookup() -> String {
    "userLookup".to_string()
}

fn default_inactive_goals() -> String {
    "inactive goals".to_string()
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            users: default_users(),
            user_lookup: default_user_lookup(),
            inactive_goals: default_inactive_goals(),
        }
    }
}

/// Goal history screen behaviour.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalHistoryConfig {
    /// Tear down and recreate subscriptions when the screen regains focus.
    /// Off by default.
    #[serde(default)]
    pub refresh_on_focus: bool,
}

/// Budget defaults for new profiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetConfig {
    #[serde(default = "default_period")]
    pub default_period: String,
}

fn default_period() -> String {
    "This Month".to_string()
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            default_period: default_period(),
        }
    }
}

impl AppConfig {
    /// Builder method to toggle refresh-on-focus.
    pub fn with_refresh_on_focus(mut self, enabled: bool) -> Self {
        self.goal_history.refresh_on_focus = enabled;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "budgeking.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load from a file, falling back to the default when it is absent or invalid.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %path.display(), "no config file ({e}), using defaults");
                return Self::default();
            }
        };
        match Self::from_toml(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), "invalid config, using defaults: {e}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.collections.inactive_goals, "inactive goals");
        assert!(!config.goal_history.refresh_on_focus);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = AppConfig::from_toml("[collections]\nusers = \"people\"\n").unwrap();
        assert_eq!(config.collections.users, "people");
        assert_eq!(config.collections.user_lookup, "userLookup");
        assert_eq!(config.budget.default_period, "This Month");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default().with_refresh_on_focus(true);
        let text = config.to_toml().unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_missing_or_invalid_file() {
        let dir = std::env::temp_dir().join(format!("budgeking_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(AppConfig::filename());

        assert_eq!(AppConfig::load_from(&path), AppConfig::default());

        std::fs::write(&path, "[goal_history]\nrefresh_on_focus = \"yes\"\n").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());

        std::fs::write(&path, "[goal_history]\nrefresh_on_focus = true\n").unwrap();
        assert!(AppConfig::load_from(&path).goal_history.refresh_on_focus);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
