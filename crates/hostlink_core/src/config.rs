//! # Bridge Configuration
//!
//! Loaded once at startup from TOML. Every section is optional; missing keys
//! fall back to the constants in `hostlink_shared`.
//!
//! ```toml
//! [prompt]
//! title = "Neural Network"
//! wait_timeout_ms = 30000
//!
//! [ads]
//! unit_id = "ca-app-pub-0000000000000000/0000000000"
//! load_on_start = true
//!
//! [gesture]
//! max_scale = 50.0
//! ```

use std::path::Path;
use std::time::Duration;

use hostlink_shared::constants::{
    DEFAULT_MAX_LOAD_RETRIES, DEFAULT_POLL_INTERVAL_MS, DEFAULT_UI_THREAD_NAME,
    DEFAULT_VIBRATION_MS, DISMISS_LABEL, EXIT_ACCEPT_LABEL, EXIT_DECLINE_LABEL, EXIT_MESSAGE,
    EXIT_TITLE, INITIAL_SCALE_FACTOR, PROMPT_TITLE, SCALE_FACTOR_MAX, SCALE_FACTOR_MIN,
};
use serde::Deserialize;

use crate::error::{BridgeError, BridgeResult};

/// Top-level bridge configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Blocking message dialogs.
    pub prompt: PromptConfig,
    /// Exit confirmation dialog.
    pub exit: ExitConfig,
    /// Pinch gesture bookkeeping.
    pub gesture: GestureConfig,
    /// Rewarded ad slot.
    pub ads: AdConfig,
    /// Vibration.
    pub haptics: HapticsConfig,
    /// UI executor.
    pub executor: ExecutorConfig,
}

/// Blocking message dialog settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptConfig {
    /// Dialog title, usually the application name.
    pub title: String,
    /// Label of the only button.
    pub dismiss_label: String,
    /// Fail-open deadline for the blocked caller. `None` waits for dismissal.
    pub wait_timeout_ms: Option<u64>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            title: PROMPT_TITLE.to_string(),
            dismiss_label: DISMISS_LABEL.to_string(),
            wait_timeout_ms: None,
        }
    }
}

impl PromptConfig {
    /// Returns the fail-open deadline as a duration.
    #[must_use]
    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout_ms.map(Duration::from_millis)
    }
}

/// Exit confirmation dialog text.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExitConfig {
    /// Dialog title.
    pub title: String,
    /// Dialog body.
    pub message: String,
    /// Label of the button that exits.
    pub accept_label: String,
    /// Label of the button that keeps running.
    pub decline_label: String,
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self {
            title: EXIT_TITLE.to_string(),
            message: EXIT_MESSAGE.to_string(),
            accept_label: EXIT_ACCEPT_LABEL.to_string(),
            decline_label: EXIT_DECLINE_LABEL.to_string(),
        }
    }
}

/// Pinch scale bounds.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GestureConfig {
    /// Lower clamp of the running factor.
    pub min_scale: f32,
    /// Upper clamp of the running factor.
    pub max_scale: f32,
    /// Factor at startup.
    pub initial_scale: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_scale: SCALE_FACTOR_MIN,
            max_scale: SCALE_FACTOR_MAX,
            initial_scale: INITIAL_SCALE_FACTOR,
        }
    }
}

/// Rewarded ad slot settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdConfig {
    /// Ad unit the backend loads from.
    pub unit_id: String,
    /// Tag requests for child-directed treatment.
    pub child_directed: bool,
    /// Issue the first load as soon as the bridge starts.
    pub load_on_start: bool,
    /// Consecutive load failures retried automatically. 0 disables retries.
    pub max_load_retries: u32,
}

impl Default for AdConfig {
    fn default() -> Self {
        Self {
            unit_id: String::new(),
            child_directed: true,
            load_on_start: false,
            max_load_retries: DEFAULT_MAX_LOAD_RETRIES,
        }
    }
}

/// Vibration settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HapticsConfig {
    /// Master switch; when off `vibrate` does nothing.
    pub enabled: bool,
    /// Length used when the engine passes 0.
    pub default_duration_ms: u32,
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_duration_ms: DEFAULT_VIBRATION_MS,
        }
    }
}

/// UI executor settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutorConfig {
    /// Shutdown-flag poll interval of a dedicated UI thread (ms).
    pub poll_interval_ms: u64,
    /// Name of a dedicated UI thread.
    pub thread_name: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            thread_name: DEFAULT_UI_THREAD_NAME.to_string(),
        }
    }
}

impl ExecutorConfig {
    /// Returns the poll interval as a duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl BridgeConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` for malformed TOML or unknown keys, and
    /// `InvalidConfig` when a value is out of range.
    pub fn from_toml_str(source: &str) -> BridgeResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| BridgeError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigIo` if the file cannot be read, otherwise the errors of
    /// [`BridgeConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| BridgeError::ConfigIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first offending value.
    pub fn validate(&self) -> BridgeResult<()> {
        let g = &self.gesture;
        if !(g.min_scale.is_finite() && g.max_scale.is_finite() && g.initial_scale.is_finite()) {
            return Err(BridgeError::InvalidConfig(
                "gesture scales must be finite".to_string(),
            ));
        }
        if g.min_scale <= 0.0 {
            return Err(BridgeError::InvalidConfig(format!(
                "gesture.min_scale must be positive, got {}",
                g.min_scale
            )));
        }
        if !(g.min_scale <= g.initial_scale && g.initial_scale <= g.max_scale) {
            return Err(BridgeError::InvalidConfig(format!(
                "gesture scales must satisfy min <= initial <= max, got {} / {} / {}",
                g.min_scale, g.initial_scale, g.max_scale
            )));
        }
        if self.executor.poll_interval_ms == 0 {
            return Err(BridgeError::InvalidConfig(
                "executor.poll_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.prompt.wait_timeout_ms == Some(0) {
            return Err(BridgeError::InvalidConfig(
                "prompt.wait_timeout_ms must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.gesture.min_scale, 0.01);
        assert_eq!(config.gesture.max_scale, 100.0);
        assert_eq!(config.exit.title, "Exit Application?");
        assert_eq!(config.ads.max_load_retries, 3);
        assert!(config.prompt.wait_timeout().is_none());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = BridgeConfig::from_toml_str(
            r#"
            [prompt]
            title = "Neural Network"
            wait_timeout_ms = 250

            [ads]
            unit_id = "unit-7"
            load_on_start = true
            "#,
        )
        .unwrap();

        assert_eq!(config.prompt.title, "Neural Network");
        assert_eq!(config.prompt.dismiss_label, "Close");
        assert_eq!(config.prompt.wait_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.ads.unit_id, "unit-7");
        assert!(config.ads.load_on_start);
        assert!(config.ads.child_directed);
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let err = BridgeConfig::from_toml_str("[ads]\nunit = \"x\"\n").unwrap_err();
        assert!(matches!(err, BridgeError::ConfigParse(_)));
    }

    #[test]
    fn test_inverted_scale_bounds_rejected() {
        let err = BridgeConfig::from_toml_str("[gesture]\nmin_scale = 5.0\nmax_scale = 2.0\n")
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_min_scale_rejected() {
        let mut config = BridgeConfig::default();
        config.gesture.min_scale = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = BridgeConfig::default();
        config.prompt.wait_timeout_ms = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("hostlink_missing_config_for_test.toml");
        let err = BridgeConfig::load(&path).unwrap_err();
        assert!(matches!(err, BridgeError::ConfigIo { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("hostlink_config_{id}.toml"));
        std::fs::write(&path, "[haptics]\nenabled = false\n").unwrap();

        let config = BridgeConfig::load(&path).unwrap();
        assert!(!config.haptics.enabled);
        assert_eq!(config.haptics.default_duration_ms, 200);

        std::fs::remove_file(&path).ok();
    }
}
