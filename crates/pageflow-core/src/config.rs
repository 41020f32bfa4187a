use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::detection::DeviceClass;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub wheel: WheelConfig,
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub device: DeviceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Site origin; links and navigation URLs are resolved against it
    #[serde(default = "default_origin")]
    pub origin: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            origin: default_origin(),
        }
    }
}

/// Smooth-scroll integration constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Blend weight applied each frame when easing `current` toward `target`
    #[serde(default = "default_ease")]
    pub ease: f64,
    /// Multiplier applied to touch drag distance
    #[serde(default = "default_touch_multiplier")]
    pub touch_multiplier: f64,
    /// Offsets below this value snap to exactly zero
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            ease: default_ease(),
            touch_multiplier: default_touch_multiplier(),
            snap_threshold: default_snap_threshold(),
        }
    }
}

/// Wheel delta normalization constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelConfig {
    /// Pixels per line when the host reports line-mode deltas
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    /// Pixels per page when the host reports page-mode deltas
    #[serde(default = "default_page_height")]
    pub page_height: f64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            line_height: default_line_height(),
            page_height: default_page_height(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Render loop frequency, 1 to 1000; 0 falls back to ~60fps
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { fps: default_fps() }
    }
}

/// Extension trait for FrameConfig with timing helpers
pub trait FrameConfigExt {
    /// Duration of one render tick
    fn tick_duration(&self) -> Duration;
}

impl FrameConfigExt for FrameConfig {
    #[inline]
    fn tick_duration(&self) -> Duration {
        if self.fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_micros((1_000_000 / self.fps as u64).max(1))
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Force a device class instead of detecting it
    #[serde(default)]
    pub class: Option<DeviceClass>,
    /// User agent used for detection when no class is forced
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl DeviceConfig {
    /// Resolve the effective device class
    pub fn resolve(&self) -> DeviceClass {
        match (self.class, self.user_agent.as_deref()) {
            (Some(class), _) => class,
            (None, Some(ua)) => DeviceClass::from_user_agent(ua),
            (None, None) => DeviceClass::Desktop,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_ease() -> f64 {
    0.07
}

fn default_touch_multiplier() -> f64 {
    3.0
}

fn default_snap_threshold() -> f64 {
    0.1
}

fn default_line_height() -> f64 {
    40.0
}

fn default_page_height() -> f64 {
    800.0
}

fn default_fps() -> u32 {
    60
}

const MAX_FPS: u32 = 1000;

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit file, creating its directory
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/pageflow/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pageflow")
            .join("config.toml")
    }

    /// Reject values the scroll engine cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        let scroll = &self.scroll;
        if !(scroll.ease > 0.0 && scroll.ease <= 1.0) {
            return Err(crate::Error::Config(format!(
                "scroll.ease must be in (0, 1], got {}",
                scroll.ease
            )));
        }
        if !scroll.touch_multiplier.is_finite() {
            return Err(crate::Error::Config(
                "scroll.touch_multiplier must be finite".to_string(),
            ));
        }
        if !(scroll.snap_threshold >= 0.0 && scroll.snap_threshold < 1.0) {
            return Err(crate::Error::Config(format!(
                "scroll.snap_threshold must be in [0, 1), got {}",
                scroll.snap_threshold
            )));
        }
        if self.wheel.line_height <= 0.0 || self.wheel.page_height <= 0.0 {
            return Err(crate::Error::Config(
                "wheel line_height and page_height must be positive".to_string(),
            ));
        }
        if self.frame.fps > MAX_FPS {
            return Err(crate::Error::Config(format!(
                "frame.fps must be at most {}, got {}",
                MAX_FPS, self.frame.fps
            )));
        }
        url::Url::parse(&self.general.origin)?;
        Ok(())
    }

    /// Parsed site origin
    pub fn origin(&self) -> crate::Result<url::Url> {
        Ok(url::Url::parse(&self.general.origin)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scroll.ease, 0.07);
        assert_eq!(config.scroll.touch_multiplier, 3.0);
        assert_eq!(config.scroll.snap_threshold, 0.1);
        assert_eq!(config.wheel.line_height, 40.0);
        assert_eq!(config.frame.fps, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [scroll]
            ease = 0.1

            [device]
            class = "phone"
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.ease, 0.1);
        assert_eq!(config.scroll.touch_multiplier, 3.0);
        assert_eq!(config.device.resolve(), DeviceClass::Phone);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_validate_rejects_bad_ease() {
        let mut config = AppConfig::default();
        config.scroll.ease = 0.0;
        assert!(config.validate().is_err());

        config.scroll.ease = 1.5;
        assert!(config.validate().is_err());

        config.scroll.ease = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_excessive_fps() {
        let mut config = AppConfig::default();
        config.frame.fps = 2_000_000;
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));

        config.frame.fps = 1001;
        assert!(config.validate().is_err());

        config.frame.fps = 1000;
        assert!(config.validate().is_ok());
        assert_eq!(config.frame.tick_duration(), Duration::from_millis(1));

        config.frame.fps = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tick_duration() {
        let frame = FrameConfig { fps: 50 };
        assert_eq!(frame.tick_duration(), Duration::from_millis(20));

        let frame = FrameConfig { fps: 0 };
        assert_eq!(frame.tick_duration(), Duration::from_millis(16));

        // Never a zero period, even for values validation would reject
        let frame = FrameConfig { fps: u32::MAX };
        assert!(!frame.tick_duration().is_zero());
    }

    #[test]
    fn test_device_resolve_from_user_agent() {
        let device = DeviceConfig {
            class: None,
            user_agent: Some(
                "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148".to_string(),
            ),
        };
        assert_eq!(device.resolve(), DeviceClass::Phone);
        assert_eq!(DeviceConfig::default().resolve(), DeviceClass::Desktop);
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.scroll, config.scroll);
        assert_eq!(parsed.general.origin, config.general.origin);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("pageflow-{}.toml", uuid::Uuid::new_v4()));

        std::fs::write(&path, "[frame]\nfps = 120\n").unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.frame.fps, 120);

        std::fs::write(&path, "[scroll]\nease = \"fast\"\n").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, crate::Error::Toml(_)));

        std::fs::write(&path, "[scroll]\nease = 2.0\n").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_to_and_reload() {
        let dir = std::env::temp_dir().join(format!("pageflow-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.frame.fps = 30;
        config.scroll.ease = 0.12;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.frame.fps, 30);
        assert_eq!(loaded.scroll, config.scroll);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
