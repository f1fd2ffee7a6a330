//! # Frontend Configuration
//!
//! Read-only settings consumed by the window manager at construction and by
//! the presentation loop at entry.
//!
//! ## Sections
//!
//! - **renderer**: backend selection, debug context, vsync, frame wait timeout
//! - **window**: undocked default size, minimum client area, fullscreen
//! - **logging**: default log filter (overridden by `RUST_LOG`)
//! - **headless**: extension list and auto-close for the null window system
//!
//! Every field has a default, so a config file only needs the values it changes.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Config;
use crate::capabilities::Capability;
use crate::error::{FrontendError, FrontendResult};
use crate::present::{VsyncMode, DEFAULT_PRESENT_TIMEOUT_MS};

/// Undocked screen width, used as the default window width
pub const UNDOCKED_WIDTH: u32 = 1280;
/// Undocked screen height, used as the default window height
pub const UNDOCKED_HEIGHT: u32 = 720;
/// Smallest client area the window may be resized to (width)
pub const MINIMUM_WIDTH: u32 = 640;
/// Smallest client area the window may be resized to (height)
pub const MINIMUM_HEIGHT: u32 = 360;

/// Window system backend selected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// GLFW windows with OpenGL contexts
    #[default]
    Glfw,
    /// In-process null window system, no display required
    Headless,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Glfw => f.write_str("glfw"),
            Self::Headless => f.write_str("headless"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "glfw" => Ok(Self::Glfw),
            "headless" | "null" => Ok(Self::Headless),
            other => Err(format!("unknown backend '{}' (expected glfw or headless)", other)),
        }
    }
}

/// Renderer-facing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Window system backend
    pub backend: BackendKind,
    /// Request a debug GL context
    pub debug_context: bool,
    /// Pace buffer swaps to the display refresh
    pub use_vsync: bool,
    /// Upper bound on each wait for a ready frame, in milliseconds
    pub present_timeout_ms: u64,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            debug_context: false,
            use_vsync: true,
            present_timeout_ms: DEFAULT_PRESENT_TIMEOUT_MS,
        }
    }
}

impl RendererSettings {
    /// Vsync policy derived from `use_vsync`
    pub fn vsync(&self) -> VsyncMode {
        VsyncMode::from_enabled(self.use_vsync)
    }

    /// Frame wait timeout as a duration
    pub fn present_timeout(&self) -> Duration {
        Duration::from_millis(self.present_timeout_ms)
    }
}

/// Window geometry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Initial client width
    pub width: u32,
    /// Initial client height
    pub height: u32,
    /// Minimum client width
    pub min_width: u32,
    /// Minimum client height
    pub min_height: u32,
    /// Start in fullscreen on the primary monitor
    pub fullscreen: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: UNDOCKED_WIDTH,
            height: UNDOCKED_HEIGHT,
            min_width: MINIMUM_WIDTH,
            min_height: MINIMUM_HEIGHT,
            fullscreen: false,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `env_logger` filter, e.g. `info` or `emu_frontend=debug`
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Settings for the headless backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessSettings {
    /// Extension strings the simulated driver advertises
    pub extensions: Vec<String>,
    /// Close the window after this many buffer swaps
    pub close_after_swaps: Option<u64>,
}

impl Default for HeadlessSettings {
    fn default() -> Self {
        Self {
            extensions: Capability::all()
                .map(|capability| capability.extension_string().to_string())
                .collect(),
            close_after_swaps: None,
        }
    }
}

/// Complete frontend configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Renderer settings
    pub renderer: RendererSettings,
    /// Window settings
    pub window: WindowSettings,
    /// Logging settings
    pub logging: LoggingSettings,
    /// Headless backend settings
    pub headless: HeadlessSettings,
}

impl Config for FrontendConfig {}

impl FrontendConfig {
    /// Validate values the window manager cannot work with
    pub fn validate(&self) -> FrontendResult<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(FrontendError::InvalidConfig(format!(
                "window size must be positive, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        if self.window.min_width == 0 || self.window.min_height == 0 {
            return Err(FrontendError::InvalidConfig(format!(
                "minimum client area must be positive, got {}x{}",
                self.window.min_width, self.window.min_height
            )));
        }

        if self.renderer.present_timeout_ms == 0 {
            return Err(FrontendError::InvalidConfig(
                "present timeout must be at least 1 ms".to_string(),
            ));
        }

        Ok(())
    }

    /// Log every setting at info level
    pub fn log_settings(&self) {
        log::info!("Settings:");
        log::info!("  renderer.backend: {}", self.renderer.backend);
        log::info!("  renderer.debug_context: {}", self.renderer.debug_context);
        log::info!("  renderer.use_vsync: {}", self.renderer.use_vsync);
        log::info!("  renderer.present_timeout_ms: {}", self.renderer.present_timeout_ms);
        log::info!("  window.size: {}x{}", self.window.width, self.window.height);
        log::info!("  window.min_size: {}x{}", self.window.min_width, self.window.min_height);
        log::info!("  window.fullscreen: {}", self.window.fullscreen);
        log::info!("  logging.level: {}", self.logging.level);
        if self.renderer.backend == BackendKind::Headless {
            log::info!("  headless.extensions: {}", self.headless.extensions.len());
            log::info!("  headless.close_after_swaps: {:?}", self.headless.close_after_swaps);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("emu_frontend_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = FrontendConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.renderer.present_timeout(), Duration::from_millis(100));
        assert_eq!(config.headless.extensions.len(), 9);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FrontendConfig = toml::from_str(
            r#"
            [renderer]
            backend = "headless"
            use_vsync = false

            [window]
            fullscreen = true
            "#,
        )
        .unwrap();

        assert_eq!(config.renderer.backend, BackendKind::Headless);
        assert_eq!(config.renderer.vsync(), VsyncMode::Immediate);
        assert!(config.window.fullscreen);
        assert_eq!(config.window.width, UNDOCKED_WIDTH);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_zero_window_size_rejected() {
        let mut config = FrontendConfig::default();
        config.window.height = 0;
        assert!(matches!(config.validate(), Err(FrontendError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = FrontendConfig::default();
        config.renderer.present_timeout_ms = 0;
        assert!(matches!(config.validate(), Err(FrontendError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_ron_file() {
        let path = temp_path("config.ron");
        std::fs::write(
            &path,
            "(renderer: (debug_context: true), headless: (close_after_swaps: Some(3)))",
        )
        .unwrap();

        let config = FrontendConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(config.renderer.debug_context);
        assert_eq!(config.headless.close_after_swaps, Some(3));
        assert_eq!(config.renderer.backend, BackendKind::Glfw);
    }

    #[test]
    fn test_save_then_load_toml_file() {
        let path = temp_path("config.toml");
        let mut config = FrontendConfig::default();
        config.window.min_width = 320;
        config.save_to_file(&path).unwrap();

        let loaded = FrontendConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = FrontendConfig::load_from_file("settings.ini");
        assert!(matches!(result, Err(super::super::ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!("GLFW".parse::<BackendKind>(), Ok(BackendKind::Glfw));
        assert_eq!("null".parse::<BackendKind>(), Ok(BackendKind::Headless));
        assert!("sdl".parse::<BackendKind>().is_err());
    }
}
