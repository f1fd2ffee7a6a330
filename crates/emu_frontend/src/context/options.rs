//! Context creation attributes
//!
//! Window systems usually take these as global one-shot hints that only
//! affect contexts created afterwards. Here they travel as an explicit value
//! into every window/context creation call, and each backend applies them
//! immediately before the call they belong to.

use crate::config::RendererSettings;

/// OpenGL profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlProfile {
    /// Compatibility profile, legacy entry points available
    Compatibility,
    /// Core profile
    Core,
}

/// Attributes requested for every context the frontend creates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextCreationOptions {
    /// Requested GL version (major, minor); the driver may return a higher one
    pub version: (u32, u32),
    /// Requested profile
    pub profile: GlProfile,
    /// Double-buffered default framebuffer
    pub double_buffer: bool,
    /// Red/green/blue channel depth in bits
    pub color_bits: u32,
    /// Alpha channel depth in bits
    pub alpha_bits: u32,
    /// Request a debug context
    pub debug: bool,
    /// New contexts share objects with the context current at creation
    pub share_with_current: bool,
}

impl Default for ContextCreationOptions {
    fn default() -> Self {
        Self {
            version: (4, 3),
            profile: GlProfile::Compatibility,
            double_buffer: true,
            color_bits: 8,
            alpha_bits: 0,
            debug: false,
            share_with_current: true,
        }
    }
}

impl ContextCreationOptions {
    /// Options for the renderer settings (only the debug flag is configurable)
    pub fn from_settings(settings: &RendererSettings) -> Self {
        Self::default().with_debug(settings.debug_context)
    }

    /// Set the debug flag
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Whether a driver-reported version satisfies the request
    pub fn accepts_version(&self, major: u32, minor: u32) -> bool {
        (major, minor) >= self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_required_attributes() {
        let options = ContextCreationOptions::default();
        assert_eq!(options.version, (4, 3));
        assert_eq!(options.profile, GlProfile::Compatibility);
        assert!(options.double_buffer);
        assert_eq!((options.color_bits, options.alpha_bits), (8, 0));
        assert!(options.share_with_current);
        assert!(!options.debug);
    }

    #[test]
    fn test_debug_flag_follows_settings() {
        let settings = RendererSettings {
            debug_context: true,
            ..RendererSettings::default()
        };
        assert!(ContextCreationOptions::from_settings(&settings).debug);
    }

    #[test]
    fn test_accepts_version() {
        let options = ContextCreationOptions::default();
        assert!(options.accepts_version(4, 3));
        assert!(options.accepts_version(4, 6));
        assert!(!options.accepts_version(4, 2));
        assert!(!options.accepts_version(3, 3));
    }
}
