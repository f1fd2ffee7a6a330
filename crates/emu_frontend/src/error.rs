//! Frontend error types
//!
//! Every construction-time failure of the window/context subsystem is fatal:
//! rendering cannot proceed without a window, a primary context, a shared
//! context for the core, loaded GL entry points and the required extension
//! set. The library reports these as [`FrontendError`] values and leaves the
//! actual process exit to the top-level driver.

use thiserror::Error;

use crate::config::ConfigError;

/// Frontend errors
#[derive(Error, Debug)]
pub enum FrontendError {
    /// The window system library itself could not be initialized
    #[error("Failed to initialize window system: {0}")]
    BackendInit(String),

    /// The visible render window or the hidden anchor window could not be created
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// The primary context bound to the render window could not be created
    #[error("Failed to create GL context: {0}")]
    ContextCreation(String),

    /// A context sharing objects with the primary context could not be created
    #[error("Failed to create shared GL context: {0}")]
    SharedContextCreation(String),

    /// GL entry points could not be resolved through the window system loader
    #[error("Failed to initialize GL functions: {0}")]
    FunctionLoad(String),

    /// The driver lacks one or more required extensions
    #[error("GPU does not support all required OpenGL extensions: {}", .0.join(", "))]
    MissingCapabilities(Vec<&'static str>),

    /// Configuration values that cannot be used to build a window
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read or parsed
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The presentation loop already ran for this window manager
    #[error("Presentation loop already ran for this window")]
    PresentationFinished,
}

/// Result alias for frontend operations
pub type FrontendResult<T> = Result<T, FrontendError>;

impl FrontendError {
    /// Short name of the construction step that failed
    ///
    /// Used by the driver so the fatal diagnostic names the exact step.
    pub fn step(&self) -> &'static str {
        match self {
            Self::BackendInit(_) => "window system initialization",
            Self::WindowCreation(_) => "window creation",
            Self::ContextCreation(_) => "context creation",
            Self::SharedContextCreation(_) => "shared context creation",
            Self::FunctionLoad(_) => "GL function loading",
            Self::MissingCapabilities(_) => "capability check",
            Self::InvalidConfig(_) | Self::Config(_) => "configuration",
            Self::PresentationFinished => "presentation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_capabilities_message_lists_names() {
        let err = FrontendError::MissingCapabilities(vec!["ARB_multi_bind", "ARB_clip_control"]);
        assert_eq!(
            err.to_string(),
            "GPU does not support all required OpenGL extensions: ARB_multi_bind, ARB_clip_control"
        );
        assert_eq!(err.step(), "capability check");
    }

    #[test]
    fn test_step_names_distinguish_context_kinds() {
        assert_ne!(
            FrontendError::ContextCreation(String::new()).step(),
            FrontendError::SharedContextCreation(String::new()).step()
        );
    }
}
