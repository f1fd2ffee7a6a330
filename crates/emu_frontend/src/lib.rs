//! # Emulator Frontend
//!
//! Window, OpenGL context and presentation lifecycle for the emulator's
//! command-line frontend.
//!
//! ## Features
//!
//! - **Window Management**: visible render window plus a hidden anchor window
//! - **Shared Contexts**: contexts for the core thread in the primary context's sharing group
//! - **Capability Check**: required GL extensions validated once at startup
//! - **Presentation**: blocking present loop with bounded frame waits
//! - **Backends**: GLFW for real displays, headless for CI
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use emu_frontend::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FrontendConfig::default();
//!     let system = GlfwWindowSystem::new()?;
//!     let mut manager = WindowManager::new(system, &config, &BuildInfo::current())?;
//!
//!     let mailbox = Arc::new(FrameMailbox::new());
//!     let core_context = manager.take_core_context();
//!     // ... hand `core_context` and `mailbox` to the core thread ...
//!
//!     manager.present(&*mailbox)?;
//!     drop(core_context);
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod backend;
pub mod build_info;
pub mod capabilities;
pub mod config;
pub mod context;
pub mod error;
pub mod foundation;
pub mod present;
pub mod window;

pub use build_info::BuildInfo;
pub use error::{FrontendError, FrontendResult};

/// Common imports for frontend users
pub mod prelude {
    pub use crate::{
        backend::{GlfwWindowSystem, HeadlessWindowSystem},
        build_info::BuildInfo,
        capabilities::{check_required_capabilities, Capability, CapabilityReport, DriverQuery},
        config::{BackendKind, Config, FrontendConfig},
        context::{ContextCreationOptions, GraphicsContext, SharedContextFactory},
        error::{FrontendError, FrontendResult},
        present::{FrameMailbox, PresentStats, Renderer, VsyncMode},
        window::{WindowManager, WindowSystem},
    };
}
