//! Window management subsystem
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     frontend_cmd driver         │
//! └─────────────┬───────────────────┘
//!               │ Uses
//!      ┌────────▼────────┐
//!      │ WindowManager   │ ← Startup sequencing, shared contexts, teardown order
//!      └────────┬────────┘
//!               │ Drives
//!      ┌────────▼────────┐
//!      │ WindowSystem    │ ← Backend trait (this module)
//!      └────────┬────────┘
//!               │ Implemented by
//!   ┌───────────▼───────────┐
//!   │ backend::glfw_gl      │ ← GLFW windows + glow loader
//!   │ backend::headless     │ ← Null window system
//!   └───────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! - **`manager`**: [`WindowManager`], the owner of the visible window and primary context
//! - Backends live in [`crate::backend`]

pub mod manager;

pub use manager::WindowManager;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::capabilities::DriverQuery;
use crate::context::{ContextCreationOptions, GraphicsContext};
use crate::error::FrontendResult;
use crate::present::PresentSurface;

/// Parameters of the visible render window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDescriptor {
    /// Title bar text
    pub title: String,
    /// Initial client width
    pub width: u32,
    /// Initial client height
    pub height: u32,
}

/// Link between a shared context and the hidden window hosting it
///
/// The context releases its lease when dropped, from whatever thread it was
/// on. The window system keeps the other clone and destroys the window on its
/// own thread once the lease is released.
#[derive(Debug, Clone)]
pub struct HiddenWindowLease {
    held: Arc<AtomicBool>,
}

impl HiddenWindowLease {
    /// Create a held lease
    pub fn new() -> Self {
        Self {
            held: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Give up the window; the context must no longer be current anywhere
    pub fn release(&self) {
        self.held.store(false, Ordering::Release);
    }

    /// Whether the context still uses the window
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

impl Default for HiddenWindowLease {
    fn default() -> Self {
        Self::new()
    }
}

/// Framebuffer geometry reported to downstream layout logic
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferLayout {
    /// Framebuffer width in pixels
    pub width: u32,
    /// Framebuffer height in pixels
    pub height: u32,
    /// Minimum client width
    pub min_width: u32,
    /// Minimum client height
    pub min_height: u32,
}

impl FramebufferLayout {
    /// Record a resize notification
    pub fn on_resize(&mut self, width: u32, height: u32) {
        log::debug!("Framebuffer resized to {}x{}", width, height);
        self.width = width;
        self.height = height;
    }

    /// Record a minimal client area change
    pub fn on_minimal_client_area_change(&mut self, min_width: u32, min_height: u32) {
        log::debug!("Minimum client area set to {}x{}", min_width, min_height);
        self.min_width = min_width;
        self.min_height = min_height;
    }
}

/// Window system backend
///
/// The window manager calls these in a fixed order during construction:
/// render window, anchor window, fullscreen (optional), primary context,
/// shared context, function loading. Backends whose window and context
/// creation are a single native call may do the work early, as long as each
/// step reports its own error variant and fullscreen is applied before the
/// primary context is used.
///
/// All methods are called from the thread that created the backend, except
/// the [`PresentSurface`] methods, which run on the presentation thread.
pub trait WindowSystem: PresentSurface {
    /// Context handed to other threads
    type Context: GraphicsContext + Send + 'static;

    /// Loaded GL entry points
    type Functions: DriverQuery;

    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Create the visible window
    fn create_render_window(
        &mut self,
        desc: &WindowDescriptor,
        options: &ContextCreationOptions,
    ) -> FrontendResult<()>;

    /// Create the hidden auxiliary window that anchors shared contexts
    ///
    /// It is never shown or resized.
    fn create_anchor_window(&mut self, options: &ContextCreationOptions) -> FrontendResult<()>;

    /// Switch the visible window to fullscreen
    fn enter_fullscreen(&mut self) -> FrontendResult<()>;

    /// Create the primary context on the visible window and make it current
    fn create_primary_context(&mut self, options: &ContextCreationOptions) -> FrontendResult<()>;

    /// Create a context sharing objects with the context current on this thread
    ///
    /// The caller must have the primary context current, otherwise the new
    /// context joins the wrong (or no) sharing group. This is not checked.
    fn create_shared_context(
        &mut self,
        options: &ContextCreationOptions,
    ) -> FrontendResult<Self::Context>;

    /// Resolve GL entry points for the current context
    fn load_functions(&mut self) -> FrontendResult<Self::Functions>;

    /// Current framebuffer size of the visible window
    fn framebuffer_size(&self) -> (u32, u32);

    /// Constrain the visible window's client area
    fn set_minimum_size(&mut self, width: u32, height: u32);

    /// Destroy the primary context and every window this backend created
    ///
    /// Shared contexts handed out earlier must already be dropped. The hidden
    /// window of one that is still alive is logged as an error and leaked, so
    /// the context never refers to a destroyed window.
    fn destroy_primary_context(&mut self);
}
