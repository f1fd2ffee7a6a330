//! # Window Manager
//!
//! Owns the visible window, its primary context and the core's shared
//! context, and sequences their creation and destruction.
//!
//! ## Startup Order
//!
//! 1. Creation options are built once and passed to every creation call
//! 2. Visible render window, titled from the build identity
//! 3. Hidden anchor window
//! 4. Fullscreen, before the primary context exists
//! 5. Primary context (left current on the constructing thread)
//! 6. Shared context for the core, sharing against the primary
//! 7. GL entry points
//! 8. Capability check
//! 9. Initial resize and minimum-size notifications, one event pump
//!
//! Any failure is returned as a [`FrontendError`]; everything created up to
//! that point is released by the backend's own drop.
//!
//! ## Teardown Order
//!
//! The shared context is released before the primary context is destroyed.

use std::sync::Arc;
use std::time::Duration;

use super::{FramebufferLayout, WindowDescriptor, WindowSystem};
use crate::build_info::BuildInfo;
use crate::capabilities::{check_required_capabilities, DriverQuery};
use crate::config::FrontendConfig;
use crate::context::{ContextCreationOptions, SharedContextFactory};
use crate::error::{FrontendError, FrontendResult};
use crate::present::{PresentStats, PresentationLoop, Renderer, VsyncMode};

/// Owner of the visible window and its contexts
pub struct WindowManager<W: WindowSystem> {
    core_context: Option<W::Context>,
    functions: Arc<W::Functions>,
    system: W,
    options: ContextCreationOptions,
    layout: FramebufferLayout,
    vsync: VsyncMode,
    present_timeout: Duration,
    presented: bool,
}

impl<W: WindowSystem> WindowManager<W> {
    /// Create the window, contexts and function table
    pub fn new(mut system: W, config: &FrontendConfig, build: &BuildInfo) -> FrontendResult<Self> {
        config.validate()?;

        let options = ContextCreationOptions::from_settings(&config.renderer);
        let desc = WindowDescriptor {
            title: build.window_title(),
            width: config.window.width,
            height: config.window.height,
        };

        log::info!(
            "Creating {} window \"{}\" ({}x{})",
            system.name(),
            desc.title,
            desc.width,
            desc.height
        );
        system.create_render_window(&desc, &options)?;
        system.create_anchor_window(&options)?;

        // Some window systems invalidate contexts on a display mode change
        if config.window.fullscreen {
            system.enter_fullscreen()?;
        }

        system.create_primary_context(&options)?;
        system.set_swap_interval(VsyncMode::Immediate);

        let core_context = system.create_shared_context(&options)?;
        let functions = system.load_functions()?;

        let driver = functions.driver_info();
        log::info!("GL_VENDOR: {}", driver.vendor);
        log::info!("GL_RENDERER: {}", driver.renderer);
        log::info!("GL_VERSION: {}", driver.version);

        let report = check_required_capabilities(&functions);
        if !report.is_supported() {
            return Err(FrontendError::MissingCapabilities(report.missing_names()));
        }

        let mut layout = FramebufferLayout::default();
        let (width, height) = system.framebuffer_size();
        layout.on_resize(width, height);
        system.set_minimum_size(config.window.min_width, config.window.min_height);
        layout.on_minimal_client_area_change(config.window.min_width, config.window.min_height);
        system.pump_events();

        // The presentation thread binds the primary context itself
        system.done_primary_current();

        log::info!("{} Version: {}", build.product, build.version_line());
        config.log_settings();

        Ok(Self {
            core_context: Some(core_context),
            functions: Arc::new(functions),
            system,
            options,
            layout,
            vsync: config.renderer.vsync(),
            present_timeout: config.renderer.present_timeout(),
            presented: false,
        })
    }

    /// Take ownership of the core's shared context
    ///
    /// The caller must drop it (and join any thread using it) before the
    /// manager is dropped.
    pub fn take_core_context(&mut self) -> Option<W::Context> {
        self.core_context.take()
    }

    /// The core's shared context, if it has not been taken
    pub fn core_context_mut(&mut self) -> Option<&mut W::Context> {
        self.core_context.as_mut()
    }

    /// Loaded GL entry points
    pub fn functions(&self) -> Arc<W::Functions> {
        Arc::clone(&self.functions)
    }

    /// Options every context was created with
    pub fn options(&self) -> &ContextCreationOptions {
        &self.options
    }

    /// Framebuffer geometry from the startup notifications
    pub fn layout(&self) -> FramebufferLayout {
        self.layout
    }

    /// Whether the visible window is still open
    pub fn is_open(&self) -> bool {
        self.system.is_open()
    }

    /// Vsync policy the next [`WindowManager::present`] will apply
    pub fn vsync(&self) -> VsyncMode {
        self.vsync
    }

    /// Change the vsync policy, effective at the next presentation start
    pub fn set_vsync(&mut self, vsync: VsyncMode) {
        self.vsync = vsync;
    }

    /// Run the presentation loop on the calling thread until the window closes
    ///
    /// Runs at most once per manager.
    pub fn present<R: Renderer + ?Sized>(&mut self, renderer: &R) -> FrontendResult<PresentStats> {
        if self.presented {
            return Err(FrontendError::PresentationFinished);
        }
        self.presented = true;

        let presenter = PresentationLoop::new(self.vsync, self.present_timeout);
        Ok(presenter.run(&mut self.system, renderer))
    }
}

impl<W: WindowSystem> SharedContextFactory for WindowManager<W> {
    type Context = W::Context;

    fn create_shared_context(&mut self) -> FrontendResult<Self::Context> {
        // `&mut self` means the presentation loop is not holding the primary context
        self.system.make_primary_current();
        let context = self.system.create_shared_context(&self.options);
        self.system.done_primary_current();
        context
    }
}

impl<W: WindowSystem> Drop for WindowManager<W> {
    fn drop(&mut self) {
        drop(self.core_context.take());
        self.system.destroy_primary_context();
        log::debug!("Window manager destroyed");
    }
}
