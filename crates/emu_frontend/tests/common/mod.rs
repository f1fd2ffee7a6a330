//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::time::Duration;

use emu_frontend::backend::headless::HeadlessContext;
use emu_frontend::backend::{HeadlessDriver, HeadlessEvent, HeadlessWindowSystem};
use emu_frontend::config::{BackendKind, FrontendConfig, HeadlessSettings};
use emu_frontend::context::ContextCreationOptions;
use emu_frontend::error::{FrontendError, FrontendResult};
use emu_frontend::present::{PresentSurface, Renderer, VsyncMode};
use emu_frontend::window::{WindowDescriptor, WindowSystem};
use emu_frontend::BuildInfo;

pub fn build_info() -> BuildInfo {
    BuildInfo::new("yuzu", "1.0", "master", "abcd123")
}

pub fn headless_config() -> FrontendConfig {
    let mut config = FrontendConfig::default();
    config.renderer.backend = BackendKind::Headless;
    config.renderer.present_timeout_ms = 5;
    config
}

pub fn headless_system() -> HeadlessWindowSystem {
    HeadlessWindowSystem::new(HeadlessSettings::default())
}

/// Journal entries reduced to their kind, for order comparisons
pub fn kinds(events: &[HeadlessEvent]) -> Vec<&'static str> {
    events
        .iter()
        .map(|event| match event {
            HeadlessEvent::RenderWindowCreated { .. } => "render_window_created",
            HeadlessEvent::AnchorWindowCreated => "anchor_window_created",
            HeadlessEvent::FullscreenEntered => "fullscreen_entered",
            HeadlessEvent::PrimaryContextCreated(_) => "primary_created",
            HeadlessEvent::SharedContextCreated { .. } => "shared_created",
            HeadlessEvent::FunctionsLoaded => "functions_loaded",
            HeadlessEvent::SwapIntervalSet(_) => "swap_interval_set",
            HeadlessEvent::MinimumSizeSet { .. } => "minimum_size_set",
            HeadlessEvent::SharedContextDestroyed(_) => "shared_destroyed",
            HeadlessEvent::HiddenWindowDestroyed(_) => "hidden_window_destroyed",
            HeadlessEvent::HiddenWindowLeaked(_) => "hidden_window_leaked",
            HeadlessEvent::PrimaryContextDestroyed(_) => "primary_destroyed",
            HeadlessEvent::AnchorWindowDestroyed => "anchor_window_destroyed",
            HeadlessEvent::RenderWindowDestroyed => "render_window_destroyed",
        })
        .collect()
}

/// Renderer whose frames never become ready
pub struct NeverReady;

impl Renderer for NeverReady {
    fn try_present(&self, timeout: Duration) -> bool {
        std::thread::sleep(timeout);
        false
    }
}

/// Construction step a [`FaultyWindowSystem`] fails at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    RenderWindow,
    AnchorWindow,
    Fullscreen,
    PrimaryContext,
    SharedContext,
    LoadFunctions,
}

impl FailAt {
    pub const ALL: [Self; 6] = [
        Self::RenderWindow,
        Self::AnchorWindow,
        Self::Fullscreen,
        Self::PrimaryContext,
        Self::SharedContext,
        Self::LoadFunctions,
    ];
}

/// Headless window system that fails one construction step
pub struct FaultyWindowSystem {
    inner: HeadlessWindowSystem,
    fail_at: FailAt,
}

impl FaultyWindowSystem {
    pub fn new(inner: HeadlessWindowSystem, fail_at: FailAt) -> Self {
        Self { inner, fail_at }
    }

    fn check(&self, step: FailAt, error: impl FnOnce(String) -> FrontendError) -> FrontendResult<()> {
        if self.fail_at == step {
            Err(error(format!("injected failure at {:?}", step)))
        } else {
            Ok(())
        }
    }
}

impl PresentSurface for FaultyWindowSystem {
    fn make_primary_current(&mut self) {
        self.inner.make_primary_current();
    }

    fn done_primary_current(&mut self) {
        self.inner.done_primary_current();
    }

    fn set_swap_interval(&mut self, vsync: VsyncMode) {
        self.inner.set_swap_interval(vsync);
    }

    fn swap_buffers(&mut self) {
        self.inner.swap_buffers();
    }

    fn pump_events(&mut self) {
        self.inner.pump_events();
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }
}

impl WindowSystem for FaultyWindowSystem {
    type Context = HeadlessContext;
    type Functions = HeadlessDriver;

    fn name(&self) -> &'static str {
        "faulty"
    }

    fn create_render_window(
        &mut self,
        desc: &WindowDescriptor,
        options: &ContextCreationOptions,
    ) -> FrontendResult<()> {
        self.check(FailAt::RenderWindow, FrontendError::WindowCreation)?;
        self.inner.create_render_window(desc, options)
    }

    fn create_anchor_window(&mut self, options: &ContextCreationOptions) -> FrontendResult<()> {
        self.check(FailAt::AnchorWindow, FrontendError::WindowCreation)?;
        self.inner.create_anchor_window(options)
    }

    fn enter_fullscreen(&mut self) -> FrontendResult<()> {
        self.check(FailAt::Fullscreen, FrontendError::WindowCreation)?;
        self.inner.enter_fullscreen()
    }

    fn create_primary_context(&mut self, options: &ContextCreationOptions) -> FrontendResult<()> {
        self.check(FailAt::PrimaryContext, FrontendError::ContextCreation)?;
        self.inner.create_primary_context(options)
    }

    fn create_shared_context(
        &mut self,
        options: &ContextCreationOptions,
    ) -> FrontendResult<Self::Context> {
        self.check(FailAt::SharedContext, FrontendError::SharedContextCreation)?;
        self.inner.create_shared_context(options)
    }

    fn load_functions(&mut self) -> FrontendResult<Self::Functions> {
        self.check(FailAt::LoadFunctions, FrontendError::FunctionLoad)?;
        self.inner.load_functions()
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.inner.framebuffer_size()
    }

    fn set_minimum_size(&mut self, width: u32, height: u32) {
        self.inner.set_minimum_size(width, height);
    }

    fn destroy_primary_context(&mut self) {
        self.inner.destroy_primary_context();
    }
}
