//! # Headless Window System
//!
//! A null window system for CI and smoke runs on machines without a display.
//! It follows the same lifecycle as a real backend: windows and contexts are
//! created and destroyed in order, contexts bind per thread, shared contexts
//! join the sharing group of the context current at creation, and GPU objects
//! live in per-group namespaces (see [`gpu`]).
//!
//! Every lifecycle step is appended to a journal readable through a
//! [`HeadlessHandle`], together with swap counters and a close switch that
//! any thread may flip.

pub mod context;
pub mod gpu;

pub use context::HeadlessContext;
pub use gpu::{ContextId, GroupId, ObjectId, ObjectKind};

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use self::context::ContextRole;
use self::gpu::{lock, ShareGroup};
use crate::capabilities::{DriverInfo, DriverQuery};
use crate::config::HeadlessSettings;
use crate::context::{ContextCreationOptions, GraphicsContext};
use crate::error::{FrontendError, FrontendResult};
use crate::present::{PresentSurface, VsyncMode};
use crate::window::{HiddenWindowLease, WindowDescriptor, WindowSystem};

/// Size of the simulated display used for fullscreen
pub const HEADLESS_DISPLAY_SIZE: (u32, u32) = (1920, 1080);

/// Simulated display refresh interval (60 Hz)
pub const HEADLESS_REFRESH_INTERVAL: Duration = Duration::from_micros(16_667);

/// Lifecycle step recorded by the headless window system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessEvent {
    /// Visible window created
    RenderWindowCreated {
        /// Title
        title: String,
        /// Client width
        width: u32,
        /// Client height
        height: u32,
    },
    /// Hidden anchor window created
    AnchorWindowCreated,
    /// Visible window switched to fullscreen
    FullscreenEntered,
    /// Primary context created and made current
    PrimaryContextCreated(ContextId),
    /// Shared context created
    SharedContextCreated {
        /// New context
        context: ContextId,
        /// Group it joined
        group: GroupId,
    },
    /// GL entry points resolved
    FunctionsLoaded,
    /// Swap interval applied
    SwapIntervalSet(VsyncMode),
    /// Minimum client area applied
    MinimumSizeSet {
        /// Minimum width
        width: u32,
        /// Minimum height
        height: u32,
    },
    /// Shared context destroyed
    SharedContextDestroyed(ContextId),
    /// Hidden window of a dropped shared context destroyed
    HiddenWindowDestroyed(ContextId),
    /// Hidden window kept at teardown because its shared context was still alive
    HiddenWindowLeaked(ContextId),
    /// Primary context destroyed
    PrimaryContextDestroyed(ContextId),
    /// Hidden anchor window destroyed
    AnchorWindowDestroyed,
    /// Visible window destroyed
    RenderWindowDestroyed,
}

#[derive(Debug)]
pub(crate) struct HeadlessShared {
    open: AtomicBool,
    swaps: AtomicU64,
    pumps: AtomicU64,
    next_context: AtomicU64,
    journal: Mutex<Vec<HeadlessEvent>>,
}

impl HeadlessShared {
    fn new() -> Self {
        Self {
            open: AtomicBool::new(true),
            swaps: AtomicU64::new(0),
            pumps: AtomicU64::new(0),
            next_context: AtomicU64::new(1),
            journal: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn record(&self, event: HeadlessEvent) {
        log::trace!("headless: {:?}", event);
        lock(&self.journal).push(event);
    }

    pub(crate) fn next_context_id(&self) -> ContextId {
        ContextId(self.next_context.fetch_add(1, Ordering::Relaxed))
    }
}

/// Cross-thread view of a headless window system
#[derive(Debug, Clone)]
pub struct HeadlessHandle {
    shared: Arc<HeadlessShared>,
}

impl HeadlessHandle {
    /// Request the window to close, as a user clicking the close button would
    pub fn close(&self) {
        self.shared.open.store(false, Ordering::Release);
    }

    /// Whether the window is still open
    pub fn is_open(&self) -> bool {
        self.shared.open.load(Ordering::Acquire)
    }

    /// Buffer swaps performed so far
    pub fn swap_count(&self) -> u64 {
        self.shared.swaps.load(Ordering::Acquire)
    }

    /// Event pumps performed so far
    pub fn pump_count(&self) -> u64 {
        self.shared.pumps.load(Ordering::Acquire)
    }

    /// Snapshot of the lifecycle journal
    pub fn events(&self) -> Vec<HeadlessEvent> {
        lock(&self.shared.journal).clone()
    }
}

/// Function table of the simulated driver
#[derive(Debug, Clone)]
pub struct HeadlessDriver {
    extensions: HashSet<String>,
}

impl DriverQuery for HeadlessDriver {
    fn has_extension(&self, extension: &str) -> bool {
        self.extensions.has_extension(extension)
    }

    fn driver_info(&self) -> DriverInfo {
        DriverInfo {
            vendor: "emu_frontend".to_string(),
            renderer: "headless".to_string(),
            version: format!("4.6 (simulated, {} extensions)", self.extensions.len()),
        }
    }
}

#[derive(Debug)]
struct HiddenWindow {
    context: ContextId,
    lease: HiddenWindowLease,
}

#[derive(Debug)]
struct RenderWindow {
    framebuffer: (u32, u32),
    min_size: (u32, u32),
}

/// Null window system
#[derive(Debug)]
pub struct HeadlessWindowSystem {
    shared: Arc<HeadlessShared>,
    settings: HeadlessSettings,
    render_window: Option<RenderWindow>,
    anchor_window: bool,
    hidden_windows: Vec<HiddenWindow>,
    primary: Option<HeadlessContext>,
    vsync: VsyncMode,
    next_refresh: Option<Instant>,
}

impl HeadlessWindowSystem {
    /// Create a headless window system
    pub fn new(settings: HeadlessSettings) -> Self {
        Self {
            shared: Arc::new(HeadlessShared::new()),
            settings,
            render_window: None,
            anchor_window: false,
            hidden_windows: Vec::new(),
            primary: None,
            vsync: VsyncMode::Immediate,
            next_refresh: None,
        }
    }

    /// Handle for closing the window and reading counters from any thread
    pub fn handle(&self) -> HeadlessHandle {
        HeadlessHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Hidden windows currently hosting shared contexts
    pub fn hidden_window_count(&self) -> usize {
        self.hidden_windows.len()
    }

    fn reap_hidden_windows(&mut self) {
        let shared = &self.shared;
        self.hidden_windows.retain(|window| {
            let held = window.lease.is_held();
            if !held {
                shared.record(HeadlessEvent::HiddenWindowDestroyed(window.context));
            }
            held
        });
    }

    fn render_window_mut(&mut self) -> Option<&mut RenderWindow> {
        self.render_window.as_mut()
    }

    fn wait_for_refresh(&mut self) {
        let now = Instant::now();
        let deadline = self.next_refresh.unwrap_or(now);
        if deadline > now {
            thread::sleep(deadline - now);
        }
        self.next_refresh = Some(deadline.max(now) + HEADLESS_REFRESH_INTERVAL);
    }
}

impl PresentSurface for HeadlessWindowSystem {
    fn make_primary_current(&mut self) {
        if let Some(primary) = self.primary.as_mut() {
            primary.make_current();
        }
    }

    fn done_primary_current(&mut self) {
        if let Some(primary) = self.primary.as_mut() {
            primary.done_current();
        }
    }

    fn set_swap_interval(&mut self, vsync: VsyncMode) {
        self.vsync = vsync;
        self.next_refresh = None;
        self.shared.record(HeadlessEvent::SwapIntervalSet(vsync));
    }

    fn swap_buffers(&mut self) {
        if self.vsync == VsyncMode::SyncToRefresh {
            self.wait_for_refresh();
        }

        let swaps = self.shared.swaps.fetch_add(1, Ordering::AcqRel) + 1;
        if self
            .settings
            .close_after_swaps
            .is_some_and(|limit| swaps >= limit)
        {
            self.shared.open.store(false, Ordering::Release);
        }
    }

    fn pump_events(&mut self) {
        self.shared.pumps.fetch_add(1, Ordering::AcqRel);
        self.reap_hidden_windows();
    }

    fn is_open(&self) -> bool {
        self.shared.open.load(Ordering::Acquire)
    }
}

impl WindowSystem for HeadlessWindowSystem {
    type Context = HeadlessContext;
    type Functions = HeadlessDriver;

    fn name(&self) -> &'static str {
        "headless"
    }

    fn create_render_window(
        &mut self,
        desc: &WindowDescriptor,
        _options: &ContextCreationOptions,
    ) -> FrontendResult<()> {
        if self.render_window.is_some() {
            return Err(FrontendError::WindowCreation(
                "render window already exists".to_string(),
            ));
        }

        self.render_window = Some(RenderWindow {
            framebuffer: (desc.width, desc.height),
            min_size: (1, 1),
        });
        self.shared.record(HeadlessEvent::RenderWindowCreated {
            title: desc.title.clone(),
            width: desc.width,
            height: desc.height,
        });
        Ok(())
    }

    fn create_anchor_window(&mut self, _options: &ContextCreationOptions) -> FrontendResult<()> {
        self.anchor_window = true;
        self.shared.record(HeadlessEvent::AnchorWindowCreated);
        Ok(())
    }

    fn enter_fullscreen(&mut self) -> FrontendResult<()> {
        let window = self.render_window_mut().ok_or_else(|| {
            FrontendError::WindowCreation("fullscreen requested without a render window".to_string())
        })?;
        window.framebuffer = HEADLESS_DISPLAY_SIZE;
        self.shared.record(HeadlessEvent::FullscreenEntered);
        Ok(())
    }

    fn create_primary_context(&mut self, _options: &ContextCreationOptions) -> FrontendResult<()> {
        if self.render_window.is_none() {
            return Err(FrontendError::ContextCreation(
                "no render window to bind the context to".to_string(),
            ));
        }
        if self.primary.is_some() {
            return Err(FrontendError::ContextCreation(
                "primary context already exists".to_string(),
            ));
        }

        let mut primary = HeadlessContext::new(
            ContextRole::Primary,
            ShareGroup::new(),
            Arc::clone(&self.shared),
            None,
        );
        self.shared.record(HeadlessEvent::PrimaryContextCreated(primary.id()));
        primary.make_current();
        self.primary = Some(primary);
        Ok(())
    }

    fn create_shared_context(
        &mut self,
        options: &ContextCreationOptions,
    ) -> FrontendResult<Self::Context> {
        if !self.anchor_window {
            return Err(FrontendError::SharedContextCreation(
                "no anchor window to host the context".to_string(),
            ));
        }

        self.reap_hidden_windows();

        let group = if options.share_with_current {
            gpu::current_share_group().unwrap_or_else(|| {
                log::warn!("No context current while creating a shared context; starting a new group");
                ShareGroup::new()
            })
        } else {
            ShareGroup::new()
        };

        let lease = HiddenWindowLease::new();
        let context = HeadlessContext::new(
            ContextRole::Shared,
            group,
            Arc::clone(&self.shared),
            Some(lease.clone()),
        );
        self.hidden_windows.push(HiddenWindow {
            context: context.id(),
            lease,
        });
        self.shared.record(HeadlessEvent::SharedContextCreated {
            context: context.id(),
            group: context.group(),
        });
        Ok(context)
    }

    fn load_functions(&mut self) -> FrontendResult<Self::Functions> {
        if gpu::current_context().is_none() {
            return Err(FrontendError::FunctionLoad(
                "no context is current on the loading thread".to_string(),
            ));
        }

        self.shared.record(HeadlessEvent::FunctionsLoaded);
        Ok(HeadlessDriver {
            extensions: self.settings.extensions.iter().cloned().collect(),
        })
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.render_window
            .as_ref()
            .map_or((0, 0), |window| window.framebuffer)
    }

    fn set_minimum_size(&mut self, width: u32, height: u32) {
        if let Some(window) = self.render_window_mut() {
            window.min_size = (width, height);
            window.framebuffer.0 = window.framebuffer.0.max(width);
            window.framebuffer.1 = window.framebuffer.1.max(height);
        }
        self.shared.record(HeadlessEvent::MinimumSizeSet { width, height });
    }

    fn destroy_primary_context(&mut self) {
        self.reap_hidden_windows();
        for window in self.hidden_windows.drain(..) {
            log::error!("{} still alive at teardown; leaking its hidden window", window.context);
            self.shared.record(HeadlessEvent::HiddenWindowLeaked(window.context));
        }

        if let Some(mut primary) = self.primary.take() {
            primary.done_current();
            drop(primary);
        }
        if std::mem::take(&mut self.anchor_window) {
            self.shared.record(HeadlessEvent::AnchorWindowDestroyed);
        }
        if self.render_window.take().is_some() {
            self.shared.record(HeadlessEvent::RenderWindowDestroyed);
        }
    }
}

impl Drop for HeadlessWindowSystem {
    fn drop(&mut self) {
        self.destroy_primary_context();
    }
}
