//! GLFW-based window system with OpenGL contexts
//!
//! GLFW creates a window and its context in one call, so the visible window
//! already owns the primary context after [`WindowSystem::create_render_window`];
//! [`WindowSystem::create_primary_context`] binds it and checks that it is
//! usable. Creation attributes are applied as window hints immediately before
//! each creation call, from the [`ContextCreationOptions`] passed in.
//!
//! Shared contexts come from hidden 1x1 windows created with
//! `glfwCreateWindow(..., share)` against the hidden anchor window, which
//! itself shares with the render window. They never touch the visible window.
//!
//! Each hidden window carries a [`HiddenWindowLease`] shared with its
//! context. Released windows are destroyed during event pumping and before
//! each new shared context is created.
//!
//! Every method must run on the main thread, as GLFW requires for window
//! creation, destruction and event processing. The presentation loop
//! therefore runs on the main thread with this backend.

pub mod context;
pub mod loader;

pub use context::GlfwSharedContext;
pub use loader::GlFunctions;

use glfw::Context;

use crate::context::{BindingState, ContextCreationOptions, GlProfile};
use crate::error::{FrontendError, FrontendResult};
use crate::present::{PresentSurface, VsyncMode};
use crate::window::{HiddenWindowLease, WindowDescriptor, WindowSystem};

type EventReceiver = glfw::GlfwReceiver<(f64, glfw::WindowEvent)>;

/// A GLFW window together with its event channel
struct WindowSlot {
    window: glfw::PWindow,
    events: EventReceiver,
}

/// Hidden window hosting one shared context
struct SharedWindow {
    slot: WindowSlot,
    lease: HiddenWindowLease,
}

fn log_glfw_error(error: glfw::Error, description: String) {
    log::error!("GLFW error {:?}: {}", error, description);
}

/// Apply creation options as window hints for the next window
fn apply_hints(glfw: &mut glfw::Glfw, options: &ContextCreationOptions, visible: bool) {
    glfw.default_window_hints();
    glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::OpenGl));
    glfw.window_hint(glfw::WindowHint::ContextVersion(options.version.0, options.version.1));
    glfw.window_hint(glfw::WindowHint::OpenGlProfile(match options.profile {
        GlProfile::Compatibility => glfw::OpenGlProfileHint::Compat,
        GlProfile::Core => glfw::OpenGlProfileHint::Core,
    }));
    glfw.window_hint(glfw::WindowHint::DoubleBuffer(options.double_buffer));
    glfw.window_hint(glfw::WindowHint::RedBits(Some(options.color_bits)));
    glfw.window_hint(glfw::WindowHint::GreenBits(Some(options.color_bits)));
    glfw.window_hint(glfw::WindowHint::BlueBits(Some(options.color_bits)));
    glfw.window_hint(glfw::WindowHint::AlphaBits(Some(options.alpha_bits)));
    glfw.window_hint(glfw::WindowHint::OpenGlDebugContext(options.debug));

    glfw.window_hint(glfw::WindowHint::Visible(visible));
    glfw.window_hint(glfw::WindowHint::Resizable(visible));
    glfw.window_hint(glfw::WindowHint::ScaleToMonitor(visible));
}

/// GLFW window system
pub struct GlfwWindowSystem {
    glfw: glfw::Glfw,
    render: Option<WindowSlot>,
    anchor: Option<WindowSlot>,
    shared_windows: Vec<SharedWindow>,
    primary_binding: BindingState,
    options: ContextCreationOptions,
    framebuffer: (u32, u32),
}

impl GlfwWindowSystem {
    /// Initialize GLFW
    pub fn new() -> FrontendResult<Self> {
        let glfw = glfw::init(log_glfw_error)
            .map_err(|e| FrontendError::BackendInit(format!("{:?}", e)))?;

        log::debug!("GLFW {}", glfw::get_version_string());

        Ok(Self {
            glfw,
            render: None,
            anchor: None,
            shared_windows: Vec::new(),
            primary_binding: BindingState::default(),
            options: ContextCreationOptions::default(),
            framebuffer: (0, 0),
        })
    }

    /// Destroy hidden windows whose context has been dropped
    fn reap_shared_windows(&mut self) {
        let before = self.shared_windows.len();
        self.shared_windows.retain(|window| window.lease.is_held());

        let reaped = before - self.shared_windows.len();
        if reaped > 0 {
            log::debug!("Destroyed {} released hidden window(s)", reaped);
        }
    }

    fn read_framebuffer_size(window: &glfw::PWindow) -> (u32, u32) {
        let (width, height) = window.get_framebuffer_size();
        (width.max(0) as u32, height.max(0) as u32)
    }
}

impl PresentSurface for GlfwWindowSystem {
    fn make_primary_current(&mut self) {
        let Some(render) = self.render.as_mut() else {
            return;
        };
        let window = &mut render.window;
        self.primary_binding.bind(|| {
            window.make_current();
            window.is_current()
        });
    }

    fn done_primary_current(&mut self) {
        self.primary_binding
            .release(|| glfw::make_context_current(None));
    }

    fn set_swap_interval(&mut self, vsync: VsyncMode) {
        let interval = match vsync {
            VsyncMode::Immediate => glfw::SwapInterval::None,
            VsyncMode::SyncToRefresh => glfw::SwapInterval::Sync(vsync.swap_interval()),
        };
        self.glfw.set_swap_interval(interval);
    }

    fn swap_buffers(&mut self) {
        if let Some(render) = self.render.as_mut() {
            render.window.swap_buffers();
        }
    }

    fn pump_events(&mut self) {
        self.glfw.poll_events();
        self.reap_shared_windows();

        let Some(render) = self.render.as_ref() else {
            return;
        };
        for (_, event) in glfw::flush_messages(&render.events) {
            match event {
                glfw::WindowEvent::FramebufferSize(width, height) => {
                    self.framebuffer = (width.max(0) as u32, height.max(0) as u32);
                    log::debug!("Framebuffer resized to {}x{}", width, height);
                }
                glfw::WindowEvent::Close => log::info!("Window close requested"),
                _ => {}
            }
        }
    }

    fn is_open(&self) -> bool {
        self.render
            .as_ref()
            .is_some_and(|render| !render.window.should_close())
    }
}

impl WindowSystem for GlfwWindowSystem {
    type Context = GlfwSharedContext;
    type Functions = GlFunctions;

    fn name(&self) -> &'static str {
        "glfw"
    }

    fn create_render_window(
        &mut self,
        desc: &WindowDescriptor,
        options: &ContextCreationOptions,
    ) -> FrontendResult<()> {
        apply_hints(&mut self.glfw, options, true);

        let (mut window, events) = self
            .glfw
            .create_window(desc.width, desc.height, &desc.title, glfw::WindowMode::Windowed)
            .ok_or_else(|| {
                FrontendError::WindowCreation(format!(
                    "glfwCreateWindow failed for a {}x{} GL {}.{} window",
                    desc.width, desc.height, options.version.0, options.version.1
                ))
            })?;

        window.set_framebuffer_size_polling(true);
        window.set_close_polling(true);

        self.framebuffer = Self::read_framebuffer_size(&window);
        self.options = options.clone();
        self.render = Some(WindowSlot { window, events });
        Ok(())
    }

    fn create_anchor_window(&mut self, options: &ContextCreationOptions) -> FrontendResult<()> {
        let render = self.render.as_ref().ok_or_else(|| {
            FrontendError::WindowCreation("anchor window requested before the render window".to_string())
        })?;

        apply_hints(&mut self.glfw, options, false);
        let (window, events) = render
            .window
            .create_shared(1, 1, "", glfw::WindowMode::Windowed)
            .ok_or_else(|| FrontendError::WindowCreation("failed to create hidden anchor window".to_string()))?;

        self.anchor = Some(WindowSlot { window, events });
        Ok(())
    }

    fn enter_fullscreen(&mut self) -> FrontendResult<()> {
        let render = self.render.as_mut().ok_or_else(|| {
            FrontendError::WindowCreation("fullscreen requested without a render window".to_string())
        })?;

        let entered = self.glfw.with_primary_monitor(|_, monitor| {
            let monitor = monitor?;
            let mode = monitor.get_video_mode()?;
            render.window.set_monitor(
                glfw::WindowMode::FullScreen(&*monitor),
                0,
                0,
                mode.width,
                mode.height,
                Some(mode.refresh_rate),
            );
            Some((mode.width, mode.height))
        });

        match entered {
            Some((width, height)) => {
                log::info!("Entered fullscreen at {}x{}", width, height);
                self.framebuffer = Self::read_framebuffer_size(&render.window);
            }
            None => log::warn!("No primary monitor video mode available, staying windowed"),
        }
        Ok(())
    }

    fn create_primary_context(&mut self, _options: &ContextCreationOptions) -> FrontendResult<()> {
        if self.render.is_none() {
            return Err(FrontendError::ContextCreation(
                "no render window to bind the context to".to_string(),
            ));
        }

        self.make_primary_current();
        if !self.primary_binding.is_current() {
            return Err(FrontendError::ContextCreation(
                "render window context could not be made current".to_string(),
            ));
        }
        Ok(())
    }

    fn create_shared_context(
        &mut self,
        options: &ContextCreationOptions,
    ) -> FrontendResult<Self::Context> {
        if !self.primary_binding.is_current() {
            log::warn!("Creating a shared context while the primary context is not current");
        }
        self.reap_shared_windows();

        let anchor = self.anchor.as_ref().ok_or_else(|| {
            FrontendError::SharedContextCreation("no anchor window to share against".to_string())
        })?;

        apply_hints(&mut self.glfw, options, false);
        let (mut window, events) = anchor
            .window
            .create_shared(1, 1, "", glfw::WindowMode::Windowed)
            .ok_or_else(|| {
                FrontendError::SharedContextCreation("glfwCreateWindow failed for hidden context window".to_string())
            })?;

        let lease = HiddenWindowLease::new();
        let context = GlfwSharedContext::new(window.render_context(), lease.clone());
        self.shared_windows.push(SharedWindow {
            slot: WindowSlot { window, events },
            lease,
        });
        Ok(context)
    }

    fn load_functions(&mut self) -> FrontendResult<Self::Functions> {
        let functions = GlFunctions::load(&self.glfw)?;

        let (major, minor) = functions.version();
        if !self.options.accepts_version(major, minor) {
            return Err(FrontendError::ContextCreation(format!(
                "driver returned GL {}.{}, {}.{} is required",
                major, minor, self.options.version.0, self.options.version.1
            )));
        }

        Ok(functions)
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.framebuffer
    }

    fn set_minimum_size(&mut self, width: u32, height: u32) {
        if let Some(render) = self.render.as_mut() {
            render
                .window
                .set_size_limits(Some(width), Some(height), None, None);
            self.framebuffer = Self::read_framebuffer_size(&render.window);
        }
    }

    fn destroy_primary_context(&mut self) {
        self.done_primary_current();
        self.reap_shared_windows();
        for window in self.shared_windows.drain(..) {
            log::error!("Shared context still alive at teardown; leaking its hidden window");
            // Destroying the window would leave the context pointing at freed memory
            std::mem::forget(window.slot.window);
        }
        self.anchor = None;
        if self.render.take().is_some() {
            log::debug!("GLFW render window destroyed");
        }
    }
}

impl Drop for GlfwWindowSystem {
    fn drop(&mut self) {
        self.destroy_primary_context();
    }
}
