//! GLFW shared context
//!
//! The context lives on a hidden 1x1 window (GLFW cannot create zero-sized
//! windows). GLFW windows must be destroyed on the main thread, so the hidden
//! window stays owned by [`super::GlfwWindowSystem`]. Dropping this handle
//! releases the thread binding and then the window's lease; the window system
//! destroys released windows the next time it runs on the main thread.

use glfw::Context;

use crate::context::{GraphicsContext, ThreadBinding};
use crate::window::HiddenWindowLease;

/// Context sharing objects with the GLFW render window's context
pub struct GlfwSharedContext {
    context: glfw::PRenderContext,
    binding: ThreadBinding,
    lease: HiddenWindowLease,
}

impl GlfwSharedContext {
    pub(super) fn new(context: glfw::PRenderContext, lease: HiddenWindowLease) -> Self {
        Self {
            context,
            binding: ThreadBinding::default(),
            lease,
        }
    }
}

impl GraphicsContext for GlfwSharedContext {
    fn make_current(&mut self) {
        let context = &mut self.context;
        let current = context.is_current();
        self.binding.bind(current, || {
            context.make_current();
            context.is_current()
        });
    }

    fn done_current(&mut self) {
        let current = self.context.is_current();
        self.binding
            .release(current, || glfw::make_context_current(None));
    }

    fn is_current(&self) -> bool {
        self.binding.is_current(self.context.is_current())
    }
}

impl Drop for GlfwSharedContext {
    fn drop(&mut self) {
        self.done_current();
        if let Some(owner) = self.binding.owner() {
            log::error!("Shared context dropped while current on {:?}", owner);
        }
        self.lease.release();
    }
}
