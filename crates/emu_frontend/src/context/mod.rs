//! # Graphics Contexts
//!
//! A graphics context is bound ("current") to at most one thread at a time,
//! and a thread has at most one current context. Contexts created through a
//! [`SharedContextFactory`] join the sharing group of the context that was
//! current when they were created, so textures, buffers and programs created
//! through one are visible through the others.
//!
//! ## Thread Model
//!
//! - The presentation thread binds the primary context owned by the window manager
//! - The core thread binds its own shared context from the same group
//! - A context instance is never bound on two threads at once; each thread owns its own
//!
//! Host-side locking cannot order GPU execution. A producer must insert a GPU
//! sync point (fence) before it tells the presenter a frame is ready.

pub mod options;

pub use options::{ContextCreationOptions, GlProfile};

use std::thread::{self, ThreadId};

use crate::error::FrontendResult;

/// A GPU context that can be bound to and released from the calling thread
pub trait GraphicsContext {
    /// Bind this context to the calling thread
    ///
    /// No-op if it is already current here. If the backend fails to bind,
    /// the context stays not current; there is no error path.
    fn make_current(&mut self);

    /// Release this context from the calling thread
    ///
    /// No-op if it is not current.
    fn done_current(&mut self);

    /// Whether this context is current on the calling thread
    fn is_current(&self) -> bool;
}

impl<T: GraphicsContext + ?Sized> GraphicsContext for Box<T> {
    fn make_current(&mut self) {
        (**self).make_current();
    }

    fn done_current(&mut self) {
        (**self).done_current();
    }

    fn is_current(&self) -> bool {
        (**self).is_current()
    }
}

/// Produces contexts sharing object namespaces with the primary context
pub trait SharedContextFactory {
    /// Context type handed to other threads
    type Context: GraphicsContext + Send;

    /// Create a new context in the primary context's sharing group
    ///
    /// The new context lives on a hidden window, never on the visible one,
    /// and is not current anywhere when returned.
    fn create_shared_context(&mut self) -> FrontendResult<Self::Context>;
}

/// Two-state binding tracker shared by backend context implementations
///
/// Transitions only happen through [`BindingState::bind`] and
/// [`BindingState::release`]; repeated same-state calls never reach the backend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Not bound to the calling thread
    #[default]
    NotCurrent,
    /// Bound to the calling thread
    Current,
}

impl BindingState {
    /// Whether the state is `Current`
    pub fn is_current(self) -> bool {
        self == Self::Current
    }

    /// Bind through `make_current` unless already current
    ///
    /// `make_current` reports whether the backend actually bound the context.
    pub fn bind(&mut self, make_current: impl FnOnce() -> bool) {
        if self.is_current() {
            return;
        }
        if make_current() {
            *self = Self::Current;
        }
    }

    /// Release through `done_current` unless not current
    pub fn release(&mut self, done_current: impl FnOnce()) {
        if !self.is_current() {
            return;
        }
        done_current();
        *self = Self::NotCurrent;
    }
}

/// Tracks the thread a context is bound to
///
/// For backends whose current-context query is per thread. `backend_current`
/// is the backend's answer for the calling thread, which may be false after
/// another context was bound over this one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ThreadBinding {
    owner: Option<ThreadId>,
}

impl ThreadBinding {
    /// Thread the context was last bound to, if not released since
    pub fn owner(self) -> Option<ThreadId> {
        self.owner
    }

    /// Whether the context is current on the calling thread
    pub fn is_current(self, backend_current: bool) -> bool {
        backend_current && self.owner == Some(thread::current().id())
    }

    /// Bind on the calling thread through `make_current`
    ///
    /// Refused with an error log while the context is bound on another thread.
    pub fn bind(&mut self, backend_current: bool, make_current: impl FnOnce() -> bool) {
        let this_thread = thread::current().id();
        match self.owner {
            Some(owner) if owner != this_thread => {
                log::error!("Context is already current on {:?}", owner);
                return;
            }
            Some(_) if backend_current => return,
            _ => {}
        }
        self.owner = make_current().then_some(this_thread);
    }

    /// Release from the calling thread through `done_current`
    ///
    /// No-op unless bound on the calling thread.
    pub fn release(&mut self, backend_current: bool, done_current: impl FnOnce()) {
        if self.owner != Some(thread::current().id()) {
            return;
        }
        if backend_current {
            done_current();
        }
        self.owner = None;
    }
}
