//! Headless context implementation

use std::sync::{Arc, Mutex};
use std::thread;

use super::gpu::{self, lock, Binding, ContextId, GroupId, Owner, ShareGroup};
use super::{HeadlessEvent, HeadlessShared};
use crate::context::GraphicsContext;
use crate::window::HiddenWindowLease;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ContextRole {
    Primary,
    Shared,
}

/// Context of the headless window system
#[derive(Debug)]
pub struct HeadlessContext {
    id: ContextId,
    role: ContextRole,
    group: Arc<ShareGroup>,
    owner: Owner,
    shared: Arc<HeadlessShared>,
    lease: Option<HiddenWindowLease>,
}

impl HeadlessContext {
    pub(super) fn new(
        role: ContextRole,
        group: Arc<ShareGroup>,
        shared: Arc<HeadlessShared>,
        lease: Option<HiddenWindowLease>,
    ) -> Self {
        Self {
            id: shared.next_context_id(),
            role,
            group,
            owner: Arc::new(Mutex::new(None)),
            shared,
            lease,
        }
    }

    /// Context identity
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Sharing group identity
    pub fn group(&self) -> GroupId {
        self.group.id()
    }
}

impl GraphicsContext for HeadlessContext {
    fn make_current(&mut self) {
        if self.is_current() {
            return;
        }

        let this_thread = thread::current().id();
        {
            let mut owner = lock(&self.owner);
            if let Some(other) = *owner {
                if other != this_thread {
                    log::error!("{} is already current on {:?}", self.id, other);
                    return;
                }
            }
            *owner = Some(this_thread);
        }

        let previous = gpu::bind(Binding {
            context: self.id,
            group: Arc::clone(&self.group),
            owner: Arc::clone(&self.owner),
        });

        // Binding a context implicitly releases the one it replaces
        if let Some(previous) = previous {
            *lock(&previous.owner) = None;
        }
    }

    fn done_current(&mut self) {
        if let Some(binding) = gpu::unbind(self.id) {
            *lock(&binding.owner) = None;
        }
    }

    fn is_current(&self) -> bool {
        gpu::current_context() == Some(self.id)
    }
}

impl Drop for HeadlessContext {
    fn drop(&mut self) {
        self.done_current();

        if let Some(other) = *lock(&self.owner) {
            log::error!("{} destroyed while current on {:?}", self.id, other);
        }

        let event = match self.role {
            ContextRole::Primary => HeadlessEvent::PrimaryContextDestroyed(self.id),
            ContextRole::Shared => HeadlessEvent::SharedContextDestroyed(self.id),
        };
        self.shared.record(event);

        if let Some(lease) = &self.lease {
            lease.release();
        }
    }
}
