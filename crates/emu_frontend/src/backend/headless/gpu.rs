//! Simulated GPU object namespaces and per-thread context binding
//!
//! Each sharing group owns one object namespace. Contexts hold the group
//! through an `Arc`, so objects outlive any single context as long as a
//! sibling in the group is alive. Object calls resolve through the context
//! current on the calling thread, the way GL calls do.

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::ThreadId;

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Name of an object inside a sharing group
    pub struct ObjectId;
}

/// Kind of a simulated GPU object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Texture
    Texture,
    /// Buffer
    Buffer,
    /// Shader program
    Program,
}

/// Identity of a sharing group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

/// Identity of a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub(super) u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "context#{}", self.0)
    }
}

static NEXT_GROUP: AtomicU64 = AtomicU64::new(1);

pub(super) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Object namespace shared by every context in a group
#[derive(Debug)]
pub struct ShareGroup {
    id: GroupId,
    objects: Mutex<SlotMap<ObjectId, ObjectKind>>,
}

impl ShareGroup {
    pub(super) fn new() -> Arc<Self> {
        Arc::new(Self {
            id: GroupId(NEXT_GROUP.fetch_add(1, Ordering::Relaxed)),
            objects: Mutex::new(SlotMap::with_key()),
        })
    }

    /// Group identity
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Number of live objects
    pub fn object_count(&self) -> usize {
        lock(&self.objects).len()
    }
}

/// Thread that currently has a context bound, shared between context and binding
pub(super) type Owner = Arc<Mutex<Option<ThreadId>>>;

#[derive(Debug, Clone)]
pub(super) struct Binding {
    pub context: ContextId,
    pub group: Arc<ShareGroup>,
    pub owner: Owner,
}

thread_local! {
    static CURRENT: RefCell<Option<Binding>> = const { RefCell::new(None) };
}

/// Install `binding` as this thread's current context, returning the one it replaced
pub(super) fn bind(binding: Binding) -> Option<Binding> {
    CURRENT.with(|current| current.borrow_mut().replace(binding))
}

/// Clear this thread's current context if it is `context`
pub(super) fn unbind(context: ContextId) -> Option<Binding> {
    CURRENT.with(|current| {
        let mut current = current.borrow_mut();
        if current.as_ref().map(|binding| binding.context) == Some(context) {
            current.take()
        } else {
            None
        }
    })
}

/// Context current on this thread
pub fn current_context() -> Option<ContextId> {
    CURRENT.with(|current| current.borrow().as_ref().map(|binding| binding.context))
}

pub(super) fn current_share_group() -> Option<Arc<ShareGroup>> {
    CURRENT.with(|current| current.borrow().as_ref().map(|binding| Arc::clone(&binding.group)))
}

/// Sharing group of the context current on this thread
pub fn current_group() -> Option<GroupId> {
    current_share_group().map(|group| group.id())
}

/// Create an object in the current context's namespace
///
/// Returns `None` when no context is current.
pub fn create_object(kind: ObjectKind) -> Option<ObjectId> {
    let group = current_share_group()?;
    let id = lock(&group.objects).insert(kind);
    Some(id)
}

/// Kind of `id` if it names a live object in the current namespace
pub fn object_kind(id: ObjectId) -> Option<ObjectKind> {
    let group = current_share_group()?;
    let kind = lock(&group.objects).get(id).copied();
    kind
}

/// Delete `id` from the current namespace, returning whether it existed
pub fn delete_object(id: ObjectId) -> bool {
    current_share_group().is_some_and(|group| lock(&group.objects).remove(id).is_some())
}
