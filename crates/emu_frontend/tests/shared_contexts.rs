//! Object sharing between the primary context and shared contexts

mod common;

use std::thread;

use common::{build_info, headless_config, headless_system};
use emu_frontend::backend::headless::gpu::{self, ObjectKind};
use emu_frontend::context::{ContextCreationOptions, GraphicsContext, SharedContextFactory};
use emu_frontend::present::PresentSurface;
use emu_frontend::window::{WindowDescriptor, WindowManager, WindowSystem};

fn desc() -> WindowDescriptor {
    WindowDescriptor {
        title: "shared".to_string(),
        width: 640,
        height: 360,
    }
}

#[test]
fn test_object_visible_from_other_thread() {
    let options = ContextCreationOptions::default();
    let mut system = headless_system();
    system.create_render_window(&desc(), &options).unwrap();
    system.create_anchor_window(&options).unwrap();
    system.create_primary_context(&options).unwrap();

    let texture = gpu::create_object(ObjectKind::Texture).unwrap();
    let mut shared = system.create_shared_context(&options).unwrap();
    system.done_primary_current();

    let seen = thread::spawn(move || {
        shared.make_current();
        let kind = gpu::object_kind(texture);
        let buffer = gpu::create_object(ObjectKind::Buffer);
        shared.done_current();
        (kind, buffer)
    })
    .join()
    .unwrap();

    assert_eq!(seen.0, Some(ObjectKind::Texture));

    // And the other way round: the shared context's object shows up on the primary
    system.make_primary_current();
    assert_eq!(gpu::object_kind(seen.1.unwrap()), Some(ObjectKind::Buffer));
    system.done_primary_current();
}

#[test]
fn test_objects_survive_creator_while_sibling_lives() {
    let options = ContextCreationOptions::default();
    let mut system = headless_system();
    system.create_render_window(&desc(), &options).unwrap();
    system.create_anchor_window(&options).unwrap();
    system.create_primary_context(&options).unwrap();

    let mut creator = system.create_shared_context(&options).unwrap();
    let mut sibling = system.create_shared_context(&options).unwrap();
    system.done_primary_current();

    creator.make_current();
    let program = gpu::create_object(ObjectKind::Program).unwrap();
    creator.done_current();
    drop(creator);

    sibling.make_current();
    assert_eq!(gpu::object_kind(program), Some(ObjectKind::Program));
    assert!(gpu::delete_object(program));
    assert_eq!(gpu::object_kind(program), None);
    sibling.done_current();
}

#[test]
fn test_core_context_shares_with_primary_across_threads() {
    let mut manager = WindowManager::new(headless_system(), &headless_config(), &build_info()).unwrap();
    let mut core = manager.take_core_context().unwrap();

    let texture = thread::spawn(move || {
        core.make_current();
        let texture = gpu::create_object(ObjectKind::Texture);
        let group = gpu::current_group();
        core.done_current();
        (texture, group)
    })
    .join()
    .unwrap();

    let mut extra = manager.create_shared_context().unwrap();
    extra.make_current();
    assert_eq!(gpu::current_group(), texture.1);
    assert_eq!(gpu::object_kind(texture.0.unwrap()), Some(ObjectKind::Texture));
    extra.done_current();
}

#[test]
fn test_factory_leaves_no_context_current() {
    let mut manager = WindowManager::new(headless_system(), &headless_config(), &build_info()).unwrap();

    let context = manager.create_shared_context().unwrap();
    assert_eq!(gpu::current_context(), None);
    assert!(!context.is_current());
}

#[test]
fn test_context_current_on_one_thread_only() {
    let options = ContextCreationOptions::default();
    let mut system = headless_system();
    system.create_render_window(&desc(), &options).unwrap();
    system.create_anchor_window(&options).unwrap();
    system.create_primary_context(&options).unwrap();
    let shared = system.create_shared_context(&options).unwrap();
    system.done_primary_current();

    let shared = std::sync::Arc::new(std::sync::Mutex::new(shared));
    shared.lock().unwrap().make_current();

    let other = std::sync::Arc::clone(&shared);
    let bound_elsewhere = thread::spawn(move || {
        let mut context = other.lock().unwrap();
        context.make_current();
        context.is_current()
    })
    .join()
    .unwrap();

    assert!(!bound_elsewhere);
    assert!(shared.lock().unwrap().is_current());
    shared.lock().unwrap().done_current();
}
