//! # Backend Module
//!
//! Window system implementations of [`crate::window::WindowSystem`].
//!
//! ## Organization
//!
//! - **glfw_gl**: GLFW windows with OpenGL contexts, GL entry points loaded through `glow`
//! - **headless**: Null window system with simulated sharing groups, for CI and smoke runs
//!
//! The backend is picked at startup from [`crate::config::BackendKind`]; the
//! window manager is generic over it, so there is no dynamic dispatch on the
//! present path.

pub mod glfw_gl;
pub mod headless;

pub use glfw_gl::{GlFunctions, GlfwSharedContext, GlfwWindowSystem};
pub use headless::{HeadlessContext, HeadlessDriver, HeadlessEvent, HeadlessHandle, HeadlessWindowSystem};
