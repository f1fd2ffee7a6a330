//! GL entry point loading through GLFW's `glfwGetProcAddress`

#![allow(unsafe_code)]

use std::collections::HashSet;

use glow::HasContext;

use crate::capabilities::{DriverInfo, DriverQuery};
use crate::error::{FrontendError, FrontendResult};

/// Loaded GL function table for the primary context's pixel format
pub struct GlFunctions {
    gl: glow::Context,
}

impl GlFunctions {
    /// Load every entry point for the context current on this thread
    pub(super) fn load(glfw: &glfw::Glfw) -> FrontendResult<Self> {
        // glGetString is needed for the version and extension queries below
        if glfw.get_proc_address_raw("glGetString").is_null() {
            return Err(FrontendError::FunctionLoad(
                "glGetString could not be resolved; is a context current?".to_string(),
            ));
        }

        // SAFETY: a context is current on this thread and the returned
        // pointers are only used while contexts of the same pixel format are
        let gl = unsafe {
            glow::Context::from_loader_function(|name| glfw.get_proc_address_raw(name) as *const _)
        };

        Ok(Self { gl })
    }

    /// Driver-reported (major, minor) version
    pub fn version(&self) -> (u32, u32) {
        let version = self.gl.version();
        (version.major, version.minor)
    }

    /// The loaded function table
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Extensions the driver advertises
    pub fn extensions(&self) -> &HashSet<String> {
        self.gl.supported_extensions()
    }

    fn string(&self, parameter: u32) -> String {
        // SAFETY: plain string query on the context current at load time
        unsafe { self.gl.get_parameter_string(parameter) }
    }
}

impl DriverQuery for GlFunctions {
    fn has_extension(&self, extension: &str) -> bool {
        self.extensions().contains(extension)
    }

    fn driver_info(&self) -> DriverInfo {
        DriverInfo {
            vendor: self.string(glow::VENDOR),
            renderer: self.string(glow::RENDERER),
            version: self.string(glow::VERSION),
        }
    }
}
