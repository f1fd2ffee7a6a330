//! # GPU Capability Validation
//!
//! The renderer relies on a fixed set of GL extensions. They are checked once,
//! after the primary context is current and the GL entry points are loaded;
//! a missing extension is fatal.
//!
//! Every extension is evaluated, even after the first miss, so one run tells
//! the operator everything the driver lacks.

use std::collections::HashSet;
use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Set of required capabilities
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CapabilitySet: u16 {
        /// Immutable buffer storage
        const BUFFER_STORAGE = 1 << 0;
        /// Direct state access
        const DIRECT_STATE_ACCESS = 1 << 1;
        /// Packed 10/11/11-bit float vertex attributes
        const VERTEX_TYPE_10F_11F_11F_REV = 1 << 2;
        /// Mirrored clamp-to-edge texture wrap
        const TEXTURE_MIRROR_CLAMP_TO_EDGE = 1 << 3;
        /// Binding multiple resources in one call
        const MULTI_BIND = 1 << 4;
        /// Clip-space origin and depth range control
        const CLIP_CONTROL = 1 << 5;
        /// S3TC block-compressed textures
        const TEXTURE_COMPRESSION_S3TC = 1 << 6;
        /// Red/green compressed textures
        const TEXTURE_COMPRESSION_RGTC = 1 << 7;
        /// Floating point depth buffers
        const DEPTH_BUFFER_FLOAT = 1 << 8;
    }
}

/// A single required capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `ARB_buffer_storage`
    BufferStorage,
    /// `ARB_direct_state_access`
    DirectStateAccess,
    /// `ARB_vertex_type_10f_11f_11f_rev`
    VertexType10f11f11fRev,
    /// `ARB_texture_mirror_clamp_to_edge`
    TextureMirrorClampToEdge,
    /// `ARB_multi_bind`
    MultiBind,
    /// `ARB_clip_control`
    ClipControl,
    /// `EXT_texture_compression_s3tc`
    TextureCompressionS3tc,
    /// `ARB_texture_compression_rgtc`
    TextureCompressionRgtc,
    /// `ARB_depth_buffer_float`
    DepthBufferFloat,
}

/// Required capabilities in reporting order
pub const REQUIRED_CAPABILITIES: [Capability; 9] = [
    Capability::BufferStorage,
    Capability::DirectStateAccess,
    Capability::VertexType10f11f11fRev,
    Capability::TextureMirrorClampToEdge,
    Capability::MultiBind,
    Capability::ClipControl,
    // Texture format support
    Capability::TextureCompressionS3tc,
    Capability::TextureCompressionRgtc,
    Capability::DepthBufferFloat,
];

impl Capability {
    /// All required capabilities
    pub fn all() -> impl Iterator<Item = Self> {
        REQUIRED_CAPABILITIES.into_iter()
    }

    /// Extension name as reported to the operator
    pub const fn name(self) -> &'static str {
        match self {
            Self::BufferStorage => "ARB_buffer_storage",
            Self::DirectStateAccess => "ARB_direct_state_access",
            Self::VertexType10f11f11fRev => "ARB_vertex_type_10f_11f_11f_rev",
            Self::TextureMirrorClampToEdge => "ARB_texture_mirror_clamp_to_edge",
            Self::MultiBind => "ARB_multi_bind",
            Self::ClipControl => "ARB_clip_control",
            Self::TextureCompressionS3tc => "EXT_texture_compression_s3tc",
            Self::TextureCompressionRgtc => "ARB_texture_compression_rgtc",
            Self::DepthBufferFloat => "ARB_depth_buffer_float",
        }
    }

    /// Extension string as advertised by the driver (`GL_` prefixed)
    pub const fn extension_string(self) -> &'static str {
        match self {
            Self::BufferStorage => "GL_ARB_buffer_storage",
            Self::DirectStateAccess => "GL_ARB_direct_state_access",
            Self::VertexType10f11f11fRev => "GL_ARB_vertex_type_10f_11f_11f_rev",
            Self::TextureMirrorClampToEdge => "GL_ARB_texture_mirror_clamp_to_edge",
            Self::MultiBind => "GL_ARB_multi_bind",
            Self::ClipControl => "GL_ARB_clip_control",
            Self::TextureCompressionS3tc => "GL_EXT_texture_compression_s3tc",
            Self::TextureCompressionRgtc => "GL_ARB_texture_compression_rgtc",
            Self::DepthBufferFloat => "GL_ARB_depth_buffer_float",
        }
    }

    /// Flag for this capability
    pub const fn flag(self) -> CapabilitySet {
        match self {
            Self::BufferStorage => CapabilitySet::BUFFER_STORAGE,
            Self::DirectStateAccess => CapabilitySet::DIRECT_STATE_ACCESS,
            Self::VertexType10f11f11fRev => CapabilitySet::VERTEX_TYPE_10F_11F_11F_REV,
            Self::TextureMirrorClampToEdge => CapabilitySet::TEXTURE_MIRROR_CLAMP_TO_EDGE,
            Self::MultiBind => CapabilitySet::MULTI_BIND,
            Self::ClipControl => CapabilitySet::CLIP_CONTROL,
            Self::TextureCompressionS3tc => CapabilitySet::TEXTURE_COMPRESSION_S3TC,
            Self::TextureCompressionRgtc => CapabilitySet::TEXTURE_COMPRESSION_RGTC,
            Self::DepthBufferFloat => CapabilitySet::DEPTH_BUFFER_FLOAT,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Driver identification strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    /// `GL_VENDOR`
    pub vendor: String,
    /// `GL_RENDERER`
    pub renderer: String,
    /// `GL_VERSION`
    pub version: String,
}

impl Default for DriverInfo {
    fn default() -> Self {
        Self {
            vendor: "unknown".to_string(),
            renderer: "unknown".to_string(),
            version: "unknown".to_string(),
        }
    }
}

/// Read access to the active driver, valid while a context is current
pub trait DriverQuery {
    /// Whether the driver advertises `extension` (a `GL_` prefixed string)
    fn has_extension(&self, extension: &str) -> bool;

    /// Vendor, renderer and version strings
    fn driver_info(&self) -> DriverInfo {
        DriverInfo::default()
    }
}

impl DriverQuery for HashSet<String> {
    fn has_extension(&self, extension: &str) -> bool {
        self.contains(extension)
            || extension
                .strip_prefix("GL_")
                .is_some_and(|bare| self.contains(bare))
    }
}

/// Outcome of a capability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityReport {
    /// Capabilities the driver advertises
    pub present: CapabilitySet,
    /// Capabilities the driver lacks
    pub missing: CapabilitySet,
}

impl CapabilityReport {
    /// True when nothing is missing
    pub fn is_supported(&self) -> bool {
        self.missing.is_empty()
    }

    /// Missing capabilities in reporting order
    pub fn missing_capabilities(&self) -> Vec<Capability> {
        Capability::all()
            .filter(|capability| self.missing.contains(capability.flag()))
            .collect()
    }

    /// Names of the missing capabilities in reporting order
    pub fn missing_names(&self) -> Vec<&'static str> {
        self.missing_capabilities()
            .into_iter()
            .map(Capability::name)
            .collect()
    }
}

/// Check every required capability against `driver`
///
/// Logs one error per missing capability.
pub fn check_required_capabilities<D: DriverQuery + ?Sized>(driver: &D) -> CapabilityReport {
    let mut report = CapabilityReport {
        present: CapabilitySet::empty(),
        missing: CapabilitySet::empty(),
    };

    for capability in Capability::all() {
        if driver.has_extension(capability.extension_string()) {
            report.present |= capability.flag();
        } else {
            report.missing |= capability.flag();
        }
    }

    for capability in report.missing_capabilities() {
        log::error!("Unsupported GL extension: {}", capability);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver_without(missing: &[Capability]) -> HashSet<String> {
        Capability::all()
            .filter(|capability| !missing.contains(capability))
            .map(|capability| capability.extension_string().to_string())
            .collect()
    }

    #[test]
    fn test_all_present_is_supported() {
        let report = check_required_capabilities(&driver_without(&[]));
        assert!(report.is_supported());
        assert!(report.missing_names().is_empty());
        assert_eq!(report.present, CapabilitySet::all());
    }

    #[test]
    fn test_reports_exactly_the_missing_set() {
        // Walk every subset of the nine capabilities
        for mask in 0u16..(1 << REQUIRED_CAPABILITIES.len()) {
            let missing: Vec<Capability> = REQUIRED_CAPABILITIES
                .iter()
                .enumerate()
                .filter(|(index, _)| mask & (1 << index) != 0)
                .map(|(_, capability)| *capability)
                .collect();

            let report = check_required_capabilities(&driver_without(&missing));

            assert_eq!(report.missing_capabilities(), missing, "mask {:#011b}", mask);
            assert_eq!(report.is_supported(), missing.is_empty());
            assert_eq!(report.present | report.missing, CapabilitySet::all());
            assert!((report.present & report.missing).is_empty());
        }
    }

    #[test]
    fn test_bare_extension_names_are_accepted() {
        let driver: HashSet<String> = Capability::all()
            .map(|capability| capability.name().to_string())
            .collect();
        assert!(check_required_capabilities(&driver).is_supported());
    }

    #[test]
    fn test_empty_driver_reports_all_names() {
        crate::foundation::logging::init_for_tests();

        let report = check_required_capabilities(&HashSet::new());
        assert_eq!(
            report.missing_names(),
            vec![
                "ARB_buffer_storage",
                "ARB_direct_state_access",
                "ARB_vertex_type_10f_11f_11f_rev",
                "ARB_texture_mirror_clamp_to_edge",
                "ARB_multi_bind",
                "ARB_clip_control",
                "EXT_texture_compression_s3tc",
                "ARB_texture_compression_rgtc",
                "ARB_depth_buffer_float",
            ]
        );
    }

    #[test]
    fn test_flags_are_distinct() {
        let mut seen = CapabilitySet::empty();
        for capability in Capability::all() {
            assert!(!seen.intersects(capability.flag()));
            seen |= capability.flag();
        }
        assert_eq!(seen, CapabilitySet::all());
    }
}
