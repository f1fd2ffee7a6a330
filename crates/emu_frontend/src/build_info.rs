//! Build identity used for the window title and the startup version line

/// Product name shown in the window title
pub const PRODUCT_NAME: &str = "yuzu";

/// Identity of the running build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Product name
    pub product: String,
    /// Version string
    pub version: String,
    /// Source-control branch the build was made from
    pub branch: String,
    /// Source-control description (usually a short commit hash)
    pub description: String,
}

impl BuildInfo {
    /// Create build info from explicit fields
    pub fn new(
        product: impl Into<String>,
        version: impl Into<String>,
        branch: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            product: product.into(),
            version: version.into(),
            branch: branch.into(),
            description: description.into(),
        }
    }

    /// Identity of this binary, with SCM fields captured at build time
    pub fn current() -> Self {
        Self::new(
            PRODUCT_NAME,
            env!("CARGO_PKG_VERSION"),
            env!("FRONTEND_SCM_BRANCH"),
            env!("FRONTEND_SCM_DESC"),
        )
    }

    /// `<product> <version> | <branch>-<description>`
    pub fn window_title(&self) -> String {
        format!(
            "{} {} | {}-{}",
            self.product, self.version, self.branch, self.description
        )
    }

    /// `<version> | <branch>-<description>`, as logged at startup
    pub fn version_line(&self) -> String {
        format!("{} | {}-{}", self.version, self.branch, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_title_format() {
        let info = BuildInfo::new("yuzu", "1.0", "master", "abcd123");
        assert_eq!(info.window_title(), "yuzu 1.0 | master-abcd123");
        assert_eq!(info.version_line(), "1.0 | master-abcd123");
    }

    #[test]
    fn test_current_has_fields() {
        let info = BuildInfo::current();
        assert_eq!(info.product, PRODUCT_NAME);
        assert!(!info.branch.is_empty());
        assert!(!info.description.is_empty());
    }
}
