//! Context creation attributes and the version type shared by EGL and GL.

use std::fmt;

/// The builder to help customizing context
#[derive(Default, Debug, Clone)]
pub struct ContextAttributesBuilder {
    attributes: ContextAttributes,
}

impl ContextAttributesBuilder {
    /// Create new builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the *GL* api for the context.
    ///
    /// By default OpenGL 2.1 is requested, since immediate mode drawing needs
    /// the legacy fixed-function pipeline.
    pub fn with_context_api(mut self, api: ContextApi) -> Self {
        self.attributes.api = api;
        self
    }

    /// Build the context attributes.
    pub fn build(self) -> ContextAttributes {
        self.attributes
    }
}

/// The attributes that are used to create a graphics context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextAttributes {
    pub(crate) api: ContextApi,
}

impl ContextAttributes {
    /// The api requested for the context.
    pub fn api(&self) -> ContextApi {
        self.api
    }
}

impl Default for ContextAttributes {
    fn default() -> Self {
        Self { api: ContextApi::OpenGl(Some(Version::new(2, 1))) }
    }
}

/// The Api used by the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextApi {
    /// OpenGL Api version that should be used by the context.
    ///
    /// When using `None` as `Version` any OpenGL context will be picked.
    OpenGl(Option<Version>),

    /// OpenGL ES Api version that should be used by the context.
    ///
    /// When using `None` as `Version` the latest **known** major version is
    /// picked.
    Gles(Option<Version>),
}

impl ContextApi {
    pub(crate) fn version(&self) -> Option<Version> {
        match self {
            Self::OpenGl(version) => *version,
            Self::Gles(version) => *version,
        }
    }
}

/// A version used by the EGL client and by the loaded GL functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major version of the Api.
    pub major: u8,
    /// Minor version of the Api.
    pub minor: u8,
}

impl Version {
    /// Create new version with the given `major` and `minor` values.
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Read the leading `<major>.<minor>` pair of a version string.
    ///
    /// Anything after the pair, such as vendor information, is ignored. Returns
    /// `None` when the string doesn't start with a version pair.
    pub fn parse(version: &str) -> Option<Self> {
        let version = version.trim_start();
        let (major, rest) = split_number(version)?;
        let rest = rest.strip_prefix('.')?;
        let (minor, _) = split_number(rest)?;
        Some(Self::new(major, minor))
    }
}

fn split_number(input: &str) -> Option<(u8, &str)> {
    let end = input.find(|c: char| !c.is_ascii_digit()).unwrap_or(input.len());
    let number = input[..end].parse().ok()?;
    Some((number, &input[end..]))
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_version() {
        assert_eq!(Version::parse("1.5"), Some(Version::new(1, 5)));
    }

    #[test]
    fn parse_ignores_vendor_suffix() {
        assert_eq!(Version::parse("1.4 (DRI2)"), Some(Version::new(1, 4)));
        assert_eq!(Version::parse("4.6.0 NVIDIA 535.54"), Some(Version::new(4, 6)));
        assert_eq!(Version::parse("2.1 Mesa 23.1.4"), Some(Version::new(2, 1)));
    }

    #[test]
    fn parse_rejects_missing_pair() {
        assert_eq!(Version::parse(""), None);
        assert_eq!(Version::parse("Mesa"), None);
        assert_eq!(Version::parse("3"), None);
        assert_eq!(Version::parse("3."), None);
    }

    #[test]
    fn versions_order_by_major_then_minor() {
        assert!(Version::new(1, 5) > Version::new(1, 4));
        assert!(Version::new(2, 0) > Version::new(1, 5));
        assert_eq!(Version::new(2, 1).to_string(), "2.1");
    }

    #[test]
    fn default_attributes_request_legacy_opengl() {
        let attributes = ContextAttributesBuilder::new().build();
        assert_eq!(attributes.api(), ContextApi::OpenGl(Some(Version::new(2, 1))));
        assert_eq!(attributes.api().version(), Some(Version::new(2, 1)));
    }

    #[test]
    fn builder_overrides_api() {
        let attributes =
            ContextAttributesBuilder::new().with_context_api(ContextApi::Gles(None)).build();
        assert_eq!(attributes.api(), ContextApi::Gles(None));
        assert_eq!(attributes.api().version(), None);
    }
}
