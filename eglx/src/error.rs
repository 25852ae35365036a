//! Eglx error handling.

use std::borrow::Cow;
use std::fmt;

/// A specialized [`Result`] type for graphics operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for all the EGL and Xlib operations.
#[derive(Debug, Clone)]
pub struct Error {
    /// The raw code of the underlying error.
    raw_code: Option<i64>,

    /// The message describing the failed step, if any.
    message: Option<Cow<'static, str>>,

    /// The simplified error kind to handle mathing.
    kind: ErrorKind,
}

impl Error {
    pub(crate) fn new(
        raw_code: Option<i64>,
        message: Option<Cow<'static, str>>,
        kind: ErrorKind,
    ) -> Self {
        Self { raw_code, message, kind }
    }

    /// Replace the message describing the failure, keeping the kind and the
    /// raw code.
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Helper to check that error is [`ErrorKind::NotSupported`].
    #[inline]
    pub fn not_supported(&self) -> bool {
        matches!(&self.kind, ErrorKind::NotSupported(_))
    }

    /// The underlying error kind.
    #[inline]
    pub fn error_kind(&self) -> ErrorKind {
        self.kind
    }

    /// The underlying raw code in case it's present.
    #[inline]
    pub fn raw_code(&self) -> Option<i64> {
        self.raw_code
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(raw_code) = self.raw_code {
            write!(f, "[{raw_code:x}] ")?;
        }

        let msg = match self.message.as_ref() {
            Some(message) => message.as_ref(),
            None => self.kind.as_str(),
        };

        write!(f, "{msg}")
    }
}

impl std::error::Error for Error {}

/// Build an error with just a kind.
impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error { raw_code: None, message: None, kind }
    }
}

/// A list specifying general categoires of native platform graphics interface
/// errors.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested library wasn't found or some required symbol in it was
    /// missing.
    NotFound,

    /// Failed to perform resource initialization.
    InitializationFailed,

    /// Can't access a requested resource.
    ///
    /// For example when trying to make a context current while it's current on
    /// another thread.
    BadAccess,

    /// An operation could not be completed, because it failed to allocate
    /// enough memory.
    OutOfMemory,

    /// An recognized attribute value was passed.
    BadAttribute,

    /// The context is no longer valid.
    BadContext,

    /// Invalid config was passed.
    BadConfig,

    /// The current surface of the calling thread is no longer valid.
    BadCurrentSurface,

    /// The display is no longer valid.
    BadDisplay,

    /// The surface is invalid.
    BadSurface,

    /// The pixmap is invalid.
    BadPixmap,

    /// Arguments are inconsistent. For example when shared contexts are not
    /// compatible.
    BadMatch,

    /// One or more argument values are invalid.
    BadParameter,

    /// Bad native pixmap was provided.
    BadNativePixmap,

    /// Bad native window was provided.
    BadNativeWindow,

    /// The context was lost.
    ContextLost,

    /// The operation is not supported by the platform.
    NotSupported(&'static str),

    /// The misc error that can't be classified occurred.
    Misc,
}

impl ErrorKind {
    pub(crate) fn as_str(&self) -> &'static str {
        use ErrorKind::*;
        match *self {
            NotFound => "not found",
            InitializationFailed => "initialization failed",
            BadAccess => "access to the resource failed",
            OutOfMemory => "out of memory",
            BadAttribute => "an unrecognized attribute or attribute value was passed",
            BadContext => "argument does not name a valid context",
            BadConfig => "argument does not name a valid config",
            BadCurrentSurface => "the current surface of the calling thread is no longer valid",
            BadDisplay => "argument does not name a valid display",
            BadSurface => "argument does not name a valid surface",
            BadPixmap => "argument does not name a valid pixmap",
            BadMatch => "arguments are inconsistent",
            BadParameter => "one or more argument values are invalid",
            BadNativePixmap => "argument does not refer to a valid native pixmap",
            BadNativeWindow => "argument does not refer to a valid native window",
            ContextLost => "context loss",
            NotSupported(reason) => reason,
            Misc => "misc platform error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_raw_code_in_hex() {
        let error = Error::new(Some(0x300b), None, ErrorKind::BadNativeWindow)
            .with_message("Unable to create EGL surface");
        assert_eq!(error.to_string(), "[300b] Unable to create EGL surface");
    }

    #[test]
    fn display_falls_back_to_kind() {
        let error: Error = ErrorKind::BadConfig.into();
        assert_eq!(error.to_string(), "argument does not name a valid config");
        assert_eq!(error.raw_code(), None);
    }

    #[test]
    fn with_message_keeps_kind_and_code() {
        let error = Error::new(Some(12), None, ErrorKind::NotSupported("no x11"))
            .with_message("Got no EGL display.");
        assert!(error.not_supported());
        assert_eq!(error.raw_code(), Some(12));
        assert_eq!(error.to_string(), "[c] Got no EGL display.");
    }
}
