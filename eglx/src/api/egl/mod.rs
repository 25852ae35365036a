//! EGL platform Api.
//!
//! The EGL library is opened at runtime. Entry points are resolved once
//! without a display to create and initialize one, and then resolved again
//! against the initialized display, which is when the display extensions and
//! the real EGL version become known.

use std::collections::HashSet;
use std::ffi::{self, CStr, CString};
use std::ops::Deref;
use std::os::raw::c_char;
use std::ptr;

use eglx_sys::egl;
use eglx_sys::egl::types::{EGLDisplay, EGLenum, EGLint};

use libloading::Library;

use crate::context::Version;
use crate::error::{Error, ErrorKind, Result};
use crate::lib_loading::{SymLoading, SymWrapper};

pub mod config;
pub mod context;
pub mod display;
pub mod surface;

const EGL_LIB_PATHS: &[&str] = &["libEGL.so.1", "libEGL.so"];

type EglGetProcAddress = unsafe extern "C" fn(*const c_char) -> *const ffi::c_void;

/// The version used when the EGL implementation doesn't report one.
const FALLBACK_VERSION: Version = Version::new(1, 0);

/// The loaded EGL entry points, together with the EGL version and the
/// extensions they were probed with.
#[derive(Clone)]
pub struct Egl {
    api: SymWrapper<egl::Egl>,
    version: Version,
    extensions: HashSet<String>,
}

impl SymLoading for egl::Egl {
    unsafe fn load_with(lib: &Library) -> Self {
        let get_proc_address = unsafe { lib.get::<EglGetProcAddress>(b"eglGetProcAddress\0") }
            .ok()
            .map(|sym| *sym);

        let loader = move |sym_name: &'static str| -> *const ffi::c_void {
            let sym_name = match CString::new(sym_name.as_bytes()) {
                Ok(sym_name) => sym_name,
                Err(_) => return ptr::null(),
            };

            // Check if the symbol is available in the library directly. If it is, just
            // return it.
            if let Ok(sym) = unsafe { lib.get::<*const ffi::c_void>(sym_name.as_bytes_with_nul()) } {
                return *sym;
            }

            // Prior to EGL 1.5 `eglGetProcAddress` is only able to look up extension
            // functions, hence the two-part lookup.
            match get_proc_address {
                Some(get_proc_address) => unsafe { get_proc_address(sym_name.as_ptr()) },
                None => ptr::null(),
            }
        };

        Self::load_with(loader)
    }
}

impl Egl {
    /// Open the EGL library and resolve its entry points without a display.
    ///
    /// The version is probed on the current display if there's one, and on
    /// `EGL_NO_DISPLAY` otherwise, which yields the client version on EGL 1.5.
    pub fn load() -> Result<Self> {
        let api = unsafe { SymWrapper::<egl::Egl>::new(EGL_LIB_PATHS) }
            .map_err(|err| err.with_message("Unable to load EGL."))?;
        Self::check_core_symbols(&api)
            .map_err(|err| err.with_message("Unable to load EGL."))?;

        let display = if api.GetCurrentDisplay.is_loaded() {
            unsafe { api.GetCurrentDisplay() }
        } else {
            egl::NO_DISPLAY
        };
        let version = query_version(&api, display);
        let extensions = get_extensions(&api, display);
        log::debug!("EGL {version} loaded with {} client extensions", extensions.len());

        Ok(Self { api, version, extensions })
    }

    /// Resolve the entry points again and probe the version and the extensions
    /// against the initialized `display`.
    pub fn reload(&self, display: EGLDisplay) -> Result<Self> {
        let api = unsafe { self.api.reload() };
        Self::check_core_symbols(&api)
            .map_err(|err| err.with_message("Unable to reload EGL."))?;

        let version = query_version(&api, display);
        let extensions = get_extensions(&api, display);
        log::debug!("EGL {version} reloaded with {} display extensions", extensions.len());

        Ok(Self { api, version, extensions })
    }

    /// The EGL version reported by the last load.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Whether the extension was reported by the last load.
    pub fn has_extension(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    fn check_core_symbols(api: &egl::Egl) -> Result<()> {
        let required = [
            ("eglGetProcAddress", api.GetProcAddress.is_loaded()),
            ("eglGetDisplay", api.GetDisplay.is_loaded()),
            ("eglInitialize", api.Initialize.is_loaded()),
            ("eglQueryString", api.QueryString.is_loaded()),
            ("eglGetError", api.GetError.is_loaded()),
        ];

        match required.iter().find(|(_, loaded)| !loaded) {
            Some((name, _)) => {
                log::warn!("{name} is missing from the EGL library");
                Err(ErrorKind::NotFound.into())
            },
            None => Ok(()),
        }
    }
}

impl Deref for Egl {
    type Target = egl::Egl;

    fn deref(&self) -> &Self::Target {
        &self.api
    }
}

impl std::fmt::Debug for Egl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Egl")
            .field("version", &self.version)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

fn query_version(api: &egl::Egl, display: EGLDisplay) -> Version {
    let version = unsafe {
        let version = api.QueryString(display, egl::VERSION as EGLint);
        // A display-less query is allowed to fail, don't leave the error around.
        api.GetError();
        version
    };

    let version =
        (!version.is_null()).then(|| unsafe { CStr::from_ptr(version) }.to_string_lossy());
    parse_version(version.as_deref())
}

/// The version from the `EGL_VERSION` string, 1.0 when there's none.
pub(crate) fn parse_version(version: Option<&str>) -> Version {
    version.and_then(Version::parse).unwrap_or(FALLBACK_VERSION)
}

/// Collect EGL extensions for the given `display`.
fn get_extensions(api: &egl::Egl, display: EGLDisplay) -> HashSet<String> {
    unsafe {
        let extensions = api.QueryString(display, egl::EXTENSIONS as EGLint);
        api.GetError();

        if extensions.is_null() {
            return HashSet::new();
        }

        let extensions = CStr::from_ptr(extensions).to_string_lossy();
        parse_extensions(&extensions)
    }
}

pub(crate) fn parse_extensions(extensions: &str) -> HashSet<String> {
    extensions.split_whitespace().map(String::from).collect()
}

/// Obtain the error from the EGL.
pub(crate) fn check_error(egl: &Egl) -> Result<()> {
    let raw_code = unsafe { egl.GetError() } as EGLenum;
    match error_kind(raw_code) {
        None => Ok(()),
        Some(kind) => Err(Error::new(Some(raw_code as i64), None, kind)),
    }
}

/// Map the raw `eglGetError` code to the error kind, `None` meaning success.
pub(crate) fn error_kind(raw_code: EGLenum) -> Option<ErrorKind> {
    let kind = match raw_code {
        egl::SUCCESS => return None,
        egl::NOT_INITIALIZED => ErrorKind::InitializationFailed,
        egl::BAD_ACCESS => ErrorKind::BadAccess,
        egl::BAD_ALLOC => ErrorKind::OutOfMemory,
        egl::BAD_ATTRIBUTE => ErrorKind::BadAttribute,
        egl::BAD_CONTEXT => ErrorKind::BadContext,
        egl::BAD_CONFIG => ErrorKind::BadConfig,
        egl::BAD_CURRENT_SURFACE => ErrorKind::BadCurrentSurface,
        egl::BAD_DISPLAY => ErrorKind::BadDisplay,
        egl::BAD_SURFACE => ErrorKind::BadSurface,
        egl::BAD_MATCH => ErrorKind::BadMatch,
        egl::BAD_PARAMETER => ErrorKind::BadParameter,
        egl::BAD_NATIVE_PIXMAP => ErrorKind::BadNativePixmap,
        egl::BAD_NATIVE_WINDOW => ErrorKind::BadNativeWindow,
        egl::CONTEXT_LOST => ErrorKind::ContextLost,
        _ => ErrorKind::Misc,
    };

    Some(kind)
}

/// The error left by a failed call, or `kind` when EGL recorded none.
pub(crate) fn last_error(egl: &Egl, kind: ErrorKind) -> Error {
    check_error(egl).err().unwrap_or_else(|| kind.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_not_an_error() {
        assert_eq!(error_kind(egl::SUCCESS), None);
    }

    #[test]
    fn egl_codes_map_to_kinds() {
        assert_eq!(error_kind(egl::NOT_INITIALIZED), Some(ErrorKind::InitializationFailed));
        assert_eq!(error_kind(egl::BAD_ALLOC), Some(ErrorKind::OutOfMemory));
        assert_eq!(error_kind(egl::BAD_CONFIG), Some(ErrorKind::BadConfig));
        assert_eq!(error_kind(egl::BAD_NATIVE_WINDOW), Some(ErrorKind::BadNativeWindow));
        assert_eq!(error_kind(egl::BAD_MATCH), Some(ErrorKind::BadMatch));
        assert_eq!(error_kind(egl::CONTEXT_LOST), Some(ErrorKind::ContextLost));
    }

    #[test]
    fn unknown_codes_are_misc() {
        assert_eq!(error_kind(0x1234), Some(ErrorKind::Misc));
    }

    #[test]
    fn missing_or_unparsable_version_is_1_0() {
        assert_eq!(parse_version(None), Version::new(1, 0));
        assert_eq!(parse_version(Some("garbage")), Version::new(1, 0));
        assert_eq!(parse_version(Some("")), Version::new(1, 0));
        assert_eq!(parse_version(Some("1.5 Mesa Project")), Version::new(1, 5));
    }

    #[test]
    fn extensions_split_on_whitespace() {
        let extensions = parse_extensions(
            "EGL_KHR_create_context  EGL_KHR_platform_x11\nEGL_EXT_platform_base ",
        );
        assert_eq!(extensions.len(), 3);
        assert!(extensions.contains("EGL_KHR_platform_x11"));
        assert!(extensions.contains("EGL_EXT_platform_base"));
        assert!(parse_extensions("").is_empty());
    }
}
