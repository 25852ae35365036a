//! Everything related to `EGLDisplay`.

use std::ffi::{self, CStr};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use eglx_sys::egl;
use eglx_sys::egl::types::{EGLAttrib, EGLDisplay, EGLint};

use raw_window_handle::RawDisplayHandle;

use crate::context::Version;
use crate::error::{ErrorKind, Result};

use super::{last_error, Egl};

/// A wrapper for the `EGLDisplay` and the loader reloaded against it.
#[derive(Debug, Clone)]
pub struct Display {
    // Inner display to simplify passing it around.
    pub(crate) inner: Arc<DisplayInner>,
}

impl Display {
    /// Create EGL display with the native display and initialize it.
    ///
    /// Once initialized the EGL entry points are reloaded against the display,
    /// see [`Display::egl_version`].
    ///
    /// # Safety
    ///
    /// `raw_display` must point to a valid Xlib display that outlives the
    /// returned display.
    pub unsafe fn new(egl: &Egl, raw_display: RawDisplayHandle) -> Result<Self> {
        // Create a EGL display by chaining all display creation functions aborting on
        // `EGL_BAD_ATTRIBUTE`.
        let display = Self::get_platform_display(egl, raw_display)
            .or_else(|err| {
                if err.error_kind() == ErrorKind::BadAttribute {
                    Err(err)
                } else {
                    Self::get_platform_display_ext(egl, raw_display)
                }
            })
            .or_else(|err| {
                if err.error_kind() == ErrorKind::BadAttribute {
                    Err(err)
                } else {
                    Self::get_display(egl, raw_display)
                }
            })
            .map_err(|err| err.with_message("Got no EGL display."))?;

        log::debug!("created {:?}", display);

        Self::initialize_display(egl, display)
    }

    /// The version reported by `eglInitialize`.
    pub fn version(&self) -> Version {
        self.inner.version
    }

    /// The EGL version the entry points were reloaded with.
    pub fn egl_version(&self) -> Version {
        self.inner.egl.version()
    }

    /// The loader reloaded against this display.
    pub fn egl(&self) -> &Egl {
        &self.inner.egl
    }

    /// The raw `EGLDisplay`.
    pub fn raw_display(&self) -> EGLDisplay {
        *self.inner.raw
    }

    /// Get the address of the client Api function.
    ///
    /// Core functions are only returned starting with EGL 1.5, callers that
    /// need to support older implementations must fall back to the library
    /// exporting them.
    pub fn get_proc_address(&self, addr: &CStr) -> *const ffi::c_void {
        unsafe { self.inner.egl.GetProcAddress(addr.as_ptr()) as *const ffi::c_void }
    }

    fn get_platform_display(egl: &Egl, display: RawDisplayHandle) -> Result<EglDisplay> {
        if !egl.GetPlatformDisplay.is_loaded() {
            return Err(ErrorKind::NotSupported("eglGetPlatformDisplay is not supported").into());
        }

        let mut attrs = Vec::<EGLAttrib>::new();
        let (platform, mut display) = match display {
            RawDisplayHandle::Xlib(handle) if egl.has_extension("EGL_KHR_platform_x11") => {
                attrs.push(egl::PLATFORM_X11_SCREEN_KHR as EGLAttrib);
                attrs.push(handle.screen as EGLAttrib);
                (
                    egl::PLATFORM_X11_KHR,
                    handle.display.map_or(std::ptr::null_mut(), |display| display.as_ptr()),
                )
            },
            _ => {
                return Err(
                    ErrorKind::NotSupported("provided display handle is not supported").into()
                )
            },
        };

        // Be explicit here.
        if display.is_null() {
            display = egl::DEFAULT_DISPLAY as *mut _;
        }

        // Push `egl::NONE` to terminate the list.
        attrs.push(egl::NONE as EGLAttrib);

        let display =
            unsafe { egl.GetPlatformDisplay(platform, display as *mut _, attrs.as_ptr()) };

        Self::check_display_error(egl, display).map(EglDisplay::Khr)
    }

    fn get_platform_display_ext(egl: &Egl, display: RawDisplayHandle) -> Result<EglDisplay> {
        if !egl.GetPlatformDisplayEXT.is_loaded() {
            return Err(ErrorKind::NotSupported("eglGetPlatformDisplayEXT is not supported").into());
        }

        let mut attrs = Vec::<EGLint>::new();
        let (platform, mut display) = match display {
            RawDisplayHandle::Xlib(handle) if egl.has_extension("EGL_EXT_platform_x11") => {
                attrs.push(egl::PLATFORM_X11_SCREEN_EXT as EGLint);
                attrs.push(handle.screen as EGLint);
                (
                    egl::PLATFORM_X11_EXT,
                    handle.display.map_or(std::ptr::null_mut(), |display| display.as_ptr()),
                )
            },
            _ => {
                return Err(
                    ErrorKind::NotSupported("provided display handle is not supported").into()
                )
            },
        };

        // Be explicit here.
        if display.is_null() {
            display = egl::DEFAULT_DISPLAY as *mut _;
        }

        // Push `egl::NONE` to terminate the list.
        attrs.push(egl::NONE as EGLint);

        let display =
            unsafe { egl.GetPlatformDisplayEXT(platform, display as *mut _, attrs.as_ptr()) };

        Self::check_display_error(egl, display).map(EglDisplay::Ext)
    }

    fn get_display(egl: &Egl, display: RawDisplayHandle) -> Result<EglDisplay> {
        let mut display = match display {
            RawDisplayHandle::Xlib(handle) => {
                handle.display.map_or(std::ptr::null_mut(), |display| display.as_ptr())
            },
            _ => {
                return Err(
                    ErrorKind::NotSupported("provided display handle is not supported").into()
                )
            },
        };

        if display.is_null() {
            display = egl::DEFAULT_DISPLAY as *mut _;
        }

        let display = unsafe { egl.GetDisplay(display) };
        Self::check_display_error(egl, display).map(EglDisplay::Legacy)
    }

    fn check_display_error(egl: &Egl, display: EGLDisplay) -> Result<EGLDisplay> {
        if display == egl::NO_DISPLAY {
            // EGL doesn't always set an error here, so fall back to a generic one.
            Err(last_error(
                egl,
                ErrorKind::NotSupported("failed to create EGLDisplay without a reason"),
            ))
        } else {
            Ok(display)
        }
    }

    fn initialize_display(egl: &Egl, display: EglDisplay) -> Result<Self> {
        let version = unsafe {
            let (mut major, mut minor) = (0, 0);
            if egl.Initialize(*display, &mut major, &mut minor) == egl::FALSE {
                return Err(last_error(egl, ErrorKind::InitializationFailed)
                    .with_message("Unable to initialize EGL"));
            }

            Version::new(major as u8, minor as u8)
        };

        log::info!("initialized EGL {version} display");

        // The display terminates itself once dropped, so it must be owned before the
        // reload has a chance to fail.
        let mut inner = DisplayInner { egl: egl.clone(), raw: display, version };
        inner.egl = egl.reload(*display)?;

        Ok(Self { inner: Arc::new(inner) })
    }
}

pub(crate) struct DisplayInner {
    /// The loader reloaded against the display.
    pub(crate) egl: Egl,

    /// Pointer to the EGLDisplay.
    pub(crate) raw: EglDisplay,

    /// The version of the egl library.
    pub(crate) version: Version,
}

impl DisplayInner {
    pub(crate) fn supports_create_context(&self) -> bool {
        self.version >= Version::new(1, 5) || self.egl.has_extension("EGL_KHR_create_context")
    }
}

impl fmt::Debug for DisplayInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Display")
            .field("raw", &self.raw)
            .field("version", &self.version)
            .field("egl", &self.egl)
            .finish()
    }
}

impl Drop for DisplayInner {
    fn drop(&mut self) {
        log::debug!("terminating {:?}", self.raw);
        unsafe {
            self.egl.Terminate(*self.raw);
        }
    }
}

/// The way the display was obtained, which decides how window surfaces are
/// created on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EglDisplay {
    /// The display was created with the KHR extension.
    Khr(EGLDisplay),

    /// The display was created with the EXT extension.
    Ext(EGLDisplay),

    /// The display in use is a legacy variant.
    Legacy(EGLDisplay),
}

impl Deref for EglDisplay {
    type Target = EGLDisplay;

    fn deref(&self) -> &Self::Target {
        match self {
            EglDisplay::Khr(display) => display,
            EglDisplay::Ext(display) => display,
            EglDisplay::Legacy(display) => display,
        }
    }
}
