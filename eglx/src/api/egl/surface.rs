//! Everything related to `EGLSurface`.

use std::ffi;
use std::fmt;

use eglx_sys::egl;
use eglx_sys::egl::types::{EGLAttrib, EGLSurface, EGLint};
use raw_window_handle::RawWindowHandle;

use crate::error::{ErrorKind, Result};

use super::config::Config;
use super::context::PossiblyCurrentContext;
use super::display::{Display, EglDisplay};
use super::last_error;

/// Hint for the attribute list size.
const ATTR_SIZE_HINT: usize = 8;

impl Display {
    /// Create the window surface for the Xlib window behind `raw_window_handle`.
    ///
    /// # Safety
    ///
    /// The window must be valid and outlive the surface.
    pub unsafe fn create_window_surface(
        &self,
        config: &Config,
        raw_window_handle: RawWindowHandle,
    ) -> Result<Surface> {
        let mut native_window = match raw_window_handle {
            RawWindowHandle::Xlib(handle) if handle.window != 0 => handle.window,
            _ => {
                return Err(ErrorKind::BadNativeWindow.into());
            },
        };

        let mut attrs = Vec::<EGLAttrib>::with_capacity(ATTR_SIZE_HINT);

        // Push `egl::NONE` to terminate the list.
        attrs.push(egl::NONE as EGLAttrib);

        let config = config.clone();
        let surface = unsafe {
            match self.inner.raw {
                EglDisplay::Khr(display) => self.inner.egl.CreatePlatformWindowSurface(
                    display,
                    *config.raw,
                    &mut native_window as *mut _ as *mut ffi::c_void,
                    attrs.as_ptr(),
                ),
                EglDisplay::Ext(display) => {
                    let attrs: Vec<EGLint> = attrs.into_iter().map(|attr| attr as EGLint).collect();
                    self.inner.egl.CreatePlatformWindowSurfaceEXT(
                        display,
                        *config.raw,
                        &mut native_window as *mut _ as *mut ffi::c_void,
                        attrs.as_ptr(),
                    )
                },
                EglDisplay::Legacy(display) => {
                    let attrs: Vec<EGLint> = attrs.into_iter().map(|attr| attr as EGLint).collect();
                    // The legacy entry point takes the window id by value.
                    self.inner.egl.CreateWindowSurface(
                        display,
                        *config.raw,
                        native_window as egl::NativeWindowType,
                        attrs.as_ptr(),
                    )
                },
            }
        };

        let surface = Self::check_surface_error(self, surface)?;
        log::debug!("created window surface {:?} for window {native_window:#x}", surface);

        Ok(Surface { display: self.clone(), config, raw: surface, native_window })
    }

    fn check_surface_error(&self, surface: EGLSurface) -> Result<EGLSurface> {
        if surface == egl::NO_SURFACE {
            Err(last_error(&self.inner.egl, ErrorKind::BadSurface)
                .with_message("Unable to create EGL surface"))
        } else {
            Ok(surface)
        }
    }
}

/// A wrapper around window `EGLSurface`.
pub struct Surface {
    display: Display,
    config: Config,
    pub(crate) raw: EGLSurface,
    native_window: std::os::raw::c_ulong,
}

impl Surface {
    /// Swaps the underlying back buffers when the surface is not single
    /// buffered.
    pub fn swap_buffers(&self, _context: &PossiblyCurrentContext) -> Result<()> {
        unsafe {
            if self.display.inner.egl.SwapBuffers(*self.display.inner.raw, self.raw) == egl::FALSE
            {
                Err(last_error(&self.display.inner.egl, ErrorKind::BadSurface))
            } else {
                Ok(())
            }
        }
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        unsafe {
            self.display.inner.egl.DestroySurface(*self.display.inner.raw, self.raw);
        }
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("display", &self.display.inner.raw)
            .field("config", &self.config.raw)
            .field("raw", &self.raw)
            .field("native_window", &self.native_window)
            .finish()
    }
}
