//! Everything related to `EGLContext` management.

use std::ffi::{self, CStr};
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use eglx_sys::egl::types::{EGLenum, EGLint};
use eglx_sys::{egl, EGLContext};

use crate::context::{ContextApi, ContextAttributes, Version};
use crate::error::{ErrorKind, Result};

use super::config::Config;
use super::display::Display;
use super::last_error;
use super::surface::Surface;

impl Display {
    /// Bind the requested client Api and create a context for it.
    pub fn create_context(
        &self,
        config: &Config,
        context_attributes: &ContextAttributes,
    ) -> Result<NotCurrentContext> {
        let api = match context_attributes.api {
            ContextApi::OpenGl(_) => egl::OPENGL_API,
            ContextApi::Gles(_) => egl::OPENGL_ES_API,
        };

        let attrs = context_attributes_list(
            context_attributes,
            self.inner.version,
            self.inner.supports_create_context(),
        );

        unsafe {
            if self.inner.egl.BindAPI(api) == egl::FALSE {
                return Err(last_error(&self.inner.egl, ErrorKind::BadParameter)
                    .with_message("eglBindAPI: bind EGL Api failed"));
            }

            let context = self.inner.egl.CreateContext(
                *self.inner.raw,
                *config.raw,
                egl::NO_CONTEXT,
                attrs.as_ptr(),
            );

            if context == egl::NO_CONTEXT {
                return Err(last_error(&self.inner.egl, ErrorKind::BadContext)
                    .with_message("Unable to create EGL context"));
            }

            log::debug!("created {:?} context {:?}", context_attributes.api, context);

            let inner = ContextInner {
                display: self.clone(),
                config: config.clone(),
                raw: EglContext(context),
                api,
            };
            Ok(NotCurrentContext::new(inner))
        }
    }
}

/// Build the `EGL_NONE` terminated attribute list for `eglCreateContext`.
///
/// With `EGL_KHR_create_context` or EGL 1.5 both major and minor versions are
/// requested. EGL 1.3 only understands the major version, through the
/// `EGL_CONTEXT_CLIENT_VERSION` attribute sharing its value with
/// `EGL_CONTEXT_MAJOR_VERSION_KHR`.
pub(crate) fn context_attributes_list(
    context_attributes: &ContextAttributes,
    egl_version: Version,
    supports_create_context: bool,
) -> Vec<EGLint> {
    let mut attrs = Vec::<EGLint>::new();
    let version = context_attributes.api.version();

    if supports_create_context {
        if let Some(version) = version {
            attrs.push(egl::CONTEXT_MAJOR_VERSION_KHR as EGLint);
            attrs.push(version.major as EGLint);
            attrs.push(egl::CONTEXT_MINOR_VERSION_KHR as EGLint);
            attrs.push(version.minor as EGLint);
        }
    } else if egl_version >= Version::new(1, 3) {
        if let Some(version) = version {
            attrs.push(egl::CONTEXT_CLIENT_VERSION as EGLint);
            attrs.push(version.major as EGLint);
        }
    }

    attrs.push(egl::NONE as EGLint);
    attrs
}

/// A wrapper around `EGLContext` that is known to be not current.
#[derive(Debug)]
pub struct NotCurrentContext {
    inner: ContextInner,
}

impl NotCurrentContext {
    fn new(inner: ContextInner) -> Self {
        Self { inner }
    }

    /// Make the context current on the calling thread with the `surface` used
    /// for both drawing and reading.
    pub fn make_current(self, surface: &Surface) -> Result<PossiblyCurrentContext> {
        self.inner.make_current_draw_read(surface, surface)?;
        Ok(PossiblyCurrentContext { inner: self.inner, _nosendsync: PhantomData })
    }
}

/// A wrapper around `EGLContext` that could be current for the current thread.
#[derive(Debug)]
pub struct PossiblyCurrentContext {
    pub(crate) inner: ContextInner,
    _nosendsync: PhantomData<EGLContext>,
}

impl PossiblyCurrentContext {
    /// Release the context from the calling thread.
    pub fn make_not_current(self) -> Result<NotCurrentContext> {
        self.inner.make_not_current()?;
        Ok(NotCurrentContext::new(self.inner))
    }

    /// Whether the context is current on the calling thread.
    pub fn is_current(&self) -> bool {
        self.inner.is_current()
    }

    /// Get the address of the client Api function through the display.
    pub fn get_proc_address(&self, addr: &CStr) -> *const ffi::c_void {
        self.inner.display.get_proc_address(addr)
    }

    /// The config the context was created with.
    pub fn config(&self) -> Config {
        self.inner.config.clone()
    }
}

pub(crate) struct ContextInner {
    display: Display,
    config: Config,
    raw: EglContext,
    api: EGLenum,
}

impl ContextInner {
    fn make_current_draw_read(&self, surface_draw: &Surface, surface_read: &Surface) -> Result<()> {
        unsafe {
            let draw = surface_draw.raw;
            let read = surface_read.raw;
            if self.display.inner.egl.MakeCurrent(*self.display.inner.raw, draw, read, *self.raw)
                == egl::FALSE
            {
                return Err(last_error(&self.display.inner.egl, ErrorKind::BadAccess)
                    .with_message("Unable to make the EGL context current"));
            }

            Ok(())
        }
    }

    fn make_not_current(&self) -> Result<()> {
        unsafe {
            if self.display.inner.egl.MakeCurrent(
                *self.display.inner.raw,
                egl::NO_SURFACE,
                egl::NO_SURFACE,
                egl::NO_CONTEXT,
            ) == egl::FALSE
            {
                Err(last_error(&self.display.inner.egl, ErrorKind::BadAccess))
            } else {
                Ok(())
            }
        }
    }

    fn is_current(&self) -> bool {
        unsafe { self.display.inner.egl.GetCurrentContext() == *self.raw }
    }
}

impl Drop for ContextInner {
    fn drop(&mut self) {
        // The context is only marked for deletion while it's current.
        if self.is_current() {
            if let Err(err) = self.make_not_current() {
                log::warn!("failed to release context on drop: {err}");
            }
        }

        unsafe {
            self.display.inner.egl.DestroyContext(*self.display.inner.raw, *self.raw);
        }
    }
}

impl fmt::Debug for ContextInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("display", &self.display.inner.raw)
            .field("config", &self.config.raw)
            .field("raw", &self.raw)
            .field("api", &self.api)
            .finish()
    }
}

#[derive(Debug)]
struct EglContext(EGLContext);

impl Deref for EglContext {
    type Target = EGLContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextAttributesBuilder;

    #[test]
    fn create_context_extension_requests_major_and_minor() {
        let attributes = ContextAttributesBuilder::new().build();
        let list = context_attributes_list(&attributes, Version::new(1, 4), true);

        assert_eq!(list, vec![
            egl::CONTEXT_MAJOR_VERSION_KHR as EGLint,
            2,
            egl::CONTEXT_MINOR_VERSION_KHR as EGLint,
            1,
            egl::NONE as EGLint,
        ]);
    }

    #[test]
    fn egl_1_3_requests_only_client_version() {
        let attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(Some(Version::new(2, 0))))
            .build();
        let list = context_attributes_list(&attributes, Version::new(1, 3), false);

        assert_eq!(list, vec![egl::CONTEXT_CLIENT_VERSION as EGLint, 2, egl::NONE as EGLint]);
    }

    #[test]
    fn old_egl_gets_an_empty_list() {
        let attributes = ContextAttributesBuilder::new().build();
        let list = context_attributes_list(&attributes, Version::new(1, 2), false);
        assert_eq!(list, vec![egl::NONE as EGLint]);
    }

    #[test]
    fn unversioned_api_gets_an_empty_list() {
        let attributes =
            ContextAttributesBuilder::new().with_context_api(ContextApi::OpenGl(None)).build();
        let list = context_attributes_list(&attributes, Version::new(1, 5), true);
        assert_eq!(list, vec![egl::NONE as EGLint]);
    }
}
