//! Everything related to finding and manipulating the `EGLConfig`.
#![allow(clippy::unnecessary_cast)] // needed for 32bit & 64bit support

use std::ops::Deref;
use std::{fmt, mem};

use eglx_sys::egl;
use eglx_sys::egl::types::{EGLConfig, EGLint};

use crate::config::{Api, ConfigSurfaceTypes, ConfigTemplate};
use crate::error::{Error, ErrorKind, Result};

use super::display::Display;
use super::last_error;

impl Display {
    /// Pick the single config matching the `template`.
    ///
    /// Exactly one config is asked for, anything else is an error.
    pub fn choose_config(&self, template: &ConfigTemplate) -> Result<Config> {
        let config_attributes = config_attributes(template);

        let mut raw: EGLConfig = unsafe { mem::zeroed() };
        let mut configs_number: EGLint = 0;
        let result = unsafe {
            self.inner.egl.ChooseConfig(
                *self.inner.raw,
                config_attributes.as_ptr(),
                &mut raw,
                1,
                &mut configs_number,
            )
        };

        if result == egl::FALSE {
            return Err(last_error(&self.inner.egl, ErrorKind::BadConfig)
                .with_message("Failed to choose config"));
        }

        if configs_number != 1 {
            let message = format!("Didn't get exactly one config, but {configs_number}");
            return Err(Error::from(ErrorKind::BadConfig).with_message(message));
        }

        let config = Config { display: self.clone(), raw: EglConfig(raw) };
        log::debug!(
            "picked config {:?} with a {} bit color buffer",
            config.config_id(),
            config.buffer_size()
        );

        Ok(config)
    }
}

/// Build the `EGL_NONE` terminated attribute list for `eglChooseConfig`.
pub(crate) fn config_attributes(template: &ConfigTemplate) -> Vec<EGLint> {
    let mut config_attributes = Vec::<EGLint>::new();

    // Add color buffer size.
    config_attributes.push(egl::BUFFER_SIZE as EGLint);
    config_attributes.push(template.buffer_size as EGLint);

    // Add alpha.
    if let Some(alpha_size) = template.alpha_size {
        config_attributes.push(egl::ALPHA_SIZE as EGLint);
        config_attributes.push(alpha_size as EGLint);
    }

    // Add depth.
    if let Some(depth_size) = template.depth_size {
        config_attributes.push(egl::DEPTH_SIZE as EGLint);
        config_attributes.push(depth_size as EGLint);
    }

    // Add surface type.
    if let Some(config_surface_types) = template.config_surface_types {
        config_attributes.push(egl::SURFACE_TYPE as EGLint);
        let mut surface_type = 0;
        if config_surface_types.contains(ConfigSurfaceTypes::WINDOW) {
            surface_type |= egl::WINDOW_BIT;
        }
        if config_surface_types.contains(ConfigSurfaceTypes::PBUFFER) {
            surface_type |= egl::PBUFFER_BIT;
        }
        if config_surface_types.contains(ConfigSurfaceTypes::PIXMAP) {
            surface_type |= egl::PIXMAP_BIT;
        }
        config_attributes.push(surface_type as EGLint);
    }

    config_attributes.push(egl::RENDERABLE_TYPE as EGLint);
    let mut api = 0;
    if template.api.contains(Api::GLES1) {
        api |= egl::OPENGL_ES_BIT;
    }
    if template.api.contains(Api::GLES2) {
        api |= egl::OPENGL_ES2_BIT;
    }
    if template.api.contains(Api::GLES3) {
        api |= egl::OPENGL_ES3_BIT;
    }
    if template.api.contains(Api::OPENGL) {
        api |= egl::OPENGL_BIT;
    }
    config_attributes.push(api as EGLint);

    // Push `egl::NONE` to terminate the list.
    config_attributes.push(egl::NONE as EGLint);

    config_attributes
}

/// A wrapper around `EGLConfig`.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) display: Display,
    pub(crate) raw: EglConfig,
}

impl Config {
    /// The size of the whole color buffer in bits.
    pub fn buffer_size(&self) -> u8 {
        unsafe { self.raw_attribute(egl::BUFFER_SIZE as EGLint) as u8 }
    }

    /// The `EGL_CONFIG_ID` of the config.
    pub fn config_id(&self) -> EGLint {
        unsafe { self.raw_attribute(egl::CONFIG_ID as EGLint) }
    }

    /// The id of the X visual matching the config.
    pub fn native_visual(&self) -> u32 {
        unsafe { self.raw_attribute(egl::NATIVE_VISUAL_ID as EGLint) as u32 }
    }

    /// The raw `EGLConfig`.
    pub fn raw_config(&self) -> EGLConfig {
        *self.raw
    }

    unsafe fn raw_attribute(&self, attr: EGLint) -> EGLint {
        unsafe {
            let mut val = 0;
            self.display.inner.egl.GetConfigAttrib(
                *self.display.inner.raw,
                *self.raw,
                attr,
                &mut val,
            );
            val as EGLint
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct EglConfig(EGLConfig);

impl fmt::Debug for EglConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EglConfig").field(&self.0).finish()
    }
}

impl Deref for EglConfig {
    type Target = EGLConfig;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigTemplateBuilder;

    #[test]
    fn default_template_matches_legacy_request() {
        let attributes = config_attributes(&ConfigTemplateBuilder::new().build());
        assert_eq!(attributes, vec![
            egl::BUFFER_SIZE as EGLint,
            16,
            egl::RENDERABLE_TYPE as EGLint,
            egl::OPENGL_BIT as EGLint,
            egl::NONE as EGLint,
        ]);
    }

    #[test]
    fn optional_fields_are_added_before_renderable_type() {
        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_surface_type(ConfigSurfaceTypes::WINDOW | ConfigSurfaceTypes::PBUFFER)
            .with_api(Api::GLES2 | Api::OPENGL)
            .build();
        let attributes = config_attributes(&template);

        assert_eq!(attributes, vec![
            egl::BUFFER_SIZE as EGLint,
            16,
            egl::ALPHA_SIZE as EGLint,
            8,
            egl::SURFACE_TYPE as EGLint,
            (egl::WINDOW_BIT | egl::PBUFFER_BIT) as EGLint,
            egl::RENDERABLE_TYPE as EGLint,
            (egl::OPENGL_ES2_BIT | egl::OPENGL_BIT) as EGLint,
            egl::NONE as EGLint,
        ]);
    }

    #[test]
    fn attribute_list_is_none_terminated() {
        let template = ConfigTemplateBuilder::new().with_depth_size(24).build();
        let attributes = config_attributes(&template);
        assert_eq!(attributes.last(), Some(&(egl::NONE as EGLint)));
        assert_eq!(attributes.len() % 2, 1);
    }
}
