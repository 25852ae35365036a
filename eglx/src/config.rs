//! Api config picking and creating utils.

use bitflags::bitflags;

/// The builder to help customizing the config template.
#[derive(Default, Debug, Clone)]
pub struct ConfigTemplateBuilder {
    template: ConfigTemplate,
}

impl ConfigTemplateBuilder {
    /// Create a new configuration template builder.
    #[inline]
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the minimum size of the whole color buffer in bits.
    ///
    /// By default `16` is requested.
    #[inline]
    pub fn with_buffer_size(mut self, buffer_size: u8) -> Self {
        self.template.buffer_size = buffer_size;
        self
    }

    /// Set the minimum size of the alpha buffer.
    ///
    /// Not requested by default.
    #[inline]
    pub fn with_alpha_size(mut self, alpha_size: u8) -> Self {
        self.template.alpha_size = Some(alpha_size);
        self
    }

    /// Set the minimum size of the depth buffer.
    ///
    /// Not requested by default.
    #[inline]
    pub fn with_depth_size(mut self, depth_size: u8) -> Self {
        self.template.depth_size = Some(depth_size);
        self
    }

    /// Set the types of the surfaces that should be supported by the config.
    ///
    /// When unset the EGL default, which is window surfaces, applies.
    #[inline]
    pub fn with_surface_type(mut self, config_surface_types: ConfigSurfaceTypes) -> Self {
        self.template.config_surface_types = Some(config_surface_types);
        self
    }

    /// Set the rendering Apis the config must be renderable with.
    ///
    /// By default only [`Api::OPENGL`] is requested.
    #[inline]
    pub fn with_api(mut self, api: Api) -> Self {
        self.template.api = api;
        self
    }

    /// Build the template to match the configs against.
    #[must_use]
    pub fn build(self) -> ConfigTemplate {
        self.template
    }
}

/// The context configuration template that is used to find desired config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTemplate {
    /// The size of the whole color buffer.
    pub(crate) buffer_size: u8,

    /// The size of the alpha.
    pub(crate) alpha_size: Option<u8>,

    /// The size of the depth buffer.
    pub(crate) depth_size: Option<u8>,

    /// The types of the surfaces supported by the configuration.
    pub(crate) config_surface_types: Option<ConfigSurfaceTypes>,

    /// The rendering Apis.
    pub(crate) api: Api,
}

impl Default for ConfigTemplate {
    fn default() -> Self {
        ConfigTemplate {
            buffer_size: 16,
            alpha_size: None,
            depth_size: None,
            config_surface_types: None,
            api: Api::OPENGL,
        }
    }
}

impl ConfigTemplate {
    /// The requested size of the color buffer.
    pub fn buffer_size(&self) -> u8 {
        self.buffer_size
    }

    /// The requested rendering Apis.
    pub fn api(&self) -> Api {
        self.api
    }
}

bitflags! {
    /// The types of the surface supported by the config.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConfigSurfaceTypes: u8 {
        /// Context must support windows.
        const WINDOW  = 0b00000001;

        /// Context must support pixmaps.
        const PIXMAP  = 0b00000010;

        /// Context must support pbuffers.
        const PBUFFER = 0b00000100;
    }
}

bitflags! {
    /// The Api supported by the config.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Api : u8 {
        /// Context supports OpenGL API.
        const OPENGL = 0b00000001;

        /// Context supports OpenGL ES 1 API.
        const GLES1 = 0b00000010;

        /// Context supports OpenGL ES 2 API.
        const GLES2 = 0b00000100;

        /// Context supports OpenGL ES 3 API.
        const GLES3 = 0b00001000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_asks_for_16_bit_opengl() {
        let template = ConfigTemplateBuilder::new().build();
        assert_eq!(template.buffer_size(), 16);
        assert_eq!(template.api(), Api::OPENGL);
        assert_eq!(template.config_surface_types, None);
        assert_eq!(template.alpha_size, None);
    }

    #[test]
    fn builder_sets_every_field() {
        let template = ConfigTemplateBuilder::new()
            .with_buffer_size(24)
            .with_alpha_size(8)
            .with_depth_size(16)
            .with_surface_type(ConfigSurfaceTypes::WINDOW | ConfigSurfaceTypes::PBUFFER)
            .with_api(Api::GLES2 | Api::GLES3)
            .build();

        assert_eq!(template.buffer_size(), 24);
        assert_eq!(template.alpha_size, Some(8));
        assert_eq!(template.depth_size, Some(16));
        assert_eq!(
            template.config_surface_types,
            Some(ConfigSurfaceTypes::WINDOW | ConfigSurfaceTypes::PBUFFER)
        );
        assert!(template.api().contains(Api::GLES3));
        assert!(!template.api().contains(Api::OPENGL));
    }
}
