//! Settings of the demo.

use std::time::Duration;

use eglx::config::{ConfigTemplate, ConfigTemplateBuilder};
use eglx::context::{ContextAttributes, ContextAttributesBuilder};
use eglx::platform::x11::WindowAttributes;

/// Animation time added per frame.
pub const FRAME_STEP: f64 = 0.0166666;

/// Pause between two frames.
pub const FRAME_DELAY: Duration = Duration::from_millis(10);

/// Everything the demo needs to know before it opens the window.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub(crate) window: WindowAttributes,
    pub(crate) config_template: ConfigTemplate,
    pub(crate) context_attributes: ContextAttributes,
    pub(crate) frame_step: f64,
    pub(crate) frame_delay: Duration,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowAttributes::default(),
            config_template: ConfigTemplateBuilder::new().build(),
            context_attributes: ContextAttributesBuilder::new().build(),
            frame_step: FRAME_STEP,
            frame_delay: FRAME_DELAY,
        }
    }
}

impl DemoConfig {
    pub fn with_window(mut self, window: WindowAttributes) -> Self {
        self.window = window;
        self
    }

    pub fn with_config_template(mut self, config_template: ConfigTemplate) -> Self {
        self.config_template = config_template;
        self
    }

    pub fn with_context_attributes(mut self, context_attributes: ContextAttributes) -> Self {
        self.context_attributes = context_attributes;
        self
    }

    /// Set the animation time added per frame.
    pub fn with_frame_step(mut self, frame_step: f64) -> Self {
        self.frame_step = frame_step;
        self
    }

    /// Set the pause between frames. Zero disables it.
    pub fn with_frame_delay(mut self, frame_delay: Duration) -> Self {
        self.frame_delay = frame_delay;
        self
    }

    pub fn window(&self) -> &WindowAttributes {
        &self.window
    }

    pub fn config_template(&self) -> &ConfigTemplate {
        &self.config_template
    }

    pub fn context_attributes(&self) -> &ContextAttributes {
        &self.context_attributes
    }

    pub fn frame_step(&self) -> f64 {
        self.frame_step
    }

    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }
}

#[cfg(test)]
mod tests {
    use eglx::config::Api;
    use eglx::context::{ContextApi, Version};

    use super::*;

    #[test]
    fn defaults() {
        let config = DemoConfig::default();
        assert_eq!(config.window().inner_size(), (800, 480));
        assert_eq!(config.window().title(), "[glad] EGL with X11");
        assert_eq!(config.config_template().buffer_size(), 16);
        assert_eq!(config.config_template().api(), Api::OPENGL);
        assert_eq!(
            config.context_attributes().api(),
            ContextApi::OpenGl(Some(Version::new(2, 1)))
        );
        assert_eq!(config.frame_step(), 0.0166666);
        assert_eq!(config.frame_delay(), Duration::from_millis(10));
    }

    #[test]
    fn overrides() {
        let config = DemoConfig::default()
            .with_window(WindowAttributes::default().with_inner_size(320, 200))
            .with_config_template(ConfigTemplateBuilder::new().with_buffer_size(24).build())
            .with_frame_step(0.5)
            .with_frame_delay(Duration::ZERO);

        assert_eq!(config.window().inner_size(), (320, 200));
        assert_eq!(config.config_template().buffer_size(), 24);
        assert_eq!(config.frame_step(), 0.5);
        assert!(config.frame_delay().is_zero());
    }
}
