use eglx::config::{Api, ConfigSurfaceTypes, ConfigTemplate, ConfigTemplateBuilder};
use eglx::context::{ContextApi, ContextAttributes, ContextAttributesBuilder, Version};
use eglx::error::{Error, ErrorKind};
use eglx::platform::x11::{Event, WindowAttributes};

trait FailToCompileIfNotSendSync
where
    Self: Send + Sync,
{
}

impl FailToCompileIfNotSendSync for ConfigTemplate {}
impl FailToCompileIfNotSendSync for ConfigTemplateBuilder {}
impl FailToCompileIfNotSendSync for ConfigSurfaceTypes {}
impl FailToCompileIfNotSendSync for Api {}
impl FailToCompileIfNotSendSync for ContextAttributes {}
impl FailToCompileIfNotSendSync for ContextAttributesBuilder {}
impl FailToCompileIfNotSendSync for ContextApi {}
impl FailToCompileIfNotSendSync for Version {}
impl FailToCompileIfNotSendSync for Error {}
impl FailToCompileIfNotSendSync for ErrorKind {}
impl FailToCompileIfNotSendSync for Event {}
impl FailToCompileIfNotSendSync for WindowAttributes {}
