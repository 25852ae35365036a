//! The purpose of this library is to provide an OpenGL context on an Xlib
//! window through EGL, with both libraries opened at runtime.
//!
//! The setup is linear. Connect to the X server with
//! [`XConnection::open`] and create a [`Window`]. Load the EGL entry points
//! with [`Egl::load`], then create a [`Display`] for the X connection, which
//! initializes it and reloads the entry points against it. Pick a [`Config`]
//! from a [`ConfigTemplate`], create the window [`Surface`] and the context,
//! and make the context current to start drawing.
//!
//! Every handle is released exactly once when dropped. Contexts and surfaces
//! keep their display alive, so the display is terminated after them.
//!
//! [`XConnection::open`]: crate::platform::x11::XConnection::open
//! [`Window`]: crate::platform::x11::Window
//! [`Egl::load`]: crate::api::egl::Egl::load
//! [`Display`]: crate::api::egl::display::Display
//! [`Config`]: crate::api::egl::config::Config
//! [`ConfigTemplate`]: crate::config::ConfigTemplate
//! [`Surface`]: crate::api::egl::surface::Surface

#![deny(missing_debug_implementations)]

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod platform;

#[cfg(egl_backend)]
mod lib_loading;

pub mod prelude {
    //! The types needed to go from an X connection to a current context.

    #[cfg(egl_backend)]
    pub use crate::api::egl::{
        config::Config,
        context::{NotCurrentContext, PossiblyCurrentContext},
        display::Display,
        surface::Surface,
        Egl,
    };
    pub use crate::config::{Api, ConfigTemplate, ConfigTemplateBuilder};
    pub use crate::context::{ContextApi, ContextAttributes, ContextAttributesBuilder, Version};
    pub use crate::error::{Error, ErrorKind};
    #[cfg(x11_platform)]
    pub use crate::platform::x11::{Event, Window, WindowAttributes, XConnection};
}
