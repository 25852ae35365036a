//! A triangle spinning in an Xlib window, drawn with the fixed-function
//! OpenGL pipeline on an EGL context. Both EGL and GL are loaded at runtime.

use std::error::Error;

use eglx::prelude::*;

pub mod clock;
pub mod config;
pub mod gl_loader;
pub mod math;
pub mod renderer;

use clock::FrameClock;
use config::DemoConfig;
use gl_loader::GlFunctions;
use renderer::Renderer;

pub mod gl {
    #![allow(clippy::all)]
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

/// What the events seen so far ask the loop to do.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopState {
    pub quit: bool,
    pub resized: Option<(u32, u32)>,
}

impl LoopState {
    /// Fold the `event` into the state.
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::KeyPress { .. } | Event::CloseRequested => self.quit = true,
            Event::Resized { width, height } => self.resized = Some((width, height)),
            _ => (),
        }
    }

    /// Take the size the window changed to, if any.
    pub fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.resized.take()
    }
}

pub fn main(config: DemoConfig) -> Result<(), Box<dyn Error>> {
    // Declaration order matters: everything is dropped in reverse, so the
    // context goes before the surface and the window outlives both.
    let xconn = XConnection::open()?;
    let window = Window::new(&xconn, config.window())?;
    log::debug!("window {:#x} is {:?}", window.xid(), window.inner_size());

    let egl = Egl::load()?;
    println!("Loaded EGL {} on first load.", egl.version());

    let display = unsafe { Display::new(&egl, xconn.raw_display_handle())? };
    println!("Loaded EGL {} after reload.", display.egl_version());

    let gl_config = display.choose_config(config.config_template())?;
    log::debug!(
        "picked config {} with buffer size {} and visual {:#x}",
        gl_config.config_id(),
        gl_config.buffer_size(),
        gl_config.native_visual()
    );

    let surface =
        unsafe { display.create_window_surface(&gl_config, window.raw_window_handle())? };
    let context = display
        .create_context(&gl_config, config.context_attributes())?
        .make_current(&surface)?;

    let gl = GlFunctions::load(&context)?;
    println!("Loaded GL {}", gl.version());
    if gl.is_gles() {
        log::warn!("got an OpenGL ES context, the fixed-function calls may be missing");
    }
    if let Some(renderer) = gl.renderer() {
        println!("Running on {renderer}");
    }
    if let Some(vendor) = gl.vendor() {
        println!("Vendor {vendor}");
    }

    let (width, height) = window.inner_size();
    let mut renderer = Renderer::new(gl, width, height);
    let mut clock = FrameClock::new(config.frame_step(), config.frame_delay());
    let mut state = LoopState::default();

    while !state.quit {
        while let Some(event) = window.poll_event() {
            log::trace!("{event:?}");
            state.handle(event);
        }

        if let Some((width, height)) = state.take_resize() {
            if (width, height) != renderer.size() {
                renderer.resize(width, height);
            }
        }

        let elapsed = clock.tick();
        renderer.draw(elapsed);
        surface.swap_buffers(&context)?;
        clock.sleep();
    }

    log::debug!("quitting after {:.3} time units", clock.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_returns_a_boxed_error() {
        let _: fn(DemoConfig) -> std::result::Result<(), Box<dyn Error>> = main;
    }

    #[test]
    fn key_press_quits() {
        let mut state = LoopState::default();
        state.handle(Event::KeyRelease { keycode: 24 });
        assert!(!state.quit);
        state.handle(Event::KeyPress { keycode: 24 });
        assert!(state.quit);
    }

    #[test]
    fn close_request_quits() {
        let mut state = LoopState::default();
        state.handle(Event::CloseRequested);
        assert!(state.quit);
    }

    #[test]
    fn last_resize_wins() {
        let mut state = LoopState::default();
        state.handle(Event::Resized { width: 640, height: 480 });
        state.handle(Event::Expose);
        state.handle(Event::Resized { width: 1024, height: 768 });
        assert!(!state.quit);
        assert_eq!(state.take_resize(), Some((1024, 768)));
        assert_eq!(state.take_resize(), None);
    }
}
