//! Xlib connection, window and event handling.
//!
//! Xlib is opened at runtime, the same way the EGL library is.

use std::ffi::CString;
use std::fmt;
use std::mem;
use std::os::raw::{c_char, c_int, c_uint, c_ulong};
use std::ptr::{self, NonNull};
use std::sync::Arc;

use once_cell::sync::Lazy;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle, XlibDisplayHandle, XlibWindowHandle};
use x11_dl::xlib::{self, Atom, Display, XEvent, Xlib};

use crate::error::{Error, ErrorKind, Result};

/// The XLIB handle.
pub(crate) static XLIB: Lazy<Option<Xlib>> = Lazy::new(|| Xlib::open().ok());

const WM_DELETE_WINDOW: &[u8] = b"WM_DELETE_WINDOW\0";

fn xlib() -> Result<&'static Xlib> {
    XLIB.as_ref().ok_or_else(|| {
        Error::from(ErrorKind::NotFound).with_message("Unable to load Xlib")
    })
}

/// The connection to the X server.
pub struct XConnection {
    xlib: &'static Xlib,
    display: NonNull<Display>,
    screen: c_int,
}

impl XConnection {
    /// Connect to the X server named by `DISPLAY`.
    pub fn open() -> Result<Arc<Self>> {
        let xlib = xlib()?;

        let display = unsafe { (xlib.XOpenDisplay)(ptr::null()) };
        let display = NonNull::new(display).ok_or_else(|| {
            Error::from(ErrorKind::BadDisplay).with_message("cannot connect to X server")
        })?;

        let screen = unsafe { (xlib.XDefaultScreen)(display.as_ptr()) };
        log::debug!("connected to the X server, default screen {screen}");

        Ok(Arc::new(Self { xlib, display, screen }))
    }

    /// The default screen of the connection.
    pub fn screen(&self) -> c_int {
        self.screen
    }

    /// The raw Xlib `Display` pointer.
    pub fn raw_display(&self) -> *mut Display {
        self.display.as_ptr()
    }

    /// The display handle to create the EGL display with.
    pub fn raw_display_handle(&self) -> RawDisplayHandle {
        let display = NonNull::new(self.display.as_ptr().cast());
        RawDisplayHandle::Xlib(XlibDisplayHandle::new(display, self.screen))
    }
}

impl fmt::Debug for XConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XConnection")
            .field("display", &self.display)
            .field("screen", &self.screen)
            .finish()
    }
}

impl Drop for XConnection {
    fn drop(&mut self) {
        unsafe {
            (self.xlib.XCloseDisplay)(self.display.as_ptr());
        }
    }
}

/// Attributes used when creating a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowAttributes {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) title: String,
}

impl Default for WindowAttributes {
    fn default() -> Self {
        Self { width: 800, height: 480, title: "[glad] EGL with X11".into() }
    }
}

impl WindowAttributes {
    /// Requests the window to be of the specific size.
    pub fn with_inner_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the initial title of the window in the title bar.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// The requested size.
    pub fn inner_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The requested title.
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// The window events the loop cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    KeyPress { keycode: u32 },

    /// A key was released.
    KeyRelease { keycode: u32 },

    /// A part of the window must be redrawn.
    Expose,

    /// The window got the new size.
    Resized { width: u32, height: u32 },

    /// The window manager asked to close the window.
    CloseRequested,

    /// Any other event, by its Xlib type.
    Other(c_int),
}

impl Event {
    /// Translate the raw Xlib event.
    ///
    /// `wm_delete_window` is the atom registered with the window manager for
    /// close requests.
    pub(crate) fn from_xevent(event: &XEvent, wm_delete_window: Atom) -> Self {
        unsafe {
            match event.get_type() {
                xlib::KeyPress => Event::KeyPress { keycode: event.key.keycode },
                xlib::KeyRelease => Event::KeyRelease { keycode: event.key.keycode },
                xlib::Expose => Event::Expose,
                xlib::ConfigureNotify => Event::Resized {
                    width: event.configure.width.max(0) as u32,
                    height: event.configure.height.max(0) as u32,
                },
                xlib::ClientMessage
                    if event.client_message.data.get_long(0) as Atom == wm_delete_window =>
                {
                    Event::CloseRequested
                },
                other => Event::Other(other),
            }
        }
    }
}

/// An Xlib window on the default screen.
#[derive(Debug)]
pub struct Window {
    xconn: Arc<XConnection>,
    window: xlib::Window,
    wm_delete_window: Atom,
}

impl Window {
    /// Create and map the window using the default visual and depth.
    pub fn new(xconn: &Arc<XConnection>, attributes: &WindowAttributes) -> Result<Self> {
        let xlib = xconn.xlib;
        let display = xconn.raw_display();

        let window = unsafe {
            let screen = xconn.screen;
            let root = (xlib.XRootWindow)(display, screen);
            let visual = (xlib.XDefaultVisual)(display, screen);
            let depth = (xlib.XDefaultDepth)(display, screen);

            let colormap = (xlib.XCreateColormap)(display, root, visual, xlib::AllocNone);

            let mut swa: xlib::XSetWindowAttributes = mem::zeroed();
            swa.colormap = colormap;
            swa.event_mask = xlib::ExposureMask
                | xlib::KeyPressMask
                | xlib::KeyReleaseMask
                | xlib::StructureNotifyMask;

            let window = (xlib.XCreateWindow)(
                display,
                root,
                0,
                0,
                attributes.width as c_uint,
                attributes.height as c_uint,
                0,
                depth,
                xlib::InputOutput as c_uint,
                visual,
                xlib::CWColormap | xlib::CWEventMask,
                &mut swa,
            );

            // The window keeps its own reference to the colormap.
            (xlib.XFreeColormap)(display, colormap);
            window
        };

        if window == 0 {
            return Err(Error::from(ErrorKind::BadNativeWindow)
                .with_message("Unable to create window."));
        }

        let mut window = Self { xconn: xconn.clone(), window, wm_delete_window: 0 };

        unsafe {
            (xlib.XMapWindow)(display, window.window);

            // Titles with interior nul bytes are cut at the first one.
            let title = attributes.title.split('\0').next().unwrap_or_default();
            if let Ok(title) = CString::new(title) {
                (xlib.XStoreName)(display, window.window, title.as_ptr());
            }

            let atom_name = WM_DELETE_WINDOW.as_ptr() as *const c_char;
            window.wm_delete_window = (xlib.XInternAtom)(display, atom_name, xlib::False);
            let mut protocols = [window.wm_delete_window];
            (xlib.XSetWMProtocols)(display, window.window, protocols.as_mut_ptr(), 1);
        }

        log::debug!(
            "created {}x{} window {:#x} titled {:?}",
            attributes.width,
            attributes.height,
            window.window,
            attributes.title
        );

        Ok(window)
    }

    /// The current size of the window.
    pub fn inner_size(&self) -> (u32, u32) {
        unsafe {
            let mut attributes: xlib::XWindowAttributes = mem::zeroed();
            (self.xconn.xlib.XGetWindowAttributes)(
                self.xconn.raw_display(),
                self.window,
                &mut attributes,
            );
            (attributes.width.max(0) as u32, attributes.height.max(0) as u32)
        }
    }

    /// Take the next pending event without blocking.
    pub fn poll_event(&self) -> Option<Event> {
        let xlib = self.xconn.xlib;
        let display = self.xconn.raw_display();

        unsafe {
            if (xlib.XPending)(display) == 0 {
                return None;
            }

            let mut event: XEvent = mem::zeroed();
            (xlib.XNextEvent)(display, &mut event);
            Some(Event::from_xevent(&event, self.wm_delete_window))
        }
    }

    /// The Xlib window id.
    pub fn xid(&self) -> c_ulong {
        self.window
    }

    /// The connection the window was created on.
    pub fn connection(&self) -> &Arc<XConnection> {
        &self.xconn
    }

    /// The window handle to create the EGL surface with.
    pub fn raw_window_handle(&self) -> RawWindowHandle {
        RawWindowHandle::Xlib(XlibWindowHandle::new(self.window))
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        unsafe {
            (self.xconn.xlib.XDestroyWindow)(self.xconn.raw_display(), self.window);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WM_DELETE: Atom = 301;

    fn zeroed_event(type_: c_int) -> XEvent {
        let mut event: XEvent = unsafe { mem::zeroed() };
        event.type_ = type_;
        event
    }

    #[test]
    fn key_events_keep_keycode() {
        let mut event = zeroed_event(xlib::KeyPress);
        event.key.keycode = 38;
        assert_eq!(Event::from_xevent(&event, WM_DELETE), Event::KeyPress { keycode: 38 });

        let mut event = zeroed_event(xlib::KeyRelease);
        event.key.keycode = 9;
        assert_eq!(Event::from_xevent(&event, WM_DELETE), Event::KeyRelease { keycode: 9 });
    }

    #[test]
    fn configure_notify_is_a_resize() {
        let mut event = zeroed_event(xlib::ConfigureNotify);
        event.configure.width = 1024;
        event.configure.height = 600;
        assert_eq!(Event::from_xevent(&event, WM_DELETE), Event::Resized {
            width: 1024,
            height: 600
        });
    }

    #[test]
    fn only_the_delete_atom_requests_close() {
        let mut event = zeroed_event(xlib::ClientMessage);
        unsafe { event.client_message.data.set_long(0, WM_DELETE as _) };
        assert_eq!(Event::from_xevent(&event, WM_DELETE), Event::CloseRequested);

        let mut event = zeroed_event(xlib::ClientMessage);
        unsafe { event.client_message.data.set_long(0, 7) };
        assert_eq!(Event::from_xevent(&event, WM_DELETE), Event::Other(xlib::ClientMessage));
    }

    #[test]
    fn expose_and_unknown_events() {
        assert_eq!(Event::from_xevent(&zeroed_event(xlib::Expose), WM_DELETE), Event::Expose);
        assert_eq!(
            Event::from_xevent(&zeroed_event(xlib::MapNotify), WM_DELETE),
            Event::Other(xlib::MapNotify)
        );
    }

    #[test]
    fn default_window_attributes() {
        let attributes = WindowAttributes::default();
        assert_eq!(attributes.inner_size(), (800, 480));
        assert_eq!(attributes.title(), "[glad] EGL with X11");

        let attributes = attributes.with_inner_size(640, 360).with_title("triangle");
        assert_eq!(attributes.inner_size(), (640, 360));
        assert_eq!(attributes.title(), "triangle");
    }
}
