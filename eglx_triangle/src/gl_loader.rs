//! Runtime loading of the OpenGL entry points.

use std::collections::HashSet;
use std::ffi::{self, CStr, CString};
use std::ops::Deref;
use std::ptr;

use eglx::context::Version;
use eglx::error::{Error, ErrorKind, Result};
use eglx::prelude::PossiblyCurrentContext;
use libloading::Library;

use crate::gl;

/// Libraries exporting the core GL entry points, for EGL implementations
/// whose `eglGetProcAddress` only knows extension functions.
const GL_LIB_PATHS: &[&str] = &["libOpenGL.so.0", "libGL.so.1", "libGL.so"];

/// Prefixes OpenGL ES implementations put in front of the version.
const ES_PREFIXES: &[&str] = &["OpenGL ES-CM ", "OpenGL ES-CL ", "OpenGL ES "];

/// The GL entry points loaded for the current context, with the version and
/// the extensions they were probed with.
pub struct GlFunctions {
    gl: gl::Gl,
    version: Version,
    es: bool,
    extensions: HashSet<String>,
    _lib: Option<Library>,
}

impl GlFunctions {
    /// Load the entry points for the `context`, which must be current.
    pub fn load(context: &PossiblyCurrentContext) -> Result<Self> {
        let lib = GL_LIB_PATHS.iter().find_map(|path| unsafe { Library::new(path) }.ok());
        if lib.is_none() {
            log::debug!("no GL library found, relying on eglGetProcAddress only");
        }

        let gl = gl::Gl::load_with(|symbol| {
            let symbol = match CString::new(symbol) {
                Ok(symbol) => symbol,
                Err(_) => return ptr::null(),
            };

            let proc_address = context.get_proc_address(symbol.as_c_str());
            if !proc_address.is_null() {
                return proc_address;
            }

            lib.as_ref()
                .and_then(|lib| unsafe {
                    lib.get::<*const ffi::c_void>(symbol.as_bytes_with_nul()).ok().map(|sym| *sym)
                })
                .unwrap_or(ptr::null())
        });

        if !gl.GetString.is_loaded() {
            return Err(Error::from(ErrorKind::NotFound).with_message("Unable to load GL."));
        }

        let (version, es) = get_gl_string(&gl, gl::VERSION)
            .and_then(|version| parse_gl_version(&version.to_string_lossy()))
            .ok_or_else(|| Error::from(ErrorKind::NotFound).with_message("Unable to load GL."))?;

        let extensions = get_extensions(&gl, version);
        log::debug!("GL {version} loaded with {} extensions", extensions.len());

        Ok(Self { gl, version, es, extensions, _lib: lib })
    }

    /// The version parsed from `GL_VERSION`.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Whether the context turned out to be OpenGL ES.
    pub fn is_gles(&self) -> bool {
        self.es
    }

    pub fn has_extension(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    pub fn renderer(&self) -> Option<String> {
        get_gl_string(&self.gl, gl::RENDERER).map(|s| s.to_string_lossy().into_owned())
    }

    pub fn vendor(&self) -> Option<String> {
        get_gl_string(&self.gl, gl::VENDOR).map(|s| s.to_string_lossy().into_owned())
    }
}

impl Deref for GlFunctions {
    type Target = gl::Gl;

    fn deref(&self) -> &Self::Target {
        &self.gl
    }
}

impl std::fmt::Debug for GlFunctions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlFunctions")
            .field("version", &self.version)
            .field("es", &self.es)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

/// Parse `GL_VERSION`, returning the version and whether it's OpenGL ES.
pub(crate) fn parse_gl_version(version: &str) -> Option<(Version, bool)> {
    let (version, es) = match ES_PREFIXES.iter().find_map(|prefix| version.strip_prefix(prefix)) {
        Some(version) => (version, true),
        None => (version, false),
    };

    Version::parse(version).map(|version| (version, es))
}

fn get_extensions(gl: &gl::Gl, version: Version) -> HashSet<String> {
    unsafe {
        if version.major >= 3 && gl.GetStringi.is_loaded() && gl.GetIntegerv.is_loaded() {
            let mut count = 0;
            gl.GetIntegerv(gl::NUM_EXTENSIONS, &mut count);
            (0..count.max(0) as gl::types::GLuint)
                .filter_map(|index| {
                    let extension = gl.GetStringi(gl::EXTENSIONS, index);
                    (!extension.is_null())
                        .then(|| CStr::from_ptr(extension.cast()).to_string_lossy().into_owned())
                })
                .collect()
        } else {
            get_gl_string(gl, gl::EXTENSIONS)
                .map(|extensions| {
                    extensions.to_string_lossy().split_whitespace().map(String::from).collect()
                })
                .unwrap_or_default()
        }
    }
}

fn get_gl_string(gl: &gl::Gl, variant: gl::types::GLenum) -> Option<&'static CStr> {
    unsafe {
        let s = gl.GetString(variant);
        (!s.is_null()).then(|| CStr::from_ptr(s.cast()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_version_string() {
        assert_eq!(parse_gl_version("2.1 Mesa 23.1.4"), Some((Version::new(2, 1), false)));
        assert_eq!(
            parse_gl_version("4.6.0 NVIDIA 535.54.03"),
            Some((Version::new(4, 6), false))
        );
    }

    #[test]
    fn es_prefixes_are_stripped() {
        assert_eq!(parse_gl_version("OpenGL ES 3.2 Mesa 23.1.4"), Some((Version::new(3, 2), true)));
        assert_eq!(parse_gl_version("OpenGL ES-CM 1.1"), Some((Version::new(1, 1), true)));
        assert_eq!(parse_gl_version("OpenGL ES-CL 1.0"), Some((Version::new(1, 0), true)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_gl_version(""), None);
        assert_eq!(parse_gl_version("OpenGL ES"), None);
        assert_eq!(parse_gl_version("unknown"), None);
    }
}
