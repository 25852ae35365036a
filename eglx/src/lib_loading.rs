//! Library loading routines.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use libloading::Library;

use crate::error::{Error, ErrorKind, Result};

pub trait SymLoading {
    /// # Safety
    /// The library must be unsured to live long enough.
    unsafe fn load_with(lib: &Library) -> Self;
}

/// A symbol table together with the library it was resolved from.
///
/// The library is unloaded once the last clone of the wrapper is gone.
#[derive(Clone)]
pub struct SymWrapper<T> {
    sym: T,
    lib: Arc<Library>,
}

impl<T: SymLoading> SymWrapper<T> {
    /// Open the first library from `lib_paths` that loads and resolve the
    /// symbols from it.
    pub unsafe fn new(lib_paths: &[&str]) -> Result<Self> {
        unsafe {
            for path in lib_paths {
                match Library::new(path) {
                    Ok(lib) => {
                        log::debug!("opened {path}");
                        return Ok(SymWrapper { sym: T::load_with(&lib), lib: Arc::new(lib) });
                    },
                    Err(err) => log::debug!("failed to open {path}: {err}"),
                }
            }
        }

        let message = format!("none of {lib_paths:?} could be opened");
        Err(Error::new(None, Some(message.into()), ErrorKind::NotFound))
    }

    /// Resolve the symbols again from the library that is already open.
    pub unsafe fn reload(&self) -> Self {
        let sym = unsafe { T::load_with(&self.lib) };
        SymWrapper { sym, lib: self.lib.clone() }
    }
}

impl<T> Deref for SymWrapper<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.sym
    }
}

impl<T> DerefMut for SymWrapper<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.sym
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoSymbols;

    impl SymLoading for NoSymbols {
        unsafe fn load_with(_lib: &Library) -> Self {
            NoSymbols
        }
    }

    #[test]
    fn missing_libraries_are_not_found() {
        let paths = ["libeglx-missing.so.0", "/nonexistent/libeglx-missing.so"];
        let err = match unsafe { SymWrapper::<NoSymbols>::new(&paths) } {
            Ok(_) => panic!("opened a library that doesn't exist"),
            Err(err) => err,
        };

        assert_eq!(err.error_kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("libeglx-missing.so.0"));
    }
}
