//! Platform specific bits.

#[cfg(x11_platform)]
pub mod x11;
