use std::env;
use std::fs::File;
use std::path::PathBuf;

use gl_generator::{Api, Fallbacks, Profile, Registry, StructGenerator};

fn main() {
    let dest = PathBuf::from(&env::var("OUT_DIR").unwrap());

    println!("cargo:rerun-if-changed=build.rs");

    // The compatibility profile keeps the fixed-function entry points, 3.0 adds
    // `glGetStringi` for the extension query.
    let mut file = File::create(dest.join("gl_bindings.rs")).unwrap();
    Registry::new(Api::Gl, (3, 0), Profile::Compatibility, Fallbacks::All, [])
        .write_bindings(StructGenerator, &mut file)
        .unwrap();
}
