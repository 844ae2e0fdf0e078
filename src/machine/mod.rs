//! Machine package composition and stored-machine builds
//!
//! - `package`: the project descriptor and its role-keyed merge rules
//! - `luacfg`: the generated machine-configuration artifact
//! - `build`: staging, the containerized build, and output relocation

pub mod build;
pub mod luacfg;
pub mod package;

pub use build::{DockerExecutor, build_machine};
