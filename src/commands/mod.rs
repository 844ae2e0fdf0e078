//! Command implementations
//!
//! One module per CLI command. Each exposes a `run` entry point taking the
//! loaded configuration façade and its parsed arguments; orchestration
//! lives here, the mechanics live in the library modules.

pub mod bundle;
pub mod completions;
pub mod fetch;
pub mod install;
pub mod machine;
pub mod publish;
pub mod repo;
pub mod version;
