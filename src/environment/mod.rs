//! Machine facts computed once per run.

pub mod facts;

pub use facts::{EnvironmentFacts, OperatingSystem, PackageManager};
