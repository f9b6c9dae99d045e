//! Run orchestration.
//!
//! [`Orchestrator`] walks the step plan in order, consults the capability
//! probe for each step, runs unsatisfied steps through the step runner, and
//! finishes with a read-only verification pass ([`verify`]).

pub mod verify;
pub mod workflow;

pub use verify::{
    extract_version, verification_set, verify_tool, verify_tools, ToolReport, NOT_FOUND,
    VERIFY_COMMANDS,
};
pub use workflow::{
    Orchestrator, OutputFactory, RunOptions, RunPhase, RunProgress, RunReport,
};
