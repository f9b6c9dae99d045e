//! Provisioning steps and their execution.
//!
//! - [`StepKind`] - the standard steps and their fixed order
//! - [`StepPlan`] - an ordered sequence of [`ProvisioningStep`]s
//! - [`StepRunner`] - run a step's script once
//! - [`StepResult`] - how a step ended
//!
//! # Example
//!
//! ```
//! use kitup::config::KitupConfig;
//! use kitup::probe::ProbeContext;
//! use kitup::steps::StepPlan;
//! use std::path::Path;
//!
//! let ctx = ProbeContext::new("/home/dev", vec![]);
//! let plan = StepPlan::standard(&KitupConfig::default(), Path::new("scripts"), &ctx).unwrap();
//!
//! assert_eq!(plan.steps()[0].name, "zsh");
//! assert_eq!(plan.get("tmux").unwrap().order, 4);
//! ```

pub mod result;
pub mod runner;
pub mod step;

pub use result::{format_duration, StepOutcome, StepResult};
pub use runner::{StepMode, StepRunner};
pub use step::{ProvisioningStep, StepKind, StepPlan};
