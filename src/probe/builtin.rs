//! Built-in capability checks for the standard provisioning steps.
//!
//! Each check composes every piece a step installs with logical AND, so a
//! partial install (binary without config, or config without binary) is
//! reported unsatisfied and the step re-runs.

use crate::config::managed_block::begin_marker;
use crate::steps::StepKind;

use super::check::CapabilityCheck;
use super::context::ProbeContext;

/// Id of the managed block the zsh step writes into `~/.zshrc`.
pub const ZSH_BLOCK_ID: &str = "zsh";

/// Build the capability check for a standard step.
pub fn check_for(kind: StepKind, ctx: &ProbeContext) -> CapabilityCheck {
    match kind {
        StepKind::Zsh => zsh_check(),
        StepKind::Nvm => nvm_check(ctx),
        StepKind::CliTools => cli_tools_check(),
        StepKind::Micro => micro_check(),
        StepKind::Tmux => tmux_check(),
    }
}

fn zsh_check() -> CapabilityCheck {
    CapabilityCheck::all(vec![
        CapabilityCheck::command("zsh"),
        CapabilityCheck::path(".oh-my-zsh"),
        CapabilityCheck::path(".oh-my-zsh/custom/plugins/zsh-autosuggestions"),
        CapabilityCheck::path(".oh-my-zsh/custom/plugins/zsh-syntax-highlighting"),
        CapabilityCheck::file_contains(".zshrc", begin_marker(ZSH_BLOCK_ID)),
    ])
}

fn nvm_check(ctx: &ProbeContext) -> CapabilityCheck {
    let nvm_dir = ctx.nvm_dir();
    CapabilityCheck::all(vec![
        CapabilityCheck::path(nvm_dir.join("nvm.sh")),
        CapabilityCheck::dir_not_empty(nvm_dir.join("versions").join("node")),
    ])
}

fn cli_tools_check() -> CapabilityCheck {
    CapabilityCheck::all(vec![
        CapabilityCheck::command("rg"),
        // Debian and Ubuntu ship these under different names
        CapabilityCheck::any(vec![
            CapabilityCheck::command("fd"),
            CapabilityCheck::command("fdfind"),
        ]),
        CapabilityCheck::command("fzf"),
        CapabilityCheck::command("jq"),
        CapabilityCheck::any(vec![
            CapabilityCheck::command("bat"),
            CapabilityCheck::command("batcat"),
        ]),
        CapabilityCheck::command("zoxide"),
        CapabilityCheck::command("delta"),
    ])
}

fn micro_check() -> CapabilityCheck {
    CapabilityCheck::all(vec![
        CapabilityCheck::command("micro"),
        CapabilityCheck::path(".config/micro/settings.json"),
    ])
}

fn tmux_check() -> CapabilityCheck {
    CapabilityCheck::all(vec![
        CapabilityCheck::command("tmux"),
        CapabilityCheck::path(".tmux.conf"),
    ])
}
