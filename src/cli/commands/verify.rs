//! Verify command implementation.
//!
//! The `kitup verify` command reports the installed version of each
//! provisioned tool. Missing tools never change the exit status.

use crate::error::Result;
use crate::orchestrator::verify_tools;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The verify command implementation.
pub struct VerifyCommand {
    context: CommandContext,
}

impl VerifyCommand {
    /// Create a new verify command.
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }
}

impl Command for VerifyCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.context.load_config()?;
        let ctx = self.context.probe_context();

        ui.show_header("Verification");
        for report in verify_tools(&ctx, &config.verify.extra_commands) {
            ui.show_tool(&report.name, report.display_version(), report.is_found());
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn verify_reports_standard_tools_and_extras() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.yml");
        fs::write(&config, "verify:\n  extra_commands: [kitup-no-such-tool]\n").unwrap();

        let cmd = VerifyCommand::new(CommandContext {
            home: temp.path().to_path_buf(),
            cwd: temp.path().to_path_buf(),
            config_path: Some(config),
            scripts_dir: None,
        });
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        let names: Vec<_> = ui.tools().iter().map(|t| t.0.as_str()).collect();
        assert_eq!(
            names,
            vec!["node", "npm", "tmux", "micro", "zsh", "kitup-no-such-tool"]
        );
        let extra = &ui.tools()[5];
        assert_eq!(extra.1, "NOT FOUND");
        assert!(!extra.2);
    }
}
