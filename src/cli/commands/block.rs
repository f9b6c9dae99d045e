//! Block command implementation.
//!
//! The `kitup block` command rewrites one managed block in a configuration
//! file. Step scripts call it to keep alias and plugin sections idempotent.

use std::fs;
use std::io::Read;

use crate::cli::args::BlockArgs;
use crate::config::{write_managed_block, BlockWrite};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{user_path, Command, CommandContext, CommandResult};

/// The block command implementation.
pub struct BlockCommand {
    context: CommandContext,
    args: BlockArgs,
}

impl BlockCommand {
    /// Create a new block command.
    pub fn new(context: CommandContext, args: BlockArgs) -> Self {
        Self { context, args }
    }

    fn read_body(&self) -> Result<String> {
        match &self.args.content_file {
            Some(path) => Ok(fs::read_to_string(user_path(path, &self.context.home))?),
            None => {
                let mut body = String::new();
                std::io::stdin().read_to_string(&mut body)?;
                Ok(body)
            }
        }
    }
}

impl Command for BlockCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let path = user_path(&self.args.file, &self.context.home);
        let body = self.read_body()?;

        match write_managed_block(&path, &self.args.id, &body)? {
            BlockWrite::Unchanged => {
                ui.message(&format!(
                    "{} already has block '{}'",
                    path.display(),
                    self.args.id
                ));
            }
            BlockWrite::Created => {
                ui.success(&format!(
                    "Created {} with block '{}'",
                    path.display(),
                    self.args.id
                ));
            }
            BlockWrite::Updated { backup } => {
                ui.success(&format!(
                    "Updated block '{}' in {}",
                    self.args.id,
                    path.display()
                ));
                if let Some(backup) = backup {
                    ui.message(&format!("Backup: {}", backup.display()));
                }
            }
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::begin_marker;
    use crate::ui::MockUI;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn command(home: &std::path::Path, content: PathBuf) -> BlockCommand {
        BlockCommand::new(
            CommandContext {
                home: home.to_path_buf(),
                cwd: home.to_path_buf(),
                config_path: None,
                scripts_dir: None,
            },
            BlockArgs {
                file: PathBuf::from("~/.zshrc"),
                id: "aliases".to_string(),
                content_file: Some(content),
            },
        )
    }

    #[test]
    fn block_command_creates_then_leaves_unchanged() {
        let temp = TempDir::new().unwrap();
        let content = temp.path().join("aliases.txt");
        fs::write(&content, "alias ll='ls -la'\n").unwrap();
        let cmd = command(temp.path(), content);

        let mut ui = MockUI::new();
        cmd.execute(&mut ui).unwrap();
        assert!(ui.has_success("Created"));

        let first = fs::read_to_string(temp.path().join(".zshrc")).unwrap();
        assert!(first.contains(&begin_marker("aliases")));

        let mut ui = MockUI::new();
        cmd.execute(&mut ui).unwrap();
        assert!(ui.has_message("already has block"));
        let second = fs::read_to_string(temp.path().join(".zshrc")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn block_command_reports_backup_on_update() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".zshrc"), "export EDITOR=micro\n").unwrap();
        let content = temp.path().join("aliases.txt");
        fs::write(&content, "alias gs='git status'\n").unwrap();

        let mut ui = MockUI::new();
        command(temp.path(), content).execute(&mut ui).unwrap();

        assert!(ui.has_success("Updated block 'aliases'"));
        assert!(ui.has_message("Backup:"));
    }

    #[test]
    fn missing_content_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        let result = command(temp.path(), temp.path().join("nope.txt")).execute(&mut ui);
        assert!(result.is_err());
    }
}
