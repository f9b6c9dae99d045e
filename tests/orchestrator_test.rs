//! End-to-end provisioning runs against a throwaway home directory.
//!
//! Step scripts are small shell scripts that create fake binaries in a
//! temporary `bin` directory and drop the config files each check expects.
//! Every script appends its step name to `~/.invocations` so tests can
//! assert exactly which scripts ran and how often.
#![cfg(unix)]

use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use kitup::config::{KitupConfig, StepOverride};
use kitup::environment::{EnvironmentFacts, OperatingSystem, PackageManager};
use kitup::orchestrator::{Orchestrator, RunOptions, RunPhase, RunProgress, RunReport};
use kitup::probe::ProbeContext;
use kitup::steps::{StepOutcome, StepPlan};
use kitup::KitupError;
use tempfile::TempDir;

struct Workstation {
    _temp: TempDir,
    home: PathBuf,
    bin: PathBuf,
    scripts: PathBuf,
}

impl Workstation {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let bin = temp.path().join("bin");
        let scripts = temp.path().join("scripts");
        for dir in [&home, &bin, &scripts] {
            fs::create_dir_all(dir).unwrap();
        }
        Self {
            _temp: temp,
            home,
            bin,
            scripts,
        }
    }

    fn ctx(&self) -> ProbeContext {
        ProbeContext::new(&self.home, vec![self.bin.clone()])
    }

    fn config(&self) -> KitupConfig {
        let mut steps = BTreeMap::new();
        for name in ["zsh", "nvm", "cli-tools", "micro", "tmux"] {
            let mut env = BTreeMap::new();
            env.insert("FAKE_BIN".to_string(), self.bin.display().to_string());
            steps.insert(name.to_string(), StepOverride { script: None, env });
        }
        KitupConfig {
            steps,
            ..Default::default()
        }
    }

    fn plan(&self) -> StepPlan {
        StepPlan::standard(&self.config(), &self.scripts, &self.ctx()).unwrap()
    }

    fn write_script(&self, name: &str, body: &str) {
        let path = self.scripts.join(format!("{}.sh", name));
        let script = format!(
            "#!/bin/sh\nset -e\necho {} >> \"$HOME/.invocations\"\n{}\n",
            name, body
        );
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Write the five standard scripts, each fully provisioning its step.
    fn write_working_scripts(&self) {
        self.write_script(
            "zsh",
            &format!(
                "{}\nmkdir -p \"$HOME/.oh-my-zsh/custom/plugins/zsh-autosuggestions\" \
                 \"$HOME/.oh-my-zsh/custom/plugins/zsh-syntax-highlighting\"\n\
                 printf '# >>> kitup:zsh >>>\\nalias ll=\"ls -la\"\\n# <<< kitup:zsh <<<\\n' >> \"$HOME/.zshrc\"",
                fake_bins("$FAKE_BIN", &["zsh"])
            ),
        );
        self.write_script(
            "nvm",
            &format!(
                "mkdir -p \"$NVM_DIR/versions/node/v20.11.0/bin\"\ntouch \"$NVM_DIR/nvm.sh\"\n{}",
                fake_bins("$NVM_DIR/versions/node/v20.11.0/bin", &["node", "npm"])
            ),
        );
        self.write_script(
            "cli-tools",
            &fake_bins(
                "$FAKE_BIN",
                &["rg", "fdfind", "fzf", "jq", "batcat", "zoxide", "delta"],
            ),
        );
        self.write_script(
            "micro",
            &format!(
                "{}\nmkdir -p \"$HOME/.config/micro\"\necho '{{}}' > \"$HOME/.config/micro/settings.json\"",
                fake_bins("$FAKE_BIN", &["micro"])
            ),
        );
        self.write_script(
            "tmux",
            &format!(
                "{}\necho 'set -g mouse on' > \"$HOME/.tmux.conf\"",
                fake_bins("$FAKE_BIN", &["tmux"])
            ),
        );
    }

    fn invocations(&self) -> Vec<String> {
        fs::read_to_string(self.home.join(".invocations"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn run(&self, options: &RunOptions) -> (RunReport, Vec<RunPhase>) {
        let plan = self.plan();
        let ctx = self.ctx();
        let facts = facts(false);
        let mut phases = Vec::new();
        let report = Orchestrator::new(&plan, &facts, &ctx)
            .capture_output(true, None)
            .run(options, |event| {
                if let RunProgress::Phase(phase) = event {
                    phases.push(phase);
                }
            })
            .unwrap();
        (report, phases)
    }
}

/// Shell lines creating executables in `dir` that print a fake version.
fn fake_bins(dir: &str, names: &[&str]) -> String {
    let mut lines = vec![format!("mkdir -p \"{}\"", dir)];
    for name in names {
        lines.push(format!(
            "printf '#!/bin/sh\\necho {name} 1.2.3\\n' > \"{dir}/{name}\"\nchmod +x \"{dir}/{name}\""
        ));
    }
    lines.join("\n")
}

fn facts(is_root: bool) -> EnvironmentFacts {
    EnvironmentFacts {
        operating_system: OperatingSystem::Linux,
        package_manager: PackageManager::Apt,
        is_root,
    }
}

fn create_fake_binary(path: &Path) {
    fs::write(path, "#!/bin/sh\necho fake 9.9.9\n").unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn fresh_machine_runs_every_step_in_order() {
    let ws = Workstation::new();
    ws.write_working_scripts();

    let (report, _) = ws.run(&RunOptions::default());

    assert!(report.success());
    assert_eq!(
        ws.invocations(),
        vec!["zsh", "nvm", "cli-tools", "micro", "tmux"]
    );
    assert_eq!(report.executed_count(), 5);
    assert!(report
        .steps
        .iter()
        .all(|r| r.outcome == StepOutcome::Succeeded));

    let node = report
        .verification
        .iter()
        .find(|t| t.name == "node")
        .unwrap();
    assert!(node.is_found());
    assert_eq!(node.version.as_deref(), Some("1.2.3"));
    assert!(report.verification.iter().all(|t| t.is_found()));
}

#[test]
fn second_run_skips_everything() {
    let ws = Workstation::new();
    ws.write_working_scripts();

    let (first, _) = ws.run(&RunOptions::default());
    assert!(first.success());

    let (second, _) = ws.run(&RunOptions::default());
    assert!(second.success());
    assert_eq!(second.skipped_count(), 5);
    assert_eq!(second.executed_count(), 0);
    assert_eq!(ws.invocations().len(), 5);

    let zshrc = fs::read_to_string(ws.home.join(".zshrc")).unwrap();
    assert_eq!(zshrc.matches("# >>> kitup:zsh >>>").count(), 1);
}

#[test]
fn partially_provisioned_machine_runs_only_missing_steps() {
    let ws = Workstation::new();
    ws.write_working_scripts();

    create_fake_binary(&ws.bin.join("tmux"));
    fs::write(ws.home.join(".tmux.conf"), "set -g mouse on\n").unwrap();
    create_fake_binary(&ws.bin.join("zsh"));
    fs::create_dir_all(
        ws.home
            .join(".oh-my-zsh/custom/plugins/zsh-autosuggestions"),
    )
    .unwrap();
    fs::create_dir_all(
        ws.home
            .join(".oh-my-zsh/custom/plugins/zsh-syntax-highlighting"),
    )
    .unwrap();
    fs::write(
        ws.home.join(".zshrc"),
        "# >>> kitup:zsh >>>\n# <<< kitup:zsh <<<\n",
    )
    .unwrap();

    let (report, _) = ws.run(&RunOptions {
        skip_verify: true,
        ..Default::default()
    });

    assert!(report.success());
    assert_eq!(ws.invocations(), vec!["nvm", "cli-tools", "micro"]);
    assert_eq!(report.skipped_count(), 2);
    assert!(report.steps[0].is_skipped());
    assert!(report.steps[4].is_skipped());
}

#[test]
fn failing_step_aborts_the_run() {
    let ws = Workstation::new();
    ws.write_working_scripts();
    ws.write_script(
        "nvm",
        "echo 'curl: (6) Could not resolve host: raw.githubusercontent.com' >&2\nexit 1",
    );

    let (report, phases) = ws.run(&RunOptions::default());

    assert_eq!(report.phase, RunPhase::Aborted);
    assert_eq!(ws.invocations(), vec!["zsh", "nvm"]);
    assert_eq!(report.steps.len(), 2);
    assert!(report.verification.is_empty());
    assert!(!phases.contains(&RunPhase::Verifying));
    assert_eq!(phases.last(), Some(&RunPhase::Aborted));

    let failed = report.failed_step().unwrap();
    assert_eq!(failed.name, "nvm");
    match &failed.outcome {
        StepOutcome::Failed { exit_code, reason } => {
            assert_eq!(*exit_code, Some(1));
            assert!(reason.contains("Could not resolve host"));
        }
        other => panic!("expected failure, got {:?}", other),
    }

    let err = report.failure().unwrap();
    assert!(matches!(err, KitupError::StepFailed { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn cli_tools_failure_stops_before_micro() {
    let ws = Workstation::new();
    ws.write_working_scripts();
    ws.write_script(
        "cli-tools",
        "echo 'E: Unable to locate package ripgrep' >&2\nexit 100",
    );

    let (report, phases) = ws.run(&RunOptions::default());

    assert_eq!(report.phase, RunPhase::Aborted);
    assert_eq!(ws.invocations(), vec!["zsh", "nvm", "cli-tools"]);
    assert!(!ws.bin.join("micro").exists());
    assert!(!ws.home.join(".tmux.conf").exists());
    assert!(report.steps.iter().all(|r| r.name != "micro" && r.name != "tmux"));
    assert!(!phases.contains(&RunPhase::Executing(3)));

    let err = report.failure().unwrap();
    assert_eq!(
        err.to_string(),
        "Step 'cli-tools' exited with code 100: E: Unable to locate package ripgrep"
    );
}

#[test]
fn rerun_after_failure_resumes_at_failed_step() {
    let ws = Workstation::new();
    ws.write_working_scripts();
    ws.write_script("micro", "exit 3");

    let (first, _) = ws.run(&RunOptions::default());
    assert_eq!(first.phase, RunPhase::Aborted);

    ws.write_working_scripts();
    let (second, _) = ws.run(&RunOptions::default());
    assert!(second.success());
    assert_eq!(
        ws.invocations(),
        vec!["zsh", "nvm", "cli-tools", "micro", "micro", "tmux"]
    );
}

#[test]
fn step_that_leaves_check_unsatisfied_warns_but_continues() {
    let ws = Workstation::new();
    ws.write_working_scripts();
    ws.write_script("micro", "true");

    let plan = ws.plan();
    let ctx = ws.ctx();
    let facts = facts(false);
    let mut still_unsatisfied = Vec::new();
    let report = Orchestrator::new(&plan, &facts, &ctx)
        .capture_output(true, None)
        .run(
            &RunOptions {
                skip_verify: true,
                ..Default::default()
            },
            |event| {
                if let RunProgress::StillUnsatisfied { step, .. } = event {
                    still_unsatisfied.push(step.name.clone());
                }
            },
        )
        .unwrap();

    assert!(report.success());
    assert_eq!(still_unsatisfied, vec!["micro".to_string()]);
    assert_eq!(ws.invocations().last().map(String::as_str), Some("tmux"));
}

#[test]
fn dry_run_reports_without_invoking_scripts() {
    let ws = Workstation::new();
    ws.write_working_scripts();
    create_fake_binary(&ws.bin.join("tmux"));
    fs::write(ws.home.join(".tmux.conf"), "").unwrap();

    let (report, phases) = ws.run(&RunOptions {
        dry_run: true,
        ..Default::default()
    });

    assert!(report.success());
    assert!(ws.invocations().is_empty());
    assert_eq!(report.pending, vec!["zsh", "nvm", "cli-tools", "micro"]);
    assert_eq!(report.skipped_count(), 1);
    assert!(!phases.iter().any(|p| matches!(p, RunPhase::Executing(_))));
}

#[test]
fn root_is_refused_before_any_script_runs() {
    let ws = Workstation::new();
    ws.write_working_scripts();
    let plan = ws.plan();
    let ctx = ws.ctx();
    let facts = facts(true);

    let err = Orchestrator::new(&plan, &facts, &ctx)
        .run(&RunOptions::default(), |_| {})
        .unwrap_err();

    assert!(matches!(err, KitupError::RunningAsRoot));
    assert_eq!(err.exit_code(), 2);
    assert!(ws.invocations().is_empty());
}

#[test]
fn phases_follow_the_step_order() {
    let ws = Workstation::new();
    ws.write_working_scripts();
    create_fake_binary(&ws.bin.join("tmux"));
    fs::write(ws.home.join(".tmux.conf"), "").unwrap();

    let (_, phases) = ws.run(&RunOptions::default());

    assert_eq!(phases.first(), Some(&RunPhase::Init));
    assert_eq!(phases.last(), Some(&RunPhase::Done));
    let executing: Vec<usize> = phases
        .iter()
        .filter_map(|p| match p {
            RunPhase::Executing(i) => Some(*i),
            _ => None,
        })
        .collect();
    assert_eq!(executing, vec![0, 1, 2, 3]);
    assert!(phases.contains(&RunPhase::Skipped(4)));
    assert!(phases.contains(&RunPhase::Verifying));
}
