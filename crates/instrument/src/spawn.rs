//! Process launching for intercepted exec-family calls.
//!
//! `CommandSpec` is the structured process-builder value build logic hands
//! around: an argv, an optional full-replacement environment, and an
//! optional working directory. The joined command line it reports is for
//! listener notifications only; spawning always goes through the structured
//! argv.

use envtrace_core::{Error, Result};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    argv: Vec<String>,
    /// `KEY=VALUE` entries. When present the child environment is cleared
    /// and replaced entirely, matching hermetic task execution.
    env: Option<Vec<String>>,
    cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn from_argv(argv: Vec<String>) -> Self {
        Self {
            argv,
            env: None,
            cwd: None,
        }
    }

    /// Build a spec from a flat command line, split on whitespace. No
    /// quoting is honored; callers that need arguments with spaces use
    /// [`CommandSpec::from_argv`].
    pub fn from_line(line: &str) -> Self {
        Self::from_argv(line.split_whitespace().map(str::to_string).collect())
    }

    #[must_use]
    pub fn with_env(mut self, env: Vec<String>) -> Self {
        self.env = Some(env);
        self
    }

    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The arguments joined by single spaces, for reporting only. Nothing
    /// is escaped, so the result is not suitable for re-invocation.
    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }

    fn command(&self) -> Result<Command> {
        let program = self.argv.first().ok_or_else(|| {
            Error::command_execution("", Vec::new(), "empty command line", None)
        })?;

        let mut cmd = Command::new(program);
        cmd.args(&self.argv[1..]);

        if let Some(env) = &self.env {
            cmd.env_clear();
            for entry in env {
                let (key, value) = entry.split_once('=').unwrap_or((entry.as_str(), ""));
                cmd.env(key, value);
            }
        }
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        Ok(cmd)
    }

    /// Spawn the process, inheriting the parent's standard streams.
    pub fn spawn(&self) -> Result<Child> {
        self.command()?.spawn().map_err(|e| self.spawn_error(e))
    }

    fn spawn_error(&self, source: std::io::Error) -> Error {
        Error::command_execution(
            self.argv.first().cloned().unwrap_or_default(),
            self.argv.iter().skip(1).cloned().collect(),
            format!("Failed to spawn command: {source}"),
            None,
        )
    }
}

/// Launch a pipeline of processes, the standard output of each stage wired
/// into the standard input of the next. Stages spawn in order; if any
/// spawn fails, the already-started stages are killed and the error
/// propagates. The final stage's standard output is captured so the caller
/// can read the pipeline result.
pub fn start_pipeline(stages: &[CommandSpec]) -> Result<Vec<Child>> {
    let mut children: Vec<Child> = Vec::with_capacity(stages.len());

    for stage in stages {
        let mut cmd = match stage.command() {
            Ok(cmd) => cmd,
            Err(e) => {
                kill_all(&mut children);
                return Err(e);
            }
        };
        cmd.stdout(Stdio::piped());

        if let Some(prev) = children.last_mut() {
            match prev.stdout.take() {
                Some(out) => {
                    cmd.stdin(Stdio::from(out));
                }
                None => {
                    kill_all(&mut children);
                    return Err(Error::command_execution(
                        stage.argv.first().cloned().unwrap_or_default(),
                        stage.argv.iter().skip(1).cloned().collect(),
                        "previous pipeline stage has no captured stdout",
                        None,
                    ));
                }
            }
        }

        match cmd.spawn() {
            Ok(child) => children.push(child),
            Err(e) => {
                kill_all(&mut children);
                return Err(stage.spawn_error(e));
            }
        }
    }

    Ok(children)
}

fn kill_all(children: &mut [Child]) {
    for child in children {
        let _ = child.kill();
        let _ = child.wait();
    }
}
