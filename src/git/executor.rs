// ABOUTME: Command executor abstraction for invoking the git CLI as a black box
// Swappable behind the CommandRunner trait so tests never need a real git binary

use std::borrow::Cow;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

/// A single git invocation: argument list plus optional working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl GitCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// Append a filesystem path as the final argument
    #[must_use]
    pub fn path_arg(mut self, path: &Path) -> Self {
        self.args.push(path.to_string_lossy().into_owned());
        self
    }

    /// Run the command with `dir` as its working directory
    #[must_use]
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// True if the argument list starts with the given subcommand words
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        self.args.len() >= prefix.len() && self.args.iter().zip(prefix).all(|(a, p)| a == p)
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git")?;
        for arg in &self.args {
            write!(f, " {}", shell_escape::escape(Cow::Borrowed(arg.as_str())))?;
        }
        Ok(())
    }
}

/// Combined stdout+stderr of a finished command and whether it exited zero
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub output: Vec<u8>,
    pub success: bool,
}

impl CommandOutput {
    pub fn success(output: impl Into<Vec<u8>>) -> Self {
        Self {
            output: output.into(),
            success: true,
        }
    }

    pub fn failure(output: impl Into<Vec<u8>>) -> Self {
        Self {
            output: output.into(),
            success: false,
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }
}

/// Capability to run a git command and wait for it to finish.
///
/// `Err` is reserved for failures to launch the process at all; a command that
/// ran and exited non-zero is reported through [`CommandOutput::success`].
#[cfg_attr(test, automock)]
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &GitCommand) -> io::Result<CommandOutput>;
}

/// Process-backed runner that shells out to the git executable
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl GitCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl CommandRunner for GitCli {
    fn run(&self, command: &GitCommand) -> io::Result<CommandOutput> {
        debug!(command = %command, cwd = ?command.cwd, "Running git");

        let mut process = Command::new(&self.program);
        process
            .args(&command.args)
            // Never block on credential prompts
            .env("GIT_TERMINAL_PROMPT", "0");
        if let Some(dir) = &command.cwd {
            process.current_dir(dir);
        }

        let output = process.output()?;
        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        Ok(CommandOutput {
            output: combined,
            success: output.status.success(),
        })
    }
}
