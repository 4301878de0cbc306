//! External command execution utilities.
//!
//! Provides a Builder-based API for running `next` and friends with the
//! terminal handed over to the child process.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! // Foreground: wait and fail on non-zero exit
//! Cmd::new(&next).args(["build"]).cwd(output).status()?;
//!
//! // Background: keep the child around while watching
//! let child = Cmd::new(&next).args(["dev", "-p", "10086"]).cwd(output).spawn()?;
//! ```

use anyhow::{Context, Result, bail};
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
};

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
#[derive(Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    quiet: bool,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Discard the child's stdout/stderr instead of inheriting them.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Start the process without waiting for it.
    pub fn spawn(self) -> Result<Child> {
        let name = self.program_name();
        self.command()
            .spawn()
            .with_context(|| format!("Failed to spawn `{name}`"))
    }

    /// Run the process to completion, failing on non-zero exit.
    pub fn status(self) -> Result<()> {
        let name = self.program_name();
        let status = self
            .command()
            .status()
            .with_context(|| format!("Failed to execute `{name}`"))?;

        if !status.success() {
            bail!("Command `{name}` failed with {status}");
        }
        Ok(())
    }

    /// Get the program name for error messages.
    fn program_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .unwrap_or(&self.program)
            .to_string_lossy()
            .to_string()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        if self.quiet {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        } else {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }
        cmd
    }
}

// ============================================================================
// Binary lookup
// ============================================================================

/// Locate a Node.js CLI binary.
///
/// Looks in `<root>/node_modules/.bin` first (where `npm i next` puts it),
/// then falls back to `PATH`.
pub fn find_node_bin(name: &str, root: &Path) -> Result<PathBuf> {
    let bin_dir = root.join("node_modules").join(".bin");
    let local = if cfg!(windows) {
        bin_dir.join(format!("{name}.cmd"))
    } else {
        bin_dir.join(name)
    };
    if local.is_file() {
        return Ok(local);
    }

    which::which(name).with_context(|| {
        format!(
            "`{name}` not found in {} or PATH, install it with `npm install {name}`",
            bin_dir.display()
        )
    })
}

// ============================================================================
// Tests
// ============================================================================
