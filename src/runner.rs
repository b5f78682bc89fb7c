use colored::*;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A single external command: program name, arguments and optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Arguments as lossy UTF-8, for logging and assertions.
    pub fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Exit of a child process. `code` is `None` when it was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    pub code: Option<i32>,
}

impl Exit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for Exit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub exit: Exit,
    pub stdout: String,
    pub stderr: String,
}

/// Seam between the pipeline and the external toolchains.
///
/// Every stage reaches `cmake`, `make`, `dotnet`, `fpm` and `git` only
/// through this trait, so the orchestration logic can be driven without
/// the real tools installed.
pub trait Runner {
    /// Resolve an executable on `PATH`.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Run to completion with inherited stdio.
    fn run(&self, invocation: &Invocation) -> io::Result<Exit>;

    /// Run to completion capturing stdout and stderr.
    fn capture(&self, invocation: &Invocation) -> io::Result<Captured>;
}

/// Runs real processes on the host.
#[derive(Debug, Default)]
pub struct SystemRunner {
    pub debug: bool,
}

impl SystemRunner {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    fn command(&self, invocation: &Invocation) -> Command {
        if self.debug {
            println!("{} Executing: {}", "[DEBUG]".dimmed(), invocation);
        }
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl Runner for SystemRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn run(&self, invocation: &Invocation) -> io::Result<Exit> {
        let status = self.command(invocation).status()?;
        Ok(Exit {
            code: status.code(),
        })
    }

    fn capture(&self, invocation: &Invocation) -> io::Result<Captured> {
        let output = self
            .command(invocation)
            .stdin(Stdio::null())
            .output()?;
        Ok(Captured {
            exit: Exit {
                code: output.status.code(),
            },
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
