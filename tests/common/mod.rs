#![allow(dead_code)]

use psbuild::runner::{Captured, Exit, Invocation, Runner};
use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Serializes tests that change the working directory or environment.
pub fn process_lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

type Hook = Box<dyn Fn(&Invocation)>;

/// Records every lookup and invocation instead of touching real toolchains.
#[derive(Default)]
pub struct FakeRunner {
    missing: Vec<String>,
    failing: Vec<(String, String, i32)>,
    stdout: String,
    hook: Option<Hook>,
    pub lookups: RefCell<Vec<String>>,
    pub calls: RefCell<Vec<Invocation>>,
    pub cwds: RefCell<Vec<PathBuf>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing(mut self, tool: &str) -> Self {
        self.missing.push(tool.to_string());
        self
    }

    /// Make `program` exit with `code` when its first argument is `first_arg`.
    pub fn failing(mut self, program: &str, first_arg: &str, code: i32) -> Self {
        self.failing
            .push((program.to_string(), first_arg.to_string(), code));
        self
    }

    /// Stdout returned by every captured invocation.
    pub fn stdout(mut self, stdout: &str) -> Self {
        self.stdout = stdout.to_string();
        self
    }

    /// Side effect run before an invocation "exits".
    pub fn on_run(mut self, hook: impl Fn(&Invocation) + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.to_string()).collect()
    }

    pub fn call_for(&self, program: &str, first_arg: &str) -> Option<Invocation> {
        self.calls
            .borrow()
            .iter()
            .find(|c| c.program == program && first(c) == first_arg)
            .cloned()
    }

    fn record(&self, invocation: &Invocation) {
        self.calls.borrow_mut().push(invocation.clone());
        if let Ok(dir) = std::env::current_dir() {
            self.cwds.borrow_mut().push(dir);
        }
        if let Some(hook) = &self.hook {
            hook(invocation);
        }
    }

    fn exit_for(&self, invocation: &Invocation) -> Exit {
        let code = self
            .failing
            .iter()
            .find(|(program, arg, _)| *program == invocation.program && *arg == first(invocation))
            .map(|(_, _, code)| *code)
            .unwrap_or(0);
        Exit { code: Some(code) }
    }
}

fn first(invocation: &Invocation) -> String {
    invocation
        .arg_strings()
        .into_iter()
        .find(|a| !a.starts_with("--git-dir"))
        .unwrap_or_default()
}

impl Runner for FakeRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.lookups.borrow_mut().push(program.to_string());
        if self.missing.iter().any(|m| m == program) {
            None
        } else {
            Some(PathBuf::from("/fake/bin").join(program))
        }
    }

    fn run(&self, invocation: &Invocation) -> io::Result<Exit> {
        self.record(invocation);
        Ok(self.exit_for(invocation))
    }

    fn capture(&self, invocation: &Invocation) -> io::Result<Captured> {
        self.record(invocation);
        Ok(Captured {
            exit: self.exit_for(invocation),
            stdout: self.stdout.clone(),
            stderr: String::new(),
        })
    }
}
