use crate::alias::AliasTable;
use crate::eval;
use crate::jobs::JobTable;
use crate::parser::{self, ParseError};
use crate::process::ExitStatus;

use nix::sys::termios::{tcgetattr, Termios};
use nix::unistd::{getcwd, getpgrp, getpid, Pid};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExitMode {
    Normal,
    Kill,
}

pub struct Shell {
    last_status: i32,
    pub interactive: bool,
    pub shell_termios: Option<Termios>,
    pub shell_pid: Pid,
    pub shell_pgid: Pid,
    cwd: PathBuf,
    oldpwd: Option<PathBuf>,
    aliases: AliasTable,
    jobs: JobTable,
    exit: Option<ExitMode>,
}

impl Shell {
    pub fn new() -> Self {
        Self {
            last_status: 0,
            interactive: false,
            shell_termios: None,
            shell_pid: getpid(),
            shell_pgid: getpgrp(),
            cwd: getcwd().unwrap_or_else(|_| PathBuf::from("/")),
            oldpwd: None,
            aliases: AliasTable::new(),
            jobs: JobTable::new(),
            exit: None,
        }
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
        self.shell_termios = if interactive { tcgetattr(0).ok() } else { None };
    }

    #[inline]
    pub fn interactive(&self) -> bool {
        self.interactive
    }

    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    pub fn set_last_status(&mut self, status: i32) {
        self.last_status = status;
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn oldpwd(&self) -> Option<&Path> {
        self.oldpwd.as_deref()
    }

    /// Records a successful directory change; the previous cwd becomes
    /// oldpwd.
    pub fn set_cwd(&mut self, cwd: PathBuf) {
        self.oldpwd = Some(std::mem::replace(&mut self.cwd, cwd));
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn aliases_mut(&mut self) -> &mut AliasTable {
        &mut self.aliases
    }

    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    pub fn jobs_mut(&mut self) -> &mut JobTable {
        &mut self.jobs
    }

    pub fn request_exit(&mut self, mode: ExitMode) {
        self.exit = Some(mode);
    }

    pub fn take_exit(&mut self) -> Option<ExitMode> {
        self.exit.take()
    }

    /// Parse and run one input line.
    pub fn run_line(&mut self, line: &str) -> ExitStatus {
        match parser::parse(line) {
            Ok(ast) => eval::eval(self, &ast),
            Err(ParseError::Empty) => {
                // Just ignore.
                ExitStatus::ExitedWith(self.last_status)
            }
            Err(ParseError::Fatal(err)) => {
                debug!("parse error: {}", err);
                smash_err!("invalid command");
                self.set_last_status(1);
                ExitStatus::ExitedWith(1)
            }
        }
    }
}
