use crate::process::ExitStatus;
use crate::shell::Shell;

use thiserror::Error;

mod alias;
mod cd;
mod diff;
mod fg;
mod jobs;
mod kill;
mod pwd;
mod quit;
mod showpid;
mod unalias;

pub trait BuiltinCommand {
    fn run(&self, ctx: &mut BuiltinCommandContext) -> ExitStatus;
}

pub struct BuiltinCommandContext<'a> {
    pub argv: &'a [String],
    /// The conjunct as typed; `alias` needs the original quoting.
    pub code: &'a str,
    pub shell: &'a mut Shell,
}

#[derive(Debug, Error)]
pub enum BuiltinCommandError {
    #[error("command not found")]
    NotFound,
}

pub fn builtin_command(name: &str) -> Option<Box<dyn BuiltinCommand>> {
    match name {
        "showpid" => Some(Box::new(showpid::ShowPid)),
        "pwd" => Some(Box::new(pwd::Pwd)),
        "cd" => Some(Box::new(cd::Cd)),
        "jobs" => Some(Box::new(jobs::Jobs)),
        "kill" => Some(Box::new(kill::Kill)),
        "fg" => Some(Box::new(fg::Fg)),
        "diff" => Some(Box::new(diff::Diff)),
        "alias" => Some(Box::new(alias::Alias)),
        "unalias" => Some(Box::new(unalias::Unalias)),
        "quit" => Some(Box::new(quit::Quit)),
        _ => None,
    }
}
