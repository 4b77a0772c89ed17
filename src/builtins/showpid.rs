use super::{BuiltinCommand, BuiltinCommandContext};
use crate::process::ExitStatus;

pub struct ShowPid;

impl BuiltinCommand for ShowPid {
    fn run(&self, ctx: &mut BuiltinCommandContext) -> ExitStatus {
        // Extra arguments are ignored.
        println!("smash pid is {}", ctx.shell.shell_pid);
        ExitStatus::ExitedWith(0)
    }
}
