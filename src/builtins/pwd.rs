use super::{BuiltinCommand, BuiltinCommandContext};
use crate::process::ExitStatus;

pub struct Pwd;

impl BuiltinCommand for Pwd {
    fn run(&self, ctx: &mut BuiltinCommandContext) -> ExitStatus {
        // Extra arguments are ignored.
        println!("{}", ctx.shell.cwd().display());
        ExitStatus::ExitedWith(0)
    }
}
