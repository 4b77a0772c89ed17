use super::{BuiltinCommand, BuiltinCommandContext};
use crate::process::ExitStatus;
use crate::shell::ExitMode;

pub struct Quit;

impl BuiltinCommand for Quit {
    fn run(&self, ctx: &mut BuiltinCommandContext) -> ExitStatus {
        let args = &ctx.argv[1..];
        let mode = match args {
            [] => ExitMode::Normal,
            [arg] if arg.as_str() == "kill" => ExitMode::Kill,
            _ => {
                smash_err!("quit: unexpected arguments");
                return ExitStatus::ExitedWith(1);
            }
        };

        ctx.shell.request_exit(mode);
        ExitStatus::ExitedWith(0)
    }
}
