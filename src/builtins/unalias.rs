use super::{BuiltinCommand, BuiltinCommandContext};
use crate::process::ExitStatus;

pub struct Unalias;

impl BuiltinCommand for Unalias {
    fn run(&self, ctx: &mut BuiltinCommandContext) -> ExitStatus {
        let args = &ctx.argv[1..];
        if args.is_empty() {
            smash_err!("unalias: invalid arguments");
            return ExitStatus::ExitedWith(1);
        }

        // Left to right; the first unknown name stops the sweep.
        for name in args {
            if !ctx.shell.aliases_mut().remove(name) {
                smash_err!("unalias: {} alias does not exist", name);
                return ExitStatus::ExitedWith(1);
            }
        }
        ExitStatus::ExitedWith(0)
    }
}
