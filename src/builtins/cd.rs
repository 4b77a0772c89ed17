use super::{BuiltinCommand, BuiltinCommandContext};
use crate::process::ExitStatus;

use nix::errno::Errno;
use nix::unistd::{chdir, getcwd};
use std::path::PathBuf;

pub struct Cd;

impl BuiltinCommand for Cd {
    fn run(&self, ctx: &mut BuiltinCommandContext) -> ExitStatus {
        let args = &ctx.argv[1..];
        if args.len() > 1 {
            smash_err!("cd: too many arguments");
            return ExitStatus::ExitedWith(1);
        }
        let arg = match args.first() {
            Some(arg) => arg.as_str(),
            None => {
                smash_err!("cd: expected 1 argument");
                return ExitStatus::ExitedWith(1);
            }
        };

        let target: PathBuf = if arg == "-" {
            match ctx.shell.oldpwd() {
                Some(oldpwd) => oldpwd.to_path_buf(),
                None => {
                    smash_err!("cd: old pwd not set");
                    return ExitStatus::ExitedWith(1);
                }
            }
        } else {
            PathBuf::from(arg)
        };

        if let Err(err) = chdir(&target) {
            match err {
                Errno::ENOENT => smash_err!("cd: {}: does not exist", target.display()),
                Errno::ENOTDIR => smash_err!("cd: {}: not a directory", target.display()),
                err => smash_err!("cd: {}: {}", target.display(), err.desc()),
            }
            return ExitStatus::ExitedWith(1);
        }

        // Re-read the cwd so `..` and symlinks normalize.
        let cwd = getcwd().unwrap_or(target);
        ctx.shell.set_cwd(cwd);
        ExitStatus::ExitedWith(0)
    }
}
