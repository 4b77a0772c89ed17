use super::{BuiltinCommand, BuiltinCommandContext};
use crate::process::{self, ExitStatus};

use tracing::debug;

pub struct Kill;

impl BuiltinCommand for Kill {
    fn run(&self, ctx: &mut BuiltinCommandContext) -> ExitStatus {
        let (signum, job_id) = match parse_args(&ctx.argv[1..]) {
            Some(parsed) => parsed,
            None => {
                smash_err!("kill: invalid arguments");
                return ExitStatus::ExitedWith(1);
            }
        };

        let pid = match ctx.shell.jobs().get(job_id) {
            Some(job) => job.pid,
            None => {
                smash_err!("kill: job id {} does not exist", job_id);
                return ExitStatus::ExitedWith(1);
            }
        };

        match process::send_signal(pid, signum) {
            Ok(()) => {
                println!("signal number {} was sent to pid {}", signum, pid);
                ExitStatus::ExitedWith(0)
            }
            Err(err) => {
                debug!("kill({}, {}) failed: {}", pid, signum, err);
                smash_err!("smash: kill failed");
                ExitStatus::ExitedWith(1)
            }
        }
    }
}

fn parse_args(args: &[String]) -> Option<(i32, u32)> {
    if args.len() != 2 {
        return None;
    }
    let signum: i32 = args[0].parse().ok()?;
    if !(1..=64).contains(&signum) {
        return None;
    }
    let job_id: u32 = args[1].parse().ok()?;
    Some((signum, job_id))
}
