use super::{BuiltinCommand, BuiltinCommandContext};
use crate::jobs::JobState;
use crate::process::{self, ExitStatus};

use nix::sys::signal::{kill, Signal};

pub struct Fg;

impl BuiltinCommand for Fg {
    fn run(&self, ctx: &mut BuiltinCommandContext) -> ExitStatus {
        let args = &ctx.argv[1..];
        if args.len() > 1 {
            smash_err!("fg: invalid arguments");
            return ExitStatus::ExitedWith(1);
        }

        let job_id = match args.first() {
            Some(arg) => match arg.parse::<u32>() {
                Ok(id) => id,
                Err(_) => {
                    smash_err!("fg: invalid arguments");
                    return ExitStatus::ExitedWith(1);
                }
            },
            None => match ctx.shell.jobs().max_id() {
                Some(id) => id,
                None => {
                    smash_err!("fg: jobs list is empty");
                    return ExitStatus::ExitedWith(1);
                }
            },
        };

        // The entry leaves the table before the wait; foreground jobs are
        // not tracked.
        let job = match ctx.shell.jobs_mut().take(job_id) {
            Some(job) => job,
            None => {
                smash_err!("fg: job id {} does not exist", job_id);
                return ExitStatus::ExitedWith(1);
            }
        };

        println!("{} : {}", job.cmd, job.pid);

        if job.state == JobState::Stopped {
            kill(job.pid, Signal::SIGCONT).ok();
        }

        let status = process::run_in_foreground(ctx.shell, job.pid);
        ExitStatus::ExitedWith(status)
    }
}
