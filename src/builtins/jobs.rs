use super::{BuiltinCommand, BuiltinCommandContext};
use crate::process::ExitStatus;

pub struct Jobs;

impl BuiltinCommand for Jobs {
    fn run(&self, ctx: &mut BuiltinCommandContext) -> ExitStatus {
        // Drop finished children first so no dead entry is listed.
        ctx.shell.jobs_mut().reap_finished();

        for job in ctx.shell.jobs().iter() {
            println!("[{}] {} : {}", job.id, job.cmd, job.pid);
        }
        ExitStatus::ExitedWith(0)
    }
}
