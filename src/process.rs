use crate::builtins::{BuiltinCommandContext, BuiltinCommandError};
use crate::jobs::JobState;
use crate::shell::Shell;

use nix::errno::Errno;
use nix::sys::signal::{kill, sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::termios::{tcsetattr, SetArg::TCSADRAIN, Termios};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{execvp, fork, getpid, setpgid, tcsetpgrp, ForkResult, Pid};
use std::ffi::CString;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long `quit kill` waits after SIGTERM before falling back to SIGKILL.
const TERM_GRACE: Duration = Duration::from_secs(5);

/// The process execution context.
#[derive(Debug, Copy, Clone)]
pub struct Context {
    /// The process should be executed in background.
    pub background: bool,
    pub interactive: bool,
}

/// The exit status or reason why the command exited.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExitStatus {
    ExitedWith(i32),
    /// A background child was spawned and keeps running.
    Running(Pid),
}

pub fn run_internal_command(
    shell: &mut Shell,
    argv: &[String],
    code: &str,
) -> anyhow::Result<ExitStatus> {
    let command = match crate::builtins::builtin_command(argv[0].as_str()) {
        Some(command) => command,
        _ => return Err(BuiltinCommandError::NotFound.into()),
    };

    let result = command.run(&mut BuiltinCommandContext { argv, code, shell });

    Ok(result)
}

pub fn run_external_command(
    ctx: &Context,
    shell: &mut Shell,
    argv: Vec<String>,
    code: &str,
) -> anyhow::Result<ExitStatus> {
    let mut args = Vec::new();
    for arg in argv {
        args.push(CString::new(arg)?);
    }

    // Spawn a child.
    match unsafe { fork() } {
        Err(err) => {
            debug!("fork failed: {}", err);
            smash_err!("smash: fork failed");
            Ok(ExitStatus::ExitedWith(1))
        }
        Ok(ForkResult::Parent { child }) => {
            if ctx.background {
                // Mirror the child's setpgid; the loser of the race is a
                // harmless no-op or EACCES after exec.
                setpgid(child, child).ok();
                let id = shell.jobs_mut().add(child, code.to_owned());
                debug!("spawned job [{}] pid={}", id, child);
                Ok(ExitStatus::Running(child))
            } else {
                let status = run_in_foreground(shell, child);
                Ok(ExitStatus::ExitedWith(status))
            }
        }
        Ok(ForkResult::Child) => {
            // Back to the default job-control dispositions
            // (refer https://www.gnu.org/software/libc/manual/html_node/Launching-Jobs.html)
            let action = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
            for signal in [
                Signal::SIGINT,
                Signal::SIGQUIT,
                Signal::SIGTSTP,
                Signal::SIGTTIN,
                Signal::SIGTTOU,
                Signal::SIGCHLD,
                // The Rust runtime ignores SIGPIPE, and ignored dispositions
                // survive exec.
                Signal::SIGPIPE,
            ] {
                unsafe { sigaction(signal, &action) }.ok();
            }

            if ctx.background {
                // Background children live in their own process group so a
                // later `fg` has a group to hand the terminal to.
                setpgid(Pid::from_raw(0), Pid::from_raw(0)).ok();
            } else if ctx.interactive {
                let pid = getpid();
                setpgid(pid, pid).ok();
                set_terminal_process_group(pid);
                if let Some(termios) = shell.shell_termios.as_ref() {
                    restore_terminal_attrs(termios);
                }
            }

            match execvp(&args[0], &args) {
                Ok(_) => {
                    unreachable!();
                }
                Err(err) => {
                    debug!("execvp {:?} failed: {}", args[0], err);
                    smash_err!("external: cannot find program");
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Hands the terminal to `pid`, waits for it, then takes the terminal back.
pub fn run_in_foreground(shell: &mut Shell, pid: Pid) -> i32 {
    debug!("run_in_foreground: {}", pid);
    if shell.interactive() {
        set_terminal_process_group(pid);
    }

    let status = wait_foreground(pid);

    // Go back into the shell.
    if shell.interactive() {
        set_terminal_process_group(shell.shell_pgid);
        if let Some(termios) = shell.shell_termios.clone() {
            restore_terminal_attrs(&termios);
        }
    }

    status
}

/// Blocks until `pid` terminates or stops; returns its exit status
/// (128+signo for a signal death or stop).
fn wait_foreground(pid: Pid) -> i32 {
    loop {
        match waitpid(pid, Some(WaitPidFlag::WUNTRACED)) {
            Ok(WaitStatus::Exited(_, status)) => return status,
            Ok(WaitStatus::Signaled(_, signal, _)) => return 128 + signal as i32,
            Ok(WaitStatus::Stopped(_, signal)) => {
                // Stopped foreground children are not tracked.
                debug!("foreground child {} stopped", pid);
                return 128 + signal as i32;
            }
            Err(Errno::EINTR) => continue,
            Err(err) => {
                debug!("waitpid({}) failed: {}", pid, err);
                smash_err!("smash: waitpid failed");
                return 1;
            }
            Ok(status) => {
                debug!("unexpected waitpid event: {:?}", status);
                return 1;
            }
        }
    }
}

/// Delivers `signum` to `pid`. Numbers outside the portable range (realtime
/// signals) bypass the `Signal` enum.
pub fn send_signal(pid: Pid, signum: i32) -> nix::Result<()> {
    match Signal::try_from(signum) {
        Ok(signal) => kill(pid, signal),
        Err(_) => {
            let result = unsafe { nix::libc::kill(pid.as_raw(), signum) };
            if result == -1 {
                Err(Errno::last())
            } else {
                Ok(())
            }
        }
    }
}

pub fn set_terminal_process_group(pgid: Pid) {
    tcsetpgrp(0, pgid).ok();
}

pub fn restore_terminal_attrs(termios: &Termios) {
    tcsetattr(0, TCSADRAIN, termios).ok();
}

/// Ignore the signals that must not kill or stop the shell itself. The
/// terminal-ownership pair only matters when there is a terminal.
pub fn ignore_shell_signals(interactive: bool) {
    let action = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    let mut signals = vec![Signal::SIGINT, Signal::SIGQUIT, Signal::SIGTSTP];
    if interactive {
        signals.push(Signal::SIGTTIN);
        signals.push(Signal::SIGTTOU);
    }
    for signal in signals {
        if unsafe { sigaction(signal, &action) }.is_err() {
            smash_err!("smash: sigaction failed");
        }
    }
}

/// The `quit kill` sweep: SIGTERM each live job in ascending id order, give
/// it five seconds, then SIGKILL whatever is left.
pub fn shutdown_jobs(shell: &mut Shell) {
    for job in shell.jobs_mut().drain() {
        print!("[{}] {} - Sending SIGTERM... ", job.pid, job.cmd);
        std::io::stdout().flush().ok();

        kill(job.pid, Signal::SIGTERM).ok();
        if job.state == JobState::Stopped {
            // A stopped child keeps SIGTERM pending until it runs again.
            kill(job.pid, Signal::SIGCONT).ok();
        }

        if !poll_until_reaped(job.pid, TERM_GRACE) {
            print!("Sending SIGKILL... ");
            std::io::stdout().flush().ok();
            kill(job.pid, Signal::SIGKILL).ok();
            waitpid(job.pid, None).ok();
        }

        println!("Done.");
    }
}

fn poll_until_reaped(pid: Pid, grace: Duration) -> bool {
    let deadline = Instant::now() + grace;
    loop {
        match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => {}
            // Reaped, or gone already (ECHILD).
            Ok(_) | Err(_) => return true,
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
}
