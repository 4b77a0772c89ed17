use crate::process;
use crate::shell::{ExitMode, Shell};

use std::io::{self, BufRead, Write};
use tracing::debug;

/// The interpreter loop: prompt, read, run, reap.
pub struct SmashState {
    shell: Shell,
}

impl SmashState {
    pub fn new(shell: Shell) -> SmashState {
        SmashState { shell }
    }

    pub fn run(mut self) {
        let stdin = io::stdin();
        let mut reader = stdin.lock();

        loop {
            // Keep the job table fresh before the next command.
            self.shell.jobs_mut().reap_finished();

            print!("smash > ");
            io::stdout().flush().ok();

            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => {
                    // EOF behaves like `quit`.
                    debug!("eof on stdin");
                    self.shell.request_exit(ExitMode::Normal);
                }
                Ok(_) => {
                    let line = line.trim_end_matches(|c| c == '\n' || c == '\r');
                    self.shell.run_line(line);
                }
                Err(err) => {
                    debug!("read_line failed: {}", err);
                    smash_err!("smash: read failed");
                    self.shell.request_exit(ExitMode::Normal);
                }
            }

            if let Some(mode) = self.shell.take_exit() {
                if mode == ExitMode::Kill {
                    process::shutdown_jobs(&mut self.shell);
                }
                std::process::exit(0);
            }
        }
    }
}
