use crossterm::tty::IsTty;
use tracing_subscriber::{self, fmt, prelude::*, EnvFilter};

use event::SmashState;
use shell::Shell;

#[macro_use]
mod macros;

mod alias;
mod builtins;
mod eval;
mod event;
mod expand;
mod jobs;
mod parser;
mod process;
mod shell;

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let mut shell = Shell::new();
    let is_tty = std::io::stdin().is_tty();
    shell.set_interactive(is_tty);
    process::ignore_shell_signals(is_tty);
    SmashState::new(shell).run();
}
