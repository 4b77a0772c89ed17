use crate::builtins::BuiltinCommandError;
use crate::expand::expand_words;
use crate::parser::{Ast, Conjunct};
use crate::process::{run_external_command, run_internal_command, Context, ExitStatus};
use crate::shell::Shell;

use tracing::debug;

pub fn eval(shell: &mut Shell, ast: &Ast) -> ExitStatus {
    debug!("ast: {:#?}", ast);
    run_conjuncts(shell, &ast.conjuncts)
}

pub fn run_conjuncts(shell: &mut Shell, conjuncts: &[Conjunct]) -> ExitStatus {
    let mut last_status = ExitStatus::ExitedWith(0);
    for conjunct in conjuncts {
        match last_status {
            ExitStatus::ExitedWith(0) | ExitStatus::Running(_) => (),
            // `&&` short-circuits on the first failure.
            ExitStatus::ExitedWith(_) => break,
        }

        last_status = run_conjunct(shell, conjunct);
    }

    last_status
}

fn run_conjunct(shell: &mut Shell, conjunct: &Conjunct) -> ExitStatus {
    debug!("run_conjunct: {:?}", conjunct.code);
    let argv = expand_words(shell, &conjunct.argv);
    if argv.is_empty() {
        return ExitStatus::ExitedWith(0);
    }

    let ctx = Context {
        background: conjunct.background,
        interactive: shell.interactive(),
    };

    // Internal commands first; NotFound falls through to fork+exec.
    let status = match run_internal_command(shell, &argv, &conjunct.code) {
        Ok(status) => status,
        Err(err) => match err.downcast_ref::<BuiltinCommandError>() {
            Some(BuiltinCommandError::NotFound) => {
                match run_external_command(&ctx, shell, argv, &conjunct.code) {
                    Ok(status) => status,
                    Err(err) => {
                        debug!("external command failed: {}", err);
                        smash_err!("smash: exec failed");
                        ExitStatus::ExitedWith(1)
                    }
                }
            }
            _ => {
                debug!("builtin failed: {}", err);
                ExitStatus::ExitedWith(1)
            }
        },
    };

    match status {
        ExitStatus::ExitedWith(code) => shell.set_last_status(code),
        // A freshly spawned background job does not fail the chain.
        ExitStatus::Running(_) => shell.set_last_status(0),
    }

    status
}
