//! Black-box tests: feed the shell lines over a pipe and scrape its output,
//! the same way an interactive user (or grader) would.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

fn smash() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin("smash"))
}

struct Run {
    stdout: String,
    stderr: String,
    status: std::process::ExitStatus,
}

/// Runs the shell, writing one line at a time with a pause in between.
/// Signal delivery and child death are asynchronous, so tests that depend on
/// reaping give the kernel a beat between commands.
fn run_paced(lines: &[&str], pace: Duration) -> Run {
    let mut child = smash()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn smash");

    let mut stdin = child.stdin.take().expect("stdin is piped");
    let lines: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
    let writer = std::thread::spawn(move || {
        for line in lines {
            if writeln!(stdin, "{}", line).is_err() {
                break;
            }
            stdin.flush().ok();
            if !pace.is_zero() {
                std::thread::sleep(pace);
            }
        }
    });

    let output = child.wait_with_output().expect("failed to wait for smash");
    writer.join().expect("writer thread panicked");
    Run {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        status: output.status,
    }
}

fn run(lines: &[&str]) -> Run {
    run_paced(lines, Duration::ZERO)
}

#[test]
fn showpid_prints_the_shell_pid() {
    let run = run(&["showpid", "quit"]);
    let rest = run
        .stdout
        .split("smash pid is ")
        .nth(1)
        .expect("pid line missing");
    assert!(rest.chars().next().is_some_and(|c| c.is_ascii_digit()));
}

#[test]
fn showpid_ignores_extra_arguments() {
    let run = run(&["showpid extra args here", "quit"]);
    assert!(run.stdout.contains("smash pid is "));
    assert!(!run.stderr.contains("expected 0 arguments"));
}

#[test]
fn pwd_follows_cd() {
    let run = run(&["cd /tmp", "pwd", "quit"]);
    assert!(run.stdout.contains("/tmp"));
}

#[test]
fn cd_dash_returns_to_the_previous_directory() {
    let run = run(&["cd /tmp", "cd /var", "cd -", "pwd", "quit"]);
    let last = run.stdout.lines().rev().find(|l| l.contains('/'));
    assert!(last.is_some_and(|l| l.contains("/tmp")), "{}", run.stdout);
}

#[test]
fn cd_dash_without_oldpwd_fails() {
    let run = run(&["cd -", "quit"]);
    assert!(run.stderr.contains("old pwd not set"));
}

#[test]
fn cd_reports_missing_and_non_directories() {
    let run1 = run(&["cd /this_path_does_not_exist_12345", "quit"]);
    assert!(run1.stderr.contains("does not exist"));

    let file = tempfile::NamedTempFile::new().unwrap();
    let line = format!("cd {}", file.path().display());
    let run2 = run(&[&line, "quit"]);
    assert!(run2.stderr.contains("not a directory"));
}

#[test]
fn cd_argument_count_errors() {
    let run1 = run(&["cd /tmp /var", "quit"]);
    assert!(run1.stderr.contains("too many arguments"));

    let run2 = run(&["cd", "quit"]);
    assert!(run2.stderr.contains("expected 1 argument"));
}

#[test]
fn external_commands_run_and_quote() {
    let run1 = run(&["echo hello world", "quit"]);
    assert!(run1.stdout.contains("hello world"));

    let run2 = run(&["echo 'hello   world'", "quit"]);
    assert!(run2.stdout.contains("hello   world"));
}

#[test]
fn unknown_programs_are_reported() {
    let run = run(&["no_such_program_xyz_12345", "quit"]);
    assert!(run.stderr.contains("cannot find program"));
}

#[test]
fn conjunction_runs_in_order() {
    let run = run(&["echo first && echo second", "quit"]);
    let first = run.stdout.find("first").expect("first missing");
    let second = run.stdout.find("second").expect("second missing");
    assert!(first < second);
}

#[test]
fn conjunction_short_circuits() {
    let run = run(&["cd /this_path_does_not_exist_12345 && echo should_not_appear", "quit"]);
    assert!(!run.stdout.contains("should_not_appear"));
}

#[test]
fn last_status_word_expands() {
    let run = run(&["cd /this_path_does_not_exist_12345", "echo $?", "quit"]);
    assert!(run.stdout.lines().any(|l| l.ends_with('1')), "{}", run.stdout);
}

#[test]
fn dangling_conjunction_is_invalid() {
    let run1 = run(&["echo a &&", "quit"]);
    assert!(run1.stderr.contains("invalid command"));

    let run2 = run(&["&& echo a", "quit"]);
    assert!(run2.stderr.contains("invalid command"));
}

#[test]
fn empty_lines_are_noops() {
    let run = run(&["", "   ", "echo test", "quit"]);
    assert!(run.stdout.contains("test"));
    assert!(run.stderr.is_empty(), "{}", run.stderr);
}

#[test]
fn alias_defines_expands_and_lists() {
    let run1 = run(&["alias h='echo hello world'", "h", "quit"]);
    assert!(run1.stdout.contains("hello world"));

    let run2 = run(&["alias t='echo test'", "alias", "quit"]);
    assert!(run2.stdout.contains("t='echo test'"));
}

#[test]
fn alias_listing_keeps_insertion_order_across_redefinition() {
    let run = run(&[
        "alias b='echo 1'",
        "alias a='echo 2'",
        "alias b='echo 3'",
        "alias",
        "quit",
    ]);
    let b = run.stdout.find("b='echo 3'").expect("b missing");
    let a = run.stdout.find("a='echo 2'").expect("a missing");
    assert!(b < a);
    assert!(!run.stdout.contains("b='echo 1'"));
}

#[test]
fn malformed_and_reserved_aliases_are_rejected() {
    for line in [
        "alias noequals",
        "alias h=unquoted",
        "alias h=''",
        "alias cd='echo no'",
    ] {
        let run = run(&[line, "quit"]);
        assert!(run.stderr.contains("invalid alias"), "no error for {:?}", line);
    }
}

#[test]
fn unalias_removes_until_an_unknown_name() {
    let run1 = run(&["alias t='echo test'", "unalias t", "alias", "quit"]);
    assert!(!run1.stdout.contains("t='echo test'"));

    let run2 = run(&["unalias missing", "quit"]);
    assert!(run2.stderr.contains("missing alias does not exist"));
}

#[test]
fn diff_compares_files_byte_for_byte() {
    let mut a = tempfile::NamedTempFile::new().unwrap();
    let mut b = tempfile::NamedTempFile::new().unwrap();
    write!(a, "identical content\n").unwrap();
    write!(b, "identical content\n").unwrap();
    a.flush().unwrap();
    b.flush().unwrap();

    let line = format!("diff {} {}", a.path().display(), b.path().display());
    let run1 = run(&[&line, "quit"]);
    assert!(run1.stdout.lines().any(|l| l.trim_start_matches("smash > ") == "0"));

    let mut c = tempfile::NamedTempFile::new().unwrap();
    write!(c, "different content\n").unwrap();
    c.flush().unwrap();
    let line = format!("diff {} {}", a.path().display(), c.path().display());
    let run2 = run(&[&line, "quit"]);
    assert!(run2.stdout.lines().any(|l| l.trim_start_matches("smash > ") == "1"));
}

#[test]
fn diff_argument_and_path_errors() {
    let run1 = run(&["diff /tmp", "quit"]);
    assert!(run1.stderr.contains("expected 2 arguments"));

    let run2 = run(&["diff /nonexistent1 /nonexistent2", "quit"]);
    assert!(run2.stderr.contains("expected valid paths for files"));

    let run3 = run(&["diff /tmp /var", "quit"]);
    assert!(run3.stderr.contains("paths are not files"));
}

#[test]
fn background_jobs_are_listed_with_ids_and_pids() {
    let run = run_paced(
        &["sleep 100 &", "sleep 100 &", "jobs", "quit kill"],
        Duration::from_millis(100),
    );
    assert!(run.stdout.contains("[0] sleep 100 & : "));
    assert!(run.stdout.contains("[1] sleep 100 & : "));
}

#[test]
fn job_ids_are_recycled_smallest_first() {
    let run = run_paced(
        &[
            "sleep 100 &",
            "sleep 100 &",
            "kill 9 0",
            "sleep 100 &",
            "jobs",
            "quit kill",
        ],
        Duration::from_millis(250),
    );
    assert!(run.stdout.contains("[0]"), "{}", run.stdout);
    assert!(run.stdout.contains("[1]"), "{}", run.stdout);
    assert!(!run.stdout.contains("[2]"), "{}", run.stdout);
}

#[test]
fn kill_sends_the_signal_and_confirms() {
    let run = run_paced(
        &["sleep 100 &", "kill 9 0", "quit"],
        Duration::from_millis(100),
    );
    assert!(run.stdout.contains("signal number 9 was sent to pid "));
}

#[test]
fn kill_rejects_bad_arguments_and_unknown_jobs() {
    let run1 = run(&["kill 9 99", "quit"]);
    assert!(run1.stderr.contains("job id 99 does not exist"));

    let run2 = run(&["kill abc 0", "quit"]);
    assert!(run2.stderr.contains("invalid arguments"));

    let run3 = run(&["kill 9", "quit"]);
    assert!(run3.stderr.contains("invalid arguments"));
}

#[test]
fn fg_waits_for_the_job_and_prints_it() {
    let run = run_paced(&["sleep 1 &", "fg 0", "quit"], Duration::from_millis(100));
    assert!(run.stdout.contains("sleep 1 & : "));
    assert!(run.status.success());

    // The job left the table when it was foregrounded.
    let run2 = run_paced(
        &["sleep 1 &", "fg", "jobs", "quit"],
        Duration::from_millis(100),
    );
    assert!(!run2.stdout.contains("[0]"));
}

#[test]
fn fg_errors() {
    let run1 = run(&["fg", "quit"]);
    assert!(run1.stderr.contains("jobs list is empty"));

    let run2 = run(&["fg 99", "quit"]);
    assert!(run2.stderr.contains("job id 99 does not exist"));

    let run3 = run(&["fg abc", "quit"]);
    assert!(run3.stderr.contains("invalid arguments"));
}

#[test]
fn quit_exits_cleanly() {
    let run = run(&["quit"]);
    assert!(run.status.success());
    assert_eq!(run.status.code(), Some(0));
}

#[test]
fn quit_on_eof() {
    let run = run(&[]);
    assert!(run.status.success());
}

#[test]
fn quit_rejects_unknown_arguments() {
    let run = run(&["quit foo", "quit"]);
    assert!(run.stderr.contains("unexpected arguments"));
    assert!(run.status.success());
}

#[test]
fn quit_kill_terminates_every_job() {
    let run = run_paced(
        &["sleep 100 &", "sleep 100 &", "quit kill"],
        Duration::from_millis(100),
    );
    assert!(run.stdout.contains("Sending SIGTERM... "));
    let done = run.stdout.matches("Done.").count();
    assert_eq!(done, 2, "{}", run.stdout);
    assert!(run.status.success());
}
