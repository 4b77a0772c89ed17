use super::{BuiltinCommand, BuiltinCommandContext};
use crate::process::ExitStatus;

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

const BLOCK_SIZE: usize = 4096;

pub struct Diff;

impl BuiltinCommand for Diff {
    fn run(&self, ctx: &mut BuiltinCommandContext) -> ExitStatus {
        let args = &ctx.argv[1..];
        if args.len() != 2 {
            smash_err!("diff: expected 2 arguments");
            return ExitStatus::ExitedWith(1);
        }

        let left = Path::new(&args[0]);
        let right = Path::new(&args[1]);
        if !left.exists() || !right.exists() {
            smash_err!("diff: expected valid paths for files");
            return ExitStatus::ExitedWith(1);
        }
        if !left.is_file() || !right.is_file() {
            smash_err!("diff: paths are not files");
            return ExitStatus::ExitedWith(1);
        }

        match files_differ(left, right) {
            Ok(differ) => {
                println!("{}", i32::from(differ));
                ExitStatus::ExitedWith(0)
            }
            Err(err) => {
                debug!("diff failed: {}", err);
                smash_err!("smash: read failed");
                ExitStatus::ExitedWith(1)
            }
        }
    }
}

/// Byte-for-byte comparison in fixed-size blocks. A length mismatch already
/// decides the answer.
fn files_differ(left: &Path, right: &Path) -> io::Result<bool> {
    if left.metadata()?.len() != right.metadata()?.len() {
        return Ok(true);
    }

    let mut left = File::open(left)?;
    let mut right = File::open(right)?;
    let mut left_block = [0u8; BLOCK_SIZE];
    let mut right_block = [0u8; BLOCK_SIZE];
    loop {
        let n = left.read(&mut left_block)?;
        if n == 0 {
            // Same length, so the right side is exhausted too.
            return Ok(false);
        }
        right.read_exact(&mut right_block[..n])?;
        if left_block[..n] != right_block[..n] {
            return Ok(true);
        }
    }
}
