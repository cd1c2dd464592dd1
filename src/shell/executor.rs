//! Command executor - runs external commands
//!
//! Each external command gets fresh stdin/stdout byte channels: the
//! parent feeds the pipeline carry into one and drains the other after
//! the child exits. The carry is written from its own thread while the
//! parent reads, so a child that floods its output before consuming its
//! input cannot wedge both channels.

use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use anyhow::Result;

use super::ExecResult;

/// Upper bound on the bytes carried between pipeline stages, and on the
/// output captured from a single command.
pub const CARRY_CAPACITY: usize = 64 * 1024;

/// Spawn `argv` in `cwd`, feed `input` as its standard input, and capture
/// its standard output.
///
/// A program that cannot be located or executed reports exit code 1 with
/// no output, indistinguishable from a program that ran and failed.
/// Standard error is inherited from the shell.
pub fn run_external(argv: &[String], cwd: &Path, input: &[u8]) -> Result<ExecResult> {
    let Some(program) = argv.first() else {
        return Ok(ExecResult {
            output: None,
            code: 0,
        });
    };

    let (stdout_reader, stdout_writer) = os_pipe::pipe()?;
    let (stdin_reader, stdin_writer) = os_pipe::pipe()?;

    let spawned = Command::new(program)
        .args(&argv[1..])
        .current_dir(cwd)
        .stdin(Stdio::from(stdin_reader))
        .stdout(Stdio::from(stdout_writer))
        .stderr(Stdio::inherit())
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(_) => {
            return Ok(ExecResult {
                output: None,
                code: 1,
            });
        }
    };

    // Write the carry from a separate thread; dropping the writer closes
    // the channel so the child observes end-of-input.
    let carry = input.to_vec();
    let writer = thread::spawn(move || {
        let mut stdin_writer = stdin_writer;
        let _ = stdin_writer.write_all(&carry);
    });

    // Drain to end-of-file before waiting; the child's copy of the write
    // end closes when it exits.
    let mut output = Vec::new();
    let mut stdout_reader = stdout_reader;
    stdout_reader.read_to_end(&mut output)?;

    let status = child.wait()?;
    let _ = writer.join();

    output.truncate(CARRY_CAPACITY);
    Ok(ExecResult {
        output: Some(String::from_utf8_lossy(&output).into_owned()),
        code: status.code().unwrap_or(-1),
    })
}
