//! Shell core module

pub mod builtin;
pub mod executor;
pub mod parser;
pub mod table;

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use anyhow::Result;
use colored::Colorize;

use parser::{ChainOp, RedirectKind};
use table::{AliasTable, DirStack};

/// Result of one executed segment: optional textual output plus the exit
/// code. Built-ins report 0; external commands report their real status.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecResult {
    pub output: Option<String>,
    pub code: i32,
}

/// Main shell state
pub struct Shell {
    /// Current working directory, handed to every child process
    pub cwd: PathBuf,
    /// Command aliases
    pub aliases: AliasTable,
    /// Directories recorded by pushd
    pub dir_stack: DirStack,
    /// Carry buffer between pipeline stages; live only while a pipe
    /// chain is running
    carry: Vec<u8>,
    /// Last command exit status
    pub last_status: i32,
    /// Should exit
    pub should_exit: bool,
}

impl Shell {
    pub fn new() -> Result<Self> {
        Ok(Self {
            cwd: env::current_dir()?,
            aliases: AliasTable::new(),
            dir_stack: DirStack::new(),
            carry: Vec::new(),
            last_status: 0,
            should_exit: false,
        })
    }

    /// Execute a command line, printing output to stdout.
    pub fn execute(&mut self, line: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.execute_to(line, &mut out)
    }

    /// Execute a command line, writing segment output to `out`.
    ///
    /// Segments run left to right. A `|` stores the segment's output as
    /// the next stage's input instead of emitting it; `&&` skips the next
    /// segment when the current one exits 0, `||` when it exits nonzero
    /// (the skipped segment's own operator is never consulted). Whenever
    /// a non-pipelining segment finishes the carry is cleared, so a pipe
    /// chain cannot leak into an unrelated command later on the line.
    pub fn execute_to(&mut self, line: &str, out: &mut dyn Write) -> Result<()> {
        if line == "exit" {
            self.should_exit = true;
            return Ok(());
        }

        let segments = parser::segment_line(line);
        let mut index = 0;

        while index < segments.len() {
            let segment = &segments[index];
            let (command_text, clause) = parser::split_redirect(&segment.text);

            let mut redirected = false;
            let mut out_file: Option<fs::File> = None;

            if let Some(clause) = clause {
                let target = self.cwd.join(&clause.target);
                match clause.kind {
                    RedirectKind::Input => match fs::read(&target) {
                        Ok(mut bytes) => {
                            bytes.truncate(executor::CARRY_CAPACITY);
                            self.carry = bytes;
                        }
                        // An unreadable input file cancels just this
                        // segment; its chain operator is never consulted.
                        Err(_) => {
                            index += 1;
                            continue;
                        }
                    },
                    RedirectKind::Truncate | RedirectKind::Append => {
                        redirected = true;
                        // Opened before the segment runs, so the target is
                        // created (and `>` truncated) even when the
                        // segment produces nothing. An unopenable target
                        // swallows the output.
                        out_file = fs::OpenOptions::new()
                            .write(true)
                            .create(true)
                            .truncate(clause.kind == RedirectKind::Truncate)
                            .append(clause.kind == RedirectKind::Append)
                            .open(&target)
                            .ok();
                    }
                }
            }

            let piping = segment.op == ChainOp::Pipe && index + 1 < segments.len();
            let result = self.run_segment(&command_text)?;
            self.last_status = result.code;

            if piping {
                let mut bytes = result.output.unwrap_or_default().into_bytes();
                bytes.truncate(executor::CARRY_CAPACITY);
                self.carry = bytes;
            } else {
                self.carry.clear();
                if let Some(text) = &result.output {
                    if redirected {
                        if let Some(file) = out_file.as_mut() {
                            let _ = file.write_all(text.as_bytes());
                        }
                    } else {
                        write!(out, "{}", text)?;
                        out.flush()?;
                    }
                }
            }

            let skip_next = match segment.op {
                ChainOp::And => result.code == 0,
                ChainOp::Or => result.code != 0,
                _ => false,
            };
            index += if skip_next { 2 } else { 1 };
        }

        Ok(())
    }

    /// Tokenize one segment, resolve its alias, and dispatch it to a
    /// builtin or the external executor.
    fn run_segment(&mut self, text: &str) -> Result<ExecResult> {
        let mut words = parser::split_words(text);
        parser::expand_alias(&mut words, &self.aliases);

        let name = words.first().map(String::as_str).unwrap_or_default();
        if builtin::is_builtin(name) {
            let mut buf = Vec::<u8>::new();
            let code = builtin::run(self, &words, &mut buf)?;
            let output = if buf.is_empty() {
                None
            } else {
                Some(String::from_utf8_lossy(&buf).into_owned())
            };
            Ok(ExecResult { output, code })
        } else {
            executor::run_external(&words, &self.cwd, &self.carry)
        }
    }

    /// Change the working directory, silently staying put when the target
    /// is not an enterable directory.
    pub(crate) fn change_dir(&mut self, target: &Path) {
        let target = self.cwd.join(target);
        if target.is_dir() {
            if let Ok(resolved) = fs::canonicalize(&target) {
                self.cwd = resolved;
            }
        }
    }

    /// Prompt string for the interactive loop.
    pub fn prompt(&self) -> String {
        fn shorten(s: &str, max: usize) -> String {
            if s.chars().count() <= max {
                return s.to_string();
            }
            let head: String = s.chars().take(max / 2).collect();
            let tail: String = s
                .chars()
                .rev()
                .take(max / 2 - 1)
                .collect::<String>()
                .chars()
                .rev()
                .collect();
            format!("{}…{}", head, tail)
        }

        let cwd = shorten(&self.cwd.display().to_string(), 48);
        format!("{} {}$ ", "shoal".bright_cyan().bold(), cwd.white())
    }
}
