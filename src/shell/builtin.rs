//! Built-in commands
//!
//! Built-ins run synchronously against shell state and write any textual
//! output to the caller's buffer; the execution controller decides
//! whether that text is printed, redirected, or carried into a pipe.

use std::io::Write;
use std::path::Path;
use anyhow::Result;

use super::Shell;

/// All builtin command names. Matching is exact; anything else spawns an
/// external process.
const BUILTINS: &[&str] = &[
    "pwd", "cd", "echo", "alias", "unalias", "pushd", "popd", "dirs",
];

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

/// Run a builtin. `words` is the full word list, name included.
pub fn run(shell: &mut Shell, words: &[String], out: &mut dyn Write) -> Result<i32> {
    let name = words.first().map(String::as_str).unwrap_or_default();
    let args: Vec<&str> = words.iter().skip(1).map(String::as_str).collect();

    match name {
        "pwd" => builtin_pwd(shell, out),
        "cd" => builtin_cd(shell, &args),
        "echo" => builtin_echo(&args, out),
        "alias" => builtin_alias(shell, &args, out),
        "unalias" => builtin_unalias(shell, &args),
        "pushd" => builtin_pushd(shell, &args),
        "popd" => builtin_popd(shell, out),
        "dirs" => builtin_dirs(shell, out),
        _ => Err(anyhow::anyhow!("unknown builtin: {}", name)),
    }
}

/// pwd - print the working directory
fn builtin_pwd(shell: &Shell, out: &mut dyn Write) -> Result<i32> {
    writeln!(out, "{}", shell.cwd.display())?;
    Ok(0)
}

/// cd - change the working directory; no argument means the root
/// directory. A target that cannot be entered leaves the working
/// directory unchanged, without a message.
fn builtin_cd(shell: &mut Shell, args: &[&str]) -> Result<i32> {
    let target = args.first().copied().unwrap_or("/");
    shell.change_dir(Path::new(target));
    Ok(0)
}

/// echo - join the arguments with single spaces, newline-terminated
fn builtin_echo(args: &[&str], out: &mut dyn Write) -> Result<i32> {
    writeln!(out, "{}", args.join(" "))?;
    Ok(0)
}

/// alias - no arguments dumps the table, one argument dumps that entry,
/// more define `name = rest joined with spaces`
fn builtin_alias(shell: &mut Shell, args: &[&str], out: &mut dyn Write) -> Result<i32> {
    if args.is_empty() {
        for (name, expansion) in shell.aliases.iter() {
            writeln!(out, "{}='{}'", name, expansion)?;
        }
    } else if args.len() == 1 {
        if let Some(expansion) = shell.aliases.lookup(args[0]) {
            writeln!(out, "{}='{}'", args[0], expansion)?;
        }
    } else {
        // A full table drops the definition without a word.
        shell.aliases.define(args[0], &args[1..].join(" "));
    }
    Ok(0)
}

/// unalias - drop an alias; unknown names (and a missing operand) are
/// ignored
fn builtin_unalias(shell: &mut Shell, args: &[&str]) -> Result<i32> {
    if let Some(name) = args.first() {
        shell.aliases.remove(name);
    }
    Ok(0)
}

/// pushd - remember the current directory, then change like `cd`
fn builtin_pushd(shell: &mut Shell, args: &[&str]) -> Result<i32> {
    let previous = shell.cwd.display().to_string();
    let target = args.first().copied().unwrap_or("/");
    shell.change_dir(Path::new(target));
    // Pushed after the change, but recorded before it; a full stack
    // drops the entry while the directory change stands.
    shell.dir_stack.push(previous);
    Ok(0)
}

/// popd - return to the most recently pushed directory
fn builtin_popd(shell: &mut Shell, out: &mut dyn Write) -> Result<i32> {
    match shell.dir_stack.pop() {
        Some(dir) => shell.change_dir(Path::new(&dir)),
        None => writeln!(out, "popd: directory stack empty")?,
    }
    Ok(0)
}

/// dirs - list the directory stack, most recent first
fn builtin_dirs(shell: &Shell, out: &mut dyn Write) -> Result<i32> {
    for dir in shell.dir_stack.iter_newest_first() {
        writeln!(out, "{}", dir)?;
    }
    Ok(0)
}
