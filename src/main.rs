//! shoal - a small line-oriented shell
//!
//! Usage:
//!   shoal                  Interactive shell
//!   shoal -c "command"     Execute a single line
//!   shoal script.sh        Execute a script file

use std::env;
use std::fs;
use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;

use shoal::Shell;

/// Run `~/.shoalrc` line by line before the first command.
fn load_rc(shell: &mut Shell) {
    let Some(home) = dirs::home_dir() else {
        return;
    };

    let Ok(content) = fs::read_to_string(home.join(".shoalrc")) else {
        return;
    };

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        if let Err(e) = shell.execute(line) {
            eprintln!("shoal: .shoalrc:{}: {}", idx + 1, e);
        }
        if shell.should_exit {
            break;
        }
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "-c" => {
                if args.len() < 3 {
                    eprintln!("shoal: -c requires an argument");
                    std::process::exit(1);
                }
                let line = args[2..].join(" ");
                let code = execute_command(&line)?;
                std::process::exit(code);
            }
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            "-v" | "--version" => {
                println!("shoal v{}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            path if !path.starts_with('-') => {
                return execute_script(path);
            }
            _ => {
                eprintln!("shoal: unknown option: {}", args[1]);
                std::process::exit(1);
            }
        }
    }

    run_repl()
}

fn print_help() {
    println!("{}", "shoal - a small line-oriented shell".bold());
    println!();
    println!("Usage:");
    println!("  shoal                  Start interactive shell");
    println!("  shoal -c \"command\"     Execute a single line");
    println!("  shoal script.sh        Execute a script file");
    println!("  shoal -h, --help       Show this help");
    println!("  shoal -v, --version    Show version");
    println!();
    println!("Lines split on ` ; `, ` && `, ` || `, and ` | `; redirection with");
    println!("` < `, ` > `, ` >> `. Built-ins: pwd, cd, echo, alias, unalias,");
    println!("pushd, popd, dirs. The line 'exit' leaves the shell.");
}

fn execute_command(line: &str) -> Result<i32> {
    let mut shell = Shell::new()?;
    load_rc(&mut shell);
    match shell.execute(line) {
        Ok(()) => Ok(shell.last_status),
        Err(e) => {
            eprintln!("{}: {}", "error".red(), e);
            Ok(1)
        }
    }
}

fn execute_script(path: &str) -> Result<()> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("shoal: {}: {}", path, e);
            std::process::exit(1);
        }
    };

    let mut shell = Shell::new()?;
    load_rc(&mut shell);

    for line in content.lines() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        if let Err(e) = shell.execute(line) {
            eprintln!("{}: {}", "error".red(), e);
        }
        if shell.should_exit {
            break;
        }
    }

    Ok(())
}

fn run_repl() -> Result<()> {
    let mut shell = Shell::new()?;
    load_rc(&mut shell);

    let mut editor = rustyline::DefaultEditor::new()?;
    let history_path = dirs::home_dir().map(|home| home.join(".shoal_history"));
    if let Some(path) = &history_path {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline(&shell.prompt()) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());
                if let Err(e) = shell.execute(&line) {
                    eprintln!("{}: {}", "error".red(), e);
                }
                if shell.should_exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(e) => {
                eprintln!("shoal: input error: {}", e);
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        let _ = editor.save_history(path);
    }

    Ok(())
}
