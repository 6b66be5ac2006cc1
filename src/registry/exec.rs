//! `Exec=` command-line handling for desktop entries.
//!
//! The command line is split into words with `shlex` and never handed to a shell.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("unbalanced quoting in Exec line")]
    ExecParseFailed,
    #[error("Exec line is empty after removing field codes")]
    EmptyExec,
    #[error("unbalanced quoting in terminal command")]
    TerminalParseFailed,
    #[error("terminal command is empty")]
    EmptyTerminal,
}

/// Values substituted for the field codes that refer to the entry itself.
#[derive(Debug, Clone, Default)]
pub struct ExecContext<'a> {
    pub name: Option<&'a str>,
    pub icon: Option<&'a str>,
    pub desktop_file: Option<&'a Path>,
}

/// A program and its arguments, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

/// Expand field codes inside a single word.
///
/// `%c` and `%k` are substituted, `%%` becomes `%`, file/URL codes and the
/// deprecated ones are dropped. Unknown codes are kept verbatim.
fn expand_field_codes(word: &str, ctx: &ExecContext<'_>) -> String {
    const DROPPED: &[char] = &['f', 'F', 'u', 'U', 'd', 'D', 'n', 'N', 'v', 'm', 'i'];

    let mut out = String::with_capacity(word.len());
    let mut chars = word.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('c') => out.push_str(ctx.name.unwrap_or_default()),
            Some('k') => {
                if let Some(path) = ctx.desktop_file {
                    out.push_str(&path.to_string_lossy());
                }
            }
            Some(code) if DROPPED.contains(&code) => {}
            Some(code) => {
                out.push('%');
                out.push(code);
            }
            None => out.push('%'),
        }
    }
    out
}

/// Split an `Exec=` value into a program and arguments.
pub fn parse_exec(exec: &str, ctx: &ExecContext<'_>) -> Result<LaunchCommand, LaunchError> {
    let words = shlex::split(exec).ok_or(LaunchError::ExecParseFailed)?;

    let mut expanded = Vec::with_capacity(words.len());
    for word in words {
        // `%i` standing alone expands to two words, or to nothing without an icon.
        if word == "%i" {
            if let Some(icon) = ctx.icon {
                expanded.push("--icon".to_string());
                expanded.push(icon.to_string());
            }
            continue;
        }
        let word = expand_field_codes(&word, ctx);
        if !word.is_empty() {
            expanded.push(word);
        }
    }

    let mut iter = expanded.into_iter();
    let program = iter.next().ok_or(LaunchError::EmptyExec)?;
    Ok(LaunchCommand {
        program,
        args: iter.collect(),
    })
}

fn parse_terminal(terminal: &str) -> Result<LaunchCommand, LaunchError> {
    let words = shlex::split(terminal).ok_or(LaunchError::TerminalParseFailed)?;
    let mut iter = words.into_iter();
    let program = iter.next().ok_or(LaunchError::EmptyTerminal)?;
    Ok(LaunchCommand {
        program,
        args: iter.collect(),
    })
}

/// Build the final command, wrapping it in `terminal -e` when the entry asks for a terminal.
pub fn build_launch_command(
    exec: &str,
    needs_terminal: bool,
    terminal: &str,
    ctx: &ExecContext<'_>,
) -> Result<LaunchCommand, LaunchError> {
    let cmd = parse_exec(exec, ctx)?;
    if !needs_terminal {
        return Ok(cmd);
    }

    let mut wrapped = parse_terminal(terminal)?;
    wrapped.args.push("-e".to_string());
    wrapped.args.push(cmd.program);
    wrapped.args.extend(cmd.args);
    Ok(wrapped)
}

/// Spawn the command detached from our stdio and reap it on a background thread.
pub fn spawn_detached(cmd: &LaunchCommand, working_dir: Option<&Path>) -> std::io::Result<u32> {
    let mut command = Command::new(&cmd.program);
    command
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if let Some(dir) = working_dir.filter(|d| d.is_dir()) {
        command.current_dir(dir);
    }

    let mut child = command.spawn()?;
    let pid = child.id();
    let program: PathBuf = cmd.program.clone().into();
    std::thread::spawn(move || match child.wait() {
        Ok(status) => tracing::debug!(pid, program = %program.display(), %status, "launched app exited"),
        Err(e) => tracing::debug!(pid, error = %e, "failed to wait on launched app"),
    });
    Ok(pid)
}
