//! Builtin Interceptor
//!
//! `cd`, `pwd`, `export` and `unset` change state that must outlive the
//! command, so they run against [`SessionState`] in-process instead of in a
//! child shell. Lines containing shell control operators are left to the
//! shell, since only the first simple command could be honoured here.

use crate::error::{Error, Result};
use crate::session::SessionState;
use nix::unistd::User;
use std::fmt::Write as _;
use std::iter::Peekable;
use std::path::PathBuf;
use std::str::Chars;

/// Commands handled without spawning a process
pub const INTERCEPTED: &[&str] = &["cd", "pwd", "export", "unset"];

/// Characters that make a line more than one simple command
const CONTROL_OPERATORS: &[&str] = &[";", "&", "|", "<", ">", "`", "$("];

/// Whether `line` would be handled in-process
pub fn is_intercepted(line: &str) -> bool {
    parse(line).is_some()
}

fn parse(line: &str) -> Option<Vec<String>> {
    if CONTROL_OPERATORS.iter().any(|op| line.contains(op)) {
        return None;
    }

    let tokens = shlex::split(line.trim())?;
    match tokens.first() {
        Some(first) if INTERCEPTED.contains(&first.as_str()) => Some(tokens),
        _ => None,
    }
}

/// Run `line` as a builtin if it is one
///
/// Returns `None` when the line must go to the executor. Otherwise returns
/// the display text: empty on a silent success, `❌`-prefixed on failure.
pub fn handle(session: &mut SessionState, line: &str) -> Option<String> {
    parse(line)?;
    let words = split_words(session, line.trim())?;
    let (name, args) = words.split_first()?;

    debug!("Intercepting builtin {}", name);
    let result = match name.as_str() {
        "cd" => change_directory(session, args.first().map(String::as_str)).map(|_| String::new()),
        "pwd" => Ok(session.current_dir().display().to_string()),
        "export" => export(session, args),
        "unset" => unset(session, args).map(|_| String::new()),
        _ => return None,
    };

    Some(result.unwrap_or_else(|e| e.to_display_text()))
}

/// Change the session directory; state is untouched on error
pub fn change_directory(session: &mut SessionState, target: Option<&str>) -> Result<()> {
    let requested = match target {
        None | Some("") => session.home_dir().ok_or(Error::HomeNotFound)?,
        Some("-") => session
            .previous_dir()
            .map(PathBuf::from)
            .ok_or(Error::NoPreviousDirectory)?,
        Some(path) if path.starts_with('~') => expand_tilde(session, path)?,
        Some(path) => {
            let path = PathBuf::from(path);
            if path.is_absolute() {
                path
            } else {
                session.current_dir().join(path)
            }
        }
    };

    let shown = target.unwrap_or("~").to_string();
    let resolved = requested
        .canonicalize()
        .map_err(|_| Error::DirectoryNotFound {
            target: shown.clone(),
        })?;
    if !resolved.is_dir() {
        return Err(Error::NotADirectory { target: shown });
    }

    debug!("cd {} -> {}", shown, resolved.display());
    session.change_dir(resolved);
    Ok(())
}

/// Resolve `~`, `~/rest`, `~user` and `~user/rest`
fn expand_tilde(session: &SessionState, path: &str) -> Result<PathBuf> {
    let rest = path.strip_prefix('~').unwrap_or(path);
    let (user, tail) = match rest.split_once('/') {
        Some((user, tail)) => (user, tail),
        None => (rest, ""),
    };

    let home = if user.is_empty() {
        session.home_dir().ok_or(Error::HomeNotFound)?
    } else {
        match User::from_name(user) {
            Ok(Some(entry)) => entry.dir,
            Ok(None) | Err(_) => {
                return Err(Error::DirectoryNotFound {
                    target: path.to_string(),
                })
            }
        }
    };

    Ok(if tail.is_empty() { home } else { home.join(tail) })
}

fn export(session: &mut SessionState, args: &[String]) -> Result<String> {
    if args.is_empty() {
        let mut listing = String::new();
        for (name, value) in session.env() {
            let _ = writeln!(listing, "export {}=\"{}\"", name, value);
        }
        return Ok(listing.trim_end().to_string());
    }

    for arg in args {
        let (name, value) = match arg.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (arg.as_str(), None),
        };
        validate_identifier("export", name)?;

        // A bare name only marks an existing variable for export
        if let Some(value) = value {
            session.set_var(name, value.to_string());
        }
    }

    Ok(String::new())
}

fn unset(session: &mut SessionState, args: &[String]) -> Result<()> {
    for name in args {
        validate_identifier("unset", name)?;
        session.remove_var(name);
    }
    Ok(())
}

fn validate_identifier(builtin: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric());

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier {
            builtin: builtin.to_string(),
            name: name.to_string(),
        })
    }
}

/// Split `line` into words the way `sh` would for a simple command
///
/// `$NAME` and `${NAME}` expand against the session environment outside
/// single quotes. Returns `None` on an unterminated quote.
fn split_words(session: &SessionState, line: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '\'' => break,
                        c => word.push(c),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' => match chars.next()? {
                            c @ ('"' | '\\' | '$' | '`') => word.push(c),
                            '\n' => {}
                            c => {
                                word.push('\\');
                                word.push(c);
                            }
                        },
                        '$' => expand_var(session, &mut chars, &mut word),
                        c => word.push(c),
                    }
                }
            }
            '\\' => {
                in_word = true;
                match chars.next() {
                    Some('\n') | None => {}
                    Some(c) => word.push(c),
                }
            }
            '$' => {
                in_word = true;
                expand_var(session, &mut chars, &mut word);
            }
            c => {
                in_word = true;
                word.push(c);
            }
        }
    }

    if in_word {
        words.push(word);
    }
    Some(words)
}

/// Expand the variable reference following a `$` into `out`
fn expand_var(session: &SessionState, chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    let braced = chars.peek() == Some(&'{');
    if braced {
        chars.next();
    }

    let mut name = String::new();
    while let Some(&next) = chars.peek() {
        if next == '_' || next.is_ascii_alphanumeric() {
            name.push(next);
            chars.next();
        } else {
            break;
        }
    }

    if braced {
        if chars.peek() == Some(&'}') {
            chars.next();
        } else {
            out.push_str("${");
            out.push_str(&name);
            return;
        }
    }

    if name.is_empty() {
        out.push('$');
    } else {
        out.push_str(session.var(&name).unwrap_or(""));
    }
}
