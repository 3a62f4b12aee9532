//! Prompt Rendering
//!
//! Format: `|>| user@host:cwd ` with the home directory collapsed to `~`.

use std::path::Path;

/// Prompt prefix shown before the user and host
pub const PROMPT_MARK: &str = "|>|";

/// Render the prompt for the given identity and directory
pub fn render_prompt(user: &str, host: &str, cwd: &Path, home: Option<&Path>) -> String {
    format!("{} {}@{}:{} ", PROMPT_MARK, user, host, display_dir(cwd, home))
}

/// `cwd` with a leading home directory replaced by `~`
pub fn display_dir(cwd: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home {
        if cwd == home {
            return "~".to_string();
        }
        if let Ok(stripped) = cwd.strip_prefix(home) {
            return format!("~/{}", stripped.display());
        }
    }
    cwd.display().to_string()
}

/// Login name of the current user
pub fn current_user() -> String {
    ["USER", "LOGNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "user".to_string())
}

/// Short host name of this machine
pub fn current_host() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .map(|h| h.split('.').next().unwrap_or_default().to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
