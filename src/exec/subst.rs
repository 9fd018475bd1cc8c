// src/exec/subst.rs

//! `${name}` variable substitution for commands and working directories.
//!
//! Recognized variables:
//! - `user.dir` — the supervisor's invocation directory
//! - `user.home` — the invoking user's home directory
//! - `jon.current.dir` — absolute normalized current working directory at
//!   spawn time
//! - any environment variable prefixed `jon.cmdexec.subst.` — passed through
//!   verbatim under its full name
//!
//! Unknown tokens are left intact. Substitution is a single pass, so it is
//! idempotent as long as variable values do not themselves contain tokens.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Environment prefix for user-supplied substitution variables.
pub const SUBST_ENV_PREFIX: &str = "jon.cmdexec.subst.";

const USER_DIR_VAR: &str = "user.dir";
const USER_HOME_VAR: &str = "user.home";
const CURRENT_DIR_VAR: &str = "jon.current.dir";

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("token regex is valid"));

/// Build the substitution map for one spawn.
///
/// `invocation_dir` is the directory the supervisor was started from; it is
/// captured once at startup and reused, while `jon.current.dir` reflects the
/// working directory at the moment of the call.
pub fn substitution_map(invocation_dir: &Path) -> HashMap<String, String> {
    let mut vars = HashMap::new();

    for (key, value) in std::env::vars() {
        if key.starts_with(SUBST_ENV_PREFIX) {
            vars.insert(key, value);
        }
    }

    if let Some(home) = dirs::home_dir() {
        vars.insert(USER_HOME_VAR.to_string(), home.display().to_string());
    }
    vars.insert(
        USER_DIR_VAR.to_string(),
        invocation_dir.display().to_string(),
    );

    if let Ok(current) = std::env::current_dir() {
        let normalized = current.canonicalize().unwrap_or(current);
        vars.insert(CURRENT_DIR_VAR.to_string(), normalized.display().to_string());
    }

    vars
}

/// Rewrite `${name}` tokens in `input` from `vars`, leaving unknown tokens
/// intact.
pub fn substitute(input: &str, vars: &HashMap<String, String>) -> String {
    TOKEN_RE
        .replace_all(input, |caps: &Captures<'_>| {
            match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn vars() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("user.dir".to_string(), "/srv/app".to_string());
        m.insert("jon.cmdexec.subst.port".to_string(), "8080".to_string());
        m
    }

    #[test]
    fn replaces_known_tokens() {
        let out = substitute("serve --root ${user.dir} --port ${jon.cmdexec.subst.port}", &vars());
        assert_eq!(out, "serve --root /srv/app --port 8080");
    }

    #[test]
    fn leaves_unknown_tokens_intact() {
        let out = substitute("run ${no.such.var}", &vars());
        assert_eq!(out, "run ${no.such.var}");
    }

    #[test]
    fn substitution_is_idempotent() {
        let v = vars();
        let once = substitute("cd ${user.dir} && ${missing}", &v);
        let twice = substitute(&once, &v);
        assert_eq!(once, twice);
    }

    #[test]
    fn map_contains_builtin_variables() {
        let m = substitution_map(&PathBuf::from("/tmp"));
        assert_eq!(m.get("user.dir").map(String::as_str), Some("/tmp"));
        assert!(m.contains_key("jon.current.dir"));
    }
}
