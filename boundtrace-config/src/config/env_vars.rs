//! Environment variable allowlist and substitution for exclusion paths.
//!
//! Only allowlisted variables (and `BOUNDTRACE_*` prefixed ones) are
//! resolved by default so a shared config file cannot pull arbitrary
//! environment values into the process.

use regex::Regex;
use std::sync::LazyLock;

/// Matches `${VAR_NAME}` or `${VAR_NAME:-default_value}`.
static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-((?:[^}\\]|\\.)*))?}")
        .expect("env-var substitution regex is a compile-time constant and must be valid")
});

/// Environment variables that are safe to substitute in config files.
pub const ALLOWED_ENV_VARS: &[&str] = &[
    "HOME",
    "USER",
    "USERNAME",
    "USERPROFILE", // Windows
    "CARGO_HOME",
    "RUSTUP_HOME",
    "XDG_CONFIG_HOME",
    "XDG_DATA_HOME",
    "XDG_CACHE_HOME",
    "TMPDIR",
    "TEMP",
    "TMP",
    "APPDATA",
    "LOCALAPPDATA",
];

/// Check whether a variable name is on the substitution allowlist.
pub fn is_env_var_allowed(var_name: &str) -> bool {
    ALLOWED_ENV_VARS.contains(&var_name) || var_name.starts_with("BOUNDTRACE_")
}

/// Substitute `${VAR_NAME}` patterns in a string with environment variable values.
///
/// - `${VAR}` is replaced with the value of `VAR`; unset variables are left as-is.
/// - `${VAR:-default}` falls back to `default` when `VAR` is unset.
/// - `$${VAR}` is an escape and produces the literal `${VAR}`.
///
/// Non-allowlisted variables are left untouched and a warning is logged.
pub fn substitute_variables(input: &str) -> String {
    substitute_variables_with_allowlist(input, false)
}

/// Substitute variables with explicit allowlist control.
pub fn substitute_variables_with_allowlist(input: &str, allow_all: bool) -> String {
    let escaped_placeholder = "\x00ESC_DOLLAR\x00";
    let working = input.replace("$${", escaped_placeholder);

    let result = ENV_VAR_PATTERN.replace_all(&working, |caps: &regex::Captures| {
        let var_name = &caps[1];

        if !allow_all && !is_env_var_allowed(var_name) {
            log::warn!(
                "Config references non-allowlisted environment variable: ${{{var_name}}} - skipped. \
                 Add `allow_all_env_vars: true` to your config to allow all variables."
            );
            return caps[0].to_string();
        }

        match std::env::var(var_name) {
            Ok(val) => val,
            Err(_) => caps
                .get(2)
                .map(|m| m.as_str().replace("\\}", "}"))
                .unwrap_or_else(|| caps[0].to_string()),
        }
    });

    result.replace(escaped_placeholder, "${")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_used_when_unset() {
        let out = substitute_variables("${BOUNDTRACE_TEST_SURELY_UNSET:-/opt/internal}/src");
        assert_eq!(out, "/opt/internal/src");
    }

    #[test]
    fn test_non_allowlisted_left_alone() {
        let out = substitute_variables("${SECRET_TOKEN}/x");
        assert_eq!(out, "${SECRET_TOKEN}/x");
    }

    #[test]
    fn test_escaped_dollar() {
        let out = substitute_variables("$${HOME}/lib");
        assert_eq!(out, "${HOME}/lib");
    }

    #[test]
    fn test_allow_all_resolves_default() {
        let out = substitute_variables_with_allowlist("${SOME_UNSET_VAR_XYZ:-fallback}", true);
        assert_eq!(out, "fallback");
    }

    #[test]
    fn test_allowlist() {
        assert!(is_env_var_allowed("HOME"));
        assert!(is_env_var_allowed("BOUNDTRACE_INTERNAL_DIR"));
        assert!(!is_env_var_allowed("AWS_SECRET_ACCESS_KEY"));
    }
}
