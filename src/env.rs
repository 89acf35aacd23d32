use std::env::VarError;

/// Parse a flag value such as "1", "Yes" or "off".
///
/// Matching ignores case and surrounding whitespace. Returns `None` if the
/// value is not recognized.
pub fn str_as_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean option from the environment variable `name`.
///
/// Returns `default` if the variable is unset, or set to a value which is not
/// a recognized flag. Unrecognized values are logged.
pub fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => str_as_bool(&value).unwrap_or_else(|| {
            log::warn!(
                "Ignoring {}=\"{}\", expected a boolean. Using {}",
                name,
                value,
                default
            );
            default
        }),
        Err(VarError::NotPresent) => default,
        Err(VarError::NotUnicode(_)) => {
            log::warn!("Ignoring {} with non-UTF-8 value. Using {}", name, default);
            default
        }
    }
}
