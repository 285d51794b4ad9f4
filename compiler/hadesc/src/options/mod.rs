//! Session configuration.

use hades_diagnostic::DiagnosticConfig;
use hades_mono::MonoConfig;
use tracing::warn;

/// Environment variable overriding [`DiagnosticConfig::error_limit`].
const ERROR_LIMIT_VAR: &str = "HADES_ERROR_LIMIT";
/// Environment variable overriding [`MonoConfig::max_specializations`].
const MAX_SPECIALIZATIONS_VAR: &str = "HADES_MAX_SPECIALIZATIONS";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub diagnostics: DiagnosticConfig,
    pub mono: MonoConfig,
}

impl Options {
    /// Defaults, overridden by `HADES_ERROR_LIMIT` and
    /// `HADES_MAX_SPECIALIZATIONS` when they are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Options::from_env`], reading variables through `lookup`.
    ///
    /// Values that are not unsigned integers are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Options::default();
        if let Some(limit) = parse_count(&lookup, ERROR_LIMIT_VAR) {
            options.diagnostics.error_limit = limit;
        }
        if let Some(max) = parse_count(&lookup, MAX_SPECIALIZATIONS_VAR) {
            options.mono.max_specializations = max;
        }
        options
    }
}

fn parse_count(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<usize> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(count) => Some(count),
        Err(error) => {
            warn!(var = key, value = %raw, %error, "ignoring invalid setting");
            None
        }
    }
}
