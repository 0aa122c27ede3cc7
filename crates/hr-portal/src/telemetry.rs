use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Crates whose verbosity follows `portal_level`.
const PORTAL_TARGETS: [&str; 2] = ["hr_portal", "hr_portal_console"];

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid log filter '{value}': unable to build EnvFilter")
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Filter built from the configured level plus per-crate portal directives.
///
/// Directives already naming a portal crate are left alone.
pub fn filter_directives(config: &TelemetryConfig) -> String {
    let mut directives = config.log_level.trim().to_string();
    let Some(level) = config.portal_level.as_deref() else {
        return directives;
    };

    for target in PORTAL_TARGETS {
        let named = directives
            .split(',')
            .any(|directive| directive.trim().split('=').next() == Some(target));
        if !named {
            if !directives.is_empty() {
                directives.push(',');
            }
            directives.push_str(&format!("{target}={level}"));
        }
    }
    directives
}

/// Install the global subscriber. `RUST_LOG` wins over the configured filter.
///
/// Logs go to stderr so console output on stdout stays readable.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directives = filter_directives(config);
            EnvFilter::try_new(&directives).map_err(|source| TelemetryError::EnvFilter {
                value: directives,
                source,
            })?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(config.include_targets)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(log_level: &str, portal_level: Option<&str>) -> TelemetryConfig {
        TelemetryConfig {
            log_level: log_level.to_string(),
            portal_level: portal_level.map(str::to_string),
            include_targets: false,
        }
    }

    #[test]
    fn development_raises_portal_crates_only() {
        assert_eq!(
            filter_directives(&config("info", Some("debug"))),
            "info,hr_portal=debug,hr_portal_console=debug"
        );
    }

    #[test]
    fn explicit_portal_directive_is_kept() {
        assert_eq!(
            filter_directives(&config("warn,hr_portal=trace", Some("debug"))),
            "warn,hr_portal=trace,hr_portal_console=debug"
        );
    }

    #[test]
    fn production_uses_the_configured_level_verbatim() {
        assert_eq!(filter_directives(&config("info", None)), "info");
    }

    #[test]
    fn every_generated_filter_parses() {
        for level in ["info", "warn,reqwest=error", ""] {
            let directives = filter_directives(&config(level, Some("debug")));
            assert!(EnvFilter::try_new(&directives).is_ok(), "{directives}");
        }
    }
}
