use reqwest::Url;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_SUBMISSION_URL: &str = "http://127.0.0.1:8787/applications";
const DEFAULT_DEPARTMENT_URL: &str = "http://127.0.0.1:8787/department";

/// Distinguishes runtime behavior for different stages of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the portal client and its sandbox.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub endpoints: EndpointConfig,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let submission_url = url_var("HR_SUBMISSION_URL", DEFAULT_SUBMISSION_URL)?;
        let department_url = url_var("HR_DEPARTMENT_URL", DEFAULT_DEPARTMENT_URL)?;
        let request_timeout = match env::var("HR_HTTP_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or(ConfigError::InvalidTimeout { value: raw })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8787".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            endpoints: EndpointConfig {
                submission_url,
                department_url,
                request_timeout,
            },
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                portal_level: (environment == AppEnvironment::Development)
                    .then(|| "debug".to_string()),
                include_targets: environment == AppEnvironment::Development,
            },
        })
    }
}

fn url_var(name: &'static str, default: &str) -> Result<Url, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    Url::parse(raw.trim()).map_err(|err| ConfigError::InvalidUrl {
        variable: name,
        reason: err.to_string(),
        value: raw,
    })
}

/// Remote collaborators the portal talks to.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub submission_url: Url,
    pub department_url: Url,
    /// `None` leaves the bound to the transport.
    pub request_timeout: Option<Duration>,
}

/// Bind address for the sandbox endpoints.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// Extra verbosity for the portal's own crates; debug in development.
    pub portal_level: Option<String>,
    pub include_targets: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidUrl {
        variable: &'static str,
        value: String,
        reason: String,
    },
    InvalidTimeout {
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidUrl {
                variable,
                value,
                reason,
            } => write!(f, "{variable} must be an absolute URL, got '{value}' ({reason})"),
            ConfigError::InvalidTimeout { value } => write!(
                f,
                "HR_HTTP_TIMEOUT_SECS must be a positive number of seconds, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidUrl { .. }
            | ConfigError::InvalidTimeout { .. } => None,
        }
    }
}
