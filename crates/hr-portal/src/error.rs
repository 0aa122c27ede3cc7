use crate::careers::SubmissionError;
use crate::config::ConfigError;
use crate::department::DepartmentError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Client(reqwest::Error),
    Submission(SubmissionError),
    Department(DepartmentError),
}

impl AppError {
    /// Workflow failures the user already saw as a notification.
    pub fn is_reported(&self) -> bool {
        match self {
            AppError::Submission(err) => err.notification().is_some(),
            AppError::Department(err) => matches!(err, DepartmentError::Gateway(_)),
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) | AppError::Client(_) => {
                false
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Client(err) => write!(f, "http client error: {}", err),
            AppError::Submission(err) => write!(f, "application error: {}", err),
            AppError::Department(err) => write!(f, "department error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Client(err) => Some(err),
            AppError::Submission(err) => Some(err),
            AppError::Department(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        Self::Client(value)
    }
}

impl From<SubmissionError> for AppError {
    fn from(value: SubmissionError) -> Self {
        Self::Submission(value)
    }
}

impl From<DepartmentError> for AppError {
    fn from(value: DepartmentError) -> Self {
        Self::Department(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::careers::ValidationError;
    use crate::department::{GatewayError, Resource};
    use std::error::Error;

    #[test]
    fn validation_failures_are_not_reported_as_notices() {
        let err = AppError::from(SubmissionError::from(ValidationError::MissingField("email")));
        assert!(!err.is_reported());
        assert!(err.to_string().starts_with("application error:"));
        assert!(err.source().is_some());
    }

    #[test]
    fn gateway_failures_were_already_shown() {
        let err = AppError::from(DepartmentError::from(GatewayError::Rejected {
            resource: Resource::Tasks,
            status: 400,
            message: Some("Invalid request".to_string()),
        }));
        assert!(err.is_reported());
        assert_eq!(
            err.to_string(),
            "department error: tasks request rejected with status 400"
        );
    }
}
