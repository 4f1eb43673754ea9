//! Settings validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: ControllerSettings → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::settings::schema::ControllerSettings;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_settings(settings: &ControllerSettings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("{:?} is not a socket address", settings.listener.bind_address),
        ));
    }
    if settings.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be greater than 0"));
    }
    if settings.source.config_dir.trim().is_empty() {
        errors.push(ValidationError::new("source.config_dir", "must not be empty"));
    }
    if settings.source.poll_interval_ms == 0 {
        errors.push(ValidationError::new("source.poll_interval_ms", "must be greater than 0"));
    }
    if !LOG_LEVELS.contains(&settings.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("{:?} is not one of {}", settings.observability.log_level, LOG_LEVELS.join(", ")),
        ));
    }
    if settings.observability.metrics_enabled
        && settings.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", settings.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
